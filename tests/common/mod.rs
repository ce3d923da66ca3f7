//! In-memory doubles for the scan collaborators.
#![allow(dead_code)]

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use crypto_alerts::{
    error::{NotifyError, ProviderError, StoreError},
    models::{AlertThreshold, HistorySeries, Period, PricePoint, Quote, QuoteMap, SentimentIndex},
    services::{
        alert_message::AlertMessageRenderer,
        alert_scan::AlertScanner,
        traits::{HistoryProvider, Notifier, QuoteProvider, ThresholdStore},
    },
    AppState,
};

#[derive(Default)]
pub struct MemoryStore {
    pub items: Mutex<Vec<AlertThreshold>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    next_id: AtomicUsize,
}

impl MemoryStore {
    pub fn with(items: Vec<AlertThreshold>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<AlertThreshold> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThresholdStore for MemoryStore {
    async fn create(&self, threshold: &AlertThreshold) -> Result<String, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("write refused".into()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().push(threshold.clone());
        Ok(format!("{id:024x}"))
    }

    async fn get_all(&self) -> Result<Vec<AlertThreshold>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("read refused".into()));
        }
        Ok(self.saved())
    }
}

#[derive(Default)]
pub struct FakeQuotes {
    pub quotes: QuoteMap,
    pub sentiment: Option<SentimentIndex>,
    pub fail_quotes: bool,
    pub requests: Mutex<Vec<Vec<String>>>,
    pub sentiment_calls: AtomicUsize,
}

impl FakeQuotes {
    pub fn with(quotes: Vec<(&str, Quote)>) -> Self {
        Self {
            quotes: quotes.into_iter().map(|(s, q)| (s.to_string(), q)).collect(),
            sentiment: Some(SentimentIndex {
                value: 40,
                classification: "Fear".into(),
            }),
            ..Self::default()
        }
    }

    pub fn quote_calls(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteProvider for FakeQuotes {
    async fn get_quotes(&self, symbols: &[String]) -> Result<QuoteMap, ProviderError> {
        self.requests.lock().unwrap().push(symbols.to_vec());
        if self.fail_quotes {
            return Err(ProviderError::Api("quotes down".into()));
        }
        Ok(self
            .quotes
            .iter()
            .filter(|(s, _)| symbols.contains(*s))
            .map(|(s, q)| (s.clone(), q.clone()))
            .collect())
    }

    async fn get_sentiment(&self) -> Result<SentimentIndex, ProviderError> {
        self.sentiment_calls.fetch_add(1, Ordering::SeqCst);
        self.sentiment
            .clone()
            .ok_or_else(|| ProviderError::Api("sentiment down".into()))
    }
}

#[derive(Default)]
pub struct FakeHistory {
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<(String, u32)>>,
}

impl FakeHistory {
    pub fn failing_for(symbols: &[&str]) -> Self {
        Self {
            failing: symbols.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryProvider for FakeHistory {
    async fn get_history(&self, symbol: &str, days: u32) -> Result<HistorySeries, ProviderError> {
        self.calls.lock().unwrap().push((symbol.to_string(), days));
        if self.failing.contains(symbol) {
            return Err(ProviderError::UnsupportedSymbol(symbol.to_string()));
        }
        Ok(HistorySeries::new(
            symbol,
            vec![
                PricePoint { timestamp: 1, price: 100.0 },
                PricePoint { timestamp: 2, price: 200.0 },
            ],
            vec![],
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        // attempts are recorded even when they fail
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.fail {
            return Err(NotifyError::Transport("smtp down".into()));
        }
        Ok(())
    }
}

/// Quote with every percent figure present and set to zero.
pub fn flat_quote(name: &str, price: f64) -> Quote {
    let mut q = Quote {
        name: name.to_string(),
        price,
        volume_24h: 1_000_000.0,
        ..Quote::default()
    };
    for p in Period::ALL {
        q.set_percent_change(p, Some(0.0));
    }
    q
}

pub fn quote_24h(name: &str, price: f64, change: f64) -> Quote {
    let mut q = flat_quote(name, price);
    q.set_percent_change(Period::H24, Some(change));
    q
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub quotes: Arc<FakeQuotes>,
    pub history: Arc<FakeHistory>,
    pub notifier: Arc<RecordingNotifier>,
    pub scanner: Arc<AlertScanner>,
}

impl Harness {
    pub fn new(store: MemoryStore, quotes: FakeQuotes, history: FakeHistory, notifier: RecordingNotifier) -> Self {
        let store = Arc::new(store);
        let quotes = Arc::new(quotes);
        let history = Arc::new(history);
        let notifier = Arc::new(notifier);

        let scanner = Arc::new(AlertScanner::new(
            store.clone(),
            quotes.clone(),
            history.clone(),
            notifier.clone(),
            AlertMessageRenderer::new().unwrap(),
        ));

        Self {
            store,
            quotes,
            history,
            notifier,
            scanner,
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            scanner: self.scanner.clone(),
            store: self.store.clone(),
            quotes: self.quotes.clone(),
        }
    }
}
