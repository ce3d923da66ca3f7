//! The alert scan: load thresholds, fetch market data once per symbol,
//! evaluate every threshold and send one email per fired check.

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::Duration,
};

use tokio::{sync::Mutex, time};

use crate::{
    error::ScanError,
    models::{AlertEvent, AlertThreshold, HistorySeries, QuoteMap, SentimentIndex},
    services::{
        alert_message::AlertMessageRenderer,
        evaluation::{enabled_checks, CheckOutcome, MarketContext},
        traits::{HistoryProvider, Notifier, QuoteProvider, ThresholdStore},
    },
};

pub const DEFAULT_HISTORY_DAYS: u32 = 90;

/// Market data gathered for one scan, keyed by symbol.
struct MarketSnapshot {
    quotes: QuoteMap,
    sentiment: Option<SentimentIndex>,
    history: HashMap<String, Arc<HistorySeries>>,
}

impl MarketSnapshot {
    /// None when the quote provider returned nothing for `symbol`.
    fn context_for(&self, symbol: &str) -> Option<MarketContext<'_>> {
        let quote = self.quotes.get(symbol)?;
        Some(MarketContext {
            quote,
            sentiment: self.sentiment.as_ref(),
            history: self.history.get(symbol),
        })
    }
}

pub struct AlertScanner {
    store: Arc<dyn ThresholdStore>,
    quotes: Arc<dyn QuoteProvider>,
    history: Arc<dyn HistoryProvider>,
    notifier: Arc<dyn Notifier>,
    messages: AlertMessageRenderer,
    history_days: u32,
    // one scan at a time; later callers wait for the running one
    running: Mutex<()>,
}

impl AlertScanner {
    pub fn new(
        store: Arc<dyn ThresholdStore>,
        quotes: Arc<dyn QuoteProvider>,
        history: Arc<dyn HistoryProvider>,
        notifier: Arc<dyn Notifier>,
        messages: AlertMessageRenderer,
    ) -> Self {
        Self {
            store,
            quotes,
            history,
            notifier,
            messages,
            history_days: DEFAULT_HISTORY_DAYS,
            running: Mutex::new(()),
        }
    }

    pub fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }

    /// Runs one full scan and returns every alert that fired, including
    /// those whose email could not be delivered.
    pub async fn run_scan(&self) -> Result<Vec<AlertEvent>, ScanError> {
        let _guard = self.running.lock().await;

        let thresholds = self.store.get_all().await.map_err(|e| {
            tracing::error!(error = %e, "error getting thresholds from store");
            ScanError::Store(e)
        })?;

        if thresholds.is_empty() {
            tracing::info!("no thresholds found");
            return Ok(Vec::new());
        }

        let symbols = distinct_symbols(&thresholds);
        tracing::info!(thresholds = thresholds.len(), symbols = symbols.len(), "alert scan started");

        let snapshot = self.fetch_market(&symbols).await?;

        let mut alerts = Vec::new();
        for threshold in &thresholds {
            let Some(ctx) = snapshot.context_for(&threshold.crypto_symbol) else {
                tracing::debug!(symbol = %threshold.crypto_symbol, email = %threshold.email, "no quote for symbol, skipping threshold");
                continue;
            };

            let fired_before = alerts.len();
            self.evaluate_threshold(threshold, ctx, &mut alerts).await;

            if alerts.len() == fired_before {
                tracing::info!(
                    email = %threshold.email,
                    symbol = %threshold.crypto_symbol,
                    "no alerts, all variations within thresholds"
                );
            }
        }

        tracing::info!(
            thresholds = thresholds.len(),
            alerts = alerts.len(),
            "alert scan finished"
        );
        Ok(alerts)
    }

    async fn fetch_market(&self, symbols: &[String]) -> Result<MarketSnapshot, ScanError> {
        let quotes = self.quotes.get_quotes(symbols).await.map_err(|e| {
            tracing::error!(error = %e, "error getting crypto prices");
            ScanError::Quotes(e)
        })?;

        let sentiment = match self.quotes.get_sentiment().await {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "failed to get sentiment index, continuing without it");
                None
            }
        };

        let mut history = HashMap::new();
        for symbol in symbols {
            match self.history.get_history(symbol, self.history_days).await {
                Ok(series) => {
                    history.insert(symbol.clone(), Arc::new(series));
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "failed to get history, continuing without it");
                }
            }
        }

        Ok(MarketSnapshot {
            quotes,
            sentiment,
            history,
        })
    }

    async fn evaluate_threshold(
        &self,
        threshold: &AlertThreshold,
        ctx: MarketContext<'_>,
        alerts: &mut Vec<AlertEvent>,
    ) {
        for check in enabled_checks(threshold) {
            match check.evaluate(threshold, ctx) {
                CheckOutcome::Fired(mut alert) => {
                    alert.delivered = self.deliver(&alert).await;
                    alerts.push(alert);
                }
                CheckOutcome::NotCrossed => {}
                CheckOutcome::MissingData => {
                    tracing::warn!(
                        symbol = %threshold.crypto_symbol,
                        period = check.kind.label(),
                        "provider did not supply a percent change, check skipped"
                    );
                }
            }
        }
    }

    /// One delivery attempt. Failure is logged and reported, never raised.
    async fn deliver(&self, alert: &AlertEvent) -> bool {
        let subject = self.messages.subject(alert);
        let body = self.messages.body(alert);

        match self.notifier.send(&alert.email, &subject, &body).await {
            Ok(()) => {
                tracing::info!(
                    email = %alert.email,
                    symbol = %alert.symbol,
                    period = alert.period_label(),
                    direction = %alert.direction,
                    "alert email sent"
                );
                true
            }
            Err(e) => {
                tracing::error!(email = %alert.email, symbol = %alert.symbol, error = %e, "failed to send alert email");
                false
            }
        }
    }
}

/// Distinct symbols referenced by any threshold, sorted.
pub fn distinct_symbols(thresholds: &[AlertThreshold]) -> Vec<String> {
    thresholds
        .iter()
        .map(|t| t.crypto_symbol.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Runs a scan every `every` in the background. Errors are logged and the
/// loop keeps going.
pub fn spawn_scan_scheduler(scanner: Arc<AlertScanner>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match scanner.run_scan().await {
                Ok(alerts) => tracing::info!(alerts = alerts.len(), "scheduled scan done"),
                Err(e) => tracing::error!(error = %e, "scheduled scan failed"),
            }
        }
    });
}
