//! Seams between the scan engine and its collaborators.
//!
//! The engine only ever talks to these traits, so the HTTP clients, the
//! database and SMTP can be swapped for in-memory doubles in tests.

use async_trait::async_trait;

use crate::error::{NotifyError, ProviderError, StoreError};
use crate::models::{AlertThreshold, HistorySeries, QuoteMap, SentimentIndex};

/// Current quotes and the market-wide sentiment index.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// One batched call for every symbol. All-or-nothing.
    async fn get_quotes(&self, symbols: &[String]) -> Result<QuoteMap, ProviderError>;

    async fn get_sentiment(&self) -> Result<SentimentIndex, ProviderError>;
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn get_history(&self, symbol: &str, days: u32) -> Result<HistorySeries, ProviderError>;
}

#[async_trait]
pub trait ThresholdStore: Send + Sync {
    /// Persists a new record and returns its generated id (hex).
    async fn create(&self, threshold: &AlertThreshold) -> Result<String, StoreError>;

    async fn get_all(&self) -> Result<Vec<AlertThreshold>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}
