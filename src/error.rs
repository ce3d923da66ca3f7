//! Error types for each layer of the service.

use thiserror::Error;

use crate::models::{Direction, Period};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Failure talking to a market-data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no symbols provided")]
    NoSymbols,

    #[error("symbol {0} is not supported by the history provider")]
    UnsupportedSymbol(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider error: {0}")]
    Api(String),

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("could not build message: {0}")]
    Message(String),

    #[error("could not send alert email: {0}")]
    Transport(String),
}

/// First violated rule of a threshold record.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("email is required")]
    MissingEmail,

    #[error("crypto symbol is required")]
    MissingSymbol,

    #[error("threshold {direction} {period} percent is required when enabled")]
    MissingPercent { period: Period, direction: Direction },

    #[error("threshold down {0} percent must be negative")]
    NonNegativeLowerBound(Period),

    #[error("target price {0} is required when enabled")]
    MissingTargetPrice(Direction),

    #[error("target price {0} must be positive")]
    NonPositiveTargetPrice(Direction),
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors that abort a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not load thresholds: {0}")]
    Store(#[from] StoreError),

    #[error("could not fetch quotes: {0}")]
    Quotes(#[source] ProviderError),
}
