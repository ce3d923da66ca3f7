//! Library entrypoint for the crypto alert service.
//!
//! The binary only wires real collaborators into [`AppState`]; integration
//! tests under `tests/` build the same state around in-memory doubles.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub mod controllers;
pub mod routes;

use services::{
    alert_scan::AlertScanner,
    traits::{QuoteProvider, ThresholdStore},
};

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<AlertScanner>,
    pub store: Arc<dyn ThresholdStore>,
    pub quotes: Arc<dyn QuoteProvider>,
}
