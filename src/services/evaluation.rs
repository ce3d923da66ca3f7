//! Per-threshold trigger rules.
//!
//! A threshold expands into a fixed, ordered list of [`Check`]s: for each
//! period 1h..90d the upper then the lower percent bound, then target-up and
//! target-down. Every enabled check is evaluated; one firing never stops the
//! next. Bounds are inclusive.

use std::sync::Arc;

use crate::models::{
    AlertEvent, AlertThreshold, CheckKind, Direction, HistorySeries, Period, Quote, SentimentIndex,
};

/// One enabled comparison taken from a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Check {
    pub kind: CheckKind,
    pub direction: Direction,
    pub bound: f64,
}

/// Market data available to one threshold during a scan.
#[derive(Debug, Clone, Copy)]
pub struct MarketContext<'a> {
    pub quote: &'a Quote,
    pub sentiment: Option<&'a SentimentIndex>,
    pub history: Option<&'a Arc<HistorySeries>>,
}

#[derive(Debug)]
pub enum CheckOutcome {
    Fired(AlertEvent),
    NotCrossed,
    // the provider did not supply the figure this check compares against
    MissingData,
}

/// Enabled checks of `threshold`, in evaluation order.
///
/// A flag set without its value is skipped; creation rejects such records,
/// but rows written elsewhere may still carry them.
pub fn enabled_checks(threshold: &AlertThreshold) -> Vec<Check> {
    let mut checks = Vec::new();

    for period in Period::ALL {
        for direction in [Direction::Up, Direction::Down] {
            if let Some(bound) = threshold.percent_bound(period, direction).active() {
                checks.push(Check {
                    kind: CheckKind::Percent(period),
                    direction,
                    bound,
                });
            }
        }
    }

    for direction in [Direction::Up, Direction::Down] {
        if let Some(bound) = threshold.target_bound(direction).active() {
            checks.push(Check {
                kind: CheckKind::Target,
                direction,
                bound,
            });
        }
    }

    checks
}

impl Check {
    /// The figure this check compares: percent change for the period, or
    /// the current price for target checks.
    pub fn observed(&self, quote: &Quote) -> Option<f64> {
        match self.kind {
            CheckKind::Percent(period) => quote.percent_change(period),
            CheckKind::Target => Some(quote.price),
        }
    }

    pub fn is_crossed(&self, observed: f64) -> bool {
        match self.direction {
            Direction::Up => observed >= self.bound,
            Direction::Down => observed <= self.bound,
        }
    }

    pub fn evaluate(&self, threshold: &AlertThreshold, ctx: MarketContext<'_>) -> CheckOutcome {
        let Some(observed) = self.observed(ctx.quote) else {
            return CheckOutcome::MissingData;
        };

        if !self.is_crossed(observed) {
            return CheckOutcome::NotCrossed;
        }

        CheckOutcome::Fired(self.build_event(threshold, ctx, observed))
    }

    fn build_event(&self, threshold: &AlertThreshold, ctx: MarketContext<'_>, observed: f64) -> AlertEvent {
        let is_target = self.kind == CheckKind::Target;

        AlertEvent {
            email: threshold.email.clone(),
            symbol: threshold.crypto_symbol.clone(),
            name: ctx.quote.name.clone(),
            price: ctx.quote.price,
            volume: ctx.quote.volume_24h,
            period: self.kind,
            variation: if is_target { 0.0 } else { observed },
            threshold: if is_target { 0.0 } else { self.bound },
            direction: self.direction,
            is_target_price: is_target,
            target_price: is_target.then_some(self.bound),
            sentiment: ctx.sentiment.cloned(),
            history: ctx.history.cloned(),
            delivered: false,
        }
    }
}
