use std::sync::Arc;

use serde::Serialize;

use super::{Direction, HistorySeries, Period, SentimentIndex};

/// What a fired check was watching: a percent window or an absolute price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Percent(Period),
    Target,
}

impl Serialize for CheckKind {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

impl CheckKind {
    pub fn label(self) -> &'static str {
        match self {
            CheckKind::Percent(p) => p.label(),
            CheckKind::Target => "target",
        }
    }
}

/// One fired threshold check, destined for exactly one notification send.
#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub email: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub volume: f64,

    pub period: CheckKind,
    // 0 for target-price alerts
    pub variation: f64,
    // 0 for target-price alerts
    pub threshold: f64,
    pub direction: Direction,

    pub is_target_price: bool,
    pub target_price: Option<f64>,

    pub sentiment: Option<SentimentIndex>,
    #[serde(skip)]
    pub history: Option<Arc<HistorySeries>>,

    // false when the notification sink rejected the message
    pub delivered: bool,
}

impl AlertEvent {
    pub fn period_label(&self) -> &'static str {
        self.period.label()
    }
}
