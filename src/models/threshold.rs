use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Look-back windows a threshold can watch, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "7d")]
    D7,
    #[serde(rename = "30d")]
    D30,
    #[serde(rename = "60d")]
    D60,
    #[serde(rename = "90d")]
    D90,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::H1,
        Period::H24,
        Period::D7,
        Period::D30,
        Period::D60,
        Period::D90,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Period::H1 => "1h",
            Period::H24 => "24h",
            Period::D7 => "7d",
            Period::D30 => "30d",
            Period::D60 => "60d",
            Period::D90 => "90d",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One configurable bound: the enabled flag and its (optional) value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub enabled: bool,
    pub value: Option<f64>,
}

impl Bound {
    /// The value to compare against, if this bound takes part in evaluation.
    pub fn active(self) -> Option<f64> {
        if self.enabled { self.value } else { None }
    }
}

/// A user's trigger configuration for one symbol.
///
/// Field names match the JSON accepted by `POST /create` and the stored
/// document layout. Every percent/price is nullable and paired with its own
/// enabled flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub crypto_symbol: String,

    // 1h
    #[serde(default)]
    pub threshold_up_1h_percent: Option<f64>,
    #[serde(default)]
    pub threshold_up_1h_enabled: bool,
    #[serde(default)]
    pub threshold_down_1h_percent: Option<f64>,
    #[serde(default)]
    pub threshold_down_1h_enabled: bool,

    // 24h
    #[serde(default)]
    pub threshold_up_24h_percent: Option<f64>,
    #[serde(default)]
    pub threshold_up_24h_enabled: bool,
    #[serde(default)]
    pub threshold_down_24h_percent: Option<f64>,
    #[serde(default)]
    pub threshold_down_24h_enabled: bool,

    // 7d
    #[serde(default)]
    pub threshold_up_7d_percent: Option<f64>,
    #[serde(default)]
    pub threshold_up_7d_enabled: bool,
    #[serde(default)]
    pub threshold_down_7d_percent: Option<f64>,
    #[serde(default)]
    pub threshold_down_7d_enabled: bool,

    // 30d
    #[serde(default)]
    pub threshold_up_30d_percent: Option<f64>,
    #[serde(default)]
    pub threshold_up_30d_enabled: bool,
    #[serde(default)]
    pub threshold_down_30d_percent: Option<f64>,
    #[serde(default)]
    pub threshold_down_30d_enabled: bool,

    // 60d
    #[serde(default)]
    pub threshold_up_60d_percent: Option<f64>,
    #[serde(default)]
    pub threshold_up_60d_enabled: bool,
    #[serde(default)]
    pub threshold_down_60d_percent: Option<f64>,
    #[serde(default)]
    pub threshold_down_60d_enabled: bool,

    // 90d
    #[serde(default)]
    pub threshold_up_90d_percent: Option<f64>,
    #[serde(default)]
    pub threshold_up_90d_enabled: bool,
    #[serde(default)]
    pub threshold_down_90d_percent: Option<f64>,
    #[serde(default)]
    pub threshold_down_90d_enabled: bool,

    // absolute target prices
    #[serde(default)]
    pub target_price_up: Option<f64>,
    #[serde(default)]
    pub target_price_up_enabled: bool,
    #[serde(default)]
    pub target_price_down: Option<f64>,
    #[serde(default)]
    pub target_price_down_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl AlertThreshold {
    pub fn new(email: impl Into<String>, crypto_symbol: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            crypto_symbol: crypto_symbol.into(),
            ..Self::default()
        }
    }

    /// Percent-change bound for one period and direction.
    pub fn percent_bound(&self, period: Period, direction: Direction) -> Bound {
        let (enabled, value) = match (period, direction) {
            (Period::H1, Direction::Up) => (self.threshold_up_1h_enabled, self.threshold_up_1h_percent),
            (Period::H1, Direction::Down) => (self.threshold_down_1h_enabled, self.threshold_down_1h_percent),
            (Period::H24, Direction::Up) => (self.threshold_up_24h_enabled, self.threshold_up_24h_percent),
            (Period::H24, Direction::Down) => (self.threshold_down_24h_enabled, self.threshold_down_24h_percent),
            (Period::D7, Direction::Up) => (self.threshold_up_7d_enabled, self.threshold_up_7d_percent),
            (Period::D7, Direction::Down) => (self.threshold_down_7d_enabled, self.threshold_down_7d_percent),
            (Period::D30, Direction::Up) => (self.threshold_up_30d_enabled, self.threshold_up_30d_percent),
            (Period::D30, Direction::Down) => (self.threshold_down_30d_enabled, self.threshold_down_30d_percent),
            (Period::D60, Direction::Up) => (self.threshold_up_60d_enabled, self.threshold_up_60d_percent),
            (Period::D60, Direction::Down) => (self.threshold_down_60d_enabled, self.threshold_down_60d_percent),
            (Period::D90, Direction::Up) => (self.threshold_up_90d_enabled, self.threshold_up_90d_percent),
            (Period::D90, Direction::Down) => (self.threshold_down_90d_enabled, self.threshold_down_90d_percent),
        };
        Bound { enabled, value }
    }

    pub fn target_bound(&self, direction: Direction) -> Bound {
        match direction {
            Direction::Up => Bound {
                enabled: self.target_price_up_enabled,
                value: self.target_price_up,
            },
            Direction::Down => Bound {
                enabled: self.target_price_down_enabled,
                value: self.target_price_down,
            },
        }
    }

    /// Builder-style setter for a percent bound; enables it.
    pub fn with_percent(mut self, period: Period, direction: Direction, percent: f64) -> Self {
        let (enabled, value) = match (period, direction) {
            (Period::H1, Direction::Up) => (&mut self.threshold_up_1h_enabled, &mut self.threshold_up_1h_percent),
            (Period::H1, Direction::Down) => (&mut self.threshold_down_1h_enabled, &mut self.threshold_down_1h_percent),
            (Period::H24, Direction::Up) => (&mut self.threshold_up_24h_enabled, &mut self.threshold_up_24h_percent),
            (Period::H24, Direction::Down) => (&mut self.threshold_down_24h_enabled, &mut self.threshold_down_24h_percent),
            (Period::D7, Direction::Up) => (&mut self.threshold_up_7d_enabled, &mut self.threshold_up_7d_percent),
            (Period::D7, Direction::Down) => (&mut self.threshold_down_7d_enabled, &mut self.threshold_down_7d_percent),
            (Period::D30, Direction::Up) => (&mut self.threshold_up_30d_enabled, &mut self.threshold_up_30d_percent),
            (Period::D30, Direction::Down) => (&mut self.threshold_down_30d_enabled, &mut self.threshold_down_30d_percent),
            (Period::D60, Direction::Up) => (&mut self.threshold_up_60d_enabled, &mut self.threshold_up_60d_percent),
            (Period::D60, Direction::Down) => (&mut self.threshold_down_60d_enabled, &mut self.threshold_down_60d_percent),
            (Period::D90, Direction::Up) => (&mut self.threshold_up_90d_enabled, &mut self.threshold_up_90d_percent),
            (Period::D90, Direction::Down) => (&mut self.threshold_down_90d_enabled, &mut self.threshold_down_90d_percent),
        };
        *enabled = true;
        *value = Some(percent);
        self
    }

    pub fn with_target(mut self, direction: Direction, price: f64) -> Self {
        match direction {
            Direction::Up => {
                self.target_price_up_enabled = true;
                self.target_price_up = Some(price);
            }
            Direction::Down => {
                self.target_price_down_enabled = true;
                self.target_price_down = Some(price);
            }
        }
        self
    }
}
