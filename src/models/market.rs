use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Period;

/// Point-in-time snapshot for one symbol, as returned by the quote provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub name: String,
    pub price: f64,
    pub volume_24h: f64,

    // None when the provider left the figure out; never read as zero.
    pub percent_change_1h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
    pub percent_change_30d: Option<f64>,
    pub percent_change_60d: Option<f64>,
    pub percent_change_90d: Option<f64>,
}

impl Quote {
    pub fn percent_change(&self, period: Period) -> Option<f64> {
        match period {
            Period::H1 => self.percent_change_1h,
            Period::H24 => self.percent_change_24h,
            Period::D7 => self.percent_change_7d,
            Period::D30 => self.percent_change_30d,
            Period::D60 => self.percent_change_60d,
            Period::D90 => self.percent_change_90d,
        }
    }

    pub fn set_percent_change(&mut self, period: Period, value: Option<f64>) {
        let slot = match period {
            Period::H1 => &mut self.percent_change_1h,
            Period::H24 => &mut self.percent_change_24h,
            Period::D7 => &mut self.percent_change_7d,
            Period::D30 => &mut self.percent_change_30d,
            Period::D60 => &mut self.percent_change_60d,
            Period::D90 => &mut self.percent_change_90d,
        };
        *slot = value;
    }
}

pub type QuoteMap = HashMap<String, Quote>;

/// Market-wide fear/greed reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentIndex {
    pub value: i32,
    pub classification: String,
}

pub fn sentiment_label(value: i32) -> &'static str {
    match value {
        v if v <= 25 => "Extreme Fear",
        v if v <= 45 => "Fear",
        v if v <= 55 => "Neutral",
        v if v <= 75 => "Greed",
        _ => "Extreme Greed",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub timestamp: i64,
    pub volume: f64,
}

/// Min / max / average over a series. All zero for an empty series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl SeriesStats {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min,
            max,
            avg: sum / count as f64,
        }
    }
}

/// Trailing price/volume history for one symbol. Presentation only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub symbol: String,
    pub prices: Vec<PricePoint>,
    pub volumes: Vec<VolumePoint>,
    pub price_stats: SeriesStats,
    pub volume_stats: SeriesStats,
    pub days_count: usize,
}

impl HistorySeries {
    pub fn new(symbol: impl Into<String>, prices: Vec<PricePoint>, volumes: Vec<VolumePoint>) -> Self {
        let price_stats = SeriesStats::from_values(prices.iter().map(|p| p.price));
        let volume_stats = SeriesStats::from_values(volumes.iter().map(|v| v.volume));
        let days_count = prices.len();

        Self {
            symbol: symbol.into(),
            prices,
            volumes,
            price_stats,
            volume_stats,
            days_count,
        }
    }
}
