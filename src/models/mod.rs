pub mod alert;
pub mod market;
pub mod threshold;

pub use alert::{AlertEvent, CheckKind};
pub use market::{
    sentiment_label, HistorySeries, PricePoint, Quote, QuoteMap, SentimentIndex, SeriesStats,
    VolumePoint,
};
pub use threshold::{AlertThreshold, Bound, Direction, Period};
