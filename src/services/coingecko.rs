use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ProviderError,
    models::{HistorySeries, PricePoint, VolumePoint},
    services::traits::HistoryProvider,
};

const PRO_API_KEY_HEADER: &str = "x-cg-pro-api-key";

/// Ticker → CoinGecko coin id for the symbols we can chart.
pub fn coin_id(symbol: &str) -> Option<&'static str> {
    let id = match symbol.trim().to_uppercase().as_str() {
        "BTC" => "bitcoin",
        "ETH" => "ethereum",
        "SOL" => "solana",
        "BNB" => "binancecoin",
        "XRP" => "ripple",
        "ADA" => "cardano",
        "DOGE" => "dogecoin",
        "MATIC" => "matic-network",
        "DOT" => "polkadot",
        "AVAX" => "avalanche-2",
        _ => return None,
    };
    Some(id)
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    domain: String,
    api_key: String,
}

impl CoinGeckoClient {
    pub fn new(domain: String, api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            domain: domain.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[async_trait]
impl HistoryProvider for CoinGeckoClient {
    async fn get_history(&self, symbol: &str, days: u32) -> Result<HistorySeries, ProviderError> {
        let id = coin_id(symbol).ok_or_else(|| ProviderError::UnsupportedSymbol(symbol.to_string()))?;

        let url = format!("{}/coins/{}/market_chart", self.domain, id);
        let days = days.to_string();
        let mut req = self.http.get(&url).query(&[
            ("vs_currency", "usd"),
            ("days", days.as_str()),
            ("interval", "daily"),
        ]);
        if self.has_key() {
            req = req.header(PRO_API_KEY_HEADER, &self.api_key);
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let body = res.text().await?;
        let chart: MarketChartResponse = serde_json::from_str(&body)?;

        Ok(chart.into_series(symbol))
    }
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<Vec<f64>>,
    #[serde(default)]
    total_volumes: Vec<Vec<f64>>,
}

impl MarketChartResponse {
    fn into_series(self, symbol: &str) -> HistorySeries {
        let raw_days = self.prices.len();

        // each row is [timestamp_ms, value]; short rows are dropped
        let prices = self
            .prices
            .iter()
            .filter(|row| row.len() >= 2)
            .map(|row| PricePoint {
                timestamp: row[0] as i64,
                price: row[1],
            })
            .collect();
        let volumes = self
            .total_volumes
            .iter()
            .filter(|row| row.len() >= 2)
            .map(|row| VolumePoint {
                timestamp: row[0] as i64,
                volume: row[1],
            })
            .collect();

        let mut series = HistorySeries::new(symbol, prices, volumes);
        series.days_count = raw_days;
        series
    }
}
