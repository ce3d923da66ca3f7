use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ProviderError,
    models::{Period, Quote, QuoteMap, SentimentIndex},
    services::traits::QuoteProvider,
};

const USD: &str = "USD";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

#[derive(Clone)]
pub struct CoinMarketCapClient {
    http: Client,
    domain: String,
    api_key: String,
}

impl CoinMarketCapClient {
    pub fn new(domain: String, api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            domain: domain.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_body(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ProviderError> {
        let res = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        Ok(res.text().await?)
    }
}

#[async_trait]
impl QuoteProvider for CoinMarketCapClient {
    async fn get_quotes(&self, symbols: &[String]) -> Result<QuoteMap, ProviderError> {
        if symbols.is_empty() {
            return Err(ProviderError::NoSymbols);
        }

        let url = format!("{}/v2/cryptocurrency/quotes/latest", self.domain);
        let joined = symbols.join(",");
        let body = self.get_body(&url, &[("symbol", &joined)]).await?;

        let response: QuotesResponse = serde_json::from_str(&body)?;
        response.status.check()?;

        Ok(response.into_quotes())
    }

    async fn get_sentiment(&self) -> Result<SentimentIndex, ProviderError> {
        let url = format!("{}/v3/fear-and-greed/latest", self.domain);
        let body = self.get_body(&url, &[]).await?;

        let response: FearGreedResponse = serde_json::from_str(&body)?;
        response.status.check()?;

        Ok(SentimentIndex {
            value: response.data.value,
            classification: response.data.value_classification,
        })
    }
}

// ---------------- Wire types ----------------

#[derive(Debug, Deserialize)]
struct Status {
    // integer on the quotes endpoint, string on fear-and-greed
    #[serde(default)]
    error_code: serde_json::Value,
    #[serde(default)]
    error_message: Option<String>,
}

impl Status {
    fn check(&self) -> Result<(), ProviderError> {
        let ok = match &self.error_code {
            serde_json::Value::Null => true,
            serde_json::Value::Number(n) => n.as_i64() == Some(0),
            serde_json::Value::String(s) => s.trim() == "0",
            _ => false,
        };

        if ok {
            return Ok(());
        }

        Err(ProviderError::Api(format!(
            "{} - {}",
            self.error_code,
            self.error_message.as_deref().unwrap_or("unknown error")
        )))
    }
}

#[derive(Debug, Deserialize)]
struct QuotesResponse {
    status: Status,
    #[serde(default)]
    data: HashMap<String, Vec<CryptoDetail>>,
}

impl QuotesResponse {
    fn into_quotes(self) -> QuoteMap {
        let mut quotes = QuoteMap::new();

        for (symbol, details) in self.data {
            // several coins can share a ticker; the first is the ranked one
            let Some(detail) = details.into_iter().next() else {
                continue;
            };
            let Some(usd) = detail.quote.get(USD) else {
                continue;
            };
            let Some(price) = usd.price else {
                continue;
            };

            let mut quote = Quote {
                name: detail.name.clone(),
                price,
                volume_24h: usd.volume_24h.unwrap_or(0.0),
                ..Quote::default()
            };
            for (period, value) in [
                (Period::H1, usd.percent_change_1h),
                (Period::H24, usd.percent_change_24h),
                (Period::D7, usd.percent_change_7d),
                (Period::D30, usd.percent_change_30d),
                (Period::D60, usd.percent_change_60d),
                (Period::D90, usd.percent_change_90d),
            ] {
                quote.set_percent_change(period, value);
            }

            quotes.insert(symbol, quote);
        }

        quotes
    }
}

#[derive(Debug, Deserialize)]
struct CryptoDetail {
    #[serde(default)]
    name: String,
    #[serde(default)]
    quote: HashMap<String, CurrencyQuote>,
}

#[derive(Debug, Deserialize)]
struct CurrencyQuote {
    price: Option<f64>,
    volume_24h: Option<f64>,
    percent_change_1h: Option<f64>,
    percent_change_24h: Option<f64>,
    percent_change_7d: Option<f64>,
    percent_change_30d: Option<f64>,
    percent_change_60d: Option<f64>,
    percent_change_90d: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FearGreedResponse {
    data: FearGreedData,
    status: Status,
}

#[derive(Debug, Deserialize)]
struct FearGreedData {
    value: i32,
    #[serde(default)]
    value_classification: String,
}
