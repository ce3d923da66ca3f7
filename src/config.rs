use std::{env, time::Duration};

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub thresholds_collection: String,

    pub coinmarketcap_domain: String,
    pub coinmarketcap_api_key: String,
    pub coingecko_domain: String,
    pub coingecko_api_key: String,

    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,

    pub http_timeout: Duration,
    pub history_days: u32,
    pub scan_interval: Option<Duration>,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    Settings {
        host: var_or("HOST", "127.0.0.1"),
        port: parse_var("PORT").unwrap_or(8080),

        mongodb_uri: var_or("MONGODB_URI", "mongodb://localhost:27017"),
        mongodb_db: var_or("MONGODB_DB", "crypto_alerts"),
        thresholds_collection: var_or("DB_TABLE", "user_crypto_thresholds"),

        coinmarketcap_domain: var_or("COINMARKETCAP_DOMAIN", ""),
        coinmarketcap_api_key: var_or("COINMARKETCAP_API_KEY", ""),
        coingecko_domain: var_or("COINGECKO_DOMAIN", ""),
        coingecko_api_key: var_or("COINGECKO_API_KEY", ""),

        smtp_host: var_or("SMTP_HOST", ""),
        smtp_port: parse_var("SMTP_PORT").unwrap_or(0),
        smtp_username: var_or("SMTP_USERNAME", ""),
        smtp_password: var_or("SMTP_PASSWORD", ""),

        http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS").unwrap_or(10)),
        history_days: parse_var("HISTORY_DAYS").unwrap_or(90),
        scan_interval: parse_var::<u64>("SCAN_INTERVAL_SECS")
            .filter(|s| *s > 0)
            .map(Duration::from_secs),
    }
}

impl Settings {
    /// Reports the first required value that is missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, bool); 9] = [
            ("COINGECKO_DOMAIN", self.coingecko_domain.trim().is_empty()),
            ("COINMARKETCAP_DOMAIN", self.coinmarketcap_domain.trim().is_empty()),
            ("COINMARKETCAP_API_KEY", self.coinmarketcap_api_key.trim().is_empty()),
            ("MONGODB_DB", self.mongodb_db.trim().is_empty()),
            ("DB_TABLE", self.thresholds_collection.trim().is_empty()),
            ("SMTP_HOST", self.smtp_host.trim().is_empty()),
            ("SMTP_PORT", self.smtp_port == 0),
            ("SMTP_USERNAME", self.smtp_username.trim().is_empty()),
            ("SMTP_PASSWORD", self.smtp_password.is_empty()),
        ];

        match required.iter().find(|(_, missing)| *missing) {
            Some((key, _)) => Err(ConfigError::Missing(*key)),
            None => Ok(()),
        }
    }
}
