pub mod traits;

pub mod coingecko;
pub mod coinmarketcap;
pub mod db_init;
pub mod email;
pub mod threshold_store;

pub mod alert_message;
pub mod alert_scan;
pub mod alerts_service;
pub mod evaluation;
