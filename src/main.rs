use std::{net::SocketAddr, sync::Arc};

use mongodb::Client;
use tracing_subscriber::EnvFilter;

use crypto_alerts::{
    config, routes,
    services::{
        alert_message::AlertMessageRenderer,
        alert_scan::{spawn_scan_scheduler, AlertScanner},
        coingecko::CoinGeckoClient,
        coinmarketcap::CoinMarketCapClient,
        db_init,
        email::SmtpNotifier,
        threshold_store::MongoThresholdStore,
    },
    AppState,
};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    let settings = config::load();
    init_logging();

    if let Err(e) = settings.validate() {
        tracing::error!("invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = db_init::ensure_indexes(&db, &settings.thresholds_collection).await {
        tracing::warn!("could not create indexes: {}", e);
    }

    let store = Arc::new(MongoThresholdStore::new(db, settings.thresholds_collection.clone()));
    let quotes = Arc::new(
        CoinMarketCapClient::new(
            settings.coinmarketcap_domain.clone(),
            settings.coinmarketcap_api_key.clone(),
            settings.http_timeout,
        )
        .expect("Failed to build CoinMarketCap client"),
    );
    let history = Arc::new(
        CoinGeckoClient::new(
            settings.coingecko_domain.clone(),
            settings.coingecko_api_key.clone(),
            settings.http_timeout,
        )
        .expect("Failed to build CoinGecko client"),
    );
    let notifier = Arc::new(
        SmtpNotifier::new(
            &settings.smtp_host,
            settings.smtp_port,
            &settings.smtp_username,
            &settings.smtp_password,
        )
        .expect("Failed to build SMTP transport"),
    );
    let messages = AlertMessageRenderer::new().expect("alert templates");

    let scanner = Arc::new(
        AlertScanner::new(store.clone(), quotes.clone(), history, notifier, messages)
            .with_history_days(settings.history_days),
    );

    if let Some(every) = settings.scan_interval {
        tracing::info!("scheduled scans every {:?}", every);
        spawn_scan_scheduler(scanner.clone(), every);
    }

    let state = AppState {
        scanner,
        store,
        quotes,
    };
    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings
            .host
            .parse::<std::net::IpAddr>()
            .expect("HOST must be an IP address"),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);
    tracing::info!("thresholds in {}/{}", settings.mongodb_db, settings.thresholds_collection);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
