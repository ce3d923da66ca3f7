mod common;

use std::sync::Arc;

use common::{flat_quote, quote_24h, FakeHistory, FakeQuotes, Harness, MemoryStore, RecordingNotifier};
use crypto_alerts::{
    error::ScanError,
    models::{AlertThreshold, CheckKind, Direction, Period},
};

fn btc_up_24h(email: &str, bound: f64) -> AlertThreshold {
    AlertThreshold::new(email, "BTC").with_percent(Period::H24, Direction::Up, bound)
}

#[tokio::test]
async fn crossed_upper_bound_fires_one_alert_and_one_email() {
    let h = Harness::new(
        MemoryStore::with(vec![btc_up_24h("a@x.com", 3.0)]),
        FakeQuotes::with(vec![("BTC", quote_24h("Bitcoin", 65_000.0, 5.0))]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert_eq!(alerts.len(), 1);
    let a = &alerts[0];
    assert_eq!(a.symbol, "BTC");
    assert_eq!(a.period, CheckKind::Percent(Period::H24));
    assert_eq!(a.direction, Direction::Up);
    assert_eq!(a.variation, 5.0);
    assert_eq!(a.threshold, 3.0);
    assert!(a.delivered);

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@x.com");
    assert!(sent[0].subject.contains("BTC rose 5.00% in 24h"));
}

#[tokio::test]
async fn variation_below_bound_fires_nothing() {
    let h = Harness::new(
        MemoryStore::with(vec![btc_up_24h("a@x.com", 3.0)]),
        FakeQuotes::with(vec![("BTC", quote_24h("Bitcoin", 65_000.0, 2.0))]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert!(alerts.is_empty());
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn empty_store_does_no_further_work() {
    let h = Harness::new(
        MemoryStore::default(),
        FakeQuotes::with(vec![("BTC", flat_quote("Bitcoin", 1.0))]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert!(alerts.is_empty());
    assert!(h.quotes.quote_calls().is_empty());
    assert!(h.history.calls().is_empty());
}

#[tokio::test]
async fn thresholds_on_one_symbol_share_a_single_quote_fetch() {
    let h = Harness::new(
        MemoryStore::with(vec![
            btc_up_24h("a@x.com", 3.0),
            btc_up_24h("b@x.com", 4.0),
            AlertThreshold::new("c@x.com", "ETH").with_target(Direction::Up, 1.0),
        ]),
        FakeQuotes::with(vec![
            ("BTC", quote_24h("Bitcoin", 65_000.0, 5.0)),
            ("ETH", flat_quote("Ethereum", 3_000.0)),
        ]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert_eq!(alerts.len(), 3);
    assert_eq!(h.quotes.quote_calls(), vec![vec!["BTC".to_string(), "ETH".to_string()]]);
    assert_eq!(h.quotes.sentiment_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(
        h.history.calls(),
        vec![("BTC".to_string(), 90), ("ETH".to_string(), 90)]
    );

    let recipients: Vec<String> = h.notifier.sent().into_iter().map(|m| m.to).collect();
    assert_eq!(recipients, vec!["a@x.com", "b@x.com", "c@x.com"]);
}

#[tokio::test]
async fn symbol_without_quote_is_skipped_without_affecting_others() {
    let h = Harness::new(
        MemoryStore::with(vec![
            AlertThreshold::new("a@x.com", "NOPE").with_target(Direction::Up, 0.000_001),
            btc_up_24h("b@x.com", 3.0),
        ]),
        FakeQuotes::with(vec![("BTC", quote_24h("Bitcoin", 65_000.0, 3.0))]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].symbol, "BTC");
    assert_eq!(h.notifier.sent().len(), 1);
}

#[tokio::test]
async fn history_failure_degrades_only_that_symbol() {
    let h = Harness::new(
        MemoryStore::with(vec![
            btc_up_24h("a@x.com", 3.0),
            AlertThreshold::new("b@x.com", "ETH").with_target(Direction::Down, 5_000.0),
        ]),
        FakeQuotes::with(vec![
            ("BTC", quote_24h("Bitcoin", 65_000.0, 4.0)),
            ("ETH", flat_quote("Ethereum", 3_000.0)),
        ]),
        FakeHistory::failing_for(&["BTC"]),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert_eq!(alerts.len(), 2);
    let btc = alerts.iter().find(|a| a.symbol == "BTC").unwrap();
    let eth = alerts.iter().find(|a| a.symbol == "ETH").unwrap();
    assert!(btc.history.is_none());
    assert!(eth.history.is_some());
    assert_eq!(eth.target_price, Some(5_000.0));
}

#[tokio::test]
async fn sentiment_failure_is_not_fatal() {
    let mut quotes = FakeQuotes::with(vec![("BTC", quote_24h("Bitcoin", 65_000.0, 5.0))]);
    quotes.sentiment = None;

    let h = Harness::new(
        MemoryStore::with(vec![btc_up_24h("a@x.com", 3.0)]),
        quotes,
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].sentiment.is_none());
    assert!(!h.notifier.sent()[0].body.contains("Fear &amp; Greed"));
}

#[tokio::test]
async fn sentiment_snapshot_reaches_alert_and_email() {
    let h = Harness::new(
        MemoryStore::with(vec![btc_up_24h("a@x.com", 3.0)]),
        FakeQuotes::with(vec![("BTC", quote_24h("Bitcoin", 65_000.0, 5.0))]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert_eq!(alerts[0].sentiment.as_ref().map(|s| s.value), Some(40));
    assert!(h.notifier.sent()[0].body.contains("40 - Fear"));
}

#[tokio::test]
async fn quote_failure_aborts_the_scan() {
    let mut quotes = FakeQuotes::with(vec![]);
    quotes.fail_quotes = true;

    let h = Harness::new(
        MemoryStore::with(vec![btc_up_24h("a@x.com", 3.0)]),
        quotes,
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let result = h.scanner.run_scan().await;

    assert!(matches!(result, Err(ScanError::Quotes(_))));
    assert!(h.history.calls().is_empty());
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn store_failure_aborts_the_scan() {
    let h = Harness::new(
        MemoryStore::failing_reads(),
        FakeQuotes::with(vec![]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let result = h.scanner.run_scan().await;

    assert!(matches!(result, Err(ScanError::Store(_))));
    assert!(h.quotes.quote_calls().is_empty());
}

#[tokio::test]
async fn delivery_failure_still_counts_alerts_and_continues() {
    let h = Harness::new(
        MemoryStore::with(vec![
            btc_up_24h("a@x.com", 3.0).with_target(Direction::Up, 60_000.0),
            btc_up_24h("b@x.com", 1.0),
        ]),
        FakeQuotes::with(vec![("BTC", quote_24h("Bitcoin", 65_000.0, 5.0))]),
        FakeHistory::default(),
        RecordingNotifier::failing(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert_eq!(alerts.len(), 3);
    assert!(alerts.iter().all(|a| !a.delivered));
    // exactly one attempt per fired check
    assert_eq!(h.notifier.sent().len(), 3);
}

#[tokio::test]
async fn every_enabled_check_fires_independently() {
    let mut quote = flat_quote("Solana", 150.0);
    quote.set_percent_change(Period::H1, Some(-2.0));
    quote.set_percent_change(Period::D30, Some(25.0));

    let threshold = AlertThreshold::new("a@x.com", "SOL")
        .with_percent(Period::H1, Direction::Down, -2.0)
        .with_percent(Period::D30, Direction::Up, 20.0)
        .with_percent(Period::D30, Direction::Down, -20.0)
        .with_target(Direction::Up, 100.0)
        .with_target(Direction::Down, 100.0);

    let h = Harness::new(
        MemoryStore::with(vec![threshold]),
        FakeQuotes::with(vec![("SOL", quote)]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();
    let fired: Vec<(&str, Direction)> = alerts.iter().map(|a| (a.period_label(), a.direction)).collect();

    assert_eq!(
        fired,
        vec![("1h", Direction::Down), ("30d", Direction::Up), ("target", Direction::Up)]
    );
    assert_eq!(h.notifier.sent().len(), 3);
}

#[tokio::test]
async fn missing_percent_figure_skips_only_that_check() {
    let mut quote = flat_quote("Bitcoin", 65_000.0);
    quote.set_percent_change(Period::D90, None);

    let threshold = AlertThreshold::new("a@x.com", "BTC")
        .with_percent(Period::D90, Direction::Up, -100.0)
        .with_target(Direction::Up, 1.0);

    let h = Harness::new(
        MemoryStore::with(vec![threshold]),
        FakeQuotes::with(vec![("BTC", quote)]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let alerts = h.scanner.run_scan().await.unwrap();

    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].is_target_price);
}

#[tokio::test]
async fn concurrent_scans_run_one_after_another() {
    let h = Harness::new(
        MemoryStore::with(vec![btc_up_24h("a@x.com", 3.0)]),
        FakeQuotes::with(vec![("BTC", quote_24h("Bitcoin", 65_000.0, 5.0))]),
        FakeHistory::default(),
        RecordingNotifier::default(),
    );

    let first = Arc::clone(&h.scanner);
    let second = Arc::clone(&h.scanner);
    let (a, b) = tokio::join!(first.run_scan(), second.run_scan());

    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);
    // no cross-run de-duplication: each scan sends its own email
    assert_eq!(h.notifier.sent().len(), 2);
    assert_eq!(h.quotes.quote_calls().len(), 2);
}
