//! Subject and body for alert emails.

use handlebars::{Handlebars, TemplateError};
use serde_json::json;

use crate::models::{AlertEvent, Direction};

const PERCENT_BODY: &str = r#"<html><body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
<p>Hello,</p>
<p>We have a price alert for <strong>{{name}} ({{symbol}})</strong>!</p>
<p>The {{period}} change {{direction_text}} your configured threshold of {{threshold}}%, reaching <strong>{{variation}}%</strong>.</p>
<h3>Current details:</h3>
<ul>
<li>Current price: <strong>${{price}} USD</strong></li>
<li>24h traded volume: <strong>${{volume}} USD</strong></li>
<li>Change over {{period}}: <strong>{{variation}}%</strong></li>
</ul>
{{> market_context}}
<p>This may be a good moment to review your investments and decide on next steps.</p>
{{> signature}}
</body></html>"#;

const TARGET_BODY: &str = r#"<html><body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
<p>Hello,</p>
<p><strong>{{name}} ({{symbol}})</strong> {{direction_text}} your target price of <strong>${{target_price}}</strong>.</p>
<h3>Current details:</h3>
<ul>
<li>Current price: <strong>${{price}} USD</strong></li>
<li>Target price: <strong>${{target_price}} USD</strong></li>
<li>24h traded volume: <strong>${{volume}} USD</strong></li>
</ul>
{{> market_context}}
<p>{{suggestion}}</p>
{{> signature}}
</body></html>"#;

const MARKET_CONTEXT: &str = r#"{{#if history}}
<h3>Price history ({{history.days}} days)</h3>
<p>Min: ${{history.min_price}} | Max: ${{history.max_price}} | Average: ${{history.avg_price}}</p>
<h3>Traded volume ({{history.days}} days)</h3>
<p>Min: ${{history.min_volume}}B | Max: ${{history.max_volume}}B | Average: ${{history.avg_volume}}B</p>
{{/if}}
{{#if sentiment}}
<h3>Market Fear &amp; Greed index</h3>
<p>{{sentiment.value}} - {{sentiment.classification}}</p>
{{/if}}"#;

const SIGNATURE: &str = r#"<p>Best regards,<br/>Crypto Alerts</p>
<hr/><p style="font-size: 0.9em; color: #666;">This is an automated email. Please do not reply.</p>"#;

/// Renders alert emails from templates registered once at startup.
pub struct AlertMessageRenderer {
    hbs: Handlebars<'static>,
}

impl AlertMessageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(false);

        hbs.register_template_string("alerts/percent", PERCENT_BODY)?;
        hbs.register_template_string("alerts/target", TARGET_BODY)?;
        hbs.register_partial("market_context", MARKET_CONTEXT)?;
        hbs.register_partial("signature", SIGNATURE)?;

        Ok(Self { hbs })
    }

    pub fn subject(&self, alert: &AlertEvent) -> String {
        if alert.is_target_price {
            let direction = match alert.direction {
                Direction::Up => "reached",
                Direction::Down => "fell below",
            };
            return format!(
                "🎯 Target price: {} {} ${:.2} (current: ${:.2})",
                alert.symbol,
                direction,
                alert.target_price.unwrap_or_default(),
                alert.price
            );
        }

        let (emoji, direction) = match alert.direction {
            Direction::Up => ("🟢", "rose"),
            Direction::Down => ("🔴", "fell"),
        };
        format!(
            "{} {} {} {:.2}% in {}: current price ${:.2}",
            emoji,
            alert.symbol,
            direction,
            alert.variation.abs(),
            alert.period_label(),
            alert.price
        )
    }

    pub fn body(&self, alert: &AlertEvent) -> String {
        let (template, ctx) = if alert.is_target_price {
            ("alerts/target", self.target_ctx(alert))
        } else {
            ("alerts/percent", self.percent_ctx(alert))
        };

        match self.hbs.render(template, &ctx) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, symbol = %alert.symbol, "alert template failed, sending plain body");
                self.plain_body(alert)
            }
        }
    }

    fn percent_ctx(&self, alert: &AlertEvent) -> serde_json::Value {
        let direction_text = match alert.direction {
            Direction::Up => "rose above",
            Direction::Down => "fell below",
        };
        json!({
            "name": alert.name,
            "symbol": alert.symbol,
            "period": alert.period_label(),
            "direction_text": direction_text,
            "threshold": fmt2(alert.threshold),
            "variation": fmt2(alert.variation),
            "price": fmt2(alert.price),
            "volume": format_large_number(alert.volume),
            "history": history_ctx(alert),
            "sentiment": sentiment_ctx(alert),
        })
    }

    fn target_ctx(&self, alert: &AlertEvent) -> serde_json::Value {
        let (direction_text, suggestion) = match alert.direction {
            Direction::Up => (
                "reached or went above",
                "This may be a good moment to consider selling, depending on your strategy.",
            ),
            Direction::Down => (
                "reached or went below",
                "This may be a good moment to consider buying, depending on your strategy.",
            ),
        };
        json!({
            "name": alert.name,
            "symbol": alert.symbol,
            "direction_text": direction_text,
            "suggestion": suggestion,
            "target_price": fmt2(alert.target_price.unwrap_or_default()),
            "price": fmt2(alert.price),
            "volume": format_large_number(alert.volume),
            "history": history_ctx(alert),
            "sentiment": sentiment_ctx(alert),
        })
    }

    fn plain_body(&self, alert: &AlertEvent) -> String {
        format!(
            "{} ({}) {} alert [{}]: price ${:.2}, variation {:.2}%",
            alert.name,
            alert.symbol,
            alert.direction,
            alert.period_label(),
            alert.price,
            alert.variation
        )
    }
}

fn history_ctx(alert: &AlertEvent) -> serde_json::Value {
    let Some(h) = alert.history.as_deref() else {
        return serde_json::Value::Null;
    };
    json!({
        "days": h.days_count,
        "min_price": fmt2(h.price_stats.min),
        "max_price": fmt2(h.price_stats.max),
        "avg_price": fmt2(h.price_stats.avg),
        "min_volume": fmt2(h.volume_stats.min / 1e9),
        "max_volume": fmt2(h.volume_stats.max / 1e9),
        "avg_volume": fmt2(h.volume_stats.avg / 1e9),
    })
}

fn sentiment_ctx(alert: &AlertEvent) -> serde_json::Value {
    match &alert.sentiment {
        Some(s) => json!({ "value": s.value, "classification": s.classification }),
        None => serde_json::Value::Null,
    }
}

fn fmt2(x: f64) -> String {
    format!("{:.2}", x)
}

/// Abbreviates with K/M/B/T and one decimal; plain two decimals below 1000.
pub fn format_large_number(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs >= 1e12 {
        format!("{sign}{:.1}T", abs / 1e12)
    } else if abs >= 1e9 {
        format!("{sign}{:.1}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{sign}{:.1}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{sign}{:.1}K", abs / 1e3)
    } else {
        format!("{sign}{:.2}", abs)
    }
}
