//! Notification message formatting
//!
//! Renders an alert decision into the chat payload consumed by the messaging
//! collaborator: a header, a section listing each severe country with its
//! score and revenue, and a context line.

use serde::Serialize;
use serde_json::{json, Value};

use crate::evaluator::AlertDecision;

const HEADER: &str = "Anomaly Alert";
const CONTEXT: &str = "View the dashboard for details";

/// Formatted alert ready to hand to a messaging collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertMessage {
    pub header: String,
    pub summary: String,
    pub lines: Vec<String>,
}

impl AlertMessage {
    /// `None` when the decision does not call for a notification
    pub fn from_decision(decision: &AlertDecision) -> Option<Self> {
        if !decision.should_notify {
            return None;
        }
        let lines = decision
            .severe_records
            .iter()
            .map(|r| {
                format!(
                    "  - *{}* ({}): Score {:.1}/100 (${})",
                    r.country,
                    r.month,
                    r.composite_score,
                    format_thousands(r.revenue)
                )
            })
            .collect();
        Some(Self {
            header: HEADER.to_string(),
            summary: format!("*{} severe anomalies detected:*", decision.count()),
            lines,
        })
    }

    /// Plain-text body
    pub fn text(&self) -> String {
        let mut body = self.summary.clone();
        for line in &self.lines {
            body.push('\n');
            body.push_str(line);
        }
        body
    }

    /// Block-formatted chat webhook payload
    pub fn to_payload(&self) -> Value {
        json!({
            "blocks": [
                {
                    "type": "header",
                    "text": { "type": "plain_text", "text": self.header }
                },
                {
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": self.text() }
                },
                {
                    "type": "context",
                    "elements": [ { "type": "mrkdwn", "text": CONTEXT } ]
                }
            ]
        })
    }
}

/// Whole-unit amount with comma thousands separators
fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}
