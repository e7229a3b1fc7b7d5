use chrono::NaiveDate;
use gigmate_core::{ImportMethod, Platform};
use serde::{Deserialize, Serialize};

/// Inbound text message as delivered by the phone's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub sender: String,
    pub body: String,
    /// ISO-8601, e.g. "2026-02-19T21:14:00+05:30"
    pub timestamp: String,
}

impl SmsMessage {
    pub fn new(
        sender: impl Into<String>,
        body: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Normalized earning entry (platform-agnostic). Carries no id: the store
/// that persists it assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningRecord {
    pub platform: Platform,
    /// Rupees, never negative.
    pub amount: f64,
    pub order_count: u32,
    pub date: NaiveDate,
    pub source_method: ImportMethod,
    /// Hours worked; 0 when unknown (SMS never says).
    pub duration_hours: f64,
}
