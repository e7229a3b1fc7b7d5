//! Platform payout SMS extractor.
//!
//! Each platform sends a fixed-template message at end of day. Patterns are
//! matched case-insensitively anywhere in the body, tried in [`PATTERNS`]
//! order; the first match wins. Rapido puts the ride count before the amount,
//! every other template puts the amount first.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use gigmate_core::{ImportMethod, Platform};
use regex::Regex;

use crate::types::{EarningRecord, SmsMessage};

/// Which capture group holds which number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    AmountFirst,
    CountFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformPattern {
    pub platform: Platform,
    pub pattern: &'static str,
    pub order: FieldOrder,
}

/// Priority order. Do not reorder without checking overlaps between templates.
pub const PATTERNS: [PlatformPattern; 6] = [
    PlatformPattern {
        platform: Platform::Swiggy,
        pattern: r"(?i)Congratulations! You earned ₹([0-9]+(?:\.[0-9]+)?) for ([0-9]+) orders today\.",
        order: FieldOrder::AmountFirst,
    },
    PlatformPattern {
        platform: Platform::Zomato,
        pattern: r"(?i)Your total earnings for today is ₹([0-9]+(?:\.[0-9]+)?)\. You completed ([0-9]+) deliveries\.",
        order: FieldOrder::AmountFirst,
    },
    PlatformPattern {
        platform: Platform::Uber,
        pattern: r"(?i)Uber: ₹([0-9]+(?:\.[0-9]+)?) was added to your wallet for ([0-9]+) trips\.",
        order: FieldOrder::AmountFirst,
    },
    PlatformPattern {
        platform: Platform::Rapido,
        pattern: r"(?i)Rapido Captain: You completed ([0-9]+) rides and earned ₹([0-9]+(?:\.[0-9]+)?)\.",
        order: FieldOrder::CountFirst,
    },
    PlatformPattern {
        platform: Platform::Zepto,
        pattern: r"(?i)Zepto: ₹([0-9]+(?:\.[0-9]+)?) earned for ([0-9]+) batches today\.",
        order: FieldOrder::AmountFirst,
    },
    PlatformPattern {
        platform: Platform::Blinkit,
        pattern: r"(?i)Blinkit: Total payout for today is ₹([0-9]+(?:\.[0-9]+)?)\. Orders: ([0-9]+)",
        order: FieldOrder::AmountFirst,
    },
];

/// Compiled pattern table.
#[derive(Debug, Clone)]
pub struct SmsExtractor {
    compiled: Vec<(PlatformPattern, Regex)>,
}

impl SmsExtractor {
    pub fn new() -> Result<Self> {
        let compiled = PATTERNS
            .iter()
            .map(|p| {
                Regex::new(p.pattern)
                    .with_context(|| format!("compiling {} pattern", p.platform))
                    .map(|re| (*p, re))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { compiled })
    }

    /// Find the first platform whose template appears in `body`.
    ///
    /// Returns `(platform, amount, order_count)`. A template hit whose numbers
    /// don't parse counts as no match for that platform; later ones are still tried.
    pub fn match_body(&self, body: &str) -> Option<(Platform, f64, u32)> {
        for (p, re) in &self.compiled {
            let Some(caps) = re.captures(body) else {
                continue;
            };

            let (amount_idx, count_idx) = match p.order {
                FieldOrder::AmountFirst => (1, 2),
                FieldOrder::CountFirst => (2, 1),
            };

            let amount = caps.get(amount_idx).and_then(|m| m.as_str().parse::<f64>().ok());
            let orders = caps.get(count_idx).and_then(|m| m.as_str().parse::<u32>().ok());
            if let (Some(amount), Some(orders)) = (amount, orders) {
                return Some((p.platform, amount, orders));
            }
            log::debug!("{} template matched but numbers did not parse", p.platform);
        }
        None
    }

    /// Turn a payout SMS into an earning record, or `None` for anything else.
    pub fn extract(&self, sms: &SmsMessage) -> Option<EarningRecord> {
        let (platform, amount, order_count) = self.match_body(&sms.body)?;

        let Some(date) = message_date(&sms.timestamp) else {
            log::debug!(
                "{} payout from {} has unreadable timestamp {:?}",
                platform,
                sms.sender,
                sms.timestamp
            );
            return None;
        };

        Some(EarningRecord {
            platform,
            amount,
            order_count,
            date,
            source_method: ImportMethod::Sms,
            duration_hours: 0.0,
        })
    }
}

/// Offset-carrying layouts beyond strict RFC 3339 (no seconds, compact offsets).
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Calendar date of an ISO-8601 timestamp as written (its own offset),
/// time-of-day dropped.
pub fn message_date(timestamp: &str) -> Option<NaiveDate> {
    let ts = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.date_naive());
    }

    // "Z" is just a zero offset.
    let zoned = match ts.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => ts.to_string(),
    };
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, fmt) {
            return Some(dt.date_naive());
        }
    }

    for fmt in LOCAL_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(ts, fmt) {
            return Some(ndt.date());
        }
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d").ok()
}
