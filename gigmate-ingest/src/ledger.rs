//! Earnings roll-ups for the dashboard.

use gigmate_core::Platform;
use serde::Serialize;
use std::collections::HashMap;

use crate::types::EarningRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformTotal {
    pub platform: Platform,
    pub amount: f64,
    pub orders: u64,
    pub entries: usize,
    /// Only entries that reported a duration contribute.
    pub hours: f64,
    /// Amount earned across those timed entries.
    pub timed_amount: f64,
}

impl PlatformTotal {
    /// Rupees per hour over entries with known duration.
    pub fn earnings_per_hour(&self) -> Option<f64> {
        (self.hours > 0.0).then(|| self.timed_amount / self.hours)
    }
}

/// Per-platform totals, highest earning platform first.
pub fn summarize(records: &[EarningRecord]) -> Vec<PlatformTotal> {
    let mut groups: HashMap<Platform, PlatformTotal> = HashMap::new();

    for r in records {
        let t = groups.entry(r.platform).or_insert_with(|| PlatformTotal {
            platform: r.platform,
            amount: 0.0,
            orders: 0,
            entries: 0,
            hours: 0.0,
            timed_amount: 0.0,
        });
        t.amount += r.amount;
        t.orders += u64::from(r.order_count);
        t.entries += 1;
        if r.duration_hours > 0.0 {
            t.hours += r.duration_hours;
            t.timed_amount += r.amount;
        }
    }

    let mut totals: Vec<PlatformTotal> = groups.into_values().collect();
    totals.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    totals
}

pub fn total_amount(records: &[EarningRecord]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}
