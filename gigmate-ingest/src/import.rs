//! Batch SMS import: inbox exports in, earning records out.
//!
//! CSV exports have a header row: sender,body,timestamp

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::Path;

use crate::sms::SmsExtractor;
use crate::types::{EarningRecord, SmsMessage};

/// Outcome of importing a batch. Unmatched messages are normal, not errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub records: Vec<EarningRecord>,
    pub skipped: usize,
}

impl ImportReport {
    pub fn imported(&self) -> usize {
        self.records.len()
    }
}

/// Run every message through the extractor, keeping inbox order.
pub fn import_batch(extractor: &SmsExtractor, messages: &[SmsMessage]) -> ImportReport {
    let mut report = ImportReport::default();

    for sms in messages {
        match extractor.extract(sms) {
            Some(record) => report.records.push(record),
            None => {
                log::debug!("skipping message from {}: no payout template", sms.sender);
                report.skipped += 1;
            }
        }
    }

    log::info!(
        "imported {} of {} messages",
        report.imported(),
        messages.len()
    );
    report
}

/// Parse an SMS export from any reader.
pub fn parse_sms_csv<R: Read>(reader: R) -> Result<Vec<SmsMessage>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<SmsMessage>().enumerate() {
        let sms = row.with_context(|| format!("row {}", i + 1))?;
        out.push(sms);
    }
    Ok(out)
}

/// Parse an SMS export file.
pub fn read_sms_csv(path: impl AsRef<Path>) -> Result<Vec<SmsMessage>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_sms_csv(file).with_context(|| format!("parsing {}", path.as_ref().display()))
}

/// Demo inbox shown on first launch. The Zomato message uses an older
/// template and does not parse.
pub fn mock_inbox(now: DateTime<Utc>) -> Vec<SmsMessage> {
    let ts = now.to_rfc3339();
    vec![
        SmsMessage::new(
            "BZ-SWIGGY",
            "Congratulations! You earned ₹845.50 for 12 orders today.",
            ts.clone(),
        ),
        SmsMessage::new(
            "AD-UBERIN",
            "Uber: ₹1250.00 was added to your wallet for 8 trips.",
            ts.clone(),
        ),
        SmsMessage::new(
            "JM-ZOMATO",
            "Your total earnings for today is ₹920. deliveries completed: 15.",
            ts,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gigmate_core::Platform;

    #[test]
    fn test_mock_inbox_imports_two() {
        let now = Utc.with_ymd_and_hms(2026, 2, 19, 15, 0, 0).unwrap();
        let extractor = SmsExtractor::new().unwrap();
        let report = import_batch(&extractor, &mock_inbox(now));

        assert_eq!(report.imported(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.records[0].platform, Platform::Swiggy);
        assert_eq!(report.records[1].platform, Platform::Uber);
        assert_eq!(report.records[1].date, now.date_naive());
    }

    #[test]
    fn test_parse_sms_csv() {
        let text = "sender,body,timestamp\n\
                    AD-RAPIDO,\"Rapido Captain: You completed 20 rides and earned ₹450.00.\",2026-02-18T22:10:00+05:30\n\
                    VK-BANK,\"Your OTP is 4821\",2026-02-18T22:11:00+05:30\n";
        let msgs = parse_sms_csv(text.as_bytes()).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].sender, "AD-RAPIDO");
        assert!(msgs[0].body.starts_with("Rapido Captain"));
        assert_eq!(msgs[1].timestamp, "2026-02-18T22:11:00+05:30");
    }

    #[test]
    fn test_parse_sms_csv_missing_column() {
        let text = "sender,body\nAD-RAPIDO,hello\n";
        assert!(parse_sms_csv(text.as_bytes()).is_err());
    }
}
