//! gigmate-ingest: earning ingestion from platform payout SMS, plus ledger summaries.

pub mod import;
pub mod ledger;
pub mod sms;
pub mod types;

pub use import::{import_batch, mock_inbox, parse_sms_csv, read_sms_csv, ImportReport};
pub use ledger::{summarize, total_amount, PlatformTotal};
pub use sms::{FieldOrder, PlatformPattern, SmsExtractor, PATTERNS};
pub use types::{EarningRecord, SmsMessage};
