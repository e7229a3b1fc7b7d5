use anyhow::{Context, Result};
use gigmate_ingest::EarningRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub fn gigmate_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".gigmate"))
}

pub fn ensure_gigmate_home() -> Result<PathBuf> {
    let dir = gigmate_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn earnings_path() -> Result<PathBuf> {
    Ok(ensure_gigmate_home()?.join("earnings.json"))
}

/// A persisted earning record with the id this store assigned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEarning {
    pub id: String,
    #[serde(flatten)]
    pub record: EarningRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarningsStore {
    pub entries: Vec<StoredEarning>,
}

impl EarningsStore {
    /// Append records, assigning `<prefix>-<yyyymmdd>-<seq>` ids.
    pub fn append(&mut self, prefix: &str, records: Vec<EarningRecord>) -> Vec<String> {
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id = format!(
                "{}-{}-{:04}",
                prefix,
                record.date.format("%Y%m%d"),
                self.entries.len() + 1
            );
            ids.push(id.clone());
            self.entries.push(StoredEarning { id, record });
        }
        ids
    }

    pub fn records(&self) -> Vec<EarningRecord> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }
}

pub fn read_earnings(path: &Path) -> Result<EarningsStore> {
    if !path.exists() {
        return Ok(EarningsStore::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_earnings(path: &Path, store: &EarningsStore) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
