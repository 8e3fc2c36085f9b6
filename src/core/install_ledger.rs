// src/core/install_ledger.rs

//! Persistent record of what the installer wrote, stored as one bincode file.

use crate::models::{InstallLocation, InstallationRecord};
use log::debug;
use std::io::ErrorKind;
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode from binary format: {0}")]
    BincodeDecode(#[from] bincode::error::DecodeError),
    #[error("Failed to encode to binary format: {0}")]
    BincodeEncode(#[from] bincode::error::EncodeError),
}

type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Clone)]
pub struct InstallLedger {
    path: PathBuf,
}

impl InstallLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record. A missing ledger is empty.
    pub fn load(&self) -> LedgerResult<Vec<InstallationRecord>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let (records, _): (Vec<InstallationRecord>, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
        Ok(records)
    }

    fn save(&self, records: &[InstallationRecord]) -> LedgerResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serde::encode_to_vec(records, bincode::config::standard())?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    pub fn get(
        &self,
        name: &str,
        location: InstallLocation,
    ) -> LedgerResult<Option<InstallationRecord>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|r| r.name == name && r.location == location))
    }

    /// Inserts `record`, replacing any record for the same name and location.
    pub fn record(&self, record: InstallationRecord) -> LedgerResult<()> {
        let mut records = self.load()?;
        records.retain(|r| !(r.name == record.name && r.location == record.location));
        debug!("Recording installation of '{}' ({})", record.name, record.location);
        records.push(record);
        self.save(&records)
    }

    /// Drops the record for `name` at `location`. Returns whether one existed.
    pub fn forget(&self, name: &str, location: InstallLocation) -> LedgerResult<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| !(r.name == name && r.location == location));
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordSource;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(name: &str, location: InstallLocation, size: u64) -> InstallationRecord {
        InstallationRecord {
            name: name.to_string(),
            file_path: PathBuf::from(format!("/tmp/{}.md", name)),
            location,
            installed_at: Utc::now(),
            size_bytes: size,
            source: RecordSource::Repository,
            provenance_version: Some("1.0.0".to_string()),
            content_hash: Some("abc".to_string()),
        }
    }

    #[test]
    fn test_missing_ledger_is_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = InstallLedger::new(dir.path().join("nested/installations.bin"));
        assert!(ledger.load().unwrap().is_empty());
    }

    #[test]
    fn test_record_replaces_same_name_and_location() {
        let dir = TempDir::new().unwrap();
        let ledger = InstallLedger::new(dir.path().join("nested/installations.bin"));

        ledger.record(record("commit", InstallLocation::Personal, 1)).unwrap();
        ledger.record(record("commit", InstallLocation::Project, 2)).unwrap();
        ledger.record(record("commit", InstallLocation::Personal, 3)).unwrap();

        assert_eq!(ledger.load().unwrap().len(), 2);
        let personal = ledger.get("commit", InstallLocation::Personal).unwrap().unwrap();
        assert_eq!(personal.size_bytes, 3);
        assert_eq!(personal.provenance_version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_forget() {
        let dir = TempDir::new().unwrap();
        let ledger = InstallLedger::new(dir.path().join("installations.bin"));
        ledger.record(record("commit", InstallLocation::Personal, 1)).unwrap();

        assert!(ledger.forget("commit", InstallLocation::Personal).unwrap());
        assert!(!ledger.forget("commit", InstallLocation::Personal).unwrap());
        assert!(ledger.get("commit", InstallLocation::Personal).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_ledger_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("installations.bin");
        fs::write(&path, [0xfd, 0x01]).unwrap();
        let ledger = InstallLedger::new(path);
        assert!(ledger.load().is_err());
    }
}
