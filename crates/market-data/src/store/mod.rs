//! Last-good-value persistence.
//!
//! A `SnapshotStore` keeps the most recent successful result per key as a
//! JSON blob on disk, so a restarted process can serve a recent value
//! before its first fetch completes. The format is an implementation
//! detail, not a contract with any other system; a missing or corrupt file
//! simply means no snapshot.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors opening or writing the store.
///
/// Reads never error: a snapshot that cannot be loaded is treated as
/// absent, because persistence is an optimization, not a data source.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure creating the directory or writing a blob.
    #[error("Snapshot store I/O error: {0}")]
    Io(#[from] io::Error),

    /// The value could not be serialized.
    #[error("Snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A persisted value with the time it was fetched.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot<T> {
    /// When the wrapped value was fetched
    pub fetched_at: DateTime<Utc>,
    /// The persisted value
    pub value: T,
}

/// One-JSON-file-per-key store rooted at a directory.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    /// Load the snapshot for `key`, if one exists and parses.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<Snapshot<T>> {
        let path = self.path_for(key);
        let raw = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Discarding unreadable snapshot '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Persist a snapshot for `key`, replacing any previous one.
    pub fn save<T: Serialize>(&self, key: &str, snapshot: &Snapshot<T>) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let raw = serde_json::to_string(snapshot)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use rust_decimal_macros::dec;

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(tmp.path()).unwrap();

        let quote = Quote::new("MERVAL", dec!(2134567.25), "ARS".into(), "Yahoo");
        let snapshot = Snapshot {
            fetched_at: Utc::now(),
            value: quote,
        };
        store.save("merval", &snapshot).unwrap();

        let loaded: Snapshot<Quote> = store.load("merval").unwrap();
        assert_eq!(loaded.value.symbol, "MERVAL");
        assert_eq!(loaded.value.price, dec!(2134567.25));
        assert_eq!(loaded.fetched_at, snapshot.fetched_at);
    }

    #[test]
    fn test_missing_key_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(tmp.path()).unwrap();

        assert!(store.load::<Quote>("nunca-guardado").is_none());
    }

    #[test]
    fn test_corrupt_blob_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(tmp.path()).unwrap();

        fs::write(tmp.path().join("crypto.json"), "{not json").unwrap();
        assert!(store.load::<Quote>("crypto").is_none());
    }

    #[test]
    fn test_keys_are_sanitized_to_filenames() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(tmp.path()).unwrap();

        let snapshot = Snapshot {
            fetched_at: Utc::now(),
            value: Quote::new("USD/ARS Blue", dec!(1485), "ARS".into(), "Bluelytics"),
        };
        store.save("dolar/blue", &snapshot).unwrap();

        assert!(tmp.path().join("dolar_blue.json").exists());
        assert!(store.load::<Quote>("dolar/blue").is_some());
    }
}
