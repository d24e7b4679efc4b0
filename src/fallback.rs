//! Fallback storage - JSON file used when the database is unreachable

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::StoredAccessPoint;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON array file of [`StoredAccessPoint`], appended to on every save
#[derive(Debug, Clone)]
pub struct FallbackStore {
    path: PathBuf,
    // read-modify-write must not interleave
    lock: Arc<Mutex<()>>,
}

impl FallbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// All stored records; a missing file is an empty store
    pub fn try_load(&self) -> Result<Vec<StoredAccessPoint>, StorageError> {
        let _guard = self.lock.lock();
        self.read_unlocked()
    }

    /// All stored records, or none if the file cannot be read
    pub fn load(&self) -> Vec<StoredAccessPoint> {
        self.try_load().unwrap_or_else(|e| {
            tracing::error!("[FALLBACK] Error reading from fallback storage: {}", e);
            Vec::new()
        })
    }

    pub fn list_shared(&self) -> Vec<StoredAccessPoint> {
        self.load().into_iter().filter(|ap| ap.shared_publicly).collect()
    }

    /// Append records to the existing file contents
    pub fn append(&self, records: &[StoredAccessPoint]) -> Result<(), StorageError> {
        let _guard = self.lock.lock();

        let mut existing = self.read_unlocked()?;
        existing.extend_from_slice(records);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&existing)?)?;

        tracing::info!("[FALLBACK] Saved {} records to fallback storage", records.len());
        Ok(())
    }

    fn read_unlocked(&self) -> Result<Vec<StoredAccessPoint>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShareInfo;
    use crate::wifi::AccessPoint;
    use tempfile::TempDir;

    fn record(ssid: &str, shared: bool) -> StoredAccessPoint {
        let ap = AccessPoint {
            ssid: ssid.to_string(),
            ..Default::default()
        };
        let share = ShareInfo {
            city: "Austin".to_string(),
            state: "TX".to_string(),
            uploaded_by: None,
        };
        StoredAccessPoint::for_fallback(&ap, shared.then_some(&share))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FallbackStore::new(dir.path().join("data-fallback.json"));
        assert!(store.load().is_empty());
        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn test_append_accumulates() {
        let dir = TempDir::new().unwrap();
        let store = FallbackStore::new(dir.path().join("nested").join("data-fallback.json"));

        store.append(&[record("a", true)]).unwrap();
        store.append(&[record("b", false), record("c", true)]).unwrap();

        let all = store.load();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].ssid, "a");

        let shared: Vec<String> = store.list_shared().into_iter().map(|r| r.ssid).collect();
        assert_eq!(shared, vec!["a", "c"]);
    }

    #[test]
    fn test_file_uses_dashboard_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data-fallback.json");
        let store = FallbackStore::new(&path);
        store.append(&[record("a", true)]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["SSID"], "a");
        assert_eq!(json[0]["sharedPublicly"], true);
        assert!(json[0]["id"].as_str().unwrap().starts_with("fallback-"));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data-fallback.json");
        fs::write(&path, "not json").unwrap();

        let store = FallbackStore::new(&path);
        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(StorageError::Serialization(_))));
        assert!(store.append(&[record("a", true)]).is_err());
    }
}
