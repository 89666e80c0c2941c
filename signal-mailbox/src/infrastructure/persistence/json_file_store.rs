use crate::application::ports::{PersistenceError, SignalStore};
use crate::domain::Signal;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

/// Flat-file signal store
///
/// The file holds a JSON array of signal objects and is overwritten in full
/// on every save. There is no locking or atomic rename; the registry is the
/// only writer.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl SignalStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Signal>, PersistenceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No signals file found, starting with empty list");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.display_path(),
                    source,
                });
            }
        };

        let signals: Vec<Signal> =
            serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Parse {
                path: self.display_path(),
                source,
            })?;

        info!(count = signals.len(), path = %self.path.display(), "Loaded signals from file");
        Ok(signals)
    }

    async fn save(&self, signals: &[Signal]) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec(signals)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PersistenceError::Write {
                    path: self.display_path(),
                    source,
                })?;
        }

        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| PersistenceError::Write {
                path: self.display_path(),
                source,
            })?;

        debug!(count = signals.len(), path = %self.path.display(), "Signals saved to file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn signal(id: &str, lot: f64) -> Signal {
        Signal::from_value(json!({
            "unique_id": id,
            "symbol": "XAUUSD",
            "order_type": "sell",
            "lot": lot,
            "open_price": 2010.5,
            "stop_loss": 2020.0,
            "take_profit": 1990.0,
            "open_time": 1_700_000_000,
            "magic": 9001
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("signals.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("signals.json"));
        let signals = vec![signal("A", 1.0), signal("B", 0.3)];

        store.save(&signals).await.unwrap();

        assert_eq!(store.load().await.unwrap(), signals);
    }

    #[tokio::test]
    async fn test_file_is_a_json_array_overwritten_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.json");
        let store = JsonFileStore::new(&path);

        store.save(&[signal("A", 1.0), signal("B", 1.0)]).await.unwrap();
        store.save(&[signal("C", 1.0)]).await.unwrap();

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let entries = raw.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["unique_id"], "C");
        assert_eq!(entries[0]["magic"], 9001);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state").join("signals.json"));

        store.save(&[signal("A", 1.0)]).await.unwrap();

        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.json");
        std::fs::write(&path, b"[{\"unique_id\": ").unwrap();

        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_non_object_entries_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.json");
        std::fs::write(&path, b"[1, 2, 3]").unwrap();

        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_unwritable_path_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let store = JsonFileStore::new(dir.path());

        let err = store.save(&[signal("A", 1.0)]).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
    }
}
