// # Memory Recorder
//
// In-memory implementation of Recorder.
//
// ## Purpose
//
// Holds records in a map keyed by (name, type). Nothing is sent anywhere and
// nothing survives the process. Clones share the same map, so a test can keep
// a handle and inspect what the reconciler wrote.
//
// ## Semantics
//
// Mirrors a real backend's contract:
// - `lookup` returns NotFound for a missing (name, type) pair
// - `create` fails if the pair already exists
// - `replace` fails if the pair does not exist

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::BackendConfig;
use crate::record::{Record, ZoneDescriptor};
use crate::traits::{Recorder, RecorderFactory};
use crate::Error;

const BACKEND_NAME: &str = "memory";

type RecordKey = (String, String);

/// In-memory recorder implementation
///
/// # Example
///
/// ```rust,no_run
/// use clouddns_core::memory::MemoryRecorder;
/// use clouddns_core::{Record, Recorder, ZoneDescriptor};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let recorder = MemoryRecorder::new(ZoneDescriptor::new("example.com.", "p", "example-com"));
///
///     let record = Record::new("www.example.com.", "A", vec!["1.2.3.4".into()], 60);
///     recorder.create(&record).await?;
///
///     let stored = recorder.lookup("www.example.com.", "A").await?;
///     assert_eq!(stored, record);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryRecorder {
    zone: ZoneDescriptor,
    inner: Arc<RwLock<HashMap<RecordKey, Record>>>,
}

impl MemoryRecorder {
    /// Create a new empty memory recorder
    pub fn new(zone: ZoneDescriptor) -> Self {
        Self {
            zone,
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a memory recorder pre-populated with `records`
    pub fn with_records(zone: ZoneDescriptor, records: impl IntoIterator<Item = Record>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (key_of(&record.key, &record.record_type), record))
            .collect();

        Self {
            zone,
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Get a stored record without going through the Recorder contract
    pub async fn get(&self, key: &str, record_type: &str) -> Option<Record> {
        self.inner.read().await.get(&key_of(key, record_type)).cloned()
    }

    /// Get all stored records
    pub async fn records(&self) -> Vec<Record> {
        self.inner.read().await.values().cloned().collect()
    }

    /// Get the number of records in the zone
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the zone is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

fn key_of(key: &str, record_type: &str) -> RecordKey {
    (key.to_string(), record_type.to_string())
}

#[async_trait]
impl Recorder for MemoryRecorder {
    async fn lookup(&self, key: &str, record_type: &str) -> Result<Record, Error> {
        let guard = self.inner.read().await;
        guard
            .get(&key_of(key, record_type))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{} (type: {})", key, record_type)))
    }

    async fn create(&self, record: &Record) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        let key = key_of(&record.key, &record.record_type);
        if guard.contains_key(&key) {
            return Err(Error::backend(
                BACKEND_NAME,
                format!(
                    "record already exists: {} (type: {})",
                    record.key, record.record_type
                ),
            ));
        }
        guard.insert(key, record.clone());
        Ok(())
    }

    async fn replace(&self, record: &Record) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        match guard.get_mut(&key_of(&record.key, &record.record_type)) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(Error::backend(
                BACKEND_NAME,
                format!(
                    "cannot replace missing record: {} (type: {})",
                    record.key, record.record_type
                ),
            )),
        }
    }

    fn zone(&self) -> &ZoneDescriptor {
        &self.zone
    }

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }
}

/// Factory for creating memory recorders
pub struct MemoryFactory;

impl RecorderFactory for MemoryFactory {
    fn create(&self, config: &BackendConfig, zone: ZoneDescriptor) -> Result<Box<dyn Recorder>, Error> {
        match config {
            BackendConfig::Memory => Ok(Box::new(MemoryRecorder::new(zone))),
            _ => Err(Error::config("Invalid config for memory recorder")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> ZoneDescriptor {
        ZoneDescriptor::new("example.com.", "test-project", "example-com")
    }

    fn www(ip: &str) -> Record {
        Record::new("www.example.com.", "A", vec![ip.to_string()], 60)
    }

    #[tokio::test]
    async fn test_memory_recorder_basic() {
        let recorder = MemoryRecorder::new(zone());
        assert!(recorder.is_empty().await);

        let err = recorder.lookup("www.example.com.", "A").await.unwrap_err();
        assert!(err.is_not_found());

        recorder.create(&www("1.2.3.4")).await.unwrap();
        assert_eq!(recorder.len().await, 1);
        assert_eq!(
            recorder.lookup("www.example.com.", "A").await.unwrap(),
            www("1.2.3.4")
        );

        recorder.replace(&www("5.6.7.8")).await.unwrap();
        assert_eq!(recorder.get("www.example.com.", "A").await, Some(www("5.6.7.8")));
    }

    #[tokio::test]
    async fn test_lookup_is_scoped_by_type() {
        let recorder = MemoryRecorder::with_records(zone(), [www("1.2.3.4")]);

        assert!(recorder.lookup("www.example.com.", "A").await.is_ok());
        let err = recorder.lookup("www.example.com.", "AAAA").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_existing_fails() {
        let recorder = MemoryRecorder::with_records(zone(), [www("1.2.3.4")]);

        let err = recorder.create(&www("5.6.7.8")).await.unwrap_err();
        assert!(matches!(err, Error::Backend { .. }));
        assert_eq!(recorder.get("www.example.com.", "A").await, Some(www("1.2.3.4")));
    }

    #[tokio::test]
    async fn test_replace_missing_fails() {
        let recorder = MemoryRecorder::new(zone());

        let err = recorder.replace(&www("1.2.3.4")).await.unwrap_err();
        assert!(!err.is_not_found());
        assert!(recorder.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let recorder = MemoryRecorder::new(zone());
        let handle = recorder.clone();

        recorder.create(&www("1.2.3.4")).await.unwrap();
        assert_eq!(handle.records().await, vec![www("1.2.3.4")]);
    }

    #[test]
    fn test_factory() {
        let recorder = MemoryFactory.create(&BackendConfig::Memory, zone()).unwrap();
        assert_eq!(recorder.backend_name(), "memory");
        assert_eq!(recorder.zone().managed_zone, "example-com");

        assert!(MemoryFactory.create(&BackendConfig::default(), zone()).is_err());
    }
}
