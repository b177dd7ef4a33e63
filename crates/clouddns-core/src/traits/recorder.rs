// # Recorder Trait
//
// Defines the backend capability the reconciler works through.
//
// ## Implementations
//
// - Google Cloud DNS: `clouddns-provider-gcp` crate
// - In-memory: `clouddns_core::memory::MemoryRecorder`
//
// ## Usage
//
// ```rust,ignore
// use clouddns_core::{Record, Recorder};
//
// async fn show(recorder: &dyn Recorder) -> clouddns_core::Result<()> {
//     let current = recorder.lookup("api.example.com.", "A").await?;
//     println!("{:?}", current.data);
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::config::BackendConfig;
use crate::record::{Record, ZoneDescriptor};

/// Backend capability for a single managed zone
///
/// Every recorder is bound to one [`ZoneDescriptor`] at construction time.
/// All three operations are single round trips to the backend.
///
/// # Contract
///
/// - No retries or backoff. A failed call returns an error and that is the end of it.
/// - No caching between calls. `lookup` always reflects the backend.
/// - `lookup` must return [`crate::Error::NotFound`] for an absent record and
///   never for anything else. The reconciler relies on this to pick `create`.
/// - `create` fails if the record already exists, `replace` fails if it does not.
#[async_trait]
pub trait Recorder: Send + Sync {
    /// Fetch the record stored under `key` with type `record_type`
    ///
    /// # Returns
    ///
    /// - `Ok(Record)`: The stored record
    /// - `Err(Error::NotFound)`: No record with that key and type exists
    /// - `Err(_)`: Any other backend failure
    async fn lookup(&self, key: &str, record_type: &str) -> Result<Record, crate::Error>;

    /// Insert a new record into the zone
    async fn create(&self, record: &Record) -> Result<(), crate::Error>;

    /// Overwrite the existing record with the same key and type
    async fn replace(&self, record: &Record) -> Result<(), crate::Error>;

    /// The zone this recorder is bound to
    fn zone(&self) -> &ZoneDescriptor;

    /// Get the backend name (for logging/debugging)
    fn backend_name(&self) -> &'static str;
}

/// Helper trait for constructing recorders from configuration
pub trait RecorderFactory: Send + Sync {
    /// Create a Recorder bound to `zone`
    ///
    /// # Returns
    ///
    /// A boxed Recorder trait object, or a configuration error
    fn create(
        &self,
        config: &BackendConfig,
        zone: ZoneDescriptor,
    ) -> Result<Box<dyn Recorder>, crate::Error>;
}
