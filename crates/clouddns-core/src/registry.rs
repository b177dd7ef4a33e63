//! Plugin-based recorder registry
//!
//! Backends register a [`RecorderFactory`] under their type name, and the
//! binary picks one from [`BackendConfig::type_name`] without an if-else chain.
//!
//! ```rust,ignore
//! use clouddns_core::registry::RecorderRegistry;
//!
//! let registry = RecorderRegistry::with_builtin();
//! clouddns_provider_gcp::register(&registry);
//!
//! let recorder = registry.create_recorder(&config, zone)?;
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::memory::MemoryFactory;
use crate::record::ZoneDescriptor;
use crate::traits::{Recorder, RecorderFactory};

/// Registry of recorder factories keyed by backend type name
#[derive(Default)]
pub struct RecorderRegistry {
    factories: RwLock<HashMap<String, Box<dyn RecorderFactory>>>,
}

impl RecorderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the backends that ship in this crate
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register("memory", Box::new(MemoryFactory));
        registry
    }

    /// Register a recorder factory
    ///
    /// # Parameters
    ///
    /// - `name`: Backend type name (e.g., "gcp", "memory")
    /// - `factory`: Factory object for creating recorder instances
    pub fn register(&self, name: impl Into<String>, factory: Box<dyn RecorderFactory>) {
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        factories.insert(name.into(), factory);
    }

    /// Create a recorder bound to `zone` from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Recorder>)`: Created recorder instance
    /// - `Err(Error)`: If the backend type is not registered or creation fails
    pub fn create_recorder(
        &self,
        config: &BackendConfig,
        zone: ZoneDescriptor,
    ) -> Result<Box<dyn Recorder>> {
        config.validate()?;
        zone.validate()?;

        let backend_type = config.type_name();
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);

        let factory = factories
            .get(backend_type)
            .ok_or_else(|| Error::config(format!("Unknown backend type: {}", backend_type)))?;

        factory.create(config, zone)
    }

    /// List all registered backend types
    pub fn list(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.keys().cloned().collect()
    }

    /// Check if a backend type is registered
    pub fn has(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.contains_key(name)
    }
}
