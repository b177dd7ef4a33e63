// # clouddns-core
//
// Core library for upserting a single DNS resource record in a managed zone.
//
// ## Architecture Overview
//
// - **Record** / **ZoneDescriptor**: immutable values describing what to store and where
// - **Recorder**: trait for lookup/create/replace against a DNS backend
// - **Reconciler**: decides create vs. replace from the lookup result
// - **RecorderRegistry**: plugin-based registry of recorder factories
// - **MemoryRecorder**: in-process recorder for tests and offline runs
//
// ## Design Principles
//
// 1. **One decision point**: only the reconciler chooses between create and replace
// 2. **Typed absence**: `Error::NotFound` is the only error the reconciler branches on
// 3. **Plugin-Based**: backends are registered, not hard-coded
// 4. **No ambient state**: nothing below the binary reads the environment

pub mod traits;
pub mod reconciler;
pub mod registry;
pub mod record;
pub mod config;
pub mod error;
pub mod memory;

// Re-export core types for convenience
pub use traits::{Recorder, RecorderFactory};
pub use reconciler::{reconcile, Action, Reconciler, Reconciliation};
pub use registry::RecorderRegistry;
pub use record::{Record, RecordType, ZoneDescriptor};
pub use config::{BackendConfig, Defaults, EnvInfo};
pub use error::{Error, Result};
pub use memory::MemoryRecorder;
