//! Core traits for clouddns
//!
//! - [`Recorder`]: lookup/create/replace against a DNS backend
//! - [`RecorderFactory`]: build a recorder from configuration

pub mod recorder;

pub use recorder::{Recorder, RecorderFactory};
