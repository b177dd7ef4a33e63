//! Single-record reconciler
//!
//! The Reconciler turns a desired [`Record`] into at most two backend calls:
//! one `lookup`, then either `create` or `replace`.
//!
//! ## State Machine
//!
//! ```text
//!                 ┌──────────┐
//!                 │  Lookup  │
//!                 └──────────┘
//!        NotFound      │ Ok         │ other error
//!     ┌────────────────┼────────────┴──────────┐
//!     ▼                ▼                       ▼
//! ┌────────┐      ┌─────────┐             ┌────────┐
//! │ Create │      │ Replace │             │ Failed │
//! └────────┘      └─────────┘             └────────┘
//!     │ ok / err       │ ok / err
//!     ▼                ▼
//!  Done / Failed    Done / Failed
//! ```
//!
//! Only [`Error::NotFound`] from `lookup` leads to `create`. Any other lookup
//! error ends the run without touching the zone. Errors from `create` or
//! `replace` are returned as-is: no fallback, no retry, no compensation.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::traits::Recorder;
use tracing::{debug, info, warn};

/// Which write the reconciler performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The record was absent and has been created
    Created,
    /// The record existed and has been overwritten
    Replaced,
}

/// Reconciler states, one per step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileState {
    /// Nothing has happened yet
    Start,
    /// Waiting on `lookup`
    Lookup,
    /// Record absent, calling `create`
    Create,
    /// Record present, calling `replace`
    Replace,
    /// Write succeeded
    Done,
    /// A backend call failed
    Failed,
}

/// Outcome of a successful reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The record now stored in the zone
    pub record: Record,
    /// The write that produced it
    pub action: Action,
}

/// Idempotent upsert of one record through a [`Recorder`]
pub struct Reconciler<'a> {
    recorder: &'a dyn Recorder,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over `recorder`
    pub fn new(recorder: &'a dyn Recorder) -> Self {
        Self { recorder }
    }

    /// Ensure `desired` is stored in the recorder's zone
    ///
    /// # Returns
    ///
    /// - `Ok(Reconciliation)`: The desired record and the write that stored it
    /// - `Err(Error)`: The first error from validation or the backend
    pub async fn reconcile(&self, desired: Record) -> Result<Reconciliation> {
        self.transition(ReconcileState::Start, &desired);
        desired.validate()?;

        self.transition(ReconcileState::Lookup, &desired);
        let action = match self
            .recorder
            .lookup(&desired.key, &desired.record_type)
            .await
        {
            Ok(current) => {
                debug!(
                    "Found {} (type: {}) with data {:?}, ttl {}",
                    current.key, current.record_type, current.data, current.ttl
                );
                self.transition(ReconcileState::Replace, &desired);
                self.recorder
                    .replace(&desired)
                    .await
                    .map_err(|e| self.fail(&desired, e))?;
                Action::Replaced
            }
            Err(Error::NotFound(_)) => {
                self.transition(ReconcileState::Create, &desired);
                self.recorder
                    .create(&desired)
                    .await
                    .map_err(|e| self.fail(&desired, e))?;
                Action::Created
            }
            Err(e) => return Err(self.fail(&desired, e)),
        };

        self.transition(ReconcileState::Done, &desired);
        info!(
            "{} {} (type: {}) in zone {} -> {:?} (ttl {})",
            match action {
                Action::Created => "Created",
                Action::Replaced => "Replaced",
            },
            desired.key,
            desired.record_type,
            self.recorder.zone().managed_zone,
            desired.data,
            desired.ttl
        );

        Ok(Reconciliation {
            record: desired,
            action,
        })
    }

    fn transition(&self, state: ReconcileState, desired: &Record) {
        debug!(
            state = ?state,
            backend = self.recorder.backend_name(),
            "reconcile {} (type: {})",
            desired.key,
            desired.record_type
        );
    }

    fn fail(&self, desired: &Record, error: Error) -> Error {
        self.transition(ReconcileState::Failed, desired);
        warn!(
            "Failed to reconcile {} (type: {}): {}",
            desired.key, desired.record_type, error
        );
        error
    }
}

/// Reconcile `desired` against `recorder`, returning the stored record
///
/// # Example
///
/// ```rust,no_run
/// use clouddns_core::memory::MemoryRecorder;
/// use clouddns_core::{reconcile, Record, ZoneDescriptor};
///
/// #[tokio::main]
/// async fn main() -> clouddns_core::Result<()> {
///     let recorder = MemoryRecorder::new(ZoneDescriptor::new("example.com.", "p", "example-com"));
///     let desired = Record::new("api.example.com.", "A", vec!["10.10.10.10".into()], 60);
///
///     let stored = reconcile(&recorder, desired.clone()).await?;
///     assert_eq!(stored, desired);
///     Ok(())
/// }
/// ```
pub async fn reconcile(recorder: &dyn Recorder, desired: Record) -> Result<Record> {
    Reconciler::new(recorder)
        .reconcile(desired)
        .await
        .map(|outcome| outcome.record)
}
