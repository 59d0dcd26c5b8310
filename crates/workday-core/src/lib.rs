//! # Workday Alerts Core Library
//!
//! Core engine for Workday Alerts: converts one clock-in instant and a
//! lunch-start offset into a deterministic alert schedule and keeps that
//! schedule reconciled against an external alert sink as time advances.
//!
//! ## Architecture
//!
//! - **Planner** ([`plan`]): pure computation from (clock-in, lunch offset)
//!   to the six planned events -- lunch-out, lunch-in, day-out, each with a
//!   2-minute pre-warning. Validates the offset and fails fast.
//! - **Reconciler** ([`Reconciler`]): serialized owner of the schedule.
//!   Full-replace submission (with 1-minute loop follow-ups), obsolete-entry
//!   purge, and the always-rebuilt pending projection.
//! - **Sink** ([`AlertSink`]): injected capability for the platform
//!   notification subsystem. [`MemorySink`] for tests and ephemeral use,
//!   [`StoredSink`] for the SQLite-backed CLI adapter.
//! - **Storage**: trigger database and TOML configuration.

pub mod error;
pub mod plan;
pub mod reconcile;
pub mod sink;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, Result, SinkError, ValidationError};
pub use plan::{AlertKind, PlannedEvent};
pub use reconcile::{Reconciler, ScheduledAlert, REPEAT_ALARM_ID};
pub use sink::{AlertRequest, AlertSink, MemorySink, Trigger};
pub use storage::{Config, Database, StoredSink};
