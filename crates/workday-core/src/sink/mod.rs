//! Alert sink contract.
//!
//! The sink is the external notification-delivery subsystem: it accepts and
//! cancels timed triggers and reports which triggers are still outstanding.
//! The engine treats it as the single source of truth for "what will fire"
//! and never assumes read-your-own-write consistency without re-querying.

pub mod memory;

pub use memory::MemorySink;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;

/// Discriminates a one-shot trigger at an instant from a repeating
/// interval trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    OneShot { fire_at: DateTime<Utc> },
    Repeating { interval_secs: u64 },
}

impl Trigger {
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Trigger::OneShot { .. })
    }

    /// Fire instant for one-shot triggers, `None` for repeating ones.
    pub fn fire_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Trigger::OneShot { fire_at } => Some(*fire_at),
            Trigger::Repeating { .. } => None,
        }
    }
}

/// An outstanding trigger as reported by the sink.
///
/// `looping` marks internal follow-up reminders (and the standing repeat
/// alarm) so the pending projection can exclude them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRequest {
    pub id: String,
    pub title: String,
    pub trigger: Trigger,
    pub looping: bool,
}

/// Capability surface of the platform notification subsystem.
///
/// Every implementation is an adapter around external, possibly unreliable
/// state; each call either completes or fails atomically from the engine's
/// perspective. The out-of-band calls (`request_permission`, badge, haptics)
/// default to no-ops since not every adapter has a counterpart for them.
#[allow(async_fn_in_trait)]
pub trait AlertSink: Send + Sync {
    /// Register a one-shot trigger firing at `fire_at`.
    async fn submit_one_shot(
        &self,
        id: &str,
        title: &str,
        fire_at: DateTime<Utc>,
        looping: bool,
    ) -> Result<(), SinkError>;

    /// Register a repeating trigger firing every `interval_secs`.
    async fn submit_repeating(
        &self,
        id: &str,
        title: &str,
        interval_secs: u64,
        looping: bool,
    ) -> Result<(), SinkError>;

    /// Drop every outstanding trigger, one-shot and repeating alike.
    async fn cancel_all(&self) -> Result<(), SinkError>;

    /// Drop exactly the triggers with the given ids. Unknown ids are ignored.
    async fn cancel_by_ids(&self, ids: &[String]) -> Result<(), SinkError>;

    /// Report all outstanding triggers.
    async fn list_outstanding(&self) -> Result<Vec<AlertRequest>, SinkError>;

    /// Ask the platform for notification permission. Fire-and-forget; the
    /// engine never consumes the result.
    async fn request_permission(&self) {}

    /// Reset the app badge.
    async fn set_badge_count(&self, _count: u32) {}

    /// Stop any in-flight haptic feedback.
    async fn stop_haptics(&self) {}
}

/// Sharing a sink between the reconciler and other owners.
impl<S: AlertSink> AlertSink for std::sync::Arc<S> {
    async fn submit_one_shot(
        &self,
        id: &str,
        title: &str,
        fire_at: DateTime<Utc>,
        looping: bool,
    ) -> Result<(), SinkError> {
        self.as_ref().submit_one_shot(id, title, fire_at, looping).await
    }

    async fn submit_repeating(
        &self,
        id: &str,
        title: &str,
        interval_secs: u64,
        looping: bool,
    ) -> Result<(), SinkError> {
        self.as_ref()
            .submit_repeating(id, title, interval_secs, looping)
            .await
    }

    async fn cancel_all(&self) -> Result<(), SinkError> {
        self.as_ref().cancel_all().await
    }

    async fn cancel_by_ids(&self, ids: &[String]) -> Result<(), SinkError> {
        self.as_ref().cancel_by_ids(ids).await
    }

    async fn list_outstanding(&self) -> Result<Vec<AlertRequest>, SinkError> {
        self.as_ref().list_outstanding().await
    }

    async fn request_permission(&self) {
        self.as_ref().request_permission().await;
    }

    async fn set_badge_count(&self, count: u32) {
        self.as_ref().set_badge_count(count).await;
    }

    async fn stop_haptics(&self) {
        self.as_ref().stop_haptics().await;
    }
}
