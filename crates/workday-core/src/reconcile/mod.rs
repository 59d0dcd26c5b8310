//! Schedule reconciler.
//!
//! Single logical owner of the alert schedule: submits a freshly planned
//! schedule to the sink (full replace), purges obsolete triggers as time
//! advances, and maintains the caller-facing pending projection. All
//! operations serialize behind one async mutex so a "clear all" from one
//! call can never race another call's submissions.
//!
//! Per-event sink failures are swallowed and logged: the sink is an
//! unreliable external dependency and a partial schedule beats none. The
//! projection self-heals on the next pass, so no failure here is fatal.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::plan::{plan, PlannedEvent, FOLLOW_UP_COUNT, FOLLOW_UP_INTERVAL_SECS};
use crate::sink::{AlertSink, Trigger};

/// Well-known id of the standing repeating loop alarm, reused across calls
/// so foreground activation can cancel it.
pub const REPEAT_ALARM_ID: &str = "repeat-alarm";

const REPEAT_ALARM_TITLE: &str = "Workday alert";

/// Caller-facing projection of one outstanding, future, non-loop alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAlert {
    pub id: String,
    pub title: String,
    pub fire_at: DateTime<Utc>,
}

struct Inner<S> {
    sink: S,
    pending: Vec<ScheduledAlert>,
}

/// Reconciles the planner's output against the external alert sink.
pub struct Reconciler<S: AlertSink> {
    inner: Mutex<Inner<S>>,
}

impl<S: AlertSink> Reconciler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sink,
                pending: Vec::new(),
            }),
        }
    }

    /// Last computed pending projection.
    pub async fn pending(&self) -> Vec<ScheduledAlert> {
        self.inner.lock().await.pending.clone()
    }

    /// Fire-and-forget permission request; the result is not consumed.
    pub async fn request_permission(&self) {
        self.inner.lock().await.sink.request_permission().await;
    }

    /// Replace the entire schedule with a fresh plan for this clock-in.
    ///
    /// # Errors
    /// Propagates the planner's `ValidationError` unchanged; no sink write
    /// happens in that case.
    pub async fn schedule_alerts(
        &self,
        clock_in: DateTime<Utc>,
        lunch_offset: Duration,
    ) -> Result<Vec<ScheduledAlert>, ValidationError> {
        self.schedule_alerts_at(clock_in, lunch_offset, Utc::now())
            .await
    }

    /// `schedule_alerts` with an explicit `now` for the final projection.
    pub async fn schedule_alerts_at(
        &self,
        clock_in: DateTime<Utc>,
        lunch_offset: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScheduledAlert>, ValidationError> {
        // Validation happens before the lock and before any sink mutation.
        let events = plan(clock_in, lunch_offset)?;

        let mut inner = self.inner.lock().await;
        if let Err(e) = inner.sink.cancel_all().await {
            tracing::warn!(error = %e, "failed to clear prior schedule; submitting anyway");
        }
        for event in &events {
            inner.submit_event(event).await;
        }
        // Standing 60 s loop alarm, canceled on foreground activation.
        if let Err(e) = inner
            .sink
            .submit_repeating(
                REPEAT_ALARM_ID,
                REPEAT_ALARM_TITLE,
                FOLLOW_UP_INTERVAL_SECS as u64,
                true,
            )
            .await
        {
            tracing::warn!(error = %e, "failed to submit repeating loop alarm");
        }
        Ok(inner.rebuild_pending(now).await)
    }

    /// Cancel every outstanding one-shot trigger whose fire time has passed
    /// and recompute the pending projection.
    ///
    /// Idempotent and infallible: a sink query or cancel failure means
    /// "nothing to purge this round" and is retried on the next pass.
    pub async fn purge_obsolete_and_recompute(&self) -> Vec<ScheduledAlert> {
        self.purge_obsolete_and_recompute_at(Utc::now()).await
    }

    /// `purge_obsolete_and_recompute` with an explicit `now`.
    pub async fn purge_obsolete_and_recompute_at(
        &self,
        now: DateTime<Utc>,
    ) -> Vec<ScheduledAlert> {
        let mut inner = self.inner.lock().await;
        match inner.sink.list_outstanding().await {
            Ok(requests) => {
                // Repeating triggers are never classified as obsolete.
                let obsolete: Vec<String> = requests
                    .iter()
                    .filter(|r| r.trigger.fire_at().is_some_and(|fire_at| fire_at < now))
                    .map(|r| r.id.clone())
                    .collect();
                if !obsolete.is_empty() {
                    if let Err(e) = inner.sink.cancel_by_ids(&obsolete).await {
                        tracing::warn!(
                            count = obsolete.len(),
                            error = %e,
                            "failed to cancel obsolete triggers; will retry next pass"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not query sink; nothing to purge this round");
            }
        }
        inner.rebuild_pending(now).await
    }

    /// Rebuild the pending projection from current sink truth.
    pub async fn refresh_pending(&self) -> Vec<ScheduledAlert> {
        self.refresh_pending_at(Utc::now()).await
    }

    /// `refresh_pending` with an explicit `now`.
    pub async fn refresh_pending_at(&self, now: DateTime<Utc>) -> Vec<ScheduledAlert> {
        self.inner.lock().await.rebuild_pending(now).await
    }

    /// Foreground reconciliation: stop the repeating loop alarm and reset
    /// out-of-band signals. Safe to call when no loop alarm is active.
    pub async fn on_foreground_activate(&self) {
        let inner = self.inner.lock().await;
        if let Err(e) = inner
            .sink
            .cancel_by_ids(&[REPEAT_ALARM_ID.to_string()])
            .await
        {
            tracing::warn!(error = %e, "failed to cancel repeating loop alarm");
        }
        inner.sink.set_badge_count(0).await;
        inner.sink.stop_haptics().await;
    }
}

impl<S: AlertSink> Inner<S> {
    /// Submit one planned event plus its loop follow-ups, best-effort.
    async fn submit_event(&mut self, event: &PlannedEvent) {
        let id = Uuid::new_v4().to_string();
        if let Err(e) = self
            .sink
            .submit_one_shot(&id, &event.title, event.fire_at, false)
            .await
        {
            tracing::warn!(id = %id, title = %event.title, error = %e, "alert submission failed; continuing");
        }
        if !event.repeat_eligible {
            return;
        }
        for k in 1..=FOLLOW_UP_COUNT {
            let follow_id = Uuid::new_v4().to_string();
            let fire_at = event.fire_at + Duration::seconds(FOLLOW_UP_INTERVAL_SECS * i64::from(k));
            if let Err(e) = self
                .sink
                .submit_one_shot(&follow_id, &event.title, fire_at, true)
                .await
            {
                tracing::warn!(id = %follow_id, title = %event.title, error = %e, "follow-up submission failed; continuing");
            }
        }
    }

    /// Full rebuild from sink truth: one-shot, non-loop, strictly future,
    /// sorted ascending. Never patched incrementally. A query failure keeps
    /// the previous (stale) projection.
    async fn rebuild_pending(&mut self, now: DateTime<Utc>) -> Vec<ScheduledAlert> {
        match self.sink.list_outstanding().await {
            Ok(requests) => {
                let mut pending: Vec<ScheduledAlert> = requests
                    .into_iter()
                    .filter(|r| !r.looping)
                    .filter_map(|r| match r.trigger {
                        Trigger::OneShot { fire_at } if fire_at > now => Some(ScheduledAlert {
                            id: r.id,
                            title: r.title,
                            fire_at,
                        }),
                        _ => None,
                    })
                    .collect();
                pending.sort_by_key(|a| a.fire_at);
                self.pending = pending.clone();
                pending
            }
            Err(e) => {
                tracing::warn!(error = %e, "pending refresh failed; keeping stale projection");
                self.pending.clone()
            }
        }
    }
}
