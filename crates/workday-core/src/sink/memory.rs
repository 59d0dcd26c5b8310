//! In-memory alert sink.
//!
//! Backs the reconciler tests and works as an ephemeral sink for callers
//! that don't need triggers to outlive the process. Failure injection
//! switches let tests exercise the best-effort submission and
//! query-fallback paths.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::SinkError;

use super::{AlertRequest, AlertSink, Trigger};

#[derive(Debug, Default)]
pub struct MemorySink {
    requests: Mutex<Vec<AlertRequest>>,
    fail_submissions: AtomicBool,
    fail_next: AtomicU32,
    fail_queries: AtomicBool,
    badge_count: AtomicU32,
    haptics_stopped: AtomicBool,
    permission_requested: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent submission fail.
    pub fn set_fail_submissions(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::SeqCst);
    }

    /// Make only the next `count` submissions fail, then recover.
    pub fn fail_next_submissions(&self, count: u32) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    /// Make every subsequent `list_outstanding` fail.
    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of everything currently registered.
    pub fn requests(&self) -> Vec<AlertRequest> {
        match self.requests.lock() {
            Ok(reqs) => reqs.clone(),
            Err(_) => Vec::new(),
        }
    }

    pub fn badge_count(&self) -> u32 {
        self.badge_count.load(Ordering::SeqCst)
    }

    pub fn haptics_stopped(&self) -> bool {
        self.haptics_stopped.load(Ordering::SeqCst)
    }

    pub fn permission_requested(&self) -> bool {
        self.permission_requested.load(Ordering::SeqCst)
    }

    fn insert(&self, request: AlertRequest) -> Result<(), SinkError> {
        let fail_once = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail_once || self.fail_submissions.load(Ordering::SeqCst) {
            return Err(SinkError::Submit {
                id: request.id,
                message: "injected submission failure".into(),
            });
        }
        let mut reqs = self.requests.lock().map_err(|e| SinkError::Submit {
            id: request.id.clone(),
            message: format!("lock failed: {e}"),
        })?;
        // Same-id resubmission replaces, matching platform behavior.
        reqs.retain(|r| r.id != request.id);
        reqs.push(request);
        Ok(())
    }
}

impl AlertSink for MemorySink {
    async fn submit_one_shot(
        &self,
        id: &str,
        title: &str,
        fire_at: DateTime<Utc>,
        looping: bool,
    ) -> Result<(), SinkError> {
        self.insert(AlertRequest {
            id: id.to_string(),
            title: title.to_string(),
            trigger: Trigger::OneShot { fire_at },
            looping,
        })
    }

    async fn submit_repeating(
        &self,
        id: &str,
        title: &str,
        interval_secs: u64,
        looping: bool,
    ) -> Result<(), SinkError> {
        self.insert(AlertRequest {
            id: id.to_string(),
            title: title.to_string(),
            trigger: Trigger::Repeating { interval_secs },
            looping,
        })
    }

    async fn cancel_all(&self) -> Result<(), SinkError> {
        let mut reqs = self
            .requests
            .lock()
            .map_err(|e| SinkError::Cancel(format!("lock failed: {e}")))?;
        reqs.clear();
        Ok(())
    }

    async fn cancel_by_ids(&self, ids: &[String]) -> Result<(), SinkError> {
        let mut reqs = self
            .requests
            .lock()
            .map_err(|e| SinkError::Cancel(format!("lock failed: {e}")))?;
        reqs.retain(|r| !ids.contains(&r.id));
        Ok(())
    }

    async fn list_outstanding(&self) -> Result<Vec<AlertRequest>, SinkError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(SinkError::Query("injected query failure".into()));
        }
        let reqs = self
            .requests
            .lock()
            .map_err(|e| SinkError::Query(format!("lock failed: {e}")))?;
        Ok(reqs.clone())
    }

    async fn request_permission(&self) {
        self.permission_requested.store(true, Ordering::SeqCst);
    }

    async fn set_badge_count(&self, count: u32) {
        self.badge_count.store(count, Ordering::SeqCst);
    }

    async fn stop_haptics(&self) {
        self.haptics_stopped.store(true, Ordering::SeqCst);
    }
}
