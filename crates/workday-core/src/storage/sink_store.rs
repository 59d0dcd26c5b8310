//! Persistent alert sink over the trigger database.
//!
//! Gives the CLI a sink whose triggers survive between invocations. The
//! engine still treats it as opaque external truth and re-queries instead
//! of assuming read-your-own-write consistency.

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::SinkError;
use crate::sink::{AlertRequest, AlertSink, Trigger};

use super::Database;

/// `AlertSink` adapter around [`Database`].
///
/// The connection is single-threaded; the mutex serializes access so the
/// adapter can be shared.
pub struct StoredSink {
    db: Mutex<Database>,
}

impl StoredSink {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    async fn store(&self, request: AlertRequest) -> Result<(), SinkError> {
        let id = request.id.clone();
        self.db
            .lock()
            .await
            .upsert_trigger(&request)
            .map_err(|e| SinkError::Submit {
                id,
                message: e.to_string(),
            })
    }
}

impl AlertSink for StoredSink {
    async fn submit_one_shot(
        &self,
        id: &str,
        title: &str,
        fire_at: DateTime<Utc>,
        looping: bool,
    ) -> Result<(), SinkError> {
        self.store(AlertRequest {
            id: id.to_string(),
            title: title.to_string(),
            trigger: Trigger::OneShot { fire_at },
            looping,
        })
        .await
    }

    async fn submit_repeating(
        &self,
        id: &str,
        title: &str,
        interval_secs: u64,
        looping: bool,
    ) -> Result<(), SinkError> {
        self.store(AlertRequest {
            id: id.to_string(),
            title: title.to_string(),
            trigger: Trigger::Repeating { interval_secs },
            looping,
        })
        .await
    }

    async fn cancel_all(&self) -> Result<(), SinkError> {
        self.db
            .lock()
            .await
            .delete_all_triggers()
            .map_err(|e| SinkError::Cancel(e.to_string()))
    }

    async fn cancel_by_ids(&self, ids: &[String]) -> Result<(), SinkError> {
        self.db
            .lock()
            .await
            .delete_triggers(ids)
            .map_err(|e| SinkError::Cancel(e.to_string()))
    }

    async fn list_outstanding(&self) -> Result<Vec<AlertRequest>, SinkError> {
        self.db
            .lock()
            .await
            .list_triggers()
            .map_err(|e| SinkError::Query(e.to_string()))
    }
}
