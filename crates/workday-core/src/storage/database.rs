//! SQLite-backed trigger store.
//!
//! Persists outstanding triggers between CLI invocations so the engine can
//! reconcile against them on the next run. The schema mirrors the sink's
//! record shape: one row per trigger, one-shot rows carry a fire instant,
//! repeating rows an interval.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::DatabaseError;
use crate::sink::{AlertRequest, Trigger};

use super::data_dir;

/// SQLite database holding the outstanding trigger set.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/workday-alerts/workday.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::DataDir(e.to_string()))?
            .join("workday.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and throwaway runs).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS triggers (
                    id            TEXT PRIMARY KEY,
                    title         TEXT NOT NULL,
                    kind          TEXT NOT NULL CHECK (kind IN ('one_shot', 'repeating')),
                    fire_at       TEXT,
                    interval_secs INTEGER,
                    looping       INTEGER NOT NULL DEFAULT 0
                );

                CREATE INDEX IF NOT EXISTS idx_triggers_fire_at ON triggers(fire_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Insert or replace a trigger row.
    pub fn upsert_trigger(&self, request: &AlertRequest) -> Result<(), DatabaseError> {
        let (kind, fire_at, interval_secs) = match &request.trigger {
            Trigger::OneShot { fire_at } => ("one_shot", Some(fire_at.to_rfc3339()), None),
            Trigger::Repeating { interval_secs } => ("repeating", None, Some(*interval_secs as i64)),
        };
        self.conn.execute(
            "INSERT OR REPLACE INTO triggers (id, title, kind, fire_at, interval_secs, looping)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                request.id,
                request.title,
                kind,
                fire_at,
                interval_secs,
                request.looping as i64
            ],
        )?;
        Ok(())
    }

    /// Remove every trigger row.
    pub fn delete_all_triggers(&self) -> Result<(), DatabaseError> {
        self.conn.execute("DELETE FROM triggers", [])?;
        Ok(())
    }

    /// Remove exactly the rows with the given ids.
    pub fn delete_triggers(&self, ids: &[String]) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM triggers WHERE id = ?1")?;
            for id in ids {
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// All outstanding trigger rows, in insertion order.
    pub fn list_triggers(&self) -> Result<Vec<AlertRequest>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, kind, fire_at, interval_secs, looping FROM triggers ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let title: String = row.get(1)?;
            let kind: String = row.get(2)?;
            let fire_at: Option<String> = row.get(3)?;
            let interval_secs: Option<i64> = row.get(4)?;
            let looping: i64 = row.get(5)?;
            Ok((id, title, kind, fire_at, interval_secs, looping))
        })?;

        let mut requests = Vec::new();
        for row in rows {
            let (id, title, kind, fire_at, interval_secs, looping) = row?;
            let trigger = match kind.as_str() {
                "one_shot" => {
                    let raw = fire_at.ok_or_else(|| {
                        DatabaseError::QueryFailed(format!("one-shot trigger '{id}' has no fire_at"))
                    })?;
                    let parsed = DateTime::parse_from_rfc3339(&raw).map_err(|e| {
                        DatabaseError::QueryFailed(format!("bad fire_at for '{id}': {e}"))
                    })?;
                    Trigger::OneShot {
                        fire_at: parsed.with_timezone(&Utc),
                    }
                }
                _ => Trigger::Repeating {
                    interval_secs: interval_secs.unwrap_or(0) as u64,
                },
            };
            requests.push(AlertRequest {
                id,
                title,
                trigger,
                looping: looping != 0,
            });
        }
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn one_shot(id: &str, hour: u32) -> AlertRequest {
        AlertRequest {
            id: id.to_string(),
            title: format!("alert {id}"),
            trigger: Trigger::OneShot {
                fire_at: Utc.with_ymd_and_hms(2025, 5, 12, hour, 0, 0).unwrap(),
            },
            looping: false,
        }
    }

    #[test]
    fn upsert_and_list_roundtrip() {
        let db = Database::open_memory().unwrap();
        db.upsert_trigger(&one_shot("a", 13)).unwrap();
        db.upsert_trigger(&AlertRequest {
            id: "rep".into(),
            title: "loop".into(),
            trigger: Trigger::Repeating { interval_secs: 60 },
            looping: true,
        })
        .unwrap();

        let rows = db.list_triggers().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], one_shot("a", 13));
        assert!(rows[1].looping);
        assert_eq!(rows[1].trigger, Trigger::Repeating { interval_secs: 60 });
    }

    #[test]
    fn upsert_same_id_replaces() {
        let db = Database::open_memory().unwrap();
        db.upsert_trigger(&one_shot("a", 13)).unwrap();
        db.upsert_trigger(&one_shot("a", 15)).unwrap();
        let rows = db.list_triggers().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].trigger.fire_at().unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 12, 15, 0, 0).unwrap()
        );
    }

    #[test]
    fn delete_by_ids_leaves_the_rest() {
        let db = Database::open_memory().unwrap();
        db.upsert_trigger(&one_shot("a", 13)).unwrap();
        db.upsert_trigger(&one_shot("b", 14)).unwrap();
        db.delete_triggers(&["a".to_string(), "ghost".to_string()])
            .unwrap();
        let rows = db.list_triggers().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "b");
    }

    #[test]
    fn delete_all_clears_the_table() {
        let db = Database::open_memory().unwrap();
        db.upsert_trigger(&one_shot("a", 13)).unwrap();
        db.delete_all_triggers().unwrap();
        assert!(db.list_triggers().unwrap().is_empty());
    }
}
