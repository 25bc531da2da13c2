//! # Database
//!
//! SQLite persistence for reminders and memory-exercise progress. One
//! connection behind an async mutex is the single serializing access point
//! shared by the scheduler loop and the interactive layer.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use crate::core::{StoreError, StoreResult};
use crate::features::assistant::ProgressEntry;
use crate::features::reminders::{ReminderId, ReminderRecord, Repeat, WeekdaySet};
use log::{debug, info, warn};
use sqlite::{Connection, State};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    pub async fn new(database_path: &str) -> StoreResult<Self> {
        let connection = sqlite::open(database_path)?;
        let db = Database {
            connection: Arc::new(Mutex::new(connection)),
        };
        db.init_tables().await?;
        info!("Database ready at {database_path}");
        Ok(db)
    }

    async fn init_tables(&self) -> StoreResult<()> {
        let conn = self.connection.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task TEXT NOT NULL,
                time TEXT NOT NULL,
                repeat TEXT NOT NULL,
                days TEXT NOT NULL
            )",
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                success_rate INTEGER NOT NULL,
                failure_rate INTEGER NOT NULL,
                tasks_completed INTEGER NOT NULL
            )",
        )?;

        Ok(())
    }

    // ------------------------------------------------------------------
    // Reminders
    // ------------------------------------------------------------------

    /// Insert a reminder; `days` is stored in canonical weekday order
    pub async fn add_reminder(
        &self,
        task: &str,
        time: &str,
        repeat: Repeat,
        days: WeekdaySet,
    ) -> StoreResult<ReminderId> {
        let conn = self.connection.lock().await;
        let days_str = days.to_stored();

        let mut statement =
            conn.prepare("INSERT INTO reminders (task, time, repeat, days) VALUES (?, ?, ?, ?)")?;
        statement.bind((1, task))?;
        statement.bind((2, time))?;
        statement.bind((3, repeat.as_str()))?;
        statement.bind((4, days_str.as_str()))?;
        statement.next()?;
        drop(statement);

        let mut statement = conn.prepare("SELECT last_insert_rowid()")?;
        let id = match statement.next()? {
            State::Row => statement.read::<i64, _>(0)?,
            State::Done => {
                return Err(StoreError::StorageUnavailable(
                    "insert did not yield a row id".to_string(),
                ))
            }
        };

        debug!("Stored reminder #{id}: '{task}' at {time} ({repeat}) on [{days_str}]");
        Ok(ReminderId(id))
    }

    /// All reminders in insertion order. Rows that fail to decode are skipped.
    pub async fn list_reminders(&self) -> StoreResult<Vec<ReminderRecord>> {
        let conn = self.connection.lock().await;
        let mut statement =
            conn.prepare("SELECT id, task, time, repeat, days FROM reminders ORDER BY id")?;

        let mut reminders = Vec::new();
        while let State::Row = statement.next()? {
            let id = statement.read::<i64, _>("id")?;
            let repeat_str = statement.read::<String, _>("repeat")?;

            let repeat = match repeat_str.parse::<Repeat>() {
                Ok(r) => r,
                Err(e) => {
                    warn!("Skipping reminder #{id}: {e}");
                    continue;
                }
            };

            reminders.push(ReminderRecord {
                id: ReminderId(id),
                task: statement.read::<String, _>("task")?,
                time: statement.read::<String, _>("time")?,
                repeat,
                days: WeekdaySet::from_stored(&statement.read::<String, _>("days")?),
            });
        }

        Ok(reminders)
    }

    /// Delete a reminder. Returns whether a row was removed; a missing id is not an error.
    pub async fn remove_reminder(&self, id: ReminderId) -> StoreResult<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("DELETE FROM reminders WHERE id = ?")?;
        statement.bind((1, id.0))?;
        statement.next()?;
        drop(statement);

        let deleted = conn.change_count() > 0;
        if deleted {
            debug!("Removed reminder {id}");
        } else {
            debug!("Reminder {id} already gone");
        }
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    pub async fn add_progress(
        &self,
        recorded_at: &str,
        success: i64,
        failure: i64,
        tasks: i64,
    ) -> StoreResult<()> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "INSERT INTO progress (date, success_rate, failure_rate, tasks_completed) VALUES (?, ?, ?, ?)",
        )?;
        statement.bind((1, recorded_at))?;
        statement.bind((2, success))?;
        statement.bind((3, failure))?;
        statement.bind((4, tasks))?;
        statement.next()?;
        Ok(())
    }

    pub async fn list_progress(&self) -> StoreResult<Vec<ProgressEntry>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT date, success_rate, failure_rate, tasks_completed FROM progress ORDER BY id",
        )?;

        let mut entries = Vec::new();
        while let State::Row = statement.next()? {
            entries.push(ProgressEntry {
                date: statement.read::<String, _>("date")?,
                success: statement.read::<i64, _>("success_rate")?,
                failure: statement.read::<i64, _>("failure_rate")?,
                tasks_completed: statement.read::<i64, _>("tasks_completed")?,
            });
        }
        Ok(entries)
    }

    /// Run raw SQL, used by tests to break or corrupt the schema
    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> StoreResult<()> {
        let conn = self.connection.lock().await;
        conn.execute(sql)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    async fn memory_db() -> Database {
        Database::new(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_list_reminder() {
        let db = memory_db().await;
        let id = db
            .add_reminder("Take medicine", "08:00 AM", Repeat::Daily, WeekdaySet::empty())
            .await
            .unwrap();

        let reminders = db.list_reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id, id);
        assert_eq!(reminders[0].task, "Take medicine");
        assert_eq!(reminders[0].time, "08:00 AM");
        assert_eq!(reminders[0].repeat, Repeat::Daily);
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_ordered() {
        let db = memory_db().await;
        let a = db
            .add_reminder("a", "08:00 AM", Repeat::None, WeekdaySet::empty())
            .await
            .unwrap();
        let b = db
            .add_reminder("b", "08:00 AM", Repeat::None, WeekdaySet::empty())
            .await
            .unwrap();
        assert_ne!(a, b);

        let tasks: Vec<_> = db
            .list_reminders()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.task)
            .collect();
        assert_eq!(tasks, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_days_are_normalized() {
        let db = memory_db().await;
        let days: WeekdaySet = [Weekday::Fri, Weekday::Mon, Weekday::Fri]
            .into_iter()
            .collect();
        db.add_reminder("Walk", "05:30 PM", Repeat::Weekly, days)
            .await
            .unwrap();

        let reminders = db.list_reminders().await.unwrap();
        assert_eq!(reminders[0].days.to_stored(), "Monday,Friday");
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_noop() {
        let db = memory_db().await;
        let id = db
            .add_reminder("Call doctor", "10:00 AM", Repeat::None, WeekdaySet::empty())
            .await
            .unwrap();

        assert!(!db.remove_reminder(ReminderId(id.0 + 100)).await.unwrap());
        assert_eq!(db.list_reminders().await.unwrap().len(), 1);

        assert!(db.remove_reminder(id).await.unwrap());
        assert!(!db.remove_reminder(id).await.unwrap());
        assert!(db.list_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_removes_delete_once() {
        let db = memory_db().await;
        let id = db
            .add_reminder("Call doctor", "10:00 AM", Repeat::None, WeekdaySet::empty())
            .await
            .unwrap();

        let manual = db.clone();
        let automatic = db.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move { manual.remove_reminder(id).await }),
            tokio::spawn(async move { automatic.remove_reminder(id).await }),
        );

        let a = a.unwrap().unwrap();
        let b = b.unwrap().unwrap();
        assert!(a ^ b, "exactly one caller should delete the row");
        assert!(db.list_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_row_is_skipped() {
        let db = memory_db().await;
        db.add_reminder("good", "08:00 AM", Repeat::Daily, WeekdaySet::empty())
            .await
            .unwrap();
        db.execute_raw(
            "INSERT INTO reminders (task, time, repeat, days) VALUES ('bad', '08:00 AM', 'Hourly', '')",
        )
        .await
        .unwrap();

        let reminders = db.list_reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].task, "good");
    }

    #[tokio::test]
    async fn test_missing_table_is_storage_unavailable() {
        let db = memory_db().await;
        db.execute_raw("DROP TABLE reminders").await.unwrap();

        let err = db.list_reminders().await.unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable(_)));

        let err = db
            .add_reminder("x", "08:00 AM", Repeat::Daily, WeekdaySet::empty())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_progress_round_trip() {
        let db = memory_db().await;
        db.add_progress("2025-01-01 10:00:00", 1, 0, 1).await.unwrap();
        db.add_progress("2025-01-01 10:05:00", 1, 1, 2).await.unwrap();

        let entries = db.list_progress().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].date, "2025-01-01 10:05:00");
        assert_eq!(entries[1].failure, 1);
        assert_eq!(entries[1].tasks_completed, 2);
    }
}
