use crate::error::Result;
use crate::storage::Storage;
use crate::types::{HistoryEntry, HistoryRecord};
use chrono::{DateTime, Utc};
use rusqlite::params;

pub struct HistoryStore<'a> {
    storage: &'a Storage,
}

impl<'a> HistoryStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Appends all records in one transaction.
    pub async fn append(&self, records: &[HistoryRecord]) -> Result<()> {
        let mut conn = self.storage.get_connection().await;
        let now = Utc::now().timestamp_millis();

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO lottery_history (winner_name, winner_student_id, created_at)
                 VALUES (?1, ?2, ?3)",
            )?;
            for record in records {
                stmt.execute(params![record.winner_name, record.winner_student_id, now])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, winner_name, winner_student_id, created_at
             FROM lottery_history ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![limit as i64], |row| {
                Ok(HistoryEntry {
                    id: row.get::<_, i64>(0)?.to_string(),
                    winner_name: row.get(1)?,
                    winner_student_id: row.get(2)?,
                    created_at: DateTime::from_timestamp_millis(row.get(3)?)
                        .unwrap_or_else(Utc::now),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
