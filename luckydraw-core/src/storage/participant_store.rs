use crate::error::Result;
use crate::storage::Storage;
use crate::types::{NewParticipant, Participant};
use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

pub struct ParticipantStore<'a> {
    storage: &'a Storage,
}

impl<'a> ParticipantStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn insert(&self, new: &NewParticipant) -> Result<Participant> {
        let conn = self.storage.get_connection().await;

        let participant = Participant {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            student_id: new.student_id.clone(),
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO participants (id, name, student_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                participant.id,
                participant.name,
                participant.student_id,
                participant.created_at.timestamp_millis(),
            ],
        )?;

        Ok(participant)
    }

    /// Newest first, matching the management view.
    pub async fn list(&self) -> Result<Vec<Participant>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, name, student_id, created_at
             FROM participants ORDER BY created_at DESC, rowid DESC",
        )?;

        let participants = stmt
            .query_map([], |row| {
                Ok(Participant {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    student_id: row.get(2)?,
                    created_at: DateTime::from_timestamp_millis(row.get(3)?)
                        .unwrap_or_else(Utc::now),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(participants)
    }

    /// Returns whether a row was removed. Unknown ids are not an error.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.storage.get_connection().await;
        let removed = conn.execute("DELETE FROM participants WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
