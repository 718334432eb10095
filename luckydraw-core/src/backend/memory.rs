use crate::backend::{HistoryBackend, ParticipantBackend};
use crate::error::Result;
use crate::types::{HistoryEntry, HistoryRecord, NewParticipant, Participant};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

/// Process-local backend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    participants: RwLock<Vec<Participant>>,
    history: RwLock<Vec<HistoryEntry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-filled with `(name, student_id)` pairs, in insertion order.
    pub fn with_participants<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let backend = Self::new();
        {
            let mut participants = backend.participants.write();
            for (name, student_id) in entries {
                participants.push(Participant {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    student_id: student_id.to_string(),
                    created_at: Utc::now(),
                });
            }
        }
        backend
    }

    pub fn history_records(&self) -> Vec<HistoryRecord> {
        self.history.read().iter().map(HistoryEntry::record).collect()
    }
}

#[async_trait]
impl ParticipantBackend for MemoryBackend {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        Ok(self.participants.read().iter().rev().cloned().collect())
    }

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant> {
        let created = Participant {
            id: Uuid::new_v4().to_string(),
            name: participant.name,
            student_id: participant.student_id,
            created_at: Utc::now(),
        };
        self.participants.write().push(created.clone());
        Ok(created)
    }

    async fn delete_participant(&self, id: &str) -> Result<()> {
        self.participants.write().retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl HistoryBackend for MemoryBackend {
    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()> {
        let mut history = self.history.write();
        let now = Utc::now();
        for record in records {
            let id = (history.len() + 1).to_string();
            history.push(HistoryEntry {
                id,
                winner_name: record.winner_name.clone(),
                winner_student_id: record.winner_student_id.clone(),
                created_at: now,
            });
        }
        Ok(())
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.read().iter().rev().take(limit).cloned().collect())
    }
}
