use crate::backend::{HistoryBackend, ParticipantBackend};
use crate::error::Result;
use crate::storage::{HistoryStore, ParticipantStore, Storage};
use crate::types::{HistoryEntry, HistoryRecord, NewParticipant, Participant};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Embedded SQLite file with the same two tables as the hosted store.
pub struct SqliteBackend {
    storage: Arc<Storage>,
}

impl SqliteBackend {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        let db_path = data_dir.join("luckydraw.db");
        let storage = Arc::new(Storage::new(&db_path).await?);
        tracing::debug!("Opened local store at {}", db_path.display());
        Ok(Self { storage })
    }

    pub async fn in_memory() -> Result<Self> {
        Ok(Self {
            storage: Arc::new(Storage::in_memory().await?),
        })
    }
}

#[async_trait]
impl ParticipantBackend for SqliteBackend {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        ParticipantStore::new(&self.storage).list().await
    }

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant> {
        let created = ParticipantStore::new(&self.storage)
            .insert(&participant)
            .await?;
        tracing::info!("Added participant '{}' ({})", created.name, created.id);
        Ok(created)
    }

    async fn delete_participant(&self, id: &str) -> Result<()> {
        if ParticipantStore::new(&self.storage).delete(id).await? {
            tracing::info!("Deleted participant {}", id);
        } else {
            tracing::debug!("Delete of unknown participant {} ignored", id);
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryBackend for SqliteBackend {
    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()> {
        HistoryStore::new(&self.storage).append(records).await?;
        tracing::info!("Recorded {} winner(s) in history", records.len());
        Ok(())
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        HistoryStore::new(&self.storage).recent(limit).await
    }
}
