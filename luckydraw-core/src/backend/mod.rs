//! Storage backends for participants and the winners log.
//!
//! Every backend answers with either the records or an error; callers treat
//! any error as "operation failed, keep local state".

pub mod local;
pub mod memory;
pub mod rest;

pub use local::SqliteBackend;
pub use memory::MemoryBackend;
pub use rest::RestBackend;

use crate::error::Result;
use crate::types::{HistoryEntry, HistoryRecord, NewParticipant, Participant};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ParticipantBackend: Send + Sync {
    /// Newest first.
    async fn list_participants(&self) -> Result<Vec<Participant>>;

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant>;

    /// Deleting an unknown id succeeds.
    async fn delete_participant(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Bulk append, no dedup.
    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()>;

    /// Newest first.
    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
}

/// A store that holds both tables.
pub trait Backend: ParticipantBackend + HistoryBackend {}

impl<T: ParticipantBackend + HistoryBackend> Backend for T {}

#[async_trait]
impl<T: ParticipantBackend + ?Sized> ParticipantBackend for Arc<T> {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        (**self).list_participants().await
    }

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant> {
        (**self).insert_participant(participant).await
    }

    async fn delete_participant(&self, id: &str) -> Result<()> {
        (**self).delete_participant(id).await
    }
}

#[async_trait]
impl<T: HistoryBackend + ?Sized> HistoryBackend for Arc<T> {
    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()> {
        (**self).insert_history(records).await
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        (**self).list_history(limit).await
    }
}
