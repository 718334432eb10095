use crate::{LotteryError, Result};
use luckydraw_core::{LuckyDrawError, NewParticipant, Notice, Notifier, Participant, ParticipantBackend};
use std::sync::Arc;

/// State of the participant management page.
///
/// Writes are never applied optimistically: the local list only changes
/// after a successful reload from the store.
pub struct Roster {
    backend: Arc<dyn ParticipantBackend>,
    notifier: Arc<dyn Notifier>,
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new(backend: Arc<dyn ParticipantBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            participants: Vec::new(),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub async fn refresh(&mut self) -> bool {
        match self.backend.list_participants().await {
            Ok(participants) => {
                self.participants = participants;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load participants: {}", e);
                self.notifier.notify(Notice::error("Failed to load participants"));
                false
            }
        }
    }

    pub async fn add(&mut self, name: &str, student_id: &str) -> Result<Participant> {
        let payload = match NewParticipant::new(name, student_id) {
            Ok(payload) => payload,
            Err(LuckyDrawError::Validation(reason)) => {
                tracing::debug!("Rejected add form: {}", reason);
                self.notifier.notify(Notice::error("Please fill in both name and student id"));
                let field = if name.trim().is_empty() { "name" } else { "student_id" };
                return Err(LotteryError::MissingField(field));
            }
            Err(e) => return Err(e.into()),
        };

        match self.backend.insert_participant(payload).await {
            Ok(created) => {
                self.notifier
                    .notify(Notice::success(format!("Added {}", created.name)));
                self.refresh().await;
                Ok(created)
            }
            Err(e) => {
                tracing::warn!("Failed to add participant: {}", e);
                self.notifier.notify(Notice::error("Failed to add participant"));
                Err(e.into())
            }
        }
    }

    pub async fn remove(&mut self, id: &str) -> Result<()> {
        match self.backend.delete_participant(id).await {
            Ok(()) => {
                self.notifier.notify(Notice::success("Participant removed"));
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to delete participant {}: {}", id, e);
                self.notifier.notify(Notice::error("Failed to delete participant"));
                Err(e.into())
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }
}
