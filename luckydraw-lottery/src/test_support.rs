use async_trait::async_trait;
use chrono::Utc;
use luckydraw_core::{
    HistoryBackend, HistoryEntry, HistoryRecord, LuckyDrawError, NewParticipant, Participant,
    ParticipantBackend, Result,
};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub fn pool(entries: &[(&str, &str)]) -> Vec<Participant> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (name, student_id))| Participant {
            id: format!("p{}", i + 1),
            name: name.to_string(),
            student_id: student_id.to_string(),
            created_at: Utc::now(),
        })
        .collect()
}

/// Backend whose reads and writes can be switched to fail, and whose history
/// writes can be slowed down.
#[derive(Default)]
pub struct FlakyBackend {
    participants: RwLock<Vec<Participant>>,
    history: RwLock<Vec<HistoryRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delay: Mutex<Duration>,
}

impl FlakyBackend {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            participants: RwLock::new(participants),
            ..Self::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock() = delay;
    }

    pub fn snapshot(&self) -> Vec<Participant> {
        self.participants.read().clone()
    }

    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.read().clone()
    }

    fn check(&self, flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(LuckyDrawError::network_connection("store unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ParticipantBackend for FlakyBackend {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        self.check(&self.fail_reads)?;
        Ok(self.snapshot())
    }

    async fn insert_participant(&self, participant: NewParticipant) -> Result<Participant> {
        self.check(&self.fail_writes)?;
        let mut participants = self.participants.write();
        let created = Participant {
            id: format!("p{}", participants.len() + 100),
            name: participant.name,
            student_id: participant.student_id,
            created_at: Utc::now(),
        };
        participants.insert(0, created.clone());
        Ok(created)
    }

    async fn delete_participant(&self, id: &str) -> Result<()> {
        self.check(&self.fail_writes)?;
        self.participants.write().retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl HistoryBackend for FlakyBackend {
    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()> {
        let delay = *self.write_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.check(&self.fail_writes)?;
        self.history.write().extend_from_slice(records);
        Ok(())
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.check(&self.fail_reads)?;
        Ok(self
            .history
            .read()
            .iter()
            .rev()
            .take(limit)
            .enumerate()
            .map(|(i, r)| HistoryEntry {
                id: i.to_string(),
                winner_name: r.winner_name.clone(),
                winner_student_id: r.winner_student_id.clone(),
                created_at: Utc::now(),
            })
            .collect())
    }
}
