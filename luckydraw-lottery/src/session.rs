use crate::draw::{Draw, DrawController, WinnerSet};
use crate::{LotteryError, Result};
use luckydraw_core::{Backend, Notice, Notifier, Participant};
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub enum DrawPhase {
    Setup,
    Running(Draw),
    Revealed(WinnerSet),
}

/// History write started by [`DrawSession::reveal`]. Dropping it leaves the
/// write running in the background.
#[must_use = "the write is detached unless awaited with `finish`"]
pub struct HistoryWrite(JoinHandle<bool>);

impl HistoryWrite {
    /// Wait for the write. `false` if it failed (already reported) or was aborted.
    pub async fn finish(self) -> bool {
        self.0.await.unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

/// State of the draw page: the pool, the requested count and where the
/// current draw stands.
pub struct DrawSession {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    controller: DrawController,
    participants: Vec<Participant>,
    count: usize,
    phase: DrawPhase,
}

impl DrawSession {
    pub fn new(backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        let controller = DrawController::new(Arc::new(backend.clone()), notifier.clone());
        Self {
            backend,
            notifier,
            controller,
            participants: Vec::new(),
            count: 1,
            phase: DrawPhase::Setup,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    pub fn phase(&self) -> &DrawPhase {
        &self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, DrawPhase::Running(_))
    }

    pub fn winners(&self) -> Option<&WinnerSet> {
        match &self.phase {
            DrawPhase::Revealed(winners) => Some(winners),
            _ => None,
        }
    }

    /// Reload the pool. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> bool {
        match self.backend.list_participants().await {
            Ok(participants) => {
                tracing::debug!("Loaded {} participant(s)", participants.len());
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

    /// Decide the winners for the current count. The pool is snapshotted here,
    /// so later store changes do not reach this draw.
    pub fn start_draw(&mut self) -> Result<Draw> {
        if self.is_running() {
            return Err(LotteryError::InvalidState(
                "A draw is already running".to_string(),
            ));
        }

        let draw = self.controller.start_draw(&self.participants, self.count)?;
        self.phase = DrawPhase::Running(draw.clone());
        Ok(draw)
    }

    /// Reveal the winners of the running draw and start appending them to the
    /// history. The winners are on record as soon as this returns; the write
    /// finishes in the background and a failure is reported, never undone.
    pub fn reveal(&mut self) -> Result<HistoryWrite> {
        let draw = match std::mem::replace(&mut self.phase, DrawPhase::Setup) {
            DrawPhase::Running(draw) => draw,
            other => {
                self.phase = other;
                return Err(LotteryError::InvalidState("No draw is running".to_string()));
            }
        };

        let winners = draw.winners;
        tracing::info!("Revealed winners: {}", winners.names().join(", "));
        self.phase = DrawPhase::Revealed(winners.clone());
        self.notifier.notify(Notice::success("Draw complete!"));

        let controller = self.controller.clone();
        let handle = tokio::spawn(async move { controller.record_winners(&winners).await });
        Ok(HistoryWrite(handle))
    }

    /// Abandon a running draw. Nothing is recorded.
    pub fn cancel(&mut self) -> bool {
        if self.is_running() {
            self.phase = DrawPhase::Setup;
            tracing::info!("Draw cancelled");
            self.notifier
                .notify(Notice::info("Draw cancelled. Nothing was recorded."));
            return true;
        }
        false
    }

    /// "Draw again": back to setup with a count of one.
    pub fn reset(&mut self) {
        self.phase = DrawPhase::Setup;
        self.count = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pool, FlakyBackend};
    use luckydraw_core::{
        NewParticipant, NoticeLevel, ParticipantBackend, RecordingNotifier, SqliteBackend,
    };
    use std::time::Duration;
    use tokio::time::Instant;

    fn session(backend: Arc<FlakyBackend>) -> (DrawSession, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (DrawSession::new(backend, notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_full_draw_records_history() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1"), ("B", "2"), ("C", "3")])));
        let (mut session, notifier) = session(backend.clone());

        assert!(session.refresh().await);
        session.set_count(2);
        let draw = session.start_draw().unwrap();
        assert!(session.is_running());

        assert!(session.reveal().unwrap().finish().await);
        let winners = session.winners().unwrap();
        assert_eq!(winners, &draw.winners);
        assert_eq!(winners.len(), 2);
        assert_eq!(backend.history(), winners.history_records());
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_count_changes_nothing() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1")])));
        let (mut session, notifier) = session(backend.clone());
        session.refresh().await;
        session.set_count(2);

        let err = session.start_draw().unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(session.phase(), DrawPhase::Setup));
        assert_eq!(session.participants().len(), 1);
        assert!(session.winners().is_none());
        assert_eq!(notifier.errors().len(), 1);
        assert!(backend.history().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_known_list() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1"), ("B", "2")])));
        let (mut session, notifier) = session(backend.clone());
        session.refresh().await;

        backend.fail_reads(true);
        assert!(!session.refresh().await);
        assert_eq!(session.participants().len(), 2);
        assert_eq!(notifier.errors(), vec!["Failed to load participants".to_string()]);
    }

    #[tokio::test]
    async fn test_history_failure_keeps_winners() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1"), ("B", "2")])));
        let (mut session, notifier) = session(backend.clone());
        session.refresh().await;

        session.start_draw().unwrap();
        backend.fail_writes(true);
        assert!(!session.reveal().unwrap().finish().await);

        assert_eq!(session.winners().map(WinnerSet::len), Some(1));
        assert_eq!(notifier.errors().len(), 1);
        assert!(backend.history().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_ignores_later_store_changes() {
        let backend = Arc::new(SqliteBackend::in_memory().await.unwrap());
        for (name, id) in [("A", "1"), ("B", "2"), ("C", "3")] {
            backend
                .insert_participant(NewParticipant::new(name, id).unwrap())
                .await
                .unwrap();
        }
        let notifier = Arc::new(RecordingNotifier::new());
        let mut session = DrawSession::new(backend.clone(), notifier);
        session.refresh().await;
        session.set_count(3);

        let draw = session.start_draw().unwrap();
        for participant in backend.list_participants().await.unwrap() {
            backend.delete_participant(&participant.id).await.unwrap();
        }

        session.reveal().unwrap().finish().await;
        let winners = session.winners().unwrap();
        assert_eq!(winners.len(), 3);
        assert!(winners.iter().all(|w| draw.snapshot.contains(w)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_winners_are_revealed_before_history_is_saved() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1"), ("B", "2"), ("C", "3")])));
        backend.delay_writes(Duration::from_secs(10));
        let (mut session, notifier) = session(backend.clone());
        session.refresh().await;
        session.set_count(2);

        let draw = session.start_draw().unwrap();
        let started = Instant::now();
        let pending = session.reveal().unwrap();

        assert_eq!(session.winners(), Some(&draw.winners));
        assert_eq!(notifier.notices().len(), 1);
        assert!(backend.history().is_empty());
        assert!(!pending.is_finished());

        assert!(pending.finish().await);
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert_eq!(backend.history(), draw.winners.history_records());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_history_write_still_lands() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1"), ("B", "2")])));
        backend.delay_writes(Duration::from_secs(10));
        let (mut session, _) = session(backend.clone());
        session.refresh().await;

        let draw = session.start_draw().unwrap();
        drop(session.reveal().unwrap());
        assert!(backend.history().is_empty());

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(backend.history(), draw.winners.history_records());
    }

    #[tokio::test]
    async fn test_reveal_needs_a_running_draw() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1"), ("B", "2")])));
        let (mut session, _) = session(backend.clone());
        session.refresh().await;

        assert!(matches!(session.reveal(), Err(LotteryError::InvalidState(_))));

        let draw = session.start_draw().unwrap();
        session.reveal().unwrap().finish().await;
        assert!(matches!(session.reveal(), Err(LotteryError::InvalidState(_))));
        assert_eq!(session.winners(), Some(&draw.winners));
        assert_eq!(backend.history().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_and_reset() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1"), ("B", "2")])));
        let (mut session, notifier) = session(backend.clone());
        session.refresh().await;
        session.set_count(2);

        session.start_draw().unwrap();
        assert!(session.start_draw().is_err());
        assert!(session.cancel());
        assert!(session.reveal().is_err());
        assert!(backend.history().is_empty());
        assert_eq!(
            notifier.notices().last().map(|n| n.level),
            Some(NoticeLevel::Info)
        );

        session.reset();
        assert_eq!(session.count(), 1);
        assert!(matches!(session.phase(), DrawPhase::Setup));
    }
}
