use crate::{LotteryError, Result};
use chrono::{DateTime, Utc};
use luckydraw_core::{HistoryBackend, HistoryRecord, Notice, Notifier, Participant};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How many winners to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub count: usize,
}

impl DrawRequest {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Checks the request against the pool size.
    pub fn validate(&self, available: usize) -> Result<()> {
        if available == 0 {
            return Err(LotteryError::NoParticipants);
        }
        if self.count == 0 {
            return Err(LotteryError::ZeroCount);
        }
        if self.count > available {
            return Err(LotteryError::CountOutOfRange {
                requested: self.count,
                available,
            });
        }
        Ok(())
    }
}

/// Winners in draw order; index 0 is first place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSet(Vec<Participant>);

impl WinnerSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.0.iter()
    }

    /// `(rank, winner)` pairs with rank starting at 1.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &Participant)> {
        self.0.iter().enumerate().map(|(i, p)| (i + 1, p))
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn history_records(&self) -> Vec<HistoryRecord> {
        self.0.iter().map(HistoryRecord::from).collect()
    }
}

impl From<Vec<Participant>> for WinnerSet {
    fn from(winners: Vec<Participant>) -> Self {
        Self(winners)
    }
}

/// A decided draw: the pool as it was at start, and the winners taken from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draw {
    pub snapshot: Vec<Participant>,
    pub winners: WinnerSet,
    pub started_at: DateTime<Utc>,
}

/// Uniform selection without replacement: Fisher-Yates over a copy, then the
/// first `count` entries.
pub fn select_winners<R: Rng + ?Sized>(
    participants: &[Participant],
    count: usize,
    rng: &mut R,
) -> Result<WinnerSet> {
    DrawRequest::new(count).validate(participants.len())?;

    let mut pool = participants.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);

    Ok(WinnerSet(pool))
}

#[derive(Clone)]
pub struct DrawController {
    history: Arc<dyn HistoryBackend>,
    notifier: Arc<dyn Notifier>,
}

impl DrawController {
    pub fn new(history: Arc<dyn HistoryBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { history, notifier }
    }

    /// Decide the winners now. On bad input the user is notified and no draw starts.
    pub fn start_draw(&self, participants: &[Participant], count: usize) -> Result<Draw> {
        self.start_draw_with_rng(participants, count, &mut rand::thread_rng())
    }

    pub fn start_draw_with_rng<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        count: usize,
        rng: &mut R,
    ) -> Result<Draw> {
        let winners = match select_winners(participants, count, rng) {
            Ok(winners) => winners,
            Err(e) => {
                tracing::warn!("Draw refused: {}", e);
                self.notifier.notify(Notice::error(refusal_message(&e)));
                return Err(e);
            }
        };

        tracing::info!(
            "Drew {} winner(s) from {} participant(s)",
            winners.len(),
            participants.len()
        );

        Ok(Draw {
            snapshot: participants.to_vec(),
            winners,
            started_at: Utc::now(),
        })
    }

    /// Append one history row per winner. A failure is reported, never undone:
    /// the announced winners stand either way.
    pub async fn record_winners(&self, winners: &WinnerSet) -> bool {
        if winners.is_empty() {
            return true;
        }

        match self.history.insert_history(&winners.history_records()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to record {} winner(s): {}", winners.len(), e);
                self.notifier
                    .notify(Notice::error("Winners announced, but saving the history failed"));
                false
            }
        }
    }
}

fn refusal_message(err: &LotteryError) -> String {
    match err {
        LotteryError::NoParticipants => "There are no participants".to_string(),
        LotteryError::CountOutOfRange { .. } => {
            "Draw count exceeds the number of participants".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pool, FlakyBackend};
    use luckydraw_core::{MemoryBackend, RecordingNotifier};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_winner_set_is_distinct_subset() {
        let participants = pool(&[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4"), ("E", "5")]);
        let mut rng = StdRng::seed_from_u64(7);

        for count in 1..=participants.len() {
            let winners = select_winners(&participants, count, &mut rng).unwrap();
            assert_eq!(winners.len(), count);

            let ids: HashSet<_> = winners.iter().map(|p| p.id.clone()).collect();
            assert_eq!(ids.len(), count);
            assert!(winners.iter().all(|w| participants.contains(w)));
        }
    }

    #[test]
    fn test_rejects_bad_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        let participants = pool(&[("A", "1"), ("B", "2")]);

        assert!(matches!(
            select_winners(&[], 1, &mut rng),
            Err(LotteryError::NoParticipants)
        ));
        assert!(matches!(
            select_winners(&participants, 0, &mut rng),
            Err(LotteryError::ZeroCount)
        ));
        assert!(matches!(
            select_winners(&participants, 3, &mut rng),
            Err(LotteryError::CountOutOfRange {
                requested: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn test_selection_is_uniform() {
        let participants = pool(&[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4")]);
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 20_000;
        let mut hits = vec![0usize; participants.len()];

        for _ in 0..trials {
            let winners = select_winners(&participants, 1, &mut rng).unwrap();
            let winner = winners.iter().next().unwrap();
            let idx = participants.iter().position(|p| p == winner).unwrap();
            hits[idx] += 1;
        }

        let expected = trials as f64 / participants.len() as f64;
        let chi_square: f64 = hits
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // df = 3, p = 0.001
        assert!(chi_square < 16.27, "chi-square {} too large: {:?}", chi_square, hits);
    }

    #[test]
    fn test_empty_pool_notifies_and_starts_nothing() {
        let history = Arc::new(MemoryBackend::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = DrawController::new(history.clone(), notifier.clone());

        assert!(controller.start_draw(&[], 1).is_err());
        assert_eq!(notifier.errors(), vec!["There are no participants".to_string()]);
        assert!(history.history_records().is_empty());
    }

    #[tokio::test]
    async fn test_two_of_three_records_exactly_two_rows() {
        let history = Arc::new(MemoryBackend::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = DrawController::new(history.clone(), notifier.clone());
        let participants = pool(&[("A", "1"), ("B", "2"), ("C", "3")]);

        let draw = controller.start_draw(&participants, 2).unwrap();
        assert_eq!(draw.winners.len(), 2);
        assert_eq!(draw.snapshot, participants);

        assert!(controller.record_winners(&draw.winners).await);
        assert_eq!(history.history_records(), draw.winners.history_records());
    }

    #[tokio::test]
    async fn test_history_failure_is_reported_not_fatal() {
        let backend = Arc::new(FlakyBackend::new(pool(&[("A", "1")])));
        backend.fail_writes(true);
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = DrawController::new(backend.clone(), notifier.clone());

        let draw = controller.start_draw(&backend.snapshot(), 1).unwrap();
        assert!(!controller.record_winners(&draw.winners).await);
        assert_eq!(draw.winners.len(), 1);
        assert_eq!(notifier.errors().len(), 1);
    }
}
