//! Reveal animation.
//!
//! The presenter plays a fixed-length tile shuffle and then hands back the
//! winners that were decided before it started. It never picks anything.
//!
//! Phases: `Idle -> Running -> Completing -> Idle`. Every run is one spawned
//! task held by a guard that aborts it on drop, and each run carries a
//! generation number so a stopped run can never fire its callback.

pub mod theme;
pub mod tiles;

pub use theme::{tile_theme, TileTheme};
pub use tiles::{NamePicker, TileBoard, TileGrid, TileView};

use crate::{LotteryError, Result, WinnerSet};
use luckydraw_core::Participant;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, sleep_until, Instant, MissedTickBehavior};

/// Timings are plain milliseconds in config files.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// How long the tiles cycle.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub duration: Duration,
    /// Pause between the cycling stopping and the winners being revealed.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub reveal_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub frame_interval: Duration,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub tile_size: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(5000),
            reveal_delay: Duration::from_millis(1500),
            frame_interval: Duration::from_millis(80),
            canvas_width: 840,
            canvas_height: 420,
            tile_size: 140,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.duration.is_zero() {
            return Err(LotteryError::InvalidConfig(
                "duration must be greater than 0".to_string(),
            ));
        }

        if self.frame_interval.is_zero() {
            return Err(LotteryError::InvalidConfig(
                "frame interval must be greater than 0".to_string(),
            ));
        }

        if self.tile_size == 0 {
            return Err(LotteryError::InvalidConfig(
                "tile size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn total(&self) -> Duration {
        self.duration + self.reveal_delay
    }

    pub fn grid(&self) -> TileGrid {
        TileGrid::derive(self.canvas_width, self.canvas_height, self.tile_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationPhase {
    Idle,
    Running,
    Completing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub elapsed: Duration,
    pub phase: AnimationPhase,
    pub grid: TileGrid,
    pub tiles: Vec<TileView>,
}

struct Shared {
    phase: AnimationPhase,
    generation: u64,
}

/// Owns a run task; dropping it cancels every timer the run holds.
struct TimerGuard(JoinHandle<()>);

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct AnimationPresenter {
    config: AnimationConfig,
    shared: Arc<Mutex<Shared>>,
    run: Option<TimerGuard>,
}

impl AnimationPresenter {
    pub fn new(config: AnimationConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            shared: Arc::new(Mutex::new(Shared {
                phase: AnimationPhase::Idle,
                generation: 0,
            })),
            run: None,
        })
    }

    pub fn phase(&self) -> AnimationPhase {
        self.shared.lock().phase
    }

    pub fn is_running(&self) -> bool {
        self.phase() != AnimationPhase::Idle
    }

    pub fn has_pending_timers(&self) -> bool {
        self.run.as_ref().map_or(false, |guard| !guard.0.is_finished())
    }

    /// Start a run over `participants`' names and deliver `winners` to
    /// `on_complete` once the duration and reveal delay have passed.
    ///
    /// Must be called from within a Tokio runtime. A run already in flight is
    /// cancelled first. An empty pool is refused and schedules nothing.
    pub fn start<F>(
        &mut self,
        participants: &[Participant],
        winners: WinnerSet,
        frames: Option<UnboundedSender<AnimationFrame>>,
        on_complete: F,
    ) -> Result<()>
    where
        F: FnOnce(WinnerSet) + Send + 'static,
    {
        if participants.is_empty() {
            return Err(LotteryError::NoParticipants);
        }

        self.release();

        let generation = {
            let mut shared = self.shared.lock();
            shared.generation += 1;
            shared.phase = AnimationPhase::Running;
            shared.generation
        };

        let run = Run {
            config: self.config.clone(),
            shared: self.shared.clone(),
            generation,
            names: participants.iter().map(|p| p.name.clone()).collect(),
            frames,
        };

        tracing::debug!(
            "Animation run {} started for {} participant(s)",
            generation,
            participants.len()
        );

        let task = tokio::spawn(run.play(winners, Box::new(on_complete)));
        self.run = Some(TimerGuard(task));
        Ok(())
    }

    /// Cancel the current run, if any. Returns whether one was in flight.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.release();
        if was_running {
            tracing::info!("Animation cancelled before reveal");
        }
        was_running
    }

    fn release(&mut self) {
        {
            let mut shared = self.shared.lock();
            shared.generation += 1;
            shared.phase = AnimationPhase::Idle;
        }
        self.run.take();
    }
}

impl Drop for AnimationPresenter {
    fn drop(&mut self) {
        self.release();
    }
}

struct Run {
    config: AnimationConfig,
    shared: Arc<Mutex<Shared>>,
    generation: u64,
    names: Vec<String>,
    frames: Option<UnboundedSender<AnimationFrame>>,
}

impl Run {
    async fn play(self, winners: WinnerSet, on_complete: Box<dyn FnOnce(WinnerSet) + Send>) {
        let grid = self.config.grid();
        let mut board = TileBoard::new(grid, self.names.clone());

        let started = Instant::now();
        let deadline = sleep_until(started + self.config.duration);
        tokio::pin!(deadline);

        let mut ticker = interval(self.config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = ticker.tick() => {
                    let tiles = board.advance(started.elapsed());
                    self.emit(started, AnimationPhase::Running, tiles);
                }
            }
        }

        if !self.transition(AnimationPhase::Running, AnimationPhase::Completing) {
            return;
        }
        self.emit(started, AnimationPhase::Completing, board.views());

        sleep(self.config.reveal_delay).await;

        if !self.transition(AnimationPhase::Completing, AnimationPhase::Idle) {
            return;
        }

        tracing::debug!("Animation run {} revealing winners", self.generation);
        on_complete(winners);
    }

    fn emit(&self, started: Instant, phase: AnimationPhase, tiles: Vec<TileView>) {
        if let Some(frames) = &self.frames {
            // a closed receiver only means nobody is watching
            let _ = frames.send(AnimationFrame {
                elapsed: started.elapsed(),
                phase,
                grid: self.config.grid(),
                tiles,
            });
        }
    }

    fn transition(&self, from: AnimationPhase, to: AnimationPhase) -> bool {
        let mut shared = self.shared.lock();
        if shared.generation != self.generation || shared.phase != from {
            return false;
        }
        shared.phase = to;
        true
    }
}
