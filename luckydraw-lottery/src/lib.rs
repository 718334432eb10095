//! Lucky draw engine
//!
//! Winners are decided up front by a uniform shuffle; the reveal animation
//! only builds suspense and hands back the already-decided result.

pub mod animation;
pub mod draw;
pub mod error;
pub mod particles;
pub mod roster;
pub mod session;

#[cfg(test)]
mod test_support;

pub use animation::{AnimationConfig, AnimationFrame, AnimationPhase, AnimationPresenter};
pub use draw::{select_winners, Draw, DrawController, DrawRequest, WinnerSet};
pub use error::{LotteryError, Result};
pub use particles::{burst, Particle, PARTICLE_COUNT};
pub use roster::Roster;
pub use session::{DrawPhase, DrawSession, HistoryWrite};
