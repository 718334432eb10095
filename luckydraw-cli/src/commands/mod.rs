pub mod app;
pub mod draw;
pub mod history;
pub mod participant;

pub use app::run_interactive;
pub use draw::handle_draw_command;
pub use history::handle_history_command;
pub use participant::{handle_participant_command, ParticipantCommands};

use crate::config::{BackendKind, CliConfig};
use crate::ui::ConsoleNotifier;
use luckydraw_core::{Backend, MemoryBackend, Notifier, RestBackend, SqliteBackend};
use luckydraw_lottery::AnimationConfig;
use std::sync::Arc;

/// A failure the user has already seen as a notice. `main` only turns it into
/// a non-zero exit.
#[derive(Debug, thiserror::Error)]
#[error("already reported")]
pub struct AlreadyReported;

/// Everything a command needs: one store shared by every page, and one
/// notifier for the toasts.
pub struct AppContext {
    pub backend: Arc<dyn Backend>,
    pub notifier: Arc<dyn Notifier>,
    pub animation: AnimationConfig,
}

impl AppContext {
    pub async fn from_config(config: &CliConfig) -> anyhow::Result<Self> {
        let backend: Arc<dyn Backend> = match config.backend {
            BackendKind::Local => Arc::new(SqliteBackend::new(&config.data_dir).await?),
            BackendKind::Rest => Arc::new(RestBackend::new(config.rest.clone())?),
            BackendKind::Memory => Arc::new(MemoryBackend::new()),
        };

        tracing::debug!("Using {:?} backend", config.backend);

        Ok(Self {
            backend,
            notifier: Arc::new(ConsoleNotifier),
            animation: config.animation.clone(),
        })
    }

    #[cfg(test)]
    pub fn with_backend(backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            animation: AnimationConfig::default(),
        }
    }
}
