use thiserror::Error;

pub type Result<T> = std::result::Result<T, LotteryError>;

#[derive(Error, Debug)]
pub enum LotteryError {
    #[error("Lucky draw core error: {0}")]
    Core(#[from] luckydraw_core::LuckyDrawError),

    #[error("No participants to draw from")]
    NoParticipants,

    #[error("Draw count must be at least 1")]
    ZeroCount,

    #[error("Cannot draw {requested} winner(s) from {available} participant(s)")]
    CountOutOfRange { requested: usize, available: usize },

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid draw state: {0}")]
    InvalidState(String),

    #[error("Invalid animation configuration: {0}")]
    InvalidConfig(String),
}

impl LotteryError {
    /// Input problems the user can fix; nothing was sent or changed.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoParticipants
                | Self::ZeroCount
                | Self::CountOutOfRange { .. }
                | Self::MissingField(_)
        )
    }
}
