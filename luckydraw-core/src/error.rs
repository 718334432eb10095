use thiserror::Error;

pub type Result<T> = std::result::Result<T, LuckyDrawError>;

#[derive(Error, Debug)]
pub enum LuckyDrawError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Network connection error: {0}")]
    NetworkConnection(String),

    #[error("Remote store rejected the request ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl LuckyDrawError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn network_connection(msg: impl Into<String>) -> Self {
        Self::NetworkConnection(msg.into())
    }

    /// True for failures caused by talking to the store rather than by bad input.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::NetworkConnection(_) | Self::Remote { .. } | Self::Storage(_)
        )
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for LuckyDrawError {
    fn from(err: dialoguer::Error) -> Self {
        LuckyDrawError::Dialog(err.to_string())
    }
}
