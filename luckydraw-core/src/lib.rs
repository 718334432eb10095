//! Lucky draw core - participant and winners-log storage
//!
//! This library provides the data model and the store backends (embedded
//! SQLite, hosted REST, in-memory) that the draw engine and the CLI share.

pub mod backend;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod types;

pub use backend::{
    Backend, HistoryBackend, MemoryBackend, ParticipantBackend, RestBackend, SqliteBackend,
};
pub use config::RestConfig;
pub use error::{LuckyDrawError, Result};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use types::{HistoryEntry, HistoryRecord, NewParticipant, Participant};
