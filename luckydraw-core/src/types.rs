use crate::error::{LuckyDrawError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A participant in the draw pool. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    pub student_id: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Add-form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParticipant {
    pub name: String,
    pub student_id: String,
}

impl NewParticipant {
    /// Trims both fields and rejects the payload if either ends up empty.
    pub fn new(name: &str, student_id: &str) -> Result<Self> {
        let name = name.trim();
        let student_id = student_id.trim();

        if name.is_empty() {
            return Err(LuckyDrawError::validation("name must not be empty"));
        }
        if student_id.is_empty() {
            return Err(LuckyDrawError::validation("student id must not be empty"));
        }

        Ok(Self {
            name: name.to_string(),
            student_id: student_id.to_string(),
        })
    }
}

/// One row of the append-only winners log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub winner_name: String,
    pub winner_student_id: String,
}

impl From<&Participant> for HistoryRecord {
    fn from(participant: &Participant) -> Self {
        Self {
            winner_name: participant.name.clone(),
            winner_student_id: participant.student_id.clone(),
        }
    }
}

/// A stored history row as read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub winner_name: String,
    pub winner_student_id: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn record(&self) -> HistoryRecord {
        HistoryRecord {
            winner_name: self.winner_name.clone(),
            winner_student_id: self.winner_student_id.clone(),
        }
    }
}

// Hosted stores hand out either uuid strings or serial integers.
fn opaque_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
