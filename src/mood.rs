use crate::session::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One journaled mood as persisted to the mood log. The mood string is
/// free-form, chosen by the client's own taxonomy; entries are immutable
/// once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub timestamp: DateTime<Utc>,
    pub session_id: SessionId,
    pub mood: String,
    #[serde(default)]
    pub notes: String,
}

impl MoodEntry {
    pub fn new(session_id: SessionId, mood: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id,
            mood: mood.into(),
            notes: notes.into(),
        }
    }
}
