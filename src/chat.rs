use crate::classifier::{EmotionLabel, Sentiment};
use crate::session::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat exchange as persisted to the chat log. Entries are immutable
/// once appended; the log is a write-only audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub timestamp: DateTime<Utc>,
    pub session_id: SessionId,
    pub user_message: String,
    pub bot_response: String,
    pub emotion: EmotionLabel,
    pub sentiment: Sentiment,
}

impl ChatEntry {
    pub fn new(
        session_id: SessionId,
        user_message: impl Into<String>,
        bot_response: impl Into<String>,
        emotion: EmotionLabel,
        sentiment: Sentiment,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id,
            user_message: user_message.into(),
            bot_response: bot_response.into(),
            emotion,
            sentiment,
        }
    }
}
