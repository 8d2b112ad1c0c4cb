use crate::chat::ChatEntry;
use crate::classifier::{Classifiers, EmotionLabel, Sentiment};
use crate::mood::MoodEntry;
use crate::policy::{self, RandomSource};
use crate::session::SessionId;
use crate::store::{LogStore, StorageError};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A required request field was absent or empty. Nothing gets logged.
    #[error("no {0} provided")]
    MissingField(&'static str),

    /// The backing medium failed mid-request. Fatal for this request, no
    /// retry; classifier failures never end up here.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a chat turn hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub response: String,
    pub emotion: EmotionLabel,
    pub sentiment: Sentiment,
}

/// Ties the pieces together: classify, pick a reply, persist, respond.
/// Everything it needs is injected so tests can swap in deterministic
/// classifiers and randomness.
pub struct Engine {
    classifiers: Classifiers,
    store: LogStore,
    rng: Box<dyn RandomSource>,
}

impl Engine {
    pub fn new(classifiers: Classifiers, store: LogStore, rng: Box<dyn RandomSource>) -> Self {
        Self {
            classifiers,
            store,
            rng,
        }
    }

    /// Classify the message, pick a reply, and append the exchange to the
    /// chat log. The entry is persisted before the outcome is returned.
    pub async fn handle_chat(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<ChatOutcome, EngineError> {
        if message.trim().is_empty() {
            return Err(EngineError::MissingField("message"));
        }

        let emotion = self.classifiers.detect_emotion(message).await;
        let sentiment = self.classifiers.analyze_sentiment(message).await;
        let response = policy::select_response(emotion, &sentiment, self.rng.as_ref());

        self.store
            .append_chat(ChatEntry::new(
                session_id.clone(),
                message,
                response.as_str(),
                emotion,
                sentiment,
            ))
            .await?;

        info!("chat turn logged: session={} emotion={}", session_id, emotion);

        Ok(ChatOutcome {
            response,
            emotion,
            sentiment,
        })
    }

    /// Append a mood entry and return a wellness suggestion for it.
    /// Persistence is on the critical path: a storage failure aborts the
    /// request and no suggestion is produced.
    pub async fn log_mood(
        &self,
        session_id: &SessionId,
        mood: &str,
        notes: &str,
    ) -> Result<String, EngineError> {
        if mood.trim().is_empty() {
            return Err(EngineError::MissingField("mood"));
        }

        self.store
            .append_mood(MoodEntry::new(session_id.clone(), mood, notes))
            .await?;

        info!("mood logged: session={} mood={}", session_id, mood);

        Ok(policy::select_suggestion(mood, self.rng.as_ref()))
    }

    /// The caller's most recent mood entries, oldest of the window first.
    pub async fn mood_history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<MoodEntry>, EngineError> {
        Ok(self.store.mood_history(session_id).await?)
    }
}
