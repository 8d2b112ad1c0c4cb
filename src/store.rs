use crate::chat::ChatEntry;
use crate::mood::MoodEntry;
use crate::session::SessionId;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CHAT_LOG_FILE: &str = "chat_history.json";
const MOOD_LOG_FILE: &str = "mood_data.json";

/// How many of the caller's most recent mood entries `mood_history` returns.
const MOOD_HISTORY_WINDOW: usize = 30;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt log file {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode log file {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Append-only store for the chat and mood logs.
///
/// Each log lives in one JSON array on disk that is read and rewritten
/// whole on every append. The read-modify-write cycle is not atomic:
/// two concurrent appends to the same log race, and the last writer
/// wins. Tolerable for the small per-browser logs this serves.
#[derive(Debug, Clone)]
pub struct LogStore {
    data_dir: PathBuf,
}

impl LogStore {
    /// Opens a store rooted at `data_dir`, creating the directory if needed.
    /// A log file that has never been written reads back as an empty log.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir).map_err(|source| StorageError::Write {
            path: data_dir.clone(),
            source,
        })?;
        Ok(Self { data_dir })
    }

    pub async fn append_chat(&self, entry: ChatEntry) -> Result<(), StorageError> {
        self.append(CHAT_LOG_FILE, entry).await
    }

    pub async fn append_mood(&self, entry: MoodEntry) -> Result<(), StorageError> {
        self.append(MOOD_LOG_FILE, entry).await
    }

    /// The caller's mood entries in chronological order, truncated to the
    /// most recent `MOOD_HISTORY_WINDOW`.
    pub async fn mood_history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<MoodEntry>, StorageError> {
        let all: Vec<MoodEntry> = self.load(MOOD_LOG_FILE).await?;
        let mut matching: Vec<MoodEntry> = all
            .into_iter()
            .filter(|entry| &entry.session_id == session_id)
            .collect();

        if matching.len() > MOOD_HISTORY_WINDOW {
            matching.drain(..matching.len() - MOOD_HISTORY_WINDOW);
        }
        Ok(matching)
    }

    /// Full chat log, oldest first.
    pub async fn chat_log(&self) -> Result<Vec<ChatEntry>, StorageError> {
        self.load(CHAT_LOG_FILE).await
    }

    async fn append<T>(&self, file: &str, entry: T) -> Result<(), StorageError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut entries: Vec<T> = self.load(file).await?;
        entries.push(entry);
        self.write(file, &entries).await
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StorageError> {
        let path = self.data_dir.join(file);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt { path, source })
    }

    async fn write<T: Serialize>(&self, file: &str, entries: &[T]) -> Result<(), StorageError> {
        let path = self.data_dir.join(file);
        let json = serde_json::to_string_pretty(entries)
            .map_err(|source| StorageError::Encode {
                path: path.clone(),
                source,
            })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| StorageError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{EmotionLabel, Sentiment};
    use tempfile::TempDir;

    fn chat_entry(session_id: &SessionId, message: &str) -> ChatEntry {
        ChatEntry::new(
            session_id.clone(),
            message,
            "I'm here to listen.",
            EmotionLabel::Neutral,
            Sentiment::neutral_fallback(),
        )
    }

    #[tokio::test]
    async fn uninitialized_store_reads_empty_logs() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path()).unwrap();
        let session = SessionId::generate();

        assert!(store.chat_log().await.unwrap().is_empty());
        assert!(store.mood_history(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn appended_chat_entries_read_back_in_order() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path()).unwrap();
        let session = SessionId::generate();

        store
            .append_chat(chat_entry(&session, "first"))
            .await
            .unwrap();
        store
            .append_chat(chat_entry(&session, "second"))
            .await
            .unwrap();

        let log = store.chat_log().await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].user_message, "first");
        assert_eq!(log[1].user_message, "second");
    }

    #[tokio::test]
    async fn mood_history_filters_by_session() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path()).unwrap();
        let mine = SessionId::generate();
        let theirs = SessionId::generate();

        store
            .append_mood(MoodEntry::new(mine.clone(), "joy", ""))
            .await
            .unwrap();
        store
            .append_mood(MoodEntry::new(theirs.clone(), "anger", ""))
            .await
            .unwrap();
        store
            .append_mood(MoodEntry::new(mine.clone(), "fear", "late night"))
            .await
            .unwrap();

        let history = store.mood_history(&mine).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].mood, "joy");
        assert_eq!(history[1].mood, "fear");
        assert_eq!(history[1].notes, "late night");
    }

    #[tokio::test]
    async fn mood_history_keeps_only_the_last_thirty() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path()).unwrap();
        let session = SessionId::generate();

        for i in 0..35 {
            store
                .append_mood(MoodEntry::new(session.clone(), format!("mood-{}", i), ""))
                .await
                .unwrap();
        }

        let history = store.mood_history(&session).await.unwrap();
        assert_eq!(history.len(), 30);
        // Window starts where the truncation cut off, oldest retained first.
        assert_eq!(history[0].mood, "mood-5");
        assert_eq!(history[29].mood, "mood-34");
    }

    #[tokio::test]
    async fn corrupt_log_file_surfaces_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path()).unwrap();
        let session = SessionId::generate();

        tokio::fs::write(dir.path().join("mood_data.json"), "{not json")
            .await
            .unwrap();

        let err = store
            .append_mood(MoodEntry::new(session, "joy", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
