use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Anonymous per-browser correlation token. Not an authenticated identity;
/// it only ties log entries from the same browser together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mints a fresh 128-bit random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reuses the caller's token when one is present, otherwise mints a new
/// one. Feeding the returned token back in yields the same identity, so
/// the call is idempotent per session lifetime.
pub fn ensure_session_id(current: Option<&str>) -> SessionId {
    match current {
        Some(token) if !token.trim().is_empty() => SessionId(token.to_string()),
        _ => SessionId::generate(),
    }
}
