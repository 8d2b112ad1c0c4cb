use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::engine::{Engine, EngineError};
use crate::session::{ensure_session_id, SessionId};

/// Header carrying the anonymous session token. The client stores the
/// value from the first response and replays it on later requests.
pub const SESSION_HEADER: &str = "x-session-id";

// -----------------------------------------------------------------------------
// Request / response bodies
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogMoodRequest {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogMoodResponse {
    pub success: bool,
    pub suggestion: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

// -----------------------------------------------------------------------------
// Router
// -----------------------------------------------------------------------------

pub struct ApiServer {
    engine: Arc<Engine>,
}

impl ApiServer {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/chat", post(chat_handler))
            .route("/log-mood", post(log_mood_handler))
            .route("/mood-history", get(mood_history_handler))
            .with_state(self.engine.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }
}

fn session_from_headers(headers: &HeaderMap) -> SessionId {
    let current = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok());
    ensure_session_id(current)
}

/// Attaches the session token to the outgoing response so the client can
/// hold onto it.
fn with_session(session_id: &SessionId, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if let Ok(value) = HeaderValue::from_str(session_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(SESSION_HEADER), value);
    }
    response
}

fn error_response(err: EngineError) -> (StatusCode, Json<ErrorBody>) {
    match err {
        EngineError::MissingField(field) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: format!("No {} provided", field),
            }),
        ),
        EngineError::Storage(e) => {
            error!("storage failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "storage failure".to_string(),
                }),
            )
        }
    }
}

// -----------------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------------

#[axum::debug_handler]
async fn chat_handler(
    State(engine): State<Arc<Engine>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    let session_id = session_from_headers(&headers);
    let message = request.message.as_deref().unwrap_or("");

    match engine.handle_chat(&session_id, message).await {
        Ok(outcome) => with_session(&session_id, (StatusCode::OK, Json(outcome))),
        Err(e) => with_session(&session_id, error_response(e)),
    }
}

async fn log_mood_handler(
    State(engine): State<Arc<Engine>>,
    headers: HeaderMap,
    Json(request): Json<LogMoodRequest>,
) -> Response {
    let session_id = session_from_headers(&headers);
    let mood = request.mood.as_deref().unwrap_or("");
    let notes = request.notes.as_deref().unwrap_or("");

    match engine.log_mood(&session_id, mood, notes).await {
        Ok(suggestion) => with_session(
            &session_id,
            (
                StatusCode::OK,
                Json(LogMoodResponse {
                    success: true,
                    suggestion,
                }),
            ),
        ),
        Err(e) => with_session(&session_id, error_response(e)),
    }
}

async fn mood_history_handler(
    State(engine): State<Arc<Engine>>,
    headers: HeaderMap,
) -> Response {
    let session_id = session_from_headers(&headers);

    match engine.mood_history(&session_id).await {
        Ok(history) => with_session(&session_id, (StatusCode::OK, Json(history))),
        Err(e) => with_session(&session_id, error_response(e)),
    }
}
