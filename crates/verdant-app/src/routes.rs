//! HTTP boundary: chat page, history snapshot, and the chat relay.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use verdant_ai::{AiError, ImageAttachment, Role};

use crate::state::AppState;

/// Cookie identifying a browser scope (one chat session per scope).
const SCOPE_COOKIE: &str = "verdant_scope";

/// Maximum length for user message text (prevents abuse).
const MAX_INPUT_LEN: usize = 4096;

static INDEX_HTML: &str = include_str!("../assets/index.html");

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/history", get(get_history))
        .route("/api/chat", post(post_chat))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Deserialize)]
struct ImageUpload {
    /// Base64-encoded image bytes.
    data: String,
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    text: String,
    #[serde(default)]
    image: Option<ImageUpload>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Debug, Serialize)]
struct HistoryEntry {
    role: Role,
    text: String,
    has_image: bool,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    turns: Vec<HistoryEntry>,
}

#[derive(Debug)]
enum ApiError {
    /// The request was malformed; nothing reached the session.
    Invalid(String),
    /// The model collaborator call failed; the session keeps the user turn.
    Upstream(AiError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Invalid(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Upstream(AiError::RateLimited) => (
                StatusCode::SERVICE_UNAVAILABLE,
                AiError::RateLimited.to_string(),
            ),
            ApiError::Upstream(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Resolve the scope id from the cookie jar, minting one on first touch.
fn resolve_scope(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SCOPE_COOKIE) {
        if !cookie.value().is_empty() {
            let scope_id = cookie.value().to_string();
            return (jar, scope_id);
        }
    }

    let scope_id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((SCOPE_COOKIE, scope_id.clone()))
        .path("/")
        .http_only(true)
        .build();
    (jar.add(cookie), scope_id)
}

/// Read-only history snapshot for rendering.
///
/// Only text parts are exposed: image bytes are write-once and never
/// leave the session again. Does not create a session; history before
/// the first message is simply empty.
async fn get_history(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<HistoryResponse>) {
    let (jar, scope_id) = resolve_scope(jar);

    let turns = match state.sessions.get(&scope_id) {
        Some(session) => {
            let session = session.lock().await;
            session
                .history()
                .iter()
                .map(|turn| HistoryEntry {
                    role: turn.role(),
                    text: turn.text().to_string(),
                    has_image: turn.has_image(),
                })
                .collect()
        }
        None => Vec::new(),
    };

    (jar, Json(HistoryResponse { turns }))
}

async fn post_chat(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<ChatRequest>,
) -> (CookieJar, Result<Json<ChatResponse>, ApiError>) {
    let (jar, scope_id) = resolve_scope(jar);
    let result = handle_chat(&state, &scope_id, request).await.map(Json);
    (jar, result)
}

/// Validate the request, then relay it through the scope's session.
async fn handle_chat(
    state: &AppState,
    scope_id: &str,
    request: ChatRequest,
) -> Result<ChatResponse, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::Invalid("message text must not be empty".into()));
    }
    if request.text.len() > MAX_INPUT_LEN {
        tracing::warn!(scope_id, len = request.text.len(), "chat: text too long");
        return Err(ApiError::Invalid(format!(
            "message text exceeds {MAX_INPUT_LEN} bytes"
        )));
    }

    // Decode and validate the attachment before touching the session,
    // so a bad upload never leaves a turn behind.
    let image = request.image.map(decode_image).transpose()?;

    let session = state.sessions.get_or_create(scope_id, &state.instruction);
    let mut session = session.lock().await;

    let reply = session
        .send(state.client.as_ref(), request.text, image)
        .await
        .map_err(|e| {
            tracing::warn!(scope_id, error = %e, "chat relay failed");
            ApiError::Upstream(e)
        })?;

    Ok(ChatResponse { reply })
}

fn decode_image(upload: ImageUpload) -> Result<ImageAttachment, ApiError> {
    let bytes = BASE64_STANDARD
        .decode(upload.data.as_bytes())
        .map_err(|e| ApiError::Invalid(format!("image data is not valid base64: {e}")))?;

    ImageAttachment::new(bytes, upload.mime_type).map_err(|e| ApiError::Invalid(e.to_string()))
}
