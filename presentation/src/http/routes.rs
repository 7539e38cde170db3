//! Route handlers.

use super::AppState;
use super::dto::{
    ChatRequest, ChatResponse, HealthResponse, SessionRequest, SessionResponse,
};
use super::error::ApiError;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use relay_application::ChatInput;
use tracing::debug;

/// `POST /api/session`
pub async fn session_handler(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = payload?;

    match request.action.as_str() {
        "create" => {
            let session = state.sessions.create();
            Ok(Json(SessionResponse::created(&session)))
        }
        "get" => {
            let id = request.id.unwrap_or_default();
            let session = state.sessions.get(&id)?;
            Ok(Json(SessionResponse::transcript(&session)))
        }
        other => {
            debug!(action = other, "Rejected session action");
            Err(ApiError::bad_request("INVALID_ACTION", "Invalid action"))
        }
    }
}

/// `POST /api/chat`
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;

    let mut input = ChatInput::new(request.session_id, request.query)
        .with_context(request.context.unwrap_or_default());
    if let Some(content) = request.message_content {
        input = input.with_content(content);
    }

    let output = state.chat.execute(input).await?;

    Ok(Json(ChatResponse {
        session_id: output.session_id,
        response: output.reply,
    }))
}

/// `GET /api/health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        sessions: state.sessions.session_count(),
    })
}

/// Any other `/api/*` path
pub async fn api_not_found() -> ApiError {
    ApiError::not_found("NOT_FOUND", "Not found")
}
