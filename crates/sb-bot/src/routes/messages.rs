//! Inbound message endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::dispatch::dispatch;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use sb_protocol::Actor;

/// Request body for an inbound chat message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Raw message text (free text or a slash command).
    pub text: String,
    /// Who sent it, for the movement audit trail.
    pub actor: Actor,
}

/// Reply body.
#[derive(Debug, Serialize)]
pub struct MessageReply {
    pub reply: String,
}

/// POST /api/v1/messages — handle one chat message.
pub async fn handle_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> ApiResult<Json<MessageReply>> {
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".into()));
    }

    let reply = dispatch(&state, &req.text, req.actor).await;
    Ok(Json(MessageReply { reply }))
}
