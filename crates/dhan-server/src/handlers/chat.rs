//! Money coach chat handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use dhan_core::ai::{CoachBackend, CoachContext};
use dhan_core::db::TransactionQuery;
use dhan_core::metrics::{compute_summary, GoalView};
use dhan_core::models::{ChatMessage, ChatRole, GoalStatus};

use crate::{AppError, AppState, AuthUser, MAX_PAGE_LIMIT};

/// How many past messages the coach sees per question
const HISTORY_WINDOW: i64 = 20;

/// Query parameters for GET /api/chat/history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    50
}

/// Request body for POST /api/chat/send
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
}

/// Response for POST /api/chat/send
#[derive(Serialize)]
pub struct SendResponse {
    pub reply: ChatMessage,
}

/// Response for DELETE /api/chat/clear
#[derive(Serialize)]
pub struct ClearResponse {
    pub deleted: usize,
}

/// GET /api/chat/history - The user's conversation, oldest first
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let limit = params.limit.max(1).min(MAX_PAGE_LIMIT);
    let messages = state.db.chat_history(user.id, limit)?;
    Ok(Json(messages))
}

/// POST /api/chat/send - Ask the coach a question
///
/// The question and the coach's reply are both stored, so the conversation
/// survives restarts. The coach sees the user's current snapshot with every
/// question.
pub async fn chat_send(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(body): Json<SendRequest>,
) -> Result<Json<SendResponse>, AppError> {
    let question = body.message.trim();
    if question.is_empty() {
        return Err(AppError::bad_request("Message cannot be empty"));
    }

    // Snapshot before recording the question, so the history the coach sees
    // ends just before it
    let history = state.db.chat_history(user.id, HISTORY_WINDOW)?;
    let context = build_context(&state, user.id)?;

    state
        .db
        .append_chat_message(user.id, ChatRole::User, question)?;

    let answer = state
        .ai
        .coach_reply(&context, &history, question)
        .await?;

    let reply = state
        .db
        .append_chat_message(user.id, ChatRole::Assistant, &answer)?;

    Ok(Json(SendResponse { reply }))
}

/// DELETE /api/chat/clear - Forget the conversation
pub async fn chat_clear(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<Json<ClearResponse>, AppError> {
    let deleted = state.db.clear_chat_history(user.id)?;
    Ok(Json(ClearResponse { deleted }))
}

/// Assemble the financial snapshot the coach answers from
fn build_context(state: &AppState, user_id: i64) -> Result<CoachContext, AppError> {
    let transactions = state
        .db
        .list_transactions(user_id, &TransactionQuery::all())?;
    let goals = state.db.list_goals(user_id, Some(GoalStatus::Active))?;

    let now = Utc::now();
    Ok(CoachContext {
        summary: compute_summary(&transactions, goals.len()),
        goals: goals.iter().map(|g| GoalView::compute(g, now)).collect(),
    })
}
