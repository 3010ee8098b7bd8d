//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use dhan_core::metrics::GoalView;
use dhan_core::models::{Goal, GoalStatus, GoalUpdate, NewGoal};

use crate::{AppError, AppState, AuthUser, SuccessResponse};

/// Query parameters for listing goals
#[derive(Debug, Deserialize)]
pub struct GoalListQuery {
    /// Filter by status (active or completed)
    pub status: Option<String>,
}

/// Request body for POST /api/goals/:id/contribute
#[derive(Debug, Deserialize)]
pub struct ContributeRequest {
    pub amount: f64,
}

/// A goal with its derived display figures
#[derive(Serialize)]
pub struct GoalResponse {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_percent: f64,
    pub days_left: i64,
    pub monthly_target: f64,
}

impl GoalResponse {
    fn new(goal: Goal) -> Self {
        let view = GoalView::compute(&goal, Utc::now());
        Self {
            goal,
            progress_percent: view.progress_percent,
            days_left: view.days_left,
            monthly_target: view.monthly_target,
        }
    }
}

/// GET /api/goals - List the user's goals, soonest deadline first
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(params): Query<GoalListQuery>,
) -> Result<Json<Vec<GoalResponse>>, AppError> {
    let status = match params.status.as_deref() {
        Some(s) => Some(
            s.parse::<GoalStatus>()
                .map_err(|e| AppError::bad_request(&e))?,
        ),
        None => None,
    };

    let goals = state.db.list_goals(user.id, status)?;
    Ok(Json(goals.into_iter().map(GoalResponse::new).collect()))
}

/// POST /api/goals - Create a goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(body): Json<NewGoal>,
) -> Result<Json<GoalResponse>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Goal name is required"));
    }

    let goal = state.db.create_goal(user.id, &body)?;
    Ok(Json(GoalResponse::new(goal)))
}

/// GET /api/goals/:id - Fetch one goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<GoalResponse>, AppError> {
    let goal = state.db.get_goal(user.id, id)?;
    Ok(Json(GoalResponse::new(goal)))
}

/// PUT /api/goals/:id - Apply a partial update
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<GoalUpdate>,
) -> Result<Json<GoalResponse>, AppError> {
    let goal = state.db.update_goal(user.id, id, &body)?;
    Ok(Json(GoalResponse::new(goal)))
}

/// POST /api/goals/:id/contribute - Add money toward a goal
pub async fn contribute(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<ContributeRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    let goal = state.db.contribute_to_goal(user.id, id, body.amount)?;
    Ok(Json(GoalResponse::new(goal)))
}

/// DELETE /api/goals/:id - Remove a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_goal(user.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}
