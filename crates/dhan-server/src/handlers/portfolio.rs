//! Portfolio handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use dhan_core::models::{Holding, NewHolding, PortfolioSummary};

use crate::{AppError, AppState, AuthUser, SuccessResponse};

/// GET /api/portfolio - Positions and total value at average cost
pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<Json<PortfolioSummary>, AppError> {
    let summary = state.db.portfolio_summary(user.id)?;
    Ok(Json(summary))
}

/// POST /api/portfolio - Add a holding, merging repeat buys of the same symbol
pub async fn add_holding(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(body): Json<NewHolding>,
) -> Result<Json<Holding>, AppError> {
    let holding = state.db.upsert_holding(user.id, &body)?;
    Ok(Json(holding))
}

/// DELETE /api/portfolio/:symbol - Close out a position
pub async fn delete_holding(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(symbol): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_holding(user.id, &symbol)?;
    Ok(Json(SuccessResponse { success: true }))
}
