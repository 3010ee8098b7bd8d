//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use dhan_core::db::TransactionQuery;
use dhan_core::metrics::{aggregate_by_month, compute_summary, GoalView, MonthlySeries, Summary};
use dhan_core::models::{GoalStatus, PortfolioSummary, Transaction};

use crate::{AppError, AppState, AuthUser};

/// How many recent transactions the dashboard shows
const RECENT_COUNT: usize = 5;

/// Response for GET /api/dashboard
#[derive(Serialize)]
pub struct DashboardResponse {
    pub summary: Summary,
    pub recent_transactions: Vec<Transaction>,
    pub goals: Vec<GoalView>,
    pub portfolio: PortfolioSummary,
    pub monthly: MonthlySeries,
}

/// GET /api/dashboard - One-call overview for the landing page
///
/// Each data source degrades independently: if one lookup fails, its section
/// renders empty and the rest of the dashboard still loads. The failure is
/// logged, never surfaced as a 500.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>, AppError> {
    let transactions = state
        .db
        .list_transactions(user.id, &TransactionQuery::all())
        .unwrap_or_else(|e| {
            warn!(user_id = user.id, error = %e, "Dashboard: transaction lookup failed");
            Vec::new()
        });

    let goals = state
        .db
        .list_goals(user.id, Some(GoalStatus::Active))
        .unwrap_or_else(|e| {
            warn!(user_id = user.id, error = %e, "Dashboard: goal lookup failed");
            Vec::new()
        });

    let portfolio = state.db.portfolio_summary(user.id).unwrap_or_else(|e| {
        warn!(user_id = user.id, error = %e, "Dashboard: portfolio lookup failed");
        PortfolioSummary {
            total_value: 0.0,
            positions: Vec::new(),
        }
    });

    let now = Utc::now();
    let summary = compute_summary(&transactions, goals.len());
    let monthly = aggregate_by_month(&transactions, now);
    let goal_views = goals.iter().map(|g| GoalView::compute(g, now)).collect();
    let recent_transactions = transactions.into_iter().take(RECENT_COUNT).collect();

    Ok(Json(DashboardResponse {
        summary,
        recent_transactions,
        goals: goal_views,
        portfolio,
        monthly,
    }))
}
