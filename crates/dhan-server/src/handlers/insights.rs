//! Insights handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;

use dhan_core::advice::{generate_insights, generate_recommendations, Insight, Recommendation};
use dhan_core::db::TransactionQuery;
use dhan_core::metrics::{
    aggregate_by_category, aggregate_by_month, aggregate_by_necessity, compute_summary,
    BucketTotal, GoalView, MonthlySeries, Sign, Summary,
};
use dhan_core::models::{Goal, GoalStatus};

use crate::{AppError, AppState, AuthUser};

/// Goal counters for the insights page header
#[derive(Serialize)]
pub struct GoalCounters {
    pub active: usize,
    pub completed: usize,
    /// Sum of saved amounts across all goals, completed ones included
    pub total_saved: f64,
}

/// Response for GET /api/insights/summary
#[derive(Serialize)]
pub struct InsightsSummaryResponse {
    pub summary: Summary,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    pub expense_by_category: Vec<BucketTotal>,
    pub income_by_category: Vec<BucketTotal>,
    pub expense_by_necessity: Vec<BucketTotal>,
    pub monthly: MonthlySeries,
    pub goals: GoalCounters,
}

/// GET /api/insights/summary - Full derived-metrics picture for the insights page
///
/// Every figure is computed from the same transaction list in one pass of the
/// metrics engine, so the numbers on the page always agree with each other.
pub async fn insights_summary(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<Json<InsightsSummaryResponse>, AppError> {
    let transactions = state
        .db
        .list_transactions(user.id, &TransactionQuery::all())?;
    let goals = state.db.list_goals(user.id, None)?;
    let active: Vec<&Goal> = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .collect();

    let now = Utc::now();
    let summary = compute_summary(&transactions, active.len());
    let expense_by_category = aggregate_by_category(&transactions, Sign::Expense);
    let income_by_category = aggregate_by_category(&transactions, Sign::Income);
    let expense_by_necessity = aggregate_by_necessity(&transactions);
    let monthly = aggregate_by_month(&transactions, now);

    let goal_views: Vec<GoalView> = active.iter().map(|g| GoalView::compute(g, now)).collect();
    let insights = generate_insights(&summary, &expense_by_category);
    let recommendations = generate_recommendations(&summary, &expense_by_category, &goal_views);

    let counters = GoalCounters {
        active: active.len(),
        completed: goals.len() - active.len(),
        total_saved: goals.iter().map(|g| g.current_amount).sum(),
    };

    Ok(Json(InsightsSummaryResponse {
        summary,
        insights,
        recommendations,
        expense_by_category,
        income_by_category,
        expense_by_necessity,
        monthly,
        goals: counters,
    }))
}
