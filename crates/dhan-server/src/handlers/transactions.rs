//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use dhan_core::db::TransactionQuery;
use dhan_core::models::{Category, NewTransaction, Transaction, TransactionBatch};

use crate::{AppError, AppState, AuthUser, SuccessResponse, MAX_PAGE_LIMIT};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    /// Filter by category name
    pub category: Option<String>,
}

fn default_limit() -> i64 {
    100
}

#[derive(Serialize)]
pub struct BulkImportResponse {
    pub imported: usize,
    pub ids: Vec<i64>,
}

/// GET /api/transactions - List the user's transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    // Input validation: clamp pagination parameters
    let query = TransactionQuery {
        limit: params.limit.max(1).min(MAX_PAGE_LIMIT),
        offset: params.offset.max(0),
        category: params.category.as_deref().map(Category::from),
    };

    let transactions = state.db.list_transactions(user.id, &query)?;
    Ok(Json(transactions))
}

/// POST /api/transactions - Record a single transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(body): Json<NewTransaction>,
) -> Result<Json<Transaction>, AppError> {
    let id = state.db.insert_transaction(user.id, &body)?;
    let transaction = state.db.get_transaction(user.id, id)?;
    Ok(Json(transaction))
}

/// POST /api/transactions/bulk - Import a batch of transactions
///
/// Accepts either a bare JSON array or an object with a `data` array, so
/// exports from other tools can be posted as-is.
pub async fn bulk_import(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Json(batch): Json<TransactionBatch>,
) -> Result<Json<BulkImportResponse>, AppError> {
    let transactions = batch.into_inner();
    if transactions.is_empty() {
        return Err(AppError::bad_request("Batch contains no transactions"));
    }

    let ids = state.db.insert_transactions(user.id, &transactions)?;
    Ok(Json(BulkImportResponse {
        imported: ids.len(),
        ids,
    }))
}

/// GET /api/transactions/:id - Fetch one transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state.db.get_transaction(user.id, id)?;
    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id - Remove a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_transaction(user.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}
