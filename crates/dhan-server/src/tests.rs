//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use dhan_core::ai::AiClient;
use dhan_core::db::Database;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, ServerConfig::for_tests(), AiClient::mock())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Register a user and log in, returning a bearer token
async fn register_and_login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "email": "test@example.com",
                "password": "s3cure-password",
                "full_name": "Test User"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/token",
            serde_json::json!({
                "email": "test@example.com",
                "password": "s3cure-password"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["token_type"], "bearer");
    json["access_token"].as_str().unwrap().to_string()
}

// ========== Health and Auth ==========

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/transactions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_me() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = app
        .oneshot(authed_request("GET", "/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["email"], "test@example.com");
    assert_eq!(json["full_name"], "Test User");
    // The password hash never leaves the server
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = setup_test_app();
    register_and_login(&app).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "email": "test@example.com",
                "password": "another-password",
                "full_name": "Imposter"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let app = setup_test_app();
    register_and_login(&app).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/token",
            serde_json::json!({
                "email": "test@example.com",
                "password": "wrong"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_short_password_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "email": "short@example.com",
                "password": "short",
                "full_name": "Short"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Transactions ==========

#[tokio::test]
async fn test_transaction_crud() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/transactions",
            &token,
            serde_json::json!({
                "amount": -250.0,
                "category": "food",
                "description": "groceries"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = get_body_json(response).await;
    assert_eq!(created["amount"], -250.0);
    assert_eq!(created["category"], "food");
    // Necessity defaults when the client omits it
    assert_eq!(created["necessity"], "needs");
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/transactions/{}", id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/transactions/{}", id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed_request(
            "GET",
            &format!("/api/transactions/{}", id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_import_accepts_both_shapes() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    // Bare array
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/transactions/bulk",
            &token,
            serde_json::json!([
                { "amount": 50000.0, "category": "income" },
                { "amount": -2500.0, "category": "food" }
            ]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["imported"], 2);

    // Wrapped in a data object
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/transactions/bulk",
            &token,
            serde_json::json!({
                "data": [ { "amount": -1500.0, "category": "rent" } ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed_request("GET", "/api/transactions", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_category_filter() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    app.clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/transactions/bulk",
            &token,
            serde_json::json!([
                { "amount": -100.0, "category": "food" },
                { "amount": -200.0, "category": "rent" },
                { "amount": -300.0, "category": "food" }
            ]),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(authed_request(
            "GET",
            "/api/transactions?category=food",
            &token,
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|t| t["category"] == "food"));
}

// ========== Goals ==========

#[tokio::test]
async fn test_goal_contribute_to_completion() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let target_date = (chrono::Utc::now() + chrono::Duration::days(150)).to_rfc3339();
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/goals",
            &token,
            serde_json::json!({
                "name": "New Laptop",
                "target_amount": 100000.0,
                "target_date": target_date
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let goal = get_body_json(response).await;
    let id = goal["id"].as_i64().unwrap();
    assert_eq!(goal["status"], "active");
    assert_eq!(goal["progress_percent"], 0.0);
    assert!(goal["monthly_target"].as_f64().unwrap() > 0.0);

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/goals/{}/contribute", id),
            &token,
            serde_json::json!({ "amount": 100000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let goal = get_body_json(response).await;
    assert_eq!(goal["status"], "completed");
    assert_eq!(goal["progress_percent"], 100.0);

    // Completed goals drop out of the active filter
    let response = app
        .oneshot(authed_request("GET", "/api/goals?status=active", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_goal_negative_contribution_rejected() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let target_date = (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339();
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/goals",
            &token,
            serde_json::json!({
                "name": "Trip",
                "target_amount": 5000.0,
                "target_date": target_date
            }),
        ))
        .await
        .unwrap();
    let goal = get_body_json(response).await;
    let id = goal["id"].as_i64().unwrap();

    let response = app
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/goals/{}/contribute", id),
            &token,
            serde_json::json!({ "amount": -100.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Chat ==========

#[tokio::test]
async fn test_chat_send_and_history() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/chat/send",
            &token,
            serde_json::json!({ "message": "how much should I save?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["reply"]["role"], "assistant");
    assert!(json["reply"]["content"].as_str().unwrap().contains("20%"));

    // Both sides of the exchange are stored
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/chat/history", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let history = json.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "assistant");

    let response = app
        .clone()
        .oneshot(authed_request("DELETE", "/api/chat/clear", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["deleted"], 2);

    let response = app
        .oneshot(authed_request("GET", "/api/chat/history", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_empty_message_rejected() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/chat/send",
            &token,
            serde_json::json!({ "message": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Portfolio ==========

#[tokio::test]
async fn test_portfolio_merge_and_delete() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    app.clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/portfolio",
            &token,
            serde_json::json!({ "symbol": "infy", "quantity": 10.0, "avg_cost": 100.0 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/portfolio",
            &token,
            serde_json::json!({ "symbol": "INFY", "quantity": 10.0, "avg_cost": 200.0 }),
        ))
        .await
        .unwrap();
    let merged = get_body_json(response).await;
    assert_eq!(merged["quantity"], 20.0);
    assert_eq!(merged["avg_cost"], 150.0);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/portfolio", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["total_value"], 3000.0);
    assert_eq!(json["positions"].as_array().unwrap().len(), 1);

    let response = app
        .oneshot(authed_request("DELETE", "/api/portfolio/INFY", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ========== Insights and Dashboard ==========

#[tokio::test]
async fn test_insights_summary_shape() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    app.clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/transactions/bulk",
            &token,
            serde_json::json!([
                { "amount": 50000.0, "category": "income" },
                { "amount": -2500.0, "category": "food" },
                { "amount": -1500.0, "category": "rent" }
            ]),
        ))
        .await
        .unwrap();

    // One active goal and one contributed to completion
    let target_date = (chrono::Utc::now() + chrono::Duration::days(90)).to_rfc3339();
    app.clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/goals",
            &token,
            serde_json::json!({
                "name": "Trip",
                "target_amount": 10000.0,
                "target_date": target_date
            }),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/goals",
            &token,
            serde_json::json!({
                "name": "Headphones",
                "target_amount": 1000.0,
                "target_date": target_date
            }),
        ))
        .await
        .unwrap();
    let done_id = get_body_json(response).await["id"].as_i64().unwrap();
    app.clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/goals/{}/contribute", done_id),
            &token,
            serde_json::json!({ "amount": 1000.0 }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(authed_request("GET", "/api/insights/summary", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["summary"]["total_income"], 50000.0);
    assert_eq!(json["summary"]["total_expenses"], 4000.0);
    assert_eq!(json["summary"]["current_balance"], 46000.0);
    assert_eq!(json["summary"]["savings_rate"], 92.0);

    // 92% savings rate scores the top insight band
    assert_eq!(json["insights"][0]["title"], "Excellent Savings");
    assert!(json["recommendations"].is_array());

    let by_category = json["expense_by_category"].as_array().unwrap();
    assert_eq!(by_category.len(), 2);
    // First-seen order
    assert_eq!(by_category[0]["name"], "food");
    assert_eq!(by_category[1]["name"], "rent");

    // Income breakdown is its own series
    let income = json["income_by_category"].as_array().unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0]["name"], "income");
    assert_eq!(income[0]["total"], 50000.0);

    // Counters see all goals, saved amounts include completed ones
    assert_eq!(json["goals"]["active"], 1);
    assert_eq!(json["goals"]["completed"], 1);
    assert_eq!(json["goals"]["total_saved"], 1000.0);
}

#[tokio::test]
async fn test_dashboard_empty_state() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    let response = app
        .oneshot(authed_request("GET", "/api/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["summary"]["total_income"], 0.0);
    assert_eq!(json["summary"]["savings_rate"], 0.0);
    // Base score with no data
    assert_eq!(json["summary"]["financial_health_score"], 5.0);
    assert!(json["recent_transactions"].as_array().unwrap().is_empty());
    assert!(json["goals"].as_array().unwrap().is_empty());
    assert_eq!(json["portfolio"]["total_value"], 0.0);
}

#[tokio::test]
async fn test_users_cannot_see_each_others_data() {
    let app = setup_test_app();
    let token = register_and_login(&app).await;

    app.clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/transactions",
            &token,
            serde_json::json!({ "amount": -250.0, "category": "food" }),
        ))
        .await
        .unwrap();

    // Second user
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "email": "other@example.com",
                "password": "s3cure-password",
                "full_name": "Other User"
            }),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/token",
            serde_json::json!({
                "email": "other@example.com",
                "password": "s3cure-password"
            }),
        ))
        .await
        .unwrap();
    let other_token = get_body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(authed_request("GET", "/api/transactions", &other_token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}
