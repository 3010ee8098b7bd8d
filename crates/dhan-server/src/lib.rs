//! Dhan Web Server
//!
//! Axum-based REST API for the Dhan personal finance application.
//!
//! Security features:
//! - Bearer token authentication (HS256 JWT, per-user scoping on every query)
//! - Restrictive CORS policy
//! - Input validation (pagination limits, positive-amount checks)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use dhan_core::ai::{AiClient, CoachBackend};
use dhan_core::db::Database;
use dhan_core::models::User;

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "DHAN_JWT_SECRET";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Secret for signing and validating bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Build configuration from the environment
    ///
    /// Requires `DHAN_JWT_SECRET`; a missing secret would silently invalidate
    /// every issued token on restart, so it is an error rather than a default.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var(JWT_SECRET_ENV)
            .map_err(|_| anyhow::anyhow!("{} environment variable is required", JWT_SECRET_ENV))?;
        Ok(Self {
            jwt_secret,
            token_ttl_hours: 24,
            allowed_origins: vec![],
        })
    }

    /// Fixed-secret configuration for tests
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 24,
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub ai: AiClient,
}

/// The authenticated user, inserted as a request extension by the auth middleware
#[derive(Clone)]
pub struct AuthUser(pub User);

/// Bearer token claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID
    sub: i64,
    /// Expiry (unix seconds)
    exp: i64,
}

/// Issue a bearer token for a user
pub(crate) fn issue_token(config: &ServerConfig, user_id: i64) -> Result<String, AppError> {
    let exp = chrono::Utc::now() + chrono::Duration::hours(config.token_ttl_hours);
    let claims = Claims {
        sub: user_id,
        exp: exp.timestamp(),
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(&format!("Failed to issue token: {}", e)))
}

/// Authentication middleware - validates the bearer token and loads the user
///
/// The token's `sub` claim names the user; the user row must still exist.
/// Every protected handler reads the user from the `AuthUser` extension, so
/// a request can never act on another user's data.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "));

    let token = match token {
        Some(t) => t,
        None => {
            warn!(path = %request.uri().path(), "Unauthorized request - missing bearer token");
            return unauthorized_response();
        }
    };

    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &jsonwebtoken::Validation::default(),
    );

    let claims = match token_data {
        Ok(data) => data.claims,
        Err(e) => {
            warn!(path = %request.uri().path(), error = %e, "Unauthorized request - invalid token");
            return unauthorized_response();
        }
    };

    let user = match state.db.get_user(claims.sub) {
        Ok(user) => user,
        Err(e) => {
            warn!(user_id = claims.sub, error = %e, "Token references unknown user");
            return unauthorized_response();
        }
    };

    request.extensions_mut().insert(AuthUser(user));
    next.run(request).await
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Health check response
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let db_ok = state.db.conn().is_ok();
    Json(serde_json::json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "coach_model": state.ai.model(),
    }))
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig, ai: AiClient) -> Router {
    info!(
        "Coach backend: {} (model: {})",
        ai.host(),
        ai.model()
    );

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        ai,
    });

    // Routes reachable without a token
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/token", post(handlers::login));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        // Auth
        .route("/api/auth/me", get(handlers::get_me))
        // Transactions
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/api/transactions/bulk", post(handlers::bulk_import))
        .route(
            "/api/transactions/:id",
            get(handlers::get_transaction).delete(handlers::delete_transaction),
        )
        // Goals
        .route(
            "/api/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route(
            "/api/goals/:id",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route("/api/goals/:id/contribute", post(handlers::contribute))
        // Coach chat
        .route("/api/chat/history", get(handlers::chat_history))
        .route("/api/chat/send", post(handlers::chat_send))
        .route(
            "/api/chat/clear",
            axum::routing::delete(handlers::chat_clear),
        )
        // Portfolio
        .route(
            "/api/portfolio",
            get(handlers::get_portfolio).post(handlers::add_holding),
        )
        .route(
            "/api/portfolio/:symbol",
            axum::routing::delete(handlers::delete_holding),
        )
        // Dashboard and insights
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/insights/summary", get(handlers::insights_summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    let ai = AiClient::from_env();
    if ai.health_check().await {
        info!("Coach backend responding: {}", ai.host());
    } else {
        warn!("Coach backend not responding: {}", ai.host());
    }

    let app = create_router(db, config, ai);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error to its HTTP shape
    ///
    /// Validation and lookup failures keep their message; everything else is
    /// sanitized to a generic 500 and logged.
    pub fn from_core(err: dhan_core::Error) -> Self {
        match err {
            dhan_core::Error::NotFound(msg) => Self::not_found(&msg),
            dhan_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            dhan_core::Error::Auth(msg) => Self::unauthorized(&msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(other.into()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<dhan_core::Error> for AppError {
    fn from(err: dhan_core::Error) -> Self {
        Self::from_core(err)
    }
}

#[cfg(test)]
mod tests;
