//! Dhan Core Library
//!
//! Shared functionality for the Dhan personal finance backend:
//! - Database access and migrations (SQLCipher-encrypted SQLite)
//! - Derived metrics engine (health score, savings rate, goal projections)
//! - Insight and recommendation generation
//! - Pluggable local AI backends for the money coach (Ollama, llama.cpp, etc.)
//! - Password hashing for user accounts

pub mod advice;
pub mod ai;
pub mod auth;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;

pub use advice::{generate_insights, generate_recommendations, Insight, Recommendation};
pub use ai::{AiClient, CoachBackend, CoachContext, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use db::{Database, TransactionQuery};
pub use error::{Error, Result};
pub use metrics::{
    aggregate_by_category, aggregate_by_month, aggregate_by_necessity, compute_summary,
    BucketTotal, GoalView, MonthTotal, MonthlySeries, Sign, Summary,
};
