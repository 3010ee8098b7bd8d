//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod goals;
pub mod insights;
pub mod portfolio;
pub mod transactions;

// Re-export all handlers for use in router
pub use auth::*;
pub use chat::*;
pub use dashboard::*;
pub use goals::*;
pub use insights::*;
pub use portfolio::*;
pub use transactions::*;
