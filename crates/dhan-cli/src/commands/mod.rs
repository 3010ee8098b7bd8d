//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, register) and shared utilities (open_db)
//! - `import` - Transaction import from JSON dumps
//! - `serve` - Web server command
//! - `status` - Status and summary commands

pub mod core;
pub mod import;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use import::*;
pub use serve::*;
pub use status::*;
