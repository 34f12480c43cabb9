//! Local prayer-times dashboard server.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Read-only JSON endpoints** listing slideshow images
//!   (`/api/images`) and prayer-time data files (`/api/data-status`), and
//!   serving one data file verbatim (`/api/data/{name}`)
//! - **Static file serving** for the dashboard page and its assets,
//!   rooted at the configured static root
//! - **Permissive CORS** headers on every response
//!
//! # Architecture
//!
//! There is no in-memory cache. Every request re-reads the filesystem
//! through the [`Inventory`], so handlers share only immutable state and
//! need no locking. Inventory failures (missing directories, malformed
//! JSON) degrade to empty or partial results and are logged; only bind
//! failures are fatal.

pub mod config;
pub mod error;
pub mod handlers;
pub mod inventory;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use config::{ConfigError, DashboardConfig};
pub use inventory::Inventory;
pub use router::build_router;
pub use server::ServerError;
pub use state::AppState;
