//! Shared application state for the dashboard server.
//!
//! [`AppState`] holds no mutable data: handlers re-read the filesystem
//! through the [`Inventory`] on every request, so no locking is needed
//! regardless of how many connections are served concurrently.

use std::path::{Path, PathBuf};

use crate::config::DashboardConfig;
use crate::inventory::Inventory;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// File inventory over the data and images directories.
    pub inventory: Inventory,
    /// Root directory of static file serving.
    pub static_root: PathBuf,
}

impl AppState {
    /// Create state from an inventory and a static root.
    pub fn new(inventory: Inventory, static_root: impl Into<PathBuf>) -> Self {
        Self {
            inventory,
            static_root: static_root.into(),
        }
    }

    /// Create state from a dashboard configuration.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            Inventory::from_config(config),
            config.paths.static_root.clone(),
        )
    }

    /// Root directory of static file serving.
    pub fn static_root(&self) -> &Path {
        &self.static_root
    }
}
