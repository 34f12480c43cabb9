//! Startup diagnostics for the dashboard server.
//!
//! [`run_diagnostics`] inspects the data and images directories once
//! before the server binds and reports what the dashboard will have to
//! work with. Nothing here aborts startup; a dashboard with no data
//! falls back to its built-in defaults on the client side.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::inventory::{ImageEntry, Inventory};

/// What the startup scan found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    /// Data files that passed validation.
    pub valid_files: BTreeSet<String>,
    /// Whether the current month's file exists. `None` when the check was
    /// skipped because no valid file was found.
    pub current_month_present: Option<bool>,
    /// Images available to the slideshow.
    pub images: Vec<ImageEntry>,
}

impl StartupReport {
    /// Whether the dashboard will have to use fallback data.
    pub fn needs_fallback_data(&self) -> bool {
        self.valid_files.is_empty()
    }
}

/// Validate data files, check the current month, list images and make
/// sure the images directory exists. Every finding is logged.
pub fn run_diagnostics(inventory: &Inventory) -> StartupReport {
    info!(dir = %inventory.data_dir().display(), "Checking data files");
    let valid_files = inventory.validate_data_files();

    let current_month_present = if valid_files.is_empty() {
        warn!(
            dir = %inventory.data_dir().display(),
            expected = %inventory.current_month_file_name(),
            "No valid prayer data files found; the dashboard will use fallback data. \
             Add files named <prefix>_YYYY_MM.json to the data directory"
        );
        None
    } else {
        let file = inventory.current_month_file_name();
        let present = inventory.current_month_file_exists();
        if present {
            info!(%file, "Current month data found");
        } else {
            warn!(%file, "Current month data not found, the nearest available file will be used");
        }
        Some(present)
    };

    let images = inventory.list_images();
    if images.is_empty() {
        warn!(
            dir = %inventory.images_dir().display(),
            "No images found; the slideshow will use default images"
        );
    } else {
        info!(count = images.len(), "Slideshow images found");
    }

    if let Err(e) = inventory.ensure_images_dir() {
        warn!(dir = %inventory.images_dir().display(), error = %e, "Failed to create images directory");
    }

    StartupReport {
        valid_files,
        current_month_present,
        images,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_workspace_needs_fallback() {
        let root = TempDir::new().unwrap();
        let inventory = Inventory::new(root.path().join("data"), root.path().join("images"));

        let report = run_diagnostics(&inventory);
        assert!(report.needs_fallback_data());
        assert_eq!(report.current_month_present, None);
        assert!(report.images.is_empty());
        assert!(root.path().join("images").is_dir());
    }

    #[test]
    fn valid_data_triggers_current_month_check() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");
        let images = root.path().join("images");
        fs::create_dir(&data).unwrap();
        fs::create_dir(&images).unwrap();
        fs::write(data.join("jamaah_times_2000_01.json"), r#"{"prayer_times": []}"#).unwrap();
        fs::write(images.join("dome.png"), "").unwrap();

        let inventory = Inventory::new(&data, &images);
        let report = run_diagnostics(&inventory);
        assert!(!report.needs_fallback_data());
        assert_eq!(report.current_month_present, Some(false));
        assert_eq!(report.images.len(), 1);

        fs::write(data.join(inventory.current_month_file_name()), "{}").unwrap();
        assert_eq!(run_diagnostics(&inventory).current_month_present, Some(true));
    }
}
