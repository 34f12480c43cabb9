//! Configuration loading and typed config structures for the dashboard.
//!
//! Every value has a compiled-in default, so the server runs with no
//! configuration at all. An optional `dashboard-config.yaml` in the
//! working directory can override any key, and a small set of
//! environment variables override the bind address on top of that.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "dashboard-config.yaml";

/// Environment variable overriding [`ServerSettings::host`].
pub const HOST_ENV: &str = "DASHBOARD_HOST";

/// Environment variable overriding [`ServerSettings::port`].
pub const PORT_ENV: &str = "DASHBOARD_PORT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidEnv {
        /// The variable name.
        name: &'static str,
        /// The raw value found in the environment.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Bind address.
    #[serde(default)]
    pub server: ServerSettings,

    /// Filesystem locations.
    #[serde(default)]
    pub paths: PathSettings,

    /// File naming and listing limits.
    #[serde(default)]
    pub inventory: InventorySettings,

    /// Browser launch behaviour.
    #[serde(default)]
    pub launcher: LauncherSettings,

    /// Startup diagnostics behaviour.
    #[serde(default)]
    pub startup: StartupSettings,
}

impl DashboardConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load the file at `path` if it exists (defaults otherwise), then
    /// apply overrides from the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `DASHBOARD_HOST` / `DASHBOARD_PORT` overrides using `lookup`
    /// to resolve variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_owned();
        }
        if let Some(raw) = lookup(PORT_ENV) {
            self.server.port = raw
                .trim()
                .parse()
                .map_err(|_parse| ConfigError::InvalidEnv {
                    name: PORT_ENV,
                    value: raw.clone(),
                })?;
        }
        Ok(())
    }

    /// URL of the dashboard page, e.g. `http://localhost:8000/index.html`.
    pub fn dashboard_url(&self) -> String {
        format!(
            "http://{}:{}/index.html",
            self.server.host, self.server.port
        )
    }

    /// Dashboard URL with the launcher query string appended.
    pub fn launch_url(&self) -> String {
        let base = self.dashboard_url();
        if self.launcher.query.is_empty() {
            base
        } else {
            format!("{base}?{}", self.launcher.query)
        }
    }
}

/// Host and port the server binds to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host name or address (resolved at bind time).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 8000,
        }
    }
}

impl ServerSettings {
    /// `host:port` form used in log lines and error messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Directories the server reads from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Root of static file serving.
    pub static_root: PathBuf,
    /// Directory holding `<prefix>_<YYYY>_<MM>.json` files.
    pub data_dir: PathBuf,
    /// Directory holding slideshow images.
    pub images_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            static_root: PathBuf::from("."),
            data_dir: PathBuf::from("data"),
            images_dir: PathBuf::from("images"),
        }
    }
}

/// Naming convention and listing limits for the file inventory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    /// Prefix of monthly data files.
    pub file_prefix: String,
    /// Maximum number of images returned by `/api/images`.
    pub max_images: usize,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            file_prefix: String::from("jamaah_times"),
            max_images: 20,
        }
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// Whether to open a browser once the server is listening.
    pub enabled: bool,
    /// Delay before launching, in milliseconds.
    pub delay_ms: u64,
    /// Query string appended to the dashboard URL (without `?`).
    pub query: String,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 2000,
            query: String::from("tv=1"),
        }
    }
}

/// Startup diagnostics settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StartupSettings {
    /// Pause after warning that no valid data file exists, in milliseconds.
    pub fallback_pause_ms: u64,
}

impl Default for StartupSettings {
    fn default() -> Self {
        Self {
            fallback_pause_ms: 3000,
        }
    }
}
