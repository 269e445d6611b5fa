//! Configuration management for parcelmail.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Defaults reproduce the Franklin County
//! portal endpoints and the timeouts the scrape was tuned against.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// Loaded from `~/.config/parcelmail/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser automation settings
    pub browser: BrowserSettings,
    /// Recorder portal (search results list) settings
    pub recorder: RecorderSettings,
    /// Auditor portal (parcel detail) settings
    pub auditor: AuditorSettings,
    /// Retry policy for transient browser faults
    pub retry: RetrySettings,
    /// Output file names and rotation targets
    pub export: ExportSettings,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PARCELMAIL_HEADLESS`: Override browser headless mode (true/false)
    /// - `PARCELMAIL_MAX_ATTEMPTS`: Override retry attempt count
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("PARCELMAIL_HEADLESS") {
            if let Ok(headless) = val.parse() {
                config.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("PARCELMAIL_MAX_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                config.retry.max_attempts = attempts;
                tracing::debug!("Override retry.max_attempts from env: {}", attempts);
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/parcelmail/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "parcelmail", "parcelmail").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 60,
        }
    }
}

/// Recorder portal settings: search endpoint, fixed query parameters and
/// the pagination timeouts.
///
/// The portal's server-side search can take minutes to render the results
/// table, hence the long `results_timeout_secs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderSettings {
    /// Search results endpoint
    pub base_url: String,
    /// `department` query parameter
    pub department: String,
    /// `limit` query parameter
    pub limit: u32,
    /// `offset` query parameter
    pub offset: u32,
    /// `searchOcrText` query parameter
    pub search_ocr_text: bool,
    /// `searchType` query parameter
    pub search_type: String,
    /// `searchValue` query parameter
    pub search_value: String,
    /// How long to probe for the "no results" marker, in seconds
    pub no_results_timeout_secs: u64,
    /// How long to wait for the results table and total count, in seconds
    pub results_timeout_secs: u64,
    /// How long to wait for a row's identifier cells, in seconds
    pub row_panel_timeout_secs: u64,
    /// How long to wait for the back control, in seconds
    pub back_timeout_secs: u64,
    /// How long to wait for the next-page control, in seconds
    pub next_timeout_secs: u64,
    /// Settle delay after opening a row, in milliseconds
    pub row_settle_ms: u64,
    /// Settle delay after back/next navigation, in milliseconds
    pub nav_settle_ms: u64,
    /// Pause after a stale/intercepted row click, in milliseconds
    pub stale_pause_ms: u64,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://franklin.oh.publicsearch.us/results".to_string(),
            department: "RP".to_string(),
            limit: 250,
            offset: 50,
            search_ocr_text: false,
            search_type: "quickSearch".to_string(),
            search_value: "ENVIRONMENTAL DIVISION".to_string(),
            no_results_timeout_secs: 30,
            results_timeout_secs: 300,
            row_panel_timeout_secs: 30,
            back_timeout_secs: 30,
            next_timeout_secs: 10,
            row_settle_ms: 3000,
            nav_settle_ms: 1000,
            stale_pause_ms: 2000,
        }
    }
}

/// Auditor portal settings: search page URL and the extraction timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditorSettings {
    /// Parcel-id search page
    pub search_url: String,
    /// How long to wait for the search form elements, in seconds
    pub form_timeout_secs: u64,
    /// How long to probe for the "no records" marker, in seconds
    pub no_records_timeout_secs: u64,
    /// How long to wait for the first result row, in seconds
    pub first_row_timeout_secs: u64,
    /// How long to wait for each labeled field row, in seconds
    pub field_timeout_secs: u64,
    /// Settle delay after search submit and in-page navigation, in milliseconds
    pub settle_ms: u64,
}

impl Default for AuditorSettings {
    fn default() -> Self {
        Self {
            search_url:
                "https://property.franklincountyauditor.com/_web/search/commonsearch.aspx?mode=parid"
                    .to_string(),
            form_timeout_secs: 60,
            no_records_timeout_secs: 11,
            first_row_timeout_secs: 5,
            field_timeout_secs: 10,
            settle_ms: 3000,
        }
    }
}

/// Retry policy settings for the two fragile call sites: browser launch and
/// per-token detail extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Maximum number of attempts before the error is re-raised
    pub max_attempts: u32,
    /// Fixed delay between attempts, in milliseconds
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 1000,
        }
    }
}

/// Output file names. Paths are relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Final owner workbook
    pub output_file: String,
    /// Backup name the previous workbook is rotated to
    pub previous_output_file: String,
    /// Intermediate parcel-token checkpoint
    pub tokens_file: String,
    /// Archive name the consumed token file is rotated to
    pub processed_tokens_file: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_file: "Output.xlsx".to_string(),
            previous_output_file: "Previous_output.xlsx".to_string(),
            tokens_file: "ParcelIDFile_Complete.csv".to_string(),
            processed_tokens_file: "ProcessedIDs.csv".to_string(),
        }
    }
}
