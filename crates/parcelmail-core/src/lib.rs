//! Parcelmail Core - Foundation crate for the parcelmail scraper.
//!
//! This crate provides the shared types, error handling, configuration
//! management and retry policy that the other parcelmail crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared domain types (`ParcelId`, `DetailRecord`)
//! - [`window`] - Calendar-month date windowing for scoping searches
//! - [`retry`] - Bounded retry policy for transient browser faults

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod retry;
pub mod types;
pub mod window;

// Re-export commonly used types
pub use config::{
    AppConfig, AuditorSettings, BrowserSettings, ExportSettings, RecorderSettings, RetrySettings,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use retry::RetryPolicy;
pub use types::{dedup_tokens, DetailRecord, ParcelId};
pub use window::{month_windows, parse_input_date, DateWindow};
