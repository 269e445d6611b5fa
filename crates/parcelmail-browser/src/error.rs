use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("browser launch failed: {0}")]
    LaunchError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("page interaction failed: {0}")]
    Interaction(String),

    #[error("script evaluation failed: {0}")]
    ScriptError(String),
}

impl BrowserError {
    /// Whether this failure is expected to resolve itself on a plain retry.
    ///
    /// Covers the intercepted-click/stale-element family plus launch
    /// hiccups; everything else fails fast.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Interaction(_) | Self::LaunchError(_)
        )
    }
}
