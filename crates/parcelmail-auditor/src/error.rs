use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditorError>;

#[derive(Debug, Error)]
pub enum AuditorError {
    #[error(transparent)]
    Browser(#[from] parcelmail_browser::BrowserError),
}

impl AuditorError {
    /// Whether a fresh attempt at the whole extraction may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Browser(e) => e.is_transient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelmail_browser::BrowserError;

    #[test]
    fn test_browser_transience_passes_through() {
        let err = AuditorError::from(BrowserError::Interaction("stale".to_string()));
        assert!(err.is_transient());

        let err = AuditorError::from(BrowserError::NavigationError("dns".to_string()));
        assert!(!err.is_transient());
    }
}
