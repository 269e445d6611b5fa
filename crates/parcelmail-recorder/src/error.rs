use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecorderError>;

/// Pagination itself is best-effort and never raises; the only fallible
/// recorder operation is building the search URL.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("invalid search url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let parse_err = url::Url::parse("not a url").expect_err("should fail to parse");
        let err = RecorderError::from(parse_err);
        assert!(err.to_string().starts_with("invalid search url:"));
    }
}
