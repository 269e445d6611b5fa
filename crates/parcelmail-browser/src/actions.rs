use crate::error::Result;
use std::time::Duration;

/// Outcome of looking something up on the page.
///
/// "The element never appeared" is a normal branch for callers, not a
/// failure, so it is never conflated with a thrown error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The element (or value) was located.
    Found(T),
    /// The element never appeared within the bounded wait.
    NotFound,
}

impl<T> Lookup<T> {
    /// Whether the lookup located anything.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Convert into an `Option`.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl Lookup<String> {
    /// Located text, or an empty string for structural absence.
    pub fn text_or_empty(self) -> String {
        self.found().unwrap_or_default()
    }
}

/// Page operations for driving a record portal.
///
/// All locators are XPath expressions. Implemented by [`crate::BrowserSession`]
/// against a live page and by mock DOMs in the recorder/auditor tests.
#[async_trait::async_trait]
pub trait PageActions: Send + Sync {
    /// Load a URL. Makes no readiness guarantee; callers wait for the
    /// specific elements they need.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Poll for element presence up to `timeout`. Expiry is reported as
    /// `Lookup::NotFound`, never as an error.
    async fn wait_for(&self, xpath: &str, timeout: Duration) -> Result<Lookup<()>>;

    /// Number of elements currently matching `xpath`.
    async fn count(&self, xpath: &str) -> Result<usize>;

    /// Text content of the first matching element.
    async fn text(&self, xpath: &str) -> Result<Lookup<String>>;

    /// Text content of every matching element, in document order.
    async fn text_all(&self, xpath: &str) -> Result<Vec<String>>;

    /// Attribute value of the first matching element. `NotFound` covers
    /// both a missing element and a missing attribute.
    async fn attr(&self, xpath: &str, name: &str) -> Result<Lookup<String>>;

    /// Click the first matching element.
    async fn click(&self, xpath: &str) -> Result<()>;

    /// Click the matching element at `index` (fresh lookup, zero-based).
    async fn click_nth(&self, xpath: &str, index: usize) -> Result<()>;

    /// Type a value into the first matching input.
    async fn fill(&self, xpath: &str, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_found() {
        let lookup = Lookup::Found("hello".to_string());
        assert!(lookup.is_found());
        assert_eq!(lookup.text_or_empty(), "hello");
    }

    #[test]
    fn test_lookup_not_found_is_empty() {
        let lookup: Lookup<String> = Lookup::NotFound;
        assert!(!lookup.is_found());
        assert_eq!(lookup.text_or_empty(), "");
    }

    #[test]
    fn test_lookup_into_option() {
        assert_eq!(Lookup::Found(3).found(), Some(3));
        assert_eq!(Lookup::<u32>::NotFound.found(), None);
    }
}
