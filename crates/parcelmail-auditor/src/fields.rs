//! Label-to-value field lookups on the auditor's datalet tables.
//!
//! Most fields live in rows shaped `<tr><td>Label</td><td
//! class="DataletData">value</td></tr>`; a few (dwelling data) have no
//! stable labels and are read by cell position instead.

use crate::error::Result;
use parcelmail_browser::{Lookup, PageActions};
use std::time::Duration;

/// XPath for the data cell of a row whose label cell contains `label`.
pub fn labeled_xpath(label: &str) -> String {
    format!(r#"//tr[td[contains(text(), "{label}")]]/td[@class="DataletData"]"#)
}

/// Keep the part after the first ":", trimmed. Used for heading cells
/// shaped `PARID: 010-054321-00`.
pub fn value_after_colon(text: &str) -> String {
    match text.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    }
}

/// Reads individual fields off the current page, mapping absence to an
/// empty string.
pub struct FieldExtractor<'a, P: PageActions + ?Sized> {
    page: &'a P,
    timeout: Duration,
}

impl<'a, P: PageActions + ?Sized> FieldExtractor<'a, P> {
    pub fn new(page: &'a P, timeout: Duration) -> Self {
        Self { page, timeout }
    }

    /// Value of the labeled row, or empty when the row never renders.
    pub async fn labeled(&self, label: &str) -> Result<String> {
        self.at(&labeled_xpath(label)).await
    }

    /// Text at a fixed XPath, or empty when the element never renders.
    pub async fn at(&self, xpath: &str) -> Result<String> {
        match self.page.wait_for(xpath, self.timeout).await? {
            Lookup::Found(()) => Ok(self.page.text(xpath).await?.text_or_empty()),
            Lookup::NotFound => {
                tracing::debug!("field at {xpath} not found");
                Ok(String::new())
            }
        }
    }
}
