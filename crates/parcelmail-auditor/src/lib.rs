//! Auditor portal scraping: submit one parcel id through the search form
//! and assemble the ownership detail record from the datalet pages.

pub mod error;
pub mod extractor;
pub mod fields;

pub use error::{AuditorError, Result};
pub use extractor::RecordDetailExtractor;
