//! Browser automation session for the county record portals.
//!
//! Provides a single headless Chromium session driven over CDP, with
//! XPath-based page operations behind the [`PageActions`] trait so the
//! pagination and extraction state machines can run against mock DOMs
//! in tests.

pub mod actions;
pub mod error;
pub mod session;

pub use actions::{Lookup, PageActions};
pub use error::{BrowserError, Result};
pub use session::BrowserSession;
