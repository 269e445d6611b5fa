//! Recorder portal scraping: build the date-windowed search URL, then walk
//! the paginated results list collecting parcel tokens row by row.

pub mod error;
pub mod paginator;
pub mod url_builder;

pub use error::{RecorderError, Result};
pub use paginator::ResultListPaginator;
pub use url_builder::build_search_url;
