//! Output side of the pipeline: flatten detail records to one row per
//! owner, checkpoint parcel tokens to CSV, rotate prior outputs and
//! write the final XLSX workbook.

pub mod error;
pub mod flatten;
pub mod names;
pub mod rotate;
pub mod tokens;
pub mod workbook;

pub use error::{ExportError, Result};
pub use flatten::{flatten, FlatOwnerRow};
pub use names::{split_contact_address, split_full_name, NameParts};
pub use rotate::rotate_outputs;
pub use tokens::{read_tokens, write_tokens};
pub use workbook::{write_workbook, COLUMNS};
