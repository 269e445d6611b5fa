//! Final XLSX workbook export.

use crate::error::Result;
use crate::flatten::FlatOwnerRow;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Output column headers, in order. Labels are fixed by the downstream
/// mailing-list consumers of the workbook.
pub const COLUMNS: [&str; 30] = [
    "parcel",
    "full name",
    "first_name",
    "last_name",
    "property_address",
    "property_city",
    "property_state",
    "property_zip_code",
    "description",
    "mailing_address",
    "mailing_city",
    "mailing_state",
    "mailing_zip",
    "owner_name",
    "owner_business",
    "title",
    "address_1",
    "address_2",
    "rental_city",
    "rental_state",
    "rental_zipcode",
    "phone",
    "email",
    "bedroom",
    "bathroom",
    "Tot Fin Area",
    "year built",
    "Property Class",
    "Transfer Date",
    "Transfer Price",
];

/// Write owner rows to an XLSX workbook at `path`, header row first.
pub fn write_workbook(path: &Path, rows: &[FlatOwnerRow]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in row.values().iter().enumerate() {
            worksheet.write_string(r, col as u16, *value)?;
        }
    }

    workbook.save(path)?;
    tracing::info!(rows = rows.len(), "wrote workbook to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_written_to_disk() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("Output.xlsx");

        let row = FlatOwnerRow {
            parcel: "010-054321-00".to_string(),
            full_name: "SMITH JOHN".to_string(),
            ..FlatOwnerRow::default()
        };
        write_workbook(&path, &[row]).expect("write workbook");

        let meta = std::fs::metadata(&path).expect("stat workbook");
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_empty_export_still_writes_header() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("Output.xlsx");

        write_workbook(&path, &[]).expect("write workbook");
        assert!(path.exists());
    }
}
