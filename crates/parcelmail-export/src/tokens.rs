//! Intermediate parcel-token checkpoint file.
//!
//! Tokens collected during pagination are persisted once per run, then
//! re-read before detail extraction so a crash between the two phases
//! keeps the collected set.

use crate::error::Result;
use parcelmail_core::ParcelId;
use std::path::Path;

/// Single-column header of the token file.
const TOKEN_HEADER: &str = "Pin IDs";

/// Write deduplicated tokens to `path`, one per row.
pub fn write_tokens(path: &Path, tokens: &[ParcelId]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([TOKEN_HEADER])?;
    for token in tokens {
        writer.write_record([token.as_str()])?;
    }
    writer.flush()?;
    tracing::info!(count = tokens.len(), "wrote token checkpoint to {}", path.display());
    Ok(())
}

/// Read raw token strings back from `path`.
///
/// Rows come back unfiltered; callers re-run deduplication before use.
pub fn read_tokens(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut tokens = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(value) = row.get(0) {
            tokens.push(value.to_string());
        }
    }
    tracing::debug!(count = tokens.len(), "read tokens from {}", path.display());
    Ok(tokens)
}
