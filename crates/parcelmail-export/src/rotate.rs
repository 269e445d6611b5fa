//! Rotation of prior run outputs before a new workbook is written.

use crate::error::Result;
use parcelmail_core::ExportSettings;
use std::fs;
use std::path::Path;

/// Rotate last run's files in `dir`.
///
/// The previous backup workbook is deleted, the existing workbook (if
/// any) becomes the backup, and the consumed token file replaces the
/// processed-token archive.
pub fn rotate_outputs(dir: &Path, settings: &ExportSettings) -> Result<()> {
    let output = dir.join(&settings.output_file);
    let previous = dir.join(&settings.previous_output_file);
    let tokens = dir.join(&settings.tokens_file);
    let processed = dir.join(&settings.processed_tokens_file);

    if previous.exists() {
        fs::remove_file(&previous)?;
        tracing::info!("removed stale backup {}", previous.display());
    }

    if output.exists() {
        fs::rename(&output, &previous)?;
        tracing::info!(
            "rotated {} to {}",
            output.display(),
            previous.display()
        );

        if processed.exists() {
            fs::remove_file(&processed)?;
        }
        if tokens.exists() {
            fs::rename(&tokens, &processed)?;
            tracing::info!("archived token file as {}", processed.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_rotates_nothing() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let settings = ExportSettings::default();

        rotate_outputs(tmp.path(), &settings).expect("rotate");
        assert!(!tmp.path().join(&settings.previous_output_file).exists());
    }

    #[test]
    fn test_existing_output_becomes_backup() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let settings = ExportSettings::default();

        fs::write(tmp.path().join(&settings.output_file), b"old workbook").expect("seed output");
        fs::write(tmp.path().join(&settings.tokens_file), b"Pin IDs\n123\n").expect("seed tokens");

        rotate_outputs(tmp.path(), &settings).expect("rotate");

        assert!(!tmp.path().join(&settings.output_file).exists());
        assert!(!tmp.path().join(&settings.tokens_file).exists());
        let backup =
            fs::read(tmp.path().join(&settings.previous_output_file)).expect("read backup");
        assert_eq!(backup, b"old workbook");
        let archived =
            fs::read(tmp.path().join(&settings.processed_tokens_file)).expect("read archive");
        assert_eq!(archived, b"Pin IDs\n123\n");
    }

    #[test]
    fn test_older_archives_are_overwritten() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let settings = ExportSettings::default();

        fs::write(tmp.path().join(&settings.output_file), b"new").expect("seed output");
        fs::write(tmp.path().join(&settings.previous_output_file), b"ancient")
            .expect("seed backup");
        fs::write(tmp.path().join(&settings.tokens_file), b"fresh tokens").expect("seed tokens");
        fs::write(tmp.path().join(&settings.processed_tokens_file), b"stale tokens")
            .expect("seed archive");

        rotate_outputs(tmp.path(), &settings).expect("rotate");

        let backup =
            fs::read(tmp.path().join(&settings.previous_output_file)).expect("read backup");
        assert_eq!(backup, b"new");
        let archived =
            fs::read(tmp.path().join(&settings.processed_tokens_file)).expect("read archive");
        assert_eq!(archived, b"fresh tokens");
    }
}
