//! Output persistence.
//!
//! Serialization itself is pure and lives in
//! `jsonscrape_core::serialize`; this module only resolves the target
//! path, creates the parent directory, and writes the file. Writes are
//! not atomic: a failure can leave a created directory behind.

use std::fs;
use std::path::PathBuf;

use jsonscrape_core::serialize::OutputFormat;
use jsonscrape_core::settings::OutputConfig;
use jsonscrape_core::transform::OutputRecord;

use crate::error::Error;

/// Where and how the records were written.
#[derive(Debug, Clone)]
pub struct WrittenOutput {
    pub file_path: PathBuf,
    pub format: OutputFormat,
}

/// Serialize the record set and persist it.
///
/// The default target is `data/output.<format>` under the current
/// directory when the settings gave no file path.
pub fn write_output(records: &[OutputRecord], config: &OutputConfig) -> Result<WrittenOutput, Error> {
    let format = config.format;
    let file_path = config
        .file_path
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data").join(format!("output.{}", format.extension())));

    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Write(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
    }

    let content = format
        .serialize(records)
        .map_err(|e| Error::Write(format!("serialization failed: {e}")))?;

    fs::write(&file_path, content)
        .map_err(|e| Error::Write(format!("failed to write {}: {e}", file_path.display())))?;

    Ok(WrittenOutput { file_path, format })
}
