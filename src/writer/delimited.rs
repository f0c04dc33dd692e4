use csv::WriterBuilder;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::parser::Restaurant;
use crate::schema::canonical_columns;

/// Delimiter of the internal sink artifact
pub const SINK_DELIMITER: u8 = b',';
/// Delimiter of the user-facing export
pub const EXPORT_DELIMITER: u8 = b';';

/// Serialize records with a header row, even when there are no records
pub fn write_records<W: Write>(writer: W, records: &[Restaurant], delimiter: u8) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(canonical_columns()).map_err(PipelineError::Write)?;
    for record in records {
        wtr.serialize(record).map_err(PipelineError::Write)?;
    }
    wtr.flush().map_err(PipelineError::sink)?;
    Ok(())
}

/// Render the table as delimited text
pub fn to_delimited_string(records: &[Restaurant], delimiter: u8) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_records(&mut buf, records, delimiter)?;

    Ok(match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    })
}

/// Write the artifact, replacing any previous one.
///
/// The file is written next to the target and renamed over it, so readers
/// see either the old artifact or the complete new one.
pub fn write_delimited(path: &Path, records: &[Restaurant], delimiter: u8) -> Result<PathBuf> {
    ensure_parent(path)?;
    let tmp = temp_sibling(path);

    let written = write_file(&tmp, records, delimiter)
        .and_then(|_| fs::rename(&tmp, path).map_err(PipelineError::sink));

    if let Err(e) = written {
        fs::remove_file(&tmp).ok();
        return Err(e);
    }

    info!(path = ?path, rows = records.len(), "Wrote artifact");
    Ok(path.to_path_buf())
}

fn write_file(path: &Path, records: &[Restaurant], delimiter: u8) -> Result<()> {
    let file = File::create(path).map_err(PipelineError::sink)?;
    let mut out = BufWriter::new(file);
    write_records(&mut out, records, delimiter)?;
    out.flush().map_err(PipelineError::sink)?;
    Ok(())
}

/// Create the parent directory of `path` when it has one
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!(dir = ?parent, "Creating output directory");
            fs::create_dir_all(parent).map_err(PipelineError::sink)?;
        }
    }
    Ok(())
}

/// Hidden temporary file in the same directory as `path`
pub fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}
