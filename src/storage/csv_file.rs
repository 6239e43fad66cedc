use std::path::Path;

use crate::error::{Error, Result};
use crate::models::CommentRecord;

/// Writes annotated comments as UTF-8 CSV.
pub struct CsvWriter;

impl CsvWriter {
    /// Header first, then one row per record. The file is written in one
    /// pass; nothing reaches disk if serialization fails part way.
    pub fn write<P: AsRef<Path>>(path: P, rows: &[CommentRecord]) -> Result<()> {
        let bytes = Self::to_bytes(rows)?;
        std::fs::write(path.as_ref(), bytes)?;
        tracing::info!("Wrote {} row(s) to {}", rows.len(), path.as_ref().display());
        Ok(())
    }

    pub fn to_bytes(rows: &[CommentRecord]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CommentRecord::HEADER)?;
        for row in rows {
            writer.write_record(row.to_row())?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}
