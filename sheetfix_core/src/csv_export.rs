//! Corrected catalog as CSV.
//!
//! One header line with the database column names, then one line per record
//! in the same column order. Quoting follows RFC 4180 via the `csv` crate.

use crate::output::StagedFile;
use crate::{ExerciseRecord, Result, COLUMNS};
use std::io::Write;
use std::path::Path;

/// Serialize records to any writer
pub fn write_records<W: Write>(records: &[ExerciseRecord], out: W) -> Result<()> {
    // Header is written by hand so an empty catalog still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.values())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the CSV to a temporary file next to `path` without replacing it yet
pub fn stage_csv(records: &[ExerciseRecord], path: &Path) -> Result<StagedFile> {
    StagedFile::write(path, |out| write_records(records, out))
}
