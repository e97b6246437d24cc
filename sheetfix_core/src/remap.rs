//! Column-shift correction.
//!
//! The source spreadsheet has every column from index 5 onward labelled one
//! position off: the "level" column holds the muscle group, the "category"
//! column holds the movement pattern, and the "pattern" column holds the
//! equipment. The remapper reassigns those cells to their real names and keeps
//! the pre-shift values as diagnostic fields for level inference.

use crate::RemappedRow;

// Stable positions
const ID: usize = 0;
const NAME: usize = 1;
const VARIANT: usize = 2;
const VARIANT_EXPLANATION: usize = 3;
const DURATION: usize = 4;

// Shifted positions: the header says level/category/pattern
const MUSCLE_GROUP: usize = 5;
const PATTERN: usize = 6;
const EQUIPMENT: usize = 7;

const TARGET_SETS_REPS: usize = 8;
const PROGRESS_CRITERION: usize = 9;
const PROGRESSION_FROM: usize = 10;
const PROGRESSION_TO: usize = 11;
const NOTES: usize = 12;

/// Number of source columns the remapper reads.
pub const SOURCE_WIDTH: usize = 13;

/// Bounds-checked cell access; positions past the end of the row read as "".
pub fn cell_or_default(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Remap one raw row onto the corrected schema.
///
/// Purely positional: never inspects cell contents and never fails.
pub fn remap_row(row: &[String]) -> RemappedRow {
    let cell = |index| cell_or_default(row, index).to_string();

    RemappedRow {
        exercise_id: cell(ID),
        name: cell(NAME),
        variant: cell(VARIANT),
        variant_explanation: cell(VARIANT_EXPLANATION),
        duration: cell(DURATION),

        muscle_group: cell(MUSCLE_GROUP),
        pattern_original: cell(PATTERN),
        equipment_original: cell(EQUIPMENT),

        category: cell(MUSCLE_GROUP),
        pattern: cell(PATTERN),
        equipment: cell(EQUIPMENT),

        target_sets_reps: cell(TARGET_SETS_REPS),
        progress_criterion: cell(PROGRESS_CRITERION),
        progression_from: cell(PROGRESSION_FROM),
        progression_to: cell(PROGRESSION_TO),
        notes: cell(NOTES),
    }
}

/// Warn when the header is narrower than the columns the remapper reads.
///
/// The header is informational only; a narrow header never aborts the run.
pub fn check_header(header: &[String]) {
    if header.len() < SOURCE_WIDTH {
        tracing::warn!(
            "Header has {} columns, expected at least {}; missing columns read as empty",
            header.len(),
            SOURCE_WIDTH
        );
    } else {
        tracing::debug!("Header columns: {:?}", header);
    }
}
