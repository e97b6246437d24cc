//! Core domain types for the exercise catalog pipeline.
//!
//! This module defines the records that flow through the pipeline:
//! - Raw spreadsheet rows
//! - Remapped rows (corrected fields plus diagnostic fields)
//! - Difficulty levels
//! - Final exercise records and their output column order

use std::fmt;

/// One spreadsheet row, positionally indexed. Blank cells are empty strings.
pub type RawRow = Vec<String>;

// ============================================================================
// Output Schema
// ============================================================================

/// Output column identifiers, in the order used by both the CSV and the SQL
/// script. These are the column names of the target database table.
pub const COLUMNS: [&str; 14] = [
    "exercise_id",
    "nombre",
    "nivel",
    "categoria",
    "patron",
    "equipamiento",
    "series_reps_objetivo",
    "criterio_de_progreso",
    "progresion_desde",
    "progresion_hacia",
    "notas",
    "variante",
    "explicacion_variante",
    "tiempo",
];

/// Name of the level column, used by the SQL verification query.
pub const LEVEL_COLUMN: &str = COLUMNS[2];

// ============================================================================
// Level
// ============================================================================

/// Difficulty classification inferred for every exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    Basic,
    Intermediate,
    Advanced,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Basic => "Basic",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Remapped Row
// ============================================================================

/// A raw row after column-shift correction, before a level is assigned.
///
/// Carries the corrected fields that end up in the output as well as the
/// diagnostic copies of the pre-shift cells that drive level inference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemappedRow {
    pub exercise_id: String,
    pub name: String,
    pub variant: String,
    pub variant_explanation: String,
    pub duration: String,

    /// Source "level" column, which actually holds the muscle group
    pub muscle_group: String,
    /// Source "category" column, which actually holds the movement pattern
    pub pattern_original: String,
    /// Source "pattern" column, which actually holds the equipment
    pub equipment_original: String,

    pub category: String,
    pub pattern: String,
    pub equipment: String,

    pub target_sets_reps: String,
    pub progress_criterion: String,
    pub progression_from: String,
    pub progression_to: String,
    pub notes: String,
}

// ============================================================================
// Exercise Record
// ============================================================================

/// A fully corrected exercise, ready for the emitters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExerciseRecord {
    pub exercise_id: String,
    pub name: String,
    pub level: String,
    pub category: String,
    pub pattern: String,
    pub equipment: String,
    pub target_sets_reps: String,
    pub progress_criterion: String,
    pub progression_from: String,
    pub progression_to: String,
    pub notes: String,
    pub variant: String,
    pub variant_explanation: String,
    pub duration: String,
}

impl ExerciseRecord {
    /// Field values in [`COLUMNS`] order.
    pub fn values(&self) -> [&str; 14] {
        [
            self.exercise_id.as_str(),
            self.name.as_str(),
            self.level.as_str(),
            self.category.as_str(),
            self.pattern.as_str(),
            self.equipment.as_str(),
            self.target_sets_reps.as_str(),
            self.progress_criterion.as_str(),
            self.progression_from.as_str(),
            self.progression_to.as_str(),
            self.notes.as_str(),
            self.variant.as_str(),
            self.variant_explanation.as_str(),
            self.duration.as_str(),
        ]
    }
}
