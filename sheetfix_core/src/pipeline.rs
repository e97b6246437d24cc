//! The batch pipeline: read → remap → infer → materialize → emit.
//!
//! Every stage returns a `Result` and nothing is retried. Both output files
//! are fully written and checked before either is committed, so a failure in
//! reading, writing or in a destination path never leaves a new CSV next to a
//! stale SQL script. Only a rename failing between the two commits can.

use crate::config::{Config, RulesConfig};
use crate::rules::{matching_rule, Vocabulary};
use crate::{csv_export, remap, sql_export, xlsx};
use crate::{ExerciseRecord, Level, RawRow, RemappedRow, Result};
use std::path::PathBuf;

/// Outcome of a completed run
#[derive(Debug)]
pub struct RunSummary {
    pub records: Vec<ExerciseRecord>,
    pub csv_path: PathBuf,
    pub sql_path: PathBuf,
}

/// Merge a remapped row and its inferred level into the final record.
/// Diagnostic fields are dropped here.
pub fn materialize(row: RemappedRow, level: Level, vocabulary: Vocabulary) -> ExerciseRecord {
    ExerciseRecord {
        exercise_id: row.exercise_id,
        name: row.name,
        level: vocabulary.level_label(level).to_string(),
        category: row.category,
        pattern: row.pattern,
        equipment: row.equipment,
        target_sets_reps: row.target_sets_reps,
        progress_criterion: row.progress_criterion,
        progression_from: row.progression_from,
        progression_to: row.progression_to,
        notes: row.notes,
        variant: row.variant,
        variant_explanation: row.variant_explanation,
        duration: row.duration,
    }
}

/// Turn raw rows into final records, preserving order.
pub fn process_rows(rows: &[RawRow], rules: &RulesConfig) -> Vec<ExerciseRecord> {
    let table = rules.active_table();

    rows.iter()
        .enumerate()
        .map(|(idx, raw)| {
            let remapped = remap::remap_row(raw);
            let rule = matching_rule(&remapped, table);
            tracing::debug!(
                "Row {} {:?}: {:?} -> {}",
                idx + 1,
                remapped.name,
                rule,
                rule.level()
            );
            materialize(remapped, rule.level(), rules.vocabulary)
        })
        .collect()
}

/// Read the configured workbook and produce the corrected records.
pub fn load_records(config: &Config) -> Result<Vec<ExerciseRecord>> {
    let sheet = xlsx::read_workbook(&config.paths.input)?;
    remap::check_header(&sheet.header);

    let records = process_rows(&sheet.rows, &config.rules);
    tracing::info!("Mapped {} exercises", records.len());
    Ok(records)
}

/// Run the whole pipeline and write both outputs.
pub fn run(config: &Config) -> Result<RunSummary> {
    let records = load_records(config)?;
    let generated_at = chrono::Local::now().naive_local();

    let csv = csv_export::stage_csv(&records, &config.paths.csv_output)?;
    let sql = sql_export::stage_sql(
        &records,
        &config.sql.table,
        generated_at,
        &config.paths.sql_output,
    )?;

    let csv_path = csv.commit()?;
    tracing::info!("Wrote {} records to {:?}", records.len(), csv_path);
    let sql_path = sql.commit()?;
    tracing::info!("Wrote {} INSERT statements to {:?}", records.len(), sql_path);

    Ok(RunSummary {
        records,
        csv_path,
        sql_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{source_row, write_workbook};
    use crate::ErrorKind;
    use std::path::Path;

    fn raw(cells: &[&str]) -> RawRow {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn english() -> RulesConfig {
        RulesConfig {
            vocabulary: Vocabulary::English,
            table: None,
        }
    }

    fn config_in(dir: &Path, vocabulary: Vocabulary) -> Config {
        let mut config = Config::default();
        config.paths.input = dir.join("catalog.xlsx");
        config.paths.csv_output = dir.join("out/catalog.csv");
        config.paths.sql_output = dir.join("out/seed.sql");
        config.rules.vocabulary = vocabulary;
        config
    }

    #[test]
    fn test_materialize_uses_vocabulary_label() {
        let row = remap::remap_row(&raw(&["HD-001", "Fondos", "", "", "", "Pecho"]));
        let record = materialize(row.clone(), Level::Advanced, Vocabulary::Spanish);
        assert_eq!(record.level, "Avanzado");
        assert_eq!(record.category, "Pecho");

        let record = materialize(row, Level::Advanced, Vocabulary::English);
        assert_eq!(record.level, "Advanced");
    }

    #[test]
    fn test_process_rows_full_width_rows_fill_every_field() {
        let rows = vec![raw(&[
            "HD-001", "Barbell Squat", "High bar", "Upright torso", "90s", "Legs", "Squat",
            "Barbell", "5x5", "Add 2.5kg", "Goblet Squat", "Front Squat", "Brace",
        ])];
        let records = process_rows(&rows, &english());

        let record = &records[0];
        assert!(record.values().iter().all(|v| !v.is_empty()));
        assert_eq!(record.level, "Intermediate");
        assert_eq!(record.category, "Legs");
        assert_eq!(record.pattern, "Squat");
        assert_eq!(record.equipment, "Barbell");
        assert_eq!(record.variant, "High bar");
        assert_eq!(record.duration, "90s");
        assert_eq!(record.notes, "Brace");
    }

    #[test]
    fn test_process_rows_preserves_order_and_labels() {
        let rows = vec![
            raw(&["1", "Cable Unilateral Row", "", "", "", "Back", "Pull", "Cable machine"]),
            raw(&["2", "Plank"]),
            raw(&["3", "Pause Bench", "", "", "", "Chest", "Push", "Bench"]),
        ];
        let records = process_rows(&rows, &english());

        let summary: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.exercise_id.as_str(), r.level.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("1", "Basic"), ("2", "Basic"), ("3", "Advanced")]
        );
    }

    #[test]
    fn test_nine_row_sheet_end_to_end() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let config = config_in(temp_dir.path(), Vocabulary::English);

        let mut rows = vec![vec![
            "id", "name", "variant", "variant_explanation", "time", "level", "category",
            "pattern", "equipment", "sets_reps", "progress", "from", "to",
        ]];
        rows.push(source_row("E1", "Leg Extension", "Legs", "Machine"));
        rows.push(source_row("E2", "Push-up", "Chest", "Bodyweight"));
        rows.push(source_row("E3", "Barbell Squat", "Legs", "Barbell"));
        rows.push(source_row("E4", "Incline Press", "Chest", "Dumbbell"));
        rows.push(source_row("E5", "Explosive Jump", "Legs", "None"));
        rows.push(source_row("E6", "Lateral Raise Superset", "Shoulders", "Plates"));
        rows.push(source_row("E7", "Cable Unilateral Row", "Back", "Cable machine"));
        rows.push(source_row("E8", "Plank", "Core", "Mat"));
        rows.push(source_row("E9", "Assisted Dip", "Triceps", "Station"));
        write_workbook(&config.paths.input, &rows);

        let summary = run(&config).unwrap();
        let levels: Vec<&str> = summary.records.iter().map(|r| r.level.as_str()).collect();
        assert_eq!(
            levels,
            vec![
                "Basic",
                "Basic",
                "Intermediate",
                "Intermediate",
                "Advanced",
                "Advanced",
                "Basic",
                "Basic",
                "Basic",
            ]
        );

        let third = &summary.records[2];
        assert_eq!(third.name, "Barbell Squat");
        assert_eq!(third.category, "Legs");
        assert_eq!(third.pattern, "Empuje");
        assert_eq!(third.equipment, "Barbell");

        let csv = std::fs::read_to_string(&summary.csv_path).unwrap();
        assert_eq!(csv.lines().count(), 10);
        let sql = std::fs::read_to_string(&summary.sql_path).unwrap();
        assert_eq!(sql.matches("INSERT INTO").count(), 9);
        assert!(sql.contains("'E3', 'Barbell Squat', 'Intermediate', 'Legs', 'Empuje', 'Barbell'"));
    }

    #[test]
    fn test_spanish_catalog_end_to_end() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = config_in(temp_dir.path(), Vocabulary::Spanish);

        write_workbook(
            &config.paths.input,
            &[
                vec!["id", "nombre"],
                source_row("HD-1", "Press banca", "Pecho", "Barra"),
                source_row("HD-2", "Curl en polea", "Bíceps", "Polea"),
                source_row("HD-3", "Remo unilateral", "Espalda", "Banco"),
            ],
        );

        let records = load_records(&config).unwrap();
        let levels: Vec<&str> = records.iter().map(|r| r.level.as_str()).collect();
        assert_eq!(levels, vec!["Intermedio", "Básico", "Avanzado"]);
    }

    #[test]
    fn test_bad_workbook_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = config_in(temp_dir.path(), Vocabulary::Spanish);
        std::fs::write(&config.paths.input, "not a workbook").unwrap();

        let err = run(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(!config.paths.csv_output.exists());
        assert!(!config.paths.sql_output.exists());
    }

    #[test]
    fn test_unwritable_sql_leaves_csv_uncommitted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = config_in(temp_dir.path(), Vocabulary::Spanish);
        write_workbook(
            &config.paths.input,
            &[vec!["id"], source_row("HD-1", "Fondos", "Pecho", "Paralelas")],
        );

        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        config.paths.sql_output = blocker.join("seed.sql");

        let err = run(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!config.paths.csv_output.exists());
    }

    #[test]
    fn test_sql_destination_directory_leaves_csv_uncommitted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = config_in(temp_dir.path(), Vocabulary::Spanish);
        write_workbook(
            &config.paths.input,
            &[vec!["id"], source_row("HD-1", "Fondos", "Pecho", "Paralelas")],
        );

        let sql_dir = temp_dir.path().join("out/seed.sql");
        std::fs::create_dir_all(&sql_dir).unwrap();
        std::fs::write(sql_dir.join("old.sql"), "SELECT 1;").unwrap();
        config.paths.sql_output = sql_dir.clone();

        let err = run(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("seed.sql"));
        assert!(!config.paths.csv_output.exists());
        assert_eq!(std::fs::read_dir(temp_dir.path().join("out")).unwrap().count(), 1);
    }
}
