//! SQL seeding script.
//!
//! The script is static text for an external client: a header comment, one
//! INSERT per record inside a single transaction, and two verification
//! queries. Nothing here talks to a database.

use crate::output::StagedFile;
use crate::{ExerciseRecord, Result, COLUMNS, LEVEL_COLUMN};
use chrono::NaiveDateTime;
use std::io::Write;
use std::path::Path;

const RULE: &str =
    "-- ============================================================================";

/// SQL literal for a value: quotes doubled, empty strings become NULL.
pub fn sql_literal(value: &str) -> String {
    if value.is_empty() {
        "NULL".to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// Keep a value on one comment line
fn comment_text(value: &str) -> String {
    if value.is_empty() {
        return "(unnamed)".to_string();
    }
    value.replace(['\r', '\n'], " ")
}

fn column_list() -> String {
    COLUMNS
        .chunks(5)
        .map(|chunk| format!("  {}", chunk.join(", ")))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Write the full script for `records` targeting `table`
pub fn write_script<W: Write + ?Sized>(
    out: &mut W,
    records: &[ExerciseRecord],
    table: &str,
    generated_at: NaiveDateTime,
) -> Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "-- INSERT EXERCISE CATALOG - CORRECTED")?;
    writeln!(out, "-- Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "-- Total exercises: {}", records.len())?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;

    writeln!(out, "BEGIN;")?;
    writeln!(out)?;
    writeln!(out, "-- Uncomment to clear the existing table first:")?;
    writeln!(out, "-- DELETE FROM {};", table)?;
    writeln!(out)?;

    let columns = column_list();
    for (idx, record) in records.iter().enumerate() {
        let values: Vec<String> = record.values().iter().map(|v| sql_literal(v)).collect();

        writeln!(out, "-- Exercise {}: {}", idx + 1, comment_text(&record.name))?;
        writeln!(out, "INSERT INTO {} (", table)?;
        writeln!(out, "{}", columns)?;
        writeln!(out, ") VALUES (")?;
        writeln!(out, "  {}", values.join(", "))?;
        writeln!(out, ");")?;
        writeln!(out)?;
    }

    writeln!(out, "COMMIT;")?;
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "-- VERIFICATION")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "SELECT COUNT(*) AS total_exercises FROM {};", table)?;
    writeln!(
        out,
        "SELECT {col}, COUNT(*) AS total FROM {table} GROUP BY {col};",
        col = LEVEL_COLUMN,
        table = table
    )?;
    Ok(())
}

/// Write the script to a temporary file next to `path` without replacing it yet
pub fn stage_sql(
    records: &[ExerciseRecord],
    table: &str,
    generated_at: NaiveDateTime,
    path: &Path,
) -> Result<StagedFile> {
    StagedFile::write(path, |out| write_script(out, records, table, generated_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const TABLE: &str = r#"app."Ejercicios_Heavy_Duty""#;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn render_sql(records: &[ExerciseRecord], table: &str, generated_at: NaiveDateTime) -> String {
        let mut buf = Vec::new();
        write_script(&mut buf, records, table, generated_at).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn record(name: &str) -> ExerciseRecord {
        ExerciseRecord {
            exercise_id: "HD-042".into(),
            name: name.into(),
            level: "Intermedio".into(),
            category: "Pecho".into(),
            equipment: "Barra".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sql_literal_escaping() {
        assert_eq!(sql_literal("O'Brien Press"), "'O''Brien Press'");
        assert_eq!(sql_literal("''"), "''''''");
        assert_eq!(sql_literal(""), "NULL");
        assert_eq!(sql_literal(" "), "' '");
        assert_eq!(sql_literal("Línea 1\nLínea \"2\""), "'Línea 1\nLínea \"2\"'");
    }

    #[test]
    fn test_script_structure() {
        let sql = render_sql(&[record("Press banca"), record("Fondos")], TABLE, generated_at());

        assert!(sql.contains("-- Generated: 2025-03-14 09:30:00\n"));
        assert!(sql.contains("-- Total exercises: 2\n"));

        let begin = sql.find("BEGIN;").unwrap();
        let first = sql.find("-- Exercise 1: Press banca").unwrap();
        let second = sql.find("-- Exercise 2: Fondos").unwrap();
        let commit = sql.find("COMMIT;").unwrap();
        let count = sql.find("SELECT COUNT(*) AS total_exercises").unwrap();
        assert!(begin < first && first < second && second < commit && commit < count);

        assert_eq!(sql.matches("INSERT INTO app.\"Ejercicios_Heavy_Duty\" (").count(), 2);
        assert!(sql.contains(
            "SELECT nivel, COUNT(*) AS total FROM app.\"Ejercicios_Heavy_Duty\" GROUP BY nivel;"
        ));
        assert!(sql.contains("-- DELETE FROM app.\"Ejercicios_Heavy_Duty\";"));
    }

    #[test]
    fn test_insert_lists_every_column_in_order() {
        let sql = render_sql(&[record("Press banca")], TABLE, generated_at());
        let list = column_list();
        assert!(sql.contains(&list));

        let flattened: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        assert_eq!(flattened, COLUMNS);
    }

    #[test]
    fn test_values_escaped_and_nulled() {
        let sql = render_sql(&[record("O'Brien Press")], TABLE, generated_at());
        assert!(sql.contains(
            "  'HD-042', 'O''Brien Press', 'Intermedio', 'Pecho', NULL, 'Barra', \
             NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL\n"
        ));
        assert!(!sql.contains("''Pecho"));
        assert!(!sql.contains(", ''"));
    }

    #[test]
    fn test_multiline_name_stays_in_comment() {
        let sql = render_sql(&[record("Remo\nPendlay")], TABLE, generated_at());
        assert!(sql.contains("-- Exercise 1: Remo Pendlay\n"));
        assert!(sql.contains("'Remo\nPendlay'"));
    }

    #[test]
    fn test_empty_catalog_still_commits() {
        let sql = render_sql(&[], TABLE, generated_at());
        assert!(sql.contains("-- Total exercises: 0"));
        assert!(sql.contains("BEGIN;"));
        assert!(sql.contains("COMMIT;"));
        assert!(!sql.contains("INSERT INTO"));
    }

    #[test]
    fn test_stage_sql_to_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("seed.sql");

        stage_sql(&[record("Dominadas")], "exercises", generated_at(), &path)
            .unwrap()
            .commit()
            .unwrap();

        let sql = std::fs::read_to_string(&path).unwrap();
        assert!(sql.contains("INSERT INTO exercises ("));
        assert!(sql.ends_with("GROUP BY nivel;\n"));
    }
}
