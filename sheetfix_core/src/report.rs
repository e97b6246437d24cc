//! Distribution statistics for a corrected catalog.

use crate::ExerciseRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// How many values the category and equipment breakdowns show
pub const TOP_N: usize = 10;

/// One value and how many records carry it
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Count {
    pub value: String,
    pub count: usize,
}

/// Frequency counts by level, category and equipment
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Report {
    pub total: usize,
    /// Every level, alphabetical
    pub by_level: Vec<Count>,
    /// Most frequent categories (muscle groups), at most [`TOP_N`]
    pub by_category: Vec<Count>,
    /// Most frequent equipment, at most [`TOP_N`]
    pub by_equipment: Vec<Count>,
}

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

fn into_counts(counts: BTreeMap<&str, usize>) -> Vec<Count> {
    counts
        .into_iter()
        .map(|(value, count)| Count {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// Descending by count; ties keep alphabetical order
fn top(counts: BTreeMap<&str, usize>, n: usize) -> Vec<Count> {
    let mut counts = into_counts(counts);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

impl Report {
    pub fn from_records(records: &[ExerciseRecord]) -> Self {
        Self {
            total: records.len(),
            by_level: into_counts(tally(records.iter().map(|r| r.level.as_str()))),
            by_category: top(tally(records.iter().map(|r| r.category.as_str())), TOP_N),
            by_equipment: top(tally(records.iter().map(|r| r.equipment.as_str())), TOP_N),
        }
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, title: &str, counts: &[Count]) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}:", title)?;
    for count in counts {
        let value = if count.value.is_empty() {
            "(empty)"
        } else {
            count.value.as_str()
        };
        writeln!(f, "  • {}: {} exercises", value, count.count)?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "CORRECTED EXERCISE STATISTICS ({} exercises)", self.total)?;
        writeln!(f, "{}", "=".repeat(80))?;
        write_counts(f, "By level", &self.by_level)?;
        write_counts(f, &format!("By muscle group (top {})", TOP_N), &self.by_category)?;
        write_counts(f, &format!("By equipment (top {})", TOP_N), &self.by_equipment)?;
        writeln!(f)?;
        write!(f, "{}", "=".repeat(80))
    }
}
