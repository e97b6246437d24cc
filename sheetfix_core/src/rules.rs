//! Rule-based level inference.
//!
//! Rules are evaluated in a fixed priority order and the first match wins:
//! 1. Machine or pulley/cable equipment → Basic
//! 2. Bodyweight or assisted exercises → Basic
//! 3. Barbell compound lifts (press, squat, deadlift, row) → Intermediate
//! 4. Dumbbell equipment → Intermediate
//! 5. Advanced variants (unilateral, explosive, deficit, pause, chain, band) → Advanced
//! 6. Intensity techniques (superset, drop set, rest-pause) → Advanced
//! 7. Isolation muscle group on a machine → Basic
//! 8. Anything else → Basic
//!
//! Matching is a case-insensitive substring test on the diagnostic equipment
//! text and the exercise name. The keywords themselves live in a [`RuleTable`]
//! so a catalog written in another language only needs a different table.

use crate::{Level, RemappedRow};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static SPANISH_TABLE: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    basic_equipment: words(&["máquina", "polea"]),
    basic_name: words(&["peso corporal", "asistid"]),
    barbell_equipment: words(&["barra"]),
    compound_name: words(&["press", "sentadilla", "peso muerto", "remo"]),
    dumbbell_equipment: words(&["mancuerna"]),
    advanced_name: words(&["unilateral", "explosiv", "deficit", "pausa", "cadena", "band"]),
    intensity_name: words(&["superserie", "drop", "rest-pause"]),
    isolation_groups: words(&["bíceps", "tríceps", "gemelos"]),
    isolation_equipment: words(&["máquina"]),
});

static ENGLISH_TABLE: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    basic_equipment: words(&["machine", "pulley", "cable"]),
    basic_name: words(&["bodyweight", "assist"]),
    barbell_equipment: words(&["barbell"]),
    compound_name: words(&["press", "squat", "deadlift", "row"]),
    dumbbell_equipment: words(&["dumbbell"]),
    advanced_name: words(&["unilateral", "explosive", "deficit", "pause", "chain", "band"]),
    intensity_name: words(&["superset", "drop", "rest-pause"]),
    isolation_groups: words(&["biceps", "triceps", "calves"]),
    isolation_equipment: words(&["machine"]),
});

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

// ============================================================================
// Vocabulary
// ============================================================================

/// Language of the catalog: selects the built-in keyword table and the
/// labels written for each level.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    #[default]
    Spanish,
    English,
}

impl Vocabulary {
    /// Built-in keyword table for this vocabulary
    pub fn rule_table(self) -> &'static RuleTable {
        match self {
            Vocabulary::Spanish => &SPANISH_TABLE,
            Vocabulary::English => &ENGLISH_TABLE,
        }
    }

    /// Label written to the outputs for a level
    pub fn level_label(self, level: Level) -> &'static str {
        match (self, level) {
            (Vocabulary::Spanish, Level::Basic) => "Básico",
            (Vocabulary::Spanish, Level::Intermediate) => "Intermedio",
            (Vocabulary::Spanish, Level::Advanced) => "Avanzado",
            (Vocabulary::English, Level::Basic) => "Basic",
            (Vocabulary::English, Level::Intermediate) => "Intermediate",
            (Vocabulary::English, Level::Advanced) => "Advanced",
        }
    }
}

impl FromStr for Vocabulary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spanish" | "es" => Ok(Vocabulary::Spanish),
            "english" | "en" => Ok(Vocabulary::English),
            other => Err(format!(
                "unknown vocabulary '{}', expected 'spanish' or 'english'",
                other
            )),
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vocabulary::Spanish => f.write_str("spanish"),
            Vocabulary::English => f.write_str("english"),
        }
    }
}

// ============================================================================
// Rule Table
// ============================================================================

/// Keyword lists driving each inference rule.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleTable {
    /// Rule 1: equipment keywords for machines and pulleys
    pub basic_equipment: Vec<String>,
    /// Rule 2: name keywords for bodyweight and assisted exercises
    pub basic_name: Vec<String>,
    /// Rule 3: equipment keywords for a free barbell
    pub barbell_equipment: Vec<String>,
    /// Rule 3: name keywords for compound lifts
    pub compound_name: Vec<String>,
    /// Rule 4: equipment keywords for dumbbells
    pub dumbbell_equipment: Vec<String>,
    /// Rule 5: name keywords for advanced variants
    pub advanced_name: Vec<String>,
    /// Rule 6: name keywords for intensity techniques
    pub intensity_name: Vec<String>,
    /// Rule 7: muscle groups considered isolation work (whole-value match)
    pub isolation_groups: Vec<String>,
    /// Rule 7: equipment keywords paired with the isolation groups
    pub isolation_equipment: Vec<String>,
}

impl RuleTable {
    /// Every keyword list with the field name it came from.
    pub fn lists(&self) -> [(&'static str, &[String]); 9] {
        [
            ("basic_equipment", self.basic_equipment.as_slice()),
            ("basic_name", self.basic_name.as_slice()),
            ("barbell_equipment", self.barbell_equipment.as_slice()),
            ("compound_name", self.compound_name.as_slice()),
            ("dumbbell_equipment", self.dumbbell_equipment.as_slice()),
            ("advanced_name", self.advanced_name.as_slice()),
            ("intensity_name", self.intensity_name.as_slice()),
            ("isolation_groups", self.isolation_groups.as_slice()),
            ("isolation_equipment", self.isolation_equipment.as_slice()),
        ]
    }

    /// Returns a list of validation errors (empty keywords match everything)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (list, keywords) in self.lists() {
            if keywords.iter().any(|k| k.trim().is_empty()) {
                errors.push(format!("rules.table.{} contains an empty keyword", list));
            }
        }
        errors
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (list, keywords) in self.lists() {
            writeln!(f, "  {:<20} {}", list, keywords.join(", "))?;
        }
        Ok(())
    }
}

// ============================================================================
// Inference
// ============================================================================

/// The rule that decided a record's level, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    MachineOrPulley,
    BodyweightOrAssisted,
    BarbellCompound,
    Dumbbell,
    AdvancedVariant,
    IntensityTechnique,
    IsolationMachine,
    Default,
}

impl Rule {
    pub fn level(self) -> Level {
        match self {
            Rule::MachineOrPulley
            | Rule::BodyweightOrAssisted
            | Rule::IsolationMachine
            | Rule::Default => Level::Basic,
            Rule::BarbellCompound | Rule::Dumbbell => Level::Intermediate,
            Rule::AdvancedVariant | Rule::IntensityTechnique => Level::Advanced,
        }
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| haystack.contains(k.to_lowercase().as_str()))
}

/// Find the first rule that matches a remapped row.
pub fn matching_rule(row: &RemappedRow, table: &RuleTable) -> Rule {
    let name = row.name.to_lowercase();
    let equipment = row.equipment_original.to_lowercase();
    let muscle_group = row.muscle_group.trim().to_lowercase();

    if contains_any(&equipment, &table.basic_equipment) {
        return Rule::MachineOrPulley;
    }

    if contains_any(&name, &table.basic_name) {
        return Rule::BodyweightOrAssisted;
    }

    if contains_any(&equipment, &table.barbell_equipment)
        && contains_any(&name, &table.compound_name)
    {
        return Rule::BarbellCompound;
    }

    if contains_any(&equipment, &table.dumbbell_equipment) {
        return Rule::Dumbbell;
    }

    if contains_any(&name, &table.advanced_name) {
        return Rule::AdvancedVariant;
    }

    if contains_any(&name, &table.intensity_name) {
        return Rule::IntensityTechnique;
    }

    let isolation_group = table
        .isolation_groups
        .iter()
        .any(|g| g.to_lowercase() == muscle_group);
    if isolation_group && contains_any(&equipment, &table.isolation_equipment) {
        return Rule::IsolationMachine;
    }

    Rule::Default
}

/// Infer the difficulty level of a remapped row.
pub fn infer_level(row: &RemappedRow, table: &RuleTable) -> Level {
    matching_rule(row, table).level()
}
