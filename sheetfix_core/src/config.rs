//! Configuration file support for sheetfix.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/sheetfix/config.toml`
//! unless an explicit path is given. Every section is optional.

use crate::rules::{RuleTable, Vocabulary};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub sql: SqlConfig,

    #[serde(default)]
    pub rules: RulesConfig,
}

/// Input and output locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_csv_output")]
    pub csv_output: PathBuf,

    #[serde(default = "default_sql_output")]
    pub sql_output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            csv_output: default_csv_output(),
            sql_output: default_sql_output(),
        }
    }
}

/// SQL script generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SqlConfig {
    /// Fully qualified target table, quoted as it should appear in the script
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
        }
    }
}

/// Level inference keywords
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct RulesConfig {
    #[serde(default)]
    pub vocabulary: Vocabulary,

    /// Replaces the vocabulary's built-in keyword table when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<RuleTable>,
}

impl RulesConfig {
    /// The keyword table in effect
    pub fn active_table(&self) -> &RuleTable {
        self.table
            .as_ref()
            .unwrap_or_else(|| self.vocabulary.rule_table())
    }
}

// Default value functions
fn default_input() -> PathBuf {
    PathBuf::from("Ejercicios_Heavy_duty.xlsx")
}

fn default_csv_output() -> PathBuf {
    PathBuf::from("Ejercicios_Heavy_Duty_CORREGIDO.csv")
}

fn default_sql_output() -> PathBuf {
    PathBuf::from("insert-heavy-duty-exercises.sql")
}

fn default_table() -> String {
    r#"app."Ejercicios_Heavy_Duty""#.to_string()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            config_path => {
                tracing::debug!(
                    "No config file found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("sheetfix").join("config.toml"))
    }

    /// Reject settings that would produce a broken script or match everything
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.sql.table.trim().is_empty() {
            errors.push("sql.table must not be empty".to_string());
        }
        if let Some(table) = &self.rules.table {
            errors.extend(table.validate());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(errors.join("; ")))
        }
    }
}
