//! # Configuration File Parser
//!
//! Reads and parses `tabgen.toml`, the declarative description of the tables
//! to generate. Supports:
//!
//! - `[generate]`: default seed, strict mode and output directory
//! - `[[inputs]]`: CSV files loaded as reference tables (never written out)
//! - `[[tables]]`: tables to generate, each with a row `count` (0 = infer)
//! - `[[tables.columns]]`: `type = "gen"` template columns or `type = "const"`
//!   literal value lists
//!
//! Example `tabgen.toml`:
//!
//! ```toml
//! [generate]
//! seed = 42
//! output_dir = "csvs"
//!
//! [[inputs]]
//! name = "significant_event"
//! path = "significant_dates.csv"
//!
//! [[tables]]
//! name = "person"
//! count = 100
//!
//! [[tables.columns]]
//! name = "id"
//! type = "gen"
//! value = "${uuid}"
//!
//! [[tables.columns]]
//! name = "full_name"
//! type = "gen"
//! value = "${first_name} ${last_name}"
//! null_percentage = 10
//!
//! [[tables.columns]]
//! name = "born"
//! type = "gen"
//! value = "${date}"
//! format = "%d/%m/%Y"
//!
//! [[tables]]
//! name = "significant_event"
//!
//! [[tables.columns]]
//! name = "host"
//! type = "gen"
//! value = "${company}"
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, TabgenError};
use crate::generate::plan::{ColumnSpec, GenRule, TableSpec};
use crate::registry::is_file_safe_name;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "tabgen.toml";

/// Top-level tabgen.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TabgenConfig {
    /// Default generation settings.
    pub generate: GenerateConfig,
    /// Reference CSV files, loaded before any table is generated.
    pub inputs: Vec<InputConfig>,
    /// Tables to generate, in declaration order.
    pub tables: Vec<TableConfig>,

    /// Absolute path to the directory containing tabgen.toml.
    ///
    /// Populated by `read_config()` so that relative input paths resolve
    /// against the config file's location, not the CWD.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Fixed random seed for deterministic generation.
    pub seed: Option<u64>,
    /// Treat unknown placeholders and uninferable row counts as errors.
    pub strict: Option<bool>,
    /// Directory the CSV files are written to.
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Table name the file's columns are registered under.
    pub name: String,
    /// CSV file with a header row.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    pub name: String,
    /// Rows to generate; 0 (the default) sizes the table from its existing
    /// columns.
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnConfig {
    /// Template column: placeholders are replaced per row.
    Gen {
        name: String,
        value: String,
        #[serde(default)]
        null_percentage: u8,
        #[serde(default)]
        format: String,
    },
    /// Literal values, committed as-is.
    Const { name: String, values: Vec<String> },
}

impl ColumnConfig {
    pub fn name(&self) -> &str {
        match self {
            ColumnConfig::Gen { name, .. } | ColumnConfig::Const { name, .. } => name,
        }
    }

    pub fn column_spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.name())
    }

    /// The generation rule of a `gen` column.
    pub fn gen_rule(&self) -> Option<GenRule> {
        match self {
            ColumnConfig::Gen {
                value,
                null_percentage,
                format,
                ..
            } => Some(
                GenRule::new(value.clone())
                    .with_null_percentage(*null_percentage)
                    .with_format(format.clone()),
            ),
            ColumnConfig::Const { .. } => None,
        }
    }
}

impl TableConfig {
    pub fn table_spec(&self) -> TableSpec {
        TableSpec::new(self.name.clone(), self.count)
    }
}

/// Read, parse and validate a tabgen.toml file.
pub fn read_config(path: &Path) -> Result<TabgenConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TabgenError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let mut config = parse_config(&content).map_err(|e| match e {
        TabgenError::Config { message } => TabgenError::Config {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })?;

    // Capture the absolute path to the config directory so that relative
    // input paths resolve against the config's location, not CWD.
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    config.config_dir = Some(std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));

    Ok(config)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<TabgenConfig> {
    let config: TabgenConfig = toml::from_str(content).map_err(|e| TabgenError::Config {
        message: format!("Failed to parse config: {}", e),
    })?;
    config.validate()?;
    Ok(config)
}

impl TabgenConfig {
    /// Resolve an input path against the config file's directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        match &self.config_dir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p.to_path_buf(),
        }
    }

    /// Validate semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        let mut seen_inputs = BTreeSet::new();
        for input in &self.inputs {
            if input.name.trim().is_empty() {
                return Err(config_error(format!(
                    "Input '{}' has an empty name",
                    input.path
                )));
            }
            if !is_file_safe_name(&input.name) {
                return Err(config_error(format!(
                    "Input name '{}' must be a plain name without path separators or '..'",
                    input.name
                )));
            }
            if !seen_inputs.insert(input.name.as_str()) {
                return Err(config_error(format!(
                    "Input '{}' is declared more than once",
                    input.name
                )));
            }
        }

        let mut seen_tables = BTreeSet::new();
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(config_error("A table has an empty name".to_string()));
            }
            if !is_file_safe_name(&table.name) {
                return Err(config_error(format!(
                    "Table name '{}' must be a plain name without path separators or '..'",
                    table.name
                )));
            }
            if !seen_tables.insert(table.name.as_str()) {
                return Err(config_error(format!(
                    "Table '{}' is declared more than once. \
                     Put all of its columns under a single [[tables]] entry.",
                    table.name
                )));
            }

            for column in &table.columns {
                if column.name().trim().is_empty() {
                    return Err(config_error(format!(
                        "Table '{}' has a column with an empty name",
                        table.name
                    )));
                }
                match column {
                    ColumnConfig::Gen {
                        null_percentage, ..
                    } if *null_percentage > 100 => {
                        return Err(config_error(format!(
                            "Column '{}.{}': null_percentage is {} but must be between 0 and 100",
                            table.name,
                            column.name(),
                            null_percentage
                        )));
                    }
                    ColumnConfig::Const { values, .. } if values.is_empty() => {
                        return Err(config_error(format!(
                            "Column '{}.{}': const column has no values",
                            table.name,
                            column.name()
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}

fn config_error(message: String) -> TabgenError {
    TabgenError::Config { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[generate]
seed = 42
strict = true
output_dir = "out"

[[inputs]]
name = "events"
path = "events.csv"

[[tables]]
name = "person"
count = 100

[[tables.columns]]
name = "id"
type = "gen"
value = "${uuid}"

[[tables.columns]]
name = "full_name"
type = "gen"
value = "${first_name} ${last_name}"
null_percentage = 10
format = "%s"

[[tables.columns]]
name = "sex"
type = "const"
values = ["M", "F"]

[[tables]]
name = "events"

[[tables.columns]]
name = "host"
type = "gen"
value = "${company}"
"#;

        let config = parse_config(toml).unwrap();

        assert_eq!(config.generate.seed, Some(42));
        assert_eq!(config.generate.strict, Some(true));
        assert_eq!(config.generate.output_dir.as_deref(), Some("out"));
        assert_eq!(config.inputs.len(), 1);
        assert_eq!(config.inputs[0].name, "events");

        assert_eq!(config.tables.len(), 2);
        let person = &config.tables[0];
        assert_eq!(person.table_spec(), TableSpec::new("person", 100));
        assert_eq!(person.columns.len(), 3);
        assert_eq!(
            person.columns[1].gen_rule(),
            Some(
                GenRule::new("${first_name} ${last_name}")
                    .with_null_percentage(10)
                    .with_format("%s")
            )
        );
        assert_eq!(
            person.columns[2],
            ColumnConfig::Const {
                name: "sex".into(),
                values: vec!["M".into(), "F".into()],
            }
        );
        assert_eq!(person.columns[2].gen_rule(), None);

        assert_eq!(config.tables[1].count, 0, "count defaults to inference");
        assert_eq!(config.column_count(), 4);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.generate.seed.is_none());
        assert!(config.inputs.is_empty());
        assert!(config.tables.is_empty());
    }

    #[test]
    fn test_gen_defaults() {
        let toml = r#"
[[tables]]
name = "t"
count = 1

[[tables.columns]]
name = "c"
type = "gen"
value = "x"
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.tables[0].columns[0].gen_rule(), Some(GenRule::new("x")));
    }

    #[test]
    fn test_unknown_column_type_fails() {
        let toml = r#"
[[tables]]
name = "t"

[[tables.columns]]
name = "c"
type = "wat"
"#;
        assert!(parse_config(toml).is_err());
    }

    #[test]
    fn test_validate_null_percentage_range() {
        let toml = r#"
[[tables]]
name = "t"
count = 1

[[tables.columns]]
name = "c"
type = "gen"
value = "x"
null_percentage = 101
"#;
        let msg = parse_config(toml).unwrap_err().to_string();
        assert!(msg.contains("t.c"), "Error should name the column: {}", msg);
        assert!(msg.contains("101"), "Error should mention the value: {}", msg);
    }

    #[test]
    fn test_validate_duplicate_table_fails() {
        let toml = r#"
[[tables]]
name = "t"

[[tables]]
name = "t"
"#;
        let msg = parse_config(toml).unwrap_err().to_string();
        assert!(msg.contains("more than once"), "{}", msg);
    }

    #[test]
    fn test_validate_duplicate_input_fails() {
        let toml = r#"
[[inputs]]
name = "a"
path = "a.csv"

[[inputs]]
name = "a"
path = "b.csv"
"#;
        assert!(parse_config(toml).is_err());
    }

    #[test]
    fn test_validate_rejects_path_like_names() {
        for name in ["../x", "a/b", "a\\\\b", ".."] {
            let toml = format!("[[tables]]\nname = \"{}\"\n", name);
            let msg = parse_config(&toml).unwrap_err().to_string();
            assert!(msg.contains("plain name"), "{}: {}", name, msg);
        }

        let toml = r#"
[[inputs]]
name = "../events"
path = "events.csv"
"#;
        let msg = parse_config(toml).unwrap_err().to_string();
        assert!(msg.contains("plain name"), "{}", msg);
    }

    #[test]
    fn test_validate_empty_const_fails() {
        let toml = r#"
[[tables]]
name = "t"

[[tables.columns]]
name = "c"
type = "const"
values = []
"#;
        let msg = parse_config(toml).unwrap_err().to_string();
        assert!(msg.contains("no values"), "{}", msg);
    }

    #[test]
    fn test_read_config_missing_file() {
        let result = read_config(Path::new("/nonexistent/dir/tabgen.toml"));
        assert!(matches!(result, Err(TabgenError::Config { .. })));
    }

    #[test]
    fn test_read_config_from_disk_captures_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            r#"
[[inputs]]
name = "events"
path = "data/events.csv"
"#,
        )
        .unwrap();

        let config = read_config(&config_path).unwrap();

        // canonicalize expected path too; macOS symlinks /var → /private/var
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(config.config_dir.as_deref(), Some(expected.as_path()));
        assert_eq!(
            config.resolve_path("data/events.csv"),
            expected.join("data/events.csv")
        );
        assert_eq!(
            config.resolve_path("/abs/events.csv"),
            PathBuf::from("/abs/events.csv")
        );
    }

    #[test]
    fn test_read_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "this is not valid [[[toml").unwrap();

        let msg = read_config(&config_path).unwrap_err().to_string();
        assert!(msg.contains(CONFIG_FILE_NAME), "{}", msg);
    }
}
