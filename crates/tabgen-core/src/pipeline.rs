//! # Generation Pipeline
//!
//! Runs a parsed `tabgen.toml` against a [`TableRegistry`]: every `[[inputs]]`
//! file is loaded first, then each table's columns are produced in declaration
//! order. Column order matters, since a table with `count = 0` is sized from
//! the columns committed before it.

use rand::Rng;
use tracing::info;

use crate::config::{ColumnConfig, TabgenConfig};
use crate::error::Result;
use crate::generate::engine::ColumnGenerator;
use crate::input;
use crate::registry::TableRegistry;

/// Called after each column with `(table, column, columns_done, columns_total)`.
pub type ProgressCallback<'p> = &'p dyn Fn(&str, &str, usize, usize);

pub struct Pipeline<'a> {
    config: &'a TabgenConfig,
    generator: ColumnGenerator<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a TabgenConfig, generator: ColumnGenerator<'a>) -> Self {
        Self { config, generator }
    }

    /// Load inputs and generate every configured column into `registry`.
    pub fn run<R: Rng>(
        &self,
        registry: &mut TableRegistry,
        rng: &mut R,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<()> {
        self.load_inputs(registry)?;

        let total = self.config.column_count();
        let mut done = 0usize;

        for table in &self.config.tables {
            let table_spec = table.table_spec();
            for column in &table.columns {
                if let ColumnConfig::Const { name, values } = column {
                    registry.add_output_column(&table.name, name, values.clone());
                } else if let Some(rule) = column.gen_rule() {
                    self.generator.generate_column(
                        &table_spec,
                        &column.column_spec(),
                        &rule,
                        registry,
                        rng,
                    )?;
                }

                done += 1;
                if let Some(cb) = progress {
                    cb(&table.name, column.name(), done, total);
                }
            }

            info!(
                table = %table.name,
                rows = registry.longest_column_len(&table.name),
                columns = table.columns.len(),
                "generated table"
            );
        }

        Ok(())
    }

    fn load_inputs(&self, registry: &mut TableRegistry) -> Result<()> {
        for input in &self.config.inputs {
            let path = self.config.resolve_path(&input.path);
            input::load_input(registry, &input.name, &path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::generate::replacements::Replacements;
    use crate::generate::value::Value;
    use crate::TabgenError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    fn fixed_replacements() -> Replacements {
        let mut r = Replacements::new();
        r.insert("${first_name}", |_| Value::from("Jane"));
        r.insert("${n}", |_| Value::Int(5));
        r
    }

    #[test]
    fn test_const_column_sizes_inferred_table() {
        let config = parse_config(
            r#"
[[tables]]
name = "person"

[[tables.columns]]
name = "sex"
type = "const"
values = ["M", "F", "X"]

[[tables.columns]]
name = "name"
type = "gen"
value = "${first_name}"
"#,
        )
        .unwrap();
        let r = fixed_replacements();
        let mut registry = TableRegistry::new();
        let mut rng = StdRng::seed_from_u64(1);

        Pipeline::new(&config, ColumnGenerator::new(&r))
            .run(&mut registry, &mut rng, None)
            .unwrap();

        let person = registry.get("person").unwrap();
        assert!(person.output);
        assert_eq!(person.header, vec!["sex", "name"]);
        assert_eq!(person.column("name").unwrap(), &["Jane", "Jane", "Jane"]);
    }

    #[test]
    fn test_inputs_load_before_tables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("events.csv"), "date\n2020-01-01\n2021-01-01\n").unwrap();
        let config_path = dir.path().join("tabgen.toml");
        std::fs::write(
            &config_path,
            r#"
[[inputs]]
name = "events"
path = "events.csv"

[[tables]]
name = "events"

[[tables.columns]]
name = "n"
type = "gen"
value = "${n}"
format = "%03d"
"#,
        )
        .unwrap();
        let config = crate::config::read_config(&config_path).unwrap();
        let r = fixed_replacements();
        let mut registry = TableRegistry::new();
        let mut rng = StdRng::seed_from_u64(1);

        Pipeline::new(&config, ColumnGenerator::new(&r))
            .run(&mut registry, &mut rng, None)
            .unwrap();

        let events = registry.get("events").unwrap();
        assert!(!events.output, "input registered first keeps the table as input");
        assert_eq!(events.column("n").unwrap(), &["005", "005"]);
    }

    #[test]
    fn test_progress_reports_every_column() {
        let config = parse_config(
            r#"
[[tables]]
name = "a"
count = 2

[[tables.columns]]
name = "x"
type = "gen"
value = "${n}"

[[tables]]
name = "b"
count = 1

[[tables.columns]]
name = "y"
type = "gen"
value = "${first_name}"

[[tables.columns]]
name = "z"
type = "const"
values = ["q"]
"#,
        )
        .unwrap();
        let r = fixed_replacements();
        let mut registry = TableRegistry::new();
        let mut rng = StdRng::seed_from_u64(1);
        let seen = RefCell::new(Vec::new());
        let cb = |table: &str, column: &str, done: usize, total: usize| {
            seen.borrow_mut()
                .push(format!("{}.{} {}/{}", table, column, done, total));
        };

        Pipeline::new(&config, ColumnGenerator::new(&r))
            .run(&mut registry, &mut rng, Some(&cb))
            .unwrap();

        assert_eq!(
            seen.into_inner(),
            vec!["a.x 1/3", "b.y 2/3", "b.z 3/3"]
        );
    }

    #[test]
    fn test_strict_errors_propagate() {
        let config = parse_config(
            r#"
[[tables]]
name = "a"
count = 1

[[tables.columns]]
name = "x"
type = "gen"
value = "${missing}"
"#,
        )
        .unwrap();
        let r = fixed_replacements();
        let mut registry = TableRegistry::new();
        let mut rng = StdRng::seed_from_u64(1);

        let err = Pipeline::new(&config, ColumnGenerator::new(&r).strict(true))
            .run(&mut registry, &mut rng, None)
            .unwrap_err();
        assert!(matches!(err, TabgenError::UnknownPlaceholder { .. }));
    }
}
