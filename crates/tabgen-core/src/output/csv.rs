use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, TabgenError};
use crate::registry::{is_file_safe_name, TableBuffer, TableRegistry};

/// Write one table as CSV: the header row, then one row per index across all
/// of the table's columns. Short columns are padded with empty fields.
pub fn write_table<W: Write>(writer: &mut W, table: &TableBuffer) -> Result<()> {
    writeln!(
        writer,
        "{}",
        table
            .header
            .iter()
            .map(|c| csv_escape(c))
            .collect::<Vec<_>>()
            .join(",")
    )
    .map_err(|e| TabgenError::Output {
        message: format!("writing CSV header for {}", table.name),
        source: e,
    })?;

    for row in table.rows() {
        let values: Vec<String> = row.into_iter().map(csv_escape).collect();
        writeln!(writer, "{}", values.join(",")).map_err(|e| TabgenError::Output {
            message: format!("writing CSV row for {}", table.name),
            source: e,
        })?;
    }

    Ok(())
}

/// Write every output table in `registry` to `<dir>/<table>.csv`, creating
/// `dir` if needed. Input tables are skipped.
///
/// Returns the paths written, in table order. Fails before touching the
/// filesystem if any output table name is not a plain file name.
pub fn write_outputs(dir: &Path, registry: &TableRegistry) -> Result<Vec<PathBuf>> {
    if let Some(table) = registry.outputs().find(|t| !is_file_safe_name(&t.name)) {
        return Err(TabgenError::Output {
            message: format!("table name '{}' is not a valid file name", table.name),
            source: io::Error::new(io::ErrorKind::InvalidInput, "unsafe table name"),
        });
    }

    std::fs::create_dir_all(dir).map_err(|e| TabgenError::Output {
        message: format!("creating output directory {}", dir.display()),
        source: e,
    })?;

    let mut written = Vec::new();
    for table in registry.outputs() {
        let path = dir.join(format!("{}.csv", table.name));
        let file = File::create(&path).map_err(|e| TabgenError::Output {
            message: format!("creating {}", path.display()),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        write_table(&mut writer, table)?;
        writer.flush().map_err(|e| TabgenError::Output {
            message: format!("flushing {}", path.display()),
            source: e,
        })?;

        info!(
            table = %table.name,
            rows = table.row_count(),
            path = %path.display(),
            "wrote table"
        );
        written.push(path);
    }

    Ok(written)
}

/// Escape a string for CSV: quote if it contains comma, quote, or newline.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("hello"), "hello");
        assert_eq!(csv_escape("hello,world"), "\"hello,world\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_write_table_transposes_columns() {
        let mut registry = TableRegistry::new();
        registry.add_output_column("people", "first", vals(&["Jane", "John"]));
        registry.add_output_column("people", "last", vals(&["Doe", "Smith, Jr"]));

        let mut out = Vec::new();
        write_table(&mut out, registry.get("people").unwrap()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "first,last\nJane,Doe\nJohn,\"Smith, Jr\"\n"
        );
    }

    #[test]
    fn test_write_table_with_no_rows_writes_header() {
        let mut registry = TableRegistry::new();
        registry.add_output_column("t", "a", Vec::new());

        let mut out = Vec::new();
        write_table(&mut out, registry.get("t").unwrap()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\n");
    }

    #[test]
    fn test_write_outputs_skips_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("csvs");

        let mut registry = TableRegistry::new();
        registry.add_input_column("reference", "code", vals(&["x"]));
        registry.add_output_column("person", "name", vals(&["Jane"]));

        let written = write_outputs(&out_dir, &registry).unwrap();

        assert_eq!(written, vec![out_dir.join("person.csv")]);
        assert!(!out_dir.join("reference.csv").exists());
        assert_eq!(
            std::fs::read_to_string(out_dir.join("person.csv")).unwrap(),
            "name\nJane\n"
        );
    }

    #[test]
    fn test_write_outputs_rejects_path_like_table_names() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("csvs");

        let mut registry = TableRegistry::new();
        registry.add_output_column("person", "name", vals(&["Jane"]));
        registry.add_output_column("../escaped", "name", vals(&["Jane"]));

        let err = write_outputs(&out_dir, &registry).unwrap_err();
        assert!(matches!(err, TabgenError::Output { .. }));
        assert!(!dir.path().join("escaped.csv").exists());
        assert!(!out_dir.join("person.csv").exists());
    }
}
