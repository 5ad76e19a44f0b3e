//! # Table Accumulator
//!
//! `TableRegistry` owns every in-progress table buffer, keyed by table name.
//! Columns only ever enter a table through [`TableRegistry::add_output_column`]
//! or [`TableRegistry::add_input_column`], and both go through
//! [`TableRegistry::get_or_create`], which is the only place a buffer's
//! `output` flag is set. The first call to reference a table decides whether it
//! is an output table; later calls with the opposite intent leave it alone.
//!
//! Buffers are column-major: `lines[i]` holds every row value of the column
//! named `header[i]`.

use std::path::{Component, Path};

use indexmap::IndexMap;

/// Whether `name` can be used as a file stem inside an output directory: a
/// single normal path component with no separators.
pub fn is_file_safe_name(name: &str) -> bool {
    if name.trim().is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// In-memory, column-major accumulation of one named table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBuffer {
    pub name: String,
    /// `true` for tables that get written out, `false` for input/reference data.
    pub output: bool,
    pub header: Vec<String>,
    pub lines: Vec<Vec<String>>,
}

impl TableBuffer {
    pub fn new(name: impl Into<String>, output: bool) -> Self {
        Self {
            name: name.into(),
            output,
            header: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Length of the most-populated column, or 0 when there are no columns.
    pub fn row_count(&self) -> usize {
        self.lines.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Values of the first column with the given name.
    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.header
            .iter()
            .position(|h| h == name)
            .map(|idx| self.lines[idx].as_slice())
    }

    /// Row-major view of the buffer. Columns shorter than the longest one are
    /// padded with empty strings.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.row_count()).map(move |row| {
            self.lines
                .iter()
                .map(|col| col.get(row).map(String::as_str).unwrap_or(""))
                .collect()
        })
    }

    fn push_column(&mut self, column: impl Into<String>, values: Vec<String>) {
        self.header.push(column.into());
        self.lines.push(values);
    }
}

/// Mapping from table name to its buffer, in first-reference order.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: IndexMap<String, TableBuffer>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the buffer for `table`, creating it with the given `output` flag
    /// if this is the first reference. An existing buffer's flag is never
    /// touched.
    pub fn get_or_create(&mut self, table: &str, output: bool) -> &mut TableBuffer {
        self.tables
            .entry(table.to_string())
            .or_insert_with(|| TableBuffer::new(table, output))
    }

    /// Append a generated column to `table`, creating it as an output table if
    /// absent.
    pub fn add_output_column(&mut self, table: &str, column: &str, values: Vec<String>) {
        self.get_or_create(table, true).push_column(column, values);
    }

    /// Append a reference column to `table`, creating it as an input table if
    /// absent.
    pub fn add_input_column(&mut self, table: &str, column: &str, values: Vec<String>) {
        self.get_or_create(table, false).push_column(column, values);
    }

    pub fn get(&self, table: &str) -> Option<&TableBuffer> {
        self.tables.get(table)
    }

    /// Length of the longest column accumulated for `table` so far.
    /// Unknown tables and tables without columns both report 0.
    pub fn longest_column_len(&self, table: &str) -> usize {
        self.tables.get(table).map(TableBuffer::row_count).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableBuffer> {
        self.tables.values()
    }

    /// Buffers flagged for emission, in first-reference order.
    pub fn outputs(&self) -> impl Iterator<Item = &TableBuffer> {
        self.tables.values().filter(|t| t.output)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
