//! Descriptors consumed by the column generator. They are built from
//! `tabgen.toml` by the pipeline, or by hand in library use.

/// A table to generate into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    /// Exact number of rows to generate. `0` means "as many rows as the
    /// longest column already accumulated for this table".
    pub count: usize,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// The column being populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// How one column's values are synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenRule {
    /// Template text; every registered placeholder it contains is replaced.
    pub value: String,
    /// Chance, in percent (0..=100), that a row is the empty string instead.
    pub null_percentage: u8,
    /// Format applied to each produced value; empty for the default rendering.
    pub format: String,
}

impl GenRule {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            null_percentage: 0,
            format: String::new(),
        }
    }

    pub fn with_null_percentage(mut self, null_percentage: u8) -> Self {
        self.null_percentage = null_percentage;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}
