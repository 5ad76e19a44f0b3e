//! # Error Types
//!
//! Defines `TabgenError`, the unified error enum for every failure mode in the
//! tabgen pipeline. Generation errors carry the table and column they were
//! raised for, so a bad template or format spec can be fixed straight from the
//! message.

use thiserror::Error;

use crate::generate::format::FormatError;

/// All errors that can occur in tabgen operations.
#[derive(Error, Debug)]
pub enum TabgenError {
    #[error("Cannot infer a row count for {table}.{column}: the table has count = 0 and no existing columns\n  Set an explicit count on the table, or add a const/input column first")]
    UnresolvableRowCount { table: String, column: String },

    #[error("Failed to format a value for {table}.{column}: {source}")]
    Format {
        table: String,
        column: String,
        #[source]
        source: FormatError,
    },

    #[error("Unknown placeholder '{token}' in the template for {table}.{column}\n  Run `tabgen tokens` to list the registered placeholders")]
    UnknownPlaceholder {
        table: String,
        column: String,
        token: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to read input CSV '{path}': {source}")]
    Input {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Output error: {message}: {source}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TabgenError>;
