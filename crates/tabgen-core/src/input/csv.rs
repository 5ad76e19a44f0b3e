use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{Result, TabgenError};
use crate::registry::TableRegistry;

/// Columns of a CSV file: the header row and one value sequence per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvColumns {
    pub header: Vec<String>,
    pub lines: Vec<Vec<String>>,
}

/// Read a CSV with a header row into column-major form.
///
/// Every record must have as many fields as the header.
pub fn read_columns<R: Read>(reader: R) -> std::result::Result<CsvColumns, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let header: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut lines: Vec<Vec<String>> = vec![Vec::new(); header.len()];

    for record in csv_reader.records() {
        let record = record?;
        for (column, field) in lines.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    Ok(CsvColumns { header, lines })
}

/// Load a CSV file into `registry` as input columns of `table`.
///
/// Returns the number of data rows read.
pub fn load_input(registry: &mut TableRegistry, table: &str, path: &Path) -> Result<usize> {
    let input_error = |source| TabgenError::Input {
        path: path.display().to_string(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|e| input_error(csv::Error::from(e)))?;
    let columns = read_columns(file).map_err(input_error)?;
    let rows = columns.lines.first().map(Vec::len).unwrap_or(0);

    info!(
        table,
        path = %path.display(),
        columns = columns.header.len(),
        rows,
        "loaded input"
    );

    for (name, values) in columns.header.iter().zip(columns.lines) {
        registry.add_input_column(table, name, values);
    }
    Ok(rows)
}
