use anyhow::{bail, Result};
use comfy_table::Table as ComfyTable;

use tabgen_core::TableBuffer;

use crate::args::PreviewArgs;

const MAX_CELL_CHARS: usize = 40;

pub fn run(args: &PreviewArgs) -> Result<()> {
    let rows = args.rows.get();
    let (_, registry, seed) = super::generate_registry(
        &args.opts,
        |config| {
            for table in &mut config.tables {
                if table.count > rows {
                    table.count = rows;
                }
            }
        },
        None,
    )?;

    for name in &args.tables {
        if registry.get(name).is_none() {
            bail!("Unknown table '{}'", name);
        }
    }

    for table in registry.iter() {
        if !args.tables.is_empty() && !args.tables.contains(&table.name) {
            continue;
        }
        if !table.output && !args.inputs {
            continue;
        }
        print_table(table, rows);
    }

    eprintln!("Seed: {}", seed);
    Ok(())
}

fn print_table(table: &TableBuffer, rows: usize) {
    let kind = if table.output { "" } else { ", input" };
    println!(
        "━━━ {} ({} rows{}) ━━━",
        table.name,
        table.row_count(),
        kind
    );

    let mut t = ComfyTable::new();
    t.set_header(table.header.iter().map(String::as_str).collect::<Vec<_>>());
    for row in table.rows().take(rows) {
        t.add_row(row.into_iter().map(truncate).collect::<Vec<_>>());
    }

    println!("{}\n", t);
}

fn truncate(value: &str) -> String {
    if value.chars().count() > MAX_CELL_CHARS {
        let head: String = value.chars().take(MAX_CELL_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short"), "short");
        let long = "é".repeat(50);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert!(cut.ends_with("..."));
    }
}
