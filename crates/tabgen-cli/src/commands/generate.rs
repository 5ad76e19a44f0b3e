use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use tabgen_core::output;

use crate::args::GenerateArgs;

pub fn run(args: &GenerateArgs) -> Result<()> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [1/2] Generating columns... {bar:40.cyan/dim} {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("█▓░"),
    );

    let progress = |table: &str, column: &str, done: usize, total: usize| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
        pb.set_message(format!("{}.{}", table, column));
    };

    let (config, registry, seed) = super::generate_registry(&args.opts, |_| {}, Some(&progress))
        .inspect_err(|_| pb.abandon())?;
    pb.finish_with_message("✓");

    let out_dir = args.resolve_output_dir(&config);
    let pb2 = ProgressBar::new_spinner();
    pb2.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [2/2] {msg}")
            .context("Invalid progress template")?,
    );
    pb2.set_message(format!("Writing to {}...", out_dir.display()));

    let written = output::csv::write_outputs(&out_dir, &registry)
        .with_context(|| format!("Failed to write CSV files to {}", out_dir.display()))?;
    pb2.finish_with_message(format!("Writing to {}... ✓", out_dir.display()));

    let total_rows: usize = registry.outputs().map(|t| t.row_count()).sum();
    eprintln!(
        "\n✓ Generated {} rows across {} tables → {}",
        total_rows,
        written.len(),
        out_dir.display()
    );
    for table in registry.outputs() {
        eprintln!(
            "  {:<24} {:>8} rows  {:>3} columns",
            table.name,
            table.row_count(),
            table.column_count()
        );
    }
    eprintln!("Seed: {} (pass --seed {} to reproduce)", seed, seed);

    Ok(())
}
