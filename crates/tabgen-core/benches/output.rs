//! Benchmarks for the CSV writer.
//!
//! Measures throughput of transposing column-major table buffers into CSV
//! rows. Uses a black-hole writer to isolate formatter cost from I/O.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;

use tabgen_core::output::csv;
use tabgen_core::TableRegistry;

/// A writer that discards all output; isolates formatter cost from I/O.
struct NullWriter;

impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Build a registry with one table of N rows across a handful of columns.
fn make_registry(row_count: usize) -> TableRegistry {
    let mut registry = TableRegistry::new();
    registry.add_output_column(
        "users",
        "name",
        (0..row_count).map(|i| format!("User {}", i)).collect(),
    );
    registry.add_output_column(
        "users",
        "email",
        (0..row_count)
            .map(|i| format!("user{}@example.com", i))
            .collect(),
    );
    registry.add_output_column(
        "users",
        "age",
        (0..row_count).map(|i| (20 + i % 60).to_string()).collect(),
    );
    registry.add_output_column(
        "users",
        "bio",
        (0..row_count)
            .map(|i| {
                if i % 10 == 0 {
                    String::new()
                } else {
                    format!(
                        "A longer field with commas, \"quotes\", and other characters for row {}.",
                        i
                    )
                }
            })
            .collect(),
    );
    registry
}

fn bench_csv_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("output/csv");

    for row_count in [100, 1000, 10_000] {
        let registry = make_registry(row_count);
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(
            BenchmarkId::new("rows", row_count),
            &registry,
            |b, registry| {
                b.iter(|| {
                    let mut w = NullWriter;
                    for table in registry.outputs() {
                        csv::write_table(&mut w, table).unwrap();
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_csv_output);
criterion_main!(benches);
