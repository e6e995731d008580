//! Benchmarks for footer computation and persistence.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabledit::aggregate::{footer_row, parse_float};
use tabledit::storage::{self, MemoryStore};
use tabledit::types::{Collection, Table};

/// Rows of mixed numeric and free-text cells.
fn make_rows(rows: usize, cols: usize) -> Vec<Vec<String>> {
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| match (r + c) % 4 {
                    0 => format!("{r}.{c}"),
                    1 => format!("{r} kg"),
                    2 => String::new(),
                    _ => format!("item {r}"),
                })
                .collect()
        })
        .collect()
}

fn make_collection(tables: usize, rows: usize) -> Collection {
    (0..tables)
        .map(|i| {
            let mut table = Table::new(
                format!("Table {i}"),
                vec!["Name".into(), "Qty".into(), "Price".into()],
            );
            table.rows = make_rows(rows, 3);
            table.numeric_column = Some(2);
            (format!("table_{i}"), table)
        })
        .collect()
}

/// Benchmark numeric prefix parsing on typical cell text
fn bench_parse_float(c: &mut Criterion) {
    let cells = ["42", "-1.5e3", "12 kg", "abc", "", "  .5", "Infinity"];

    c.bench_function("parse_float_mixed", |b| {
        b.iter(|| {
            for cell in &cells {
                black_box(parse_float(black_box(cell)));
            }
        })
    });
}

/// Compare footer computation across table sizes
fn bench_footer(c: &mut Criterion) {
    let mut group = c.benchmark_group("footer_row");

    for rows in [10, 1_000, 10_000] {
        let data = make_rows(rows, 5);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| footer_row(5, black_box(data), Some(0)))
        });
    }

    group.finish();
}

/// Benchmark a full save followed by a load of the collection
fn bench_persist(c: &mut Criterion) {
    let collection = make_collection(20, 200);
    let mut group = c.benchmark_group("persist");

    group.bench_function("save_20x200", |b| {
        let mut store = MemoryStore::new();
        b.iter(|| storage::save(&mut store, "tablesData", black_box(&collection)))
    });

    let mut store = MemoryStore::new();
    storage::save(&mut store, "tablesData", &collection).expect("save should succeed");
    group.bench_function("load_20x200", |b| {
        b.iter(|| storage::load(black_box(&store), "tablesData"))
    });

    group.finish();
}

criterion_group!(benches, bench_parse_float, bench_footer, bench_persist);

criterion_main!(benches);
