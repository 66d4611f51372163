use criterion::{black_box, criterion_group, criterion_main, Criterion};
use explorer_dataview::data::data_view::DataView;
use explorer_dataview::data::datatable::{DataColumn, DataRow, DataTable, DataValue};
use explorer_dataview::data::view_service::{derive_view, sorted_columns_by_label};
use explorer_dataview::data::view_spec::{RangeFilter, SortDirective, SortOrder, ViewSpec};
use std::sync::Arc;

fn create_test_table(rows: usize) -> DataTable {
    let mut table = DataTable::new("bench");

    table.add_column(DataColumn::new("region"));
    table.add_column(DataColumn::new("value"));
    table.add_column(DataColumn::new("load"));

    let regions = vec![
        "us-east", "us-west", "eu-west", "eu-north", "ap-south", "ap-east",
    ];

    for i in 0..rows {
        let region = regions[i % regions.len()].to_string();
        let row = DataRow::new(vec![
            DataValue::String(region),
            DataValue::Integer(i as i64),
            DataValue::Float((i % 997) as f64 / 10.0),
        ]);
        table.add_row(row).unwrap();
    }

    table
}

fn benchmark_derive_view(c: &mut Criterion) {
    let table_10k = create_test_table(10_000);
    let table_50k = create_test_table(50_000);
    let table_100k = create_test_table(100_000);

    let spec = ViewSpec::new()
        .with_columns(vec![0, 2])
        .with_filter(
            RangeFilter::new(2)
                .with_min(DataValue::Float(10.0))
                .with_max(DataValue::Float(60.0)),
        )
        .with_sort(SortDirective::descending(2))
        .with_sort(SortDirective::ascending(1));

    let mut group = c.benchmark_group("derive_view");

    group.bench_function("10k_rows", |b| {
        b.iter(|| {
            let result = derive_view(black_box(&table_10k), black_box(&spec));
            assert!(result.is_ok());
        });
    });

    group.bench_function("50k_rows", |b| {
        b.iter(|| {
            let result = derive_view(black_box(&table_50k), black_box(&spec));
            assert!(result.is_ok());
        });
    });

    group.bench_function("100k_rows", |b| {
        b.iter(|| {
            let result = derive_view(black_box(&table_100k), black_box(&spec));
            assert!(result.is_ok());
        });
    });

    group.finish();
}

fn benchmark_materialize(c: &mut Criterion) {
    let table = Arc::new(create_test_table(50_000));
    let spec = ViewSpec::new()
        .with_filter(RangeFilter::new(2).with_max(DataValue::Float(50.0)))
        .with_sort(SortDirective::ascending(2));
    let descriptor = derive_view(&table, &spec).unwrap();

    let mut group = c.benchmark_group("materialize");

    group.bench_function("from_descriptor_50k", |b| {
        b.iter(|| {
            let view = DataView::from_descriptor(table.clone(), black_box(&descriptor));
            assert!(view.is_ok());
        });
    });

    group.finish();
}

fn benchmark_sorted_columns(c: &mut Criterion) {
    let mut wide = DataTable::new("wide");
    for i in 0..200 {
        wide.add_column(DataColumn::new(format!("c{}", i)).with_label(format!("Column {}", 199 - i)));
    }

    let mut group = c.benchmark_group("sorted_columns");

    group.bench_function("200_columns", |b| {
        b.iter(|| {
            let order = sorted_columns_by_label(black_box(&wide), 1, SortOrder::Ascending);
            assert_eq!(order.len(), 200);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_derive_view,
    benchmark_materialize,
    benchmark_sorted_columns
);
criterion_main!(benches);
