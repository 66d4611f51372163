// View derivation debug binary, for poking at the pipeline in isolation.
// Run with: cargo run --bin view-debug

use std::sync::Arc;

use explorer_dataview::config::config::Config;
use explorer_dataview::data::data_view::DataView;
use explorer_dataview::data::datatable::{DataTable, DataValue};
use explorer_dataview::data::view_service::{derive_view, sorted_columns_by_label};
use explorer_dataview::data::view_spec::{RangeFilter, SortDirective, SortOrder, ViewSpec};
use explorer_dataview::logging;
use explorer_dataview::table_display;

fn main() -> anyhow::Result<()> {
    logging::init();
    let config = Config::load().unwrap_or_default();

    println!("=== View Derivation Debug ===\n");

    let chart = serde_json::json!({
        "cols": [
            {"id": "date", "label": "Date", "type": "date"},
            {"id": "value1", "label": "Fake values 1", "type": "number"},
            {"id": "value2", "label": "Fake values 2", "type": "number"}
        ],
        "rows": [
            {"c": [{"v": "2013/03/03 00:48:04"}, {"v": 0.5}, {"v": 3}]},
            {"c": [{"v": "2013/03/04 00:50:04"}, {"v": 0.1}, {"v": 5}]},
            {"c": [{"v": "2013/03/05 00:59:04"}, {"v": 0.3}, {"v": 1}]},
            {"c": [{"v": "2013/03/06 00:28:04"}, {"v": 0.7}, {"v": 2}]},
            {"c": [{"v": "2013/03/07 00:59:04"}, {"v": 0.2}, {"v": 6}]}
        ]
    });
    let table = Arc::new(DataTable::from_chart_json(&chart, "samples")?);

    println!("Source table");
    println!("────────────");
    let full = DataView::new(table.clone());
    table_display::print_view(&full, &config.display);
    let stats = table.get_stats();
    println!(
        "{} null cells, ~{} bytes",
        stats.null_count, stats.memory_size
    );
    println!();

    println!("Derived view");
    println!("────────────");
    let spec = ViewSpec::new()
        .with_columns(vec![0, 2])
        .with_filter(
            RangeFilter::new(1)
                .with_min(DataValue::Integer(0))
                .with_max(DataValue::Float(0.2)),
        )
        .with_sort(SortDirective::descending(2));

    match derive_view(&table, &spec) {
        Ok(descriptor) => {
            println!("Plan: {}", serde_json::to_string(&descriptor)?);
            println!("Projected columns: {:?}", descriptor.projected_columns());
            let view = DataView::from_descriptor(table.clone(), &descriptor)?;
            table_display::print_view(&view, &config.display);
            println!("CSV:\n{}", view.to_csv()?);
            println!("Records: {}", view.to_records_json());
        }
        Err(err) => println!("Rejected: {}", err.to_json()),
    }
    println!();

    println!("Rejected requests");
    println!("─────────────────");
    let bad_specs = [
        ViewSpec::new().with_columns(vec![12]),
        ViewSpec::new().with_filter(RangeFilter::new(0)),
        ViewSpec::new().with_sort(SortDirective::ascending(12)),
    ];
    for spec in &bad_specs {
        if let Err(err) = derive_view(&table, spec) {
            println!("  {}", err.to_json());
        }
    }
    println!();

    println!("Columns by label");
    println!("────────────────");
    let ascending = sorted_columns_by_label(&table, 0, SortOrder::Ascending);
    println!("  Ascending: {:?}", ascending);
    let pinned = sorted_columns_by_label(&table, 1, SortOrder::Ascending);
    println!("  First column pinned: {:?}", pinned);

    Ok(())
}
