use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::config::config::DisplayConfig;
use crate::data::data_view::DataView;

/// Lay a view out as a terminal table, bold header row included.
///
/// Rendering is capped at `max_display_rows`; the caller decides what to
/// say about anything trimmed.
pub fn render_view(view: &DataView, display: &DisplayConfig) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut headers: Vec<Cell> = Vec::new();
    if display.show_row_numbers {
        headers.push(Cell::new("#").add_attribute(Attribute::Bold));
    }
    headers.extend(
        view.column_labels()
            .iter()
            .map(|label| Cell::new(label).add_attribute(Attribute::Bold)),
    );
    table.set_header(headers);

    let shown = view.row_count().min(display.max_display_rows);
    for index in 0..shown {
        if let Some(row) = view.get_row(index) {
            let mut cells: Vec<String> = Vec::new();
            if display.show_row_numbers {
                cells.push((index + 1).to_string());
            }
            cells.extend(row.values.iter().map(|v| v.to_string()));
            table.add_row(cells);
        }
    }
    table
}

/// Print a view to stdout with a trailing row-count line.
pub fn print_view(view: &DataView, display: &DisplayConfig) {
    let table = render_view(view, display);
    println!("{table}");

    let total = view.row_count();
    let shown = total.min(display.max_display_rows);
    if shown < total {
        println!("Showing {} of {} rows", shown, total);
    } else {
        println!("{} rows", total);
    }
}
