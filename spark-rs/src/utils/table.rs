//! Report tables
//!
//! All tables share one compact format: bold title row, no separators
//! between data rows. Numeric columns are right-aligned.

use prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE;
use prettytable::{Cell, Row, Table};

/// Empty table titled with `headers`
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        headers
            .iter()
            .map(|h| Cell::new(h).style_spec("b"))
            .collect(),
    ));
    table
}

/// Append a row of text cells
pub fn add_table_row(table: &mut Table, cells: Vec<String>) {
    table.add_row(Row::new(cells.iter().map(|s| Cell::new(s)).collect()));
}

/// Append a row with a text label followed by right-aligned counts
pub fn add_numeric_row(table: &mut Table, label: String, values: &[usize]) {
    let mut row = Row::new(vec![Cell::new(&label)]);
    for value in values {
        row.add_cell(Cell::new(&value.to_string()).style_spec("r"));
    }
    table.add_row(row);
}
