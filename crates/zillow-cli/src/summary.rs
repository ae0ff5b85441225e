use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use zillow_cli::types::{AcquireResult, AuditResult, PrepareResult};

pub fn print_acquire(result: &AcquireResult) {
    let origin = if result.from_cache { "cache" } else { "query" };
    println!("Cache: {} (loaded from {origin})", result.cache_path.display());
    println!("Shape: {} rows x {} columns", result.rows, result.columns);
}

pub fn print_audit(result: &AuditResult) {
    print_acquire(&result.acquire);

    let mut columns = Table::new();
    columns.set_header(vec![
        header_cell("Column"),
        header_cell("Missing rows"),
        header_cell("Fraction"),
    ]);
    apply_table_style(&mut columns);
    align_column(&mut columns, 1, CellAlignment::Right);
    align_column(&mut columns, 2, CellAlignment::Right);
    for entry in &result.report.columns {
        columns.add_row(vec![
            Cell::new(&entry.column),
            count_cell(entry.missing_rows),
            fraction_cell(entry.fraction_missing),
        ]);
    }
    println!("{columns}");

    let mut rows = Table::new();
    rows.set_header(vec![
        header_cell("Missing columns"),
        header_cell("Rows"),
        header_cell("Fraction of width"),
    ]);
    apply_table_style(&mut rows);
    align_column(&mut rows, 0, CellAlignment::Right);
    align_column(&mut rows, 1, CellAlignment::Right);
    align_column(&mut rows, 2, CellAlignment::Right);
    for entry in &result.report.rows {
        rows.add_row(vec![
            Cell::new(entry.missing_columns),
            Cell::new(entry.row_count),
            fraction_cell(entry.fraction_missing),
        ]);
    }
    println!("{rows}");

    if let Some(path) = &result.json_path {
        println!("JSON report: {}", path.display());
    }
}

pub fn print_prepare(result: &PrepareResult) {
    print_acquire(&result.acquire);
    println!("Profile: {}", result.wrangle.profile.as_str());

    let mut steps = Table::new();
    steps.set_header(vec![
        header_cell("Step"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Columns"),
        header_cell("ms"),
    ]);
    apply_summary_table_style(&mut steps);
    for idx in 1..=4 {
        align_column(&mut steps, idx, CellAlignment::Right);
    }
    for report in &result.wrangle.steps {
        let removed = report.rows_in.saturating_sub(report.rows_out);
        steps.add_row(vec![
            Cell::new(&report.step),
            Cell::new(report.rows_in),
            if removed > 0 {
                Cell::new(report.rows_out).fg(Color::Yellow)
            } else {
                Cell::new(report.rows_out)
            },
            Cell::new(format!("{} -> {}", report.columns_in, report.columns_out)),
            dim_cell(report.duration_ms),
        ]);
    }
    for name in &result.wrangle.skipped_steps {
        steps.add_row(vec![
            dim_cell(name),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("skipped"),
        ]);
    }
    println!("{steps}");

    if let Some(prune) = &result.wrangle.prune
        && !prune.dropped_columns.is_empty()
    {
        println!("Pruned columns: {}", prune.dropped_columns.join(", "));
    }
    if !result.tidy_removed.is_empty() {
        println!("Tidy removed: {}", result.tidy_removed.join(", "));
    }

    let mut partitions = Table::new();
    partitions.set_header(vec![header_cell("Partition"), header_cell("Rows")]);
    apply_table_style(&mut partitions);
    align_column(&mut partitions, 1, CellAlignment::Right);
    let sizes = [
        ("train", result.partitions.train),
        ("validate", result.partitions.validate),
        ("test", result.partitions.test),
    ];
    for (name, rows) in sizes {
        partitions.add_row(vec![Cell::new(name), count_cell(rows)]);
    }
    let total = result.partitions.train + result.partitions.validate + result.partitions.test;
    partitions.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    println!("{partitions}");

    println!("Target: {}", result.target);
    println!("Features: {}", result.features.join(", "));
    if result.outputs.is_empty() {
        println!("Dry run: no files written to {}", result.output_dir.display());
    } else {
        println!("Output: {}", result.output_dir.display());
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn fraction_cell(fraction: f64) -> Cell {
    let text = format!("{:.1}%", fraction * 100.0);
    if fraction >= 0.5 {
        Cell::new(text).fg(Color::Red)
    } else if fraction > 0.0 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        dim_cell(text)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
