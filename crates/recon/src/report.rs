//! Flatten a `ReconResult` into a rectangular table for renderers.
//!
//! Fixed base columns come first, then one column per discovered category.
//! Renderers only see strings; they need no knowledge of matching.

use serde::Serialize;

use crate::config::ReportConfig;
use crate::model::{ReconResult, ReportRow};

pub const BASE_HEADERS: [&str; 7] = [
    "Source ID",
    "Model Name",
    "Context",
    "Match",
    "Intelligence",
    "TPS",
    "TTFT (s)",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

/// Category column order: keys named in `column_priority` (that exist this
/// run) first, in priority order, then the rest in discovered order.
/// Returns indices into `categories`.
pub fn category_order(categories: &[String], report: &ReportConfig) -> Vec<usize> {
    let mut placed = vec![false; categories.len()];
    let mut order: Vec<usize> = report
        .column_priority
        .iter()
        .filter_map(|key| categories.iter().position(|c| c == key))
        .filter(|&i| !std::mem::replace(&mut placed[i], true))
        .collect();
    order.extend((0..categories.len()).filter(|i| !placed[*i]));
    order
}

pub fn assemble_table(result: &ReconResult, report: &ReportConfig) -> Table {
    let order = category_order(&result.categories, report);

    let mut headers: Vec<String> = BASE_HEADERS.iter().map(|h| h.to_string()).collect();
    headers.extend(order.iter().map(|&i| {
        let key = &result.categories[i];
        report.rename.get(key).cloned().unwrap_or_else(|| key.clone())
    }));

    let rows = result.rows.iter().map(|row| table_row(row, &order)).collect();

    Table { headers, rows }
}

fn table_row(row: &ReportRow, order: &[usize]) -> Vec<String> {
    let mut cells = Vec::with_capacity(BASE_HEADERS.len() + order.len());
    cells.push(row.source_id.clone());
    cells.push(row.display_name.clone());
    cells.push(row.context_length.map(|c| c.to_string()).unwrap_or_default());
    cells.push(row.match_result.label());
    cells.push(format_cell(row.base_metrics.intelligence_index));
    cells.push(format_cell(row.base_metrics.tokens_per_sec));
    cells.push(format_cell(row.base_metrics.time_to_first_token));
    cells.extend(order.iter().map(|&i| format_cell(row.category_values.get(i).copied().flatten())));
    cells
}

/// Empty string for a blank slot, otherwise the shortest round-trip form.
pub fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
