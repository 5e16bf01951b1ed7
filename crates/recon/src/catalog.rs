//! Parsing of the two raw catalogs into run-scoped models.
//!
//! Source catalog: the pricing API's `{"data": [...]}` response.
//! Benchmark catalog: the scraped leaderboard table, one JSON object per row
//! keyed by column header, with header order preserved.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::config::BenchmarkColumns;
use crate::error::ReconError;
use crate::model::{BaseMetrics, BenchmarkModel, CategoryScores, SourceModel};

// ---------------------------------------------------------------------------
// Source catalog
// ---------------------------------------------------------------------------

/// Parse every distinct listing. Free-tier filtering happens in the engine.
///
/// Accepts `{"data": [...]}` or a bare array. Entries without an `id` are
/// skipped; a repeated `id` keeps its first occurrence.
pub fn parse_source_catalog(input: &str) -> Result<Vec<SourceModel>, ReconError> {
    let root: Value =
        serde_json::from_str(input).map_err(|e| ReconError::source_catalog(e.to_string()))?;

    let items = match &root {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ReconError::source_catalog("expected a `data` array"))?,
        _ => return Err(ReconError::source_catalog("expected an object or array")),
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut models = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            tracing::warn!(index = i, "skipping non-object source entry");
            continue;
        };
        let Some(id) = obj.get("id").and_then(Value::as_str).filter(|s| !s.is_empty()) else {
            tracing::warn!(index = i, "skipping source entry without id");
            continue;
        };
        if !seen.insert(id.to_string()) {
            tracing::warn!(id, "duplicate source id, keeping first occurrence");
            continue;
        }

        let display_name = obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(id)
            .to_string();

        let pricing: BTreeMap<String, String> = obj
            .get("pricing")
            .and_then(Value::as_object)
            .map(|p| p.iter().map(|(k, v)| (k.clone(), price_text(v))).collect())
            .unwrap_or_default();

        models.push(SourceModel {
            id: id.to_string(),
            display_name,
            pricing,
            context_length: obj.get("context_length").and_then(Value::as_u64),
            description: obj.get("description").and_then(Value::as_str).map(str::to_string),
        });
    }

    Ok(models)
}

/// Prices arrive as decimal strings; numbers are tolerated. Anything else
/// (null, objects) becomes its JSON text, which is never zero.
fn price_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Benchmark table
// ---------------------------------------------------------------------------

/// Map scraped table rows onto `BenchmarkModel`s.
///
/// The name column becomes `name`, the configured base columns fill
/// `base_metrics`, ignored columns are dropped and every other header is a
/// category, in the row's own header order.
pub fn parse_benchmark_table(
    input: &str,
    columns: &BenchmarkColumns,
) -> Result<Vec<BenchmarkModel>, ReconError> {
    let root: Value =
        serde_json::from_str(input).map_err(|e| ReconError::benchmark_catalog(e.to_string()))?;
    let rows = root
        .as_array()
        .ok_or_else(|| ReconError::benchmark_catalog("expected an array of row objects"))?;

    let base = &columns.base_columns;
    let mut models = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let Some(cells) = row.as_object() else {
            tracing::warn!(index = i, "skipping non-object benchmark row");
            continue;
        };
        let name = cells
            .get(&columns.name_column)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");
        if name.is_empty() {
            tracing::warn!(index = i, column = %columns.name_column, "skipping benchmark row without a name");
            continue;
        }

        let mut base_metrics = BaseMetrics::default();
        let mut category_scores = CategoryScores::new();

        for (header, value) in cells {
            if *header == base.intelligence_index {
                base_metrics.intelligence_index = cell_number(value);
            } else if *header == base.tokens_per_sec {
                base_metrics.tokens_per_sec = cell_number(value);
            } else if *header == base.time_to_first_token {
                base_metrics.time_to_first_token = cell_number(value);
            } else if !columns.is_reserved(header) {
                category_scores.insert(header.clone(), cell_number(value));
            }
        }

        models.push(BenchmarkModel {
            name: name.to_string(),
            base_metrics,
            category_scores,
        });
    }

    Ok(models)
}

fn cell_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_cell(s),
        _ => None,
    }
}

/// Read a rendered table cell as a number.
///
/// Blank, `-`, `--`, `—` and `n/a` are empty. A trailing `%`, a leading `$`
/// and thousands separators are stripped. Anything else unparsable is empty.
pub fn parse_cell(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() || matches!(t, "-" | "--" | "—") || t.eq_ignore_ascii_case("n/a") {
        return None;
    }
    let t = t.strip_suffix('%').unwrap_or(t);
    let t = t.strip_prefix('$').unwrap_or(t);
    let cleaned: String = t.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}
