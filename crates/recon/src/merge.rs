use crate::model::{BaseMetrics, BenchmarkModel, MatchResult, ReportRow, SourceModel};

/// Join one source entry with its matched benchmark row.
///
/// Always produces a row. Unmatched entries get empty base metrics and an
/// empty slot per category, so every row has exactly `categories.len()` slots.
pub fn merge_record(
    source: &SourceModel,
    result: &MatchResult,
    benchmarks: &[BenchmarkModel],
    categories: &[String],
) -> ReportRow {
    let matched = match result {
        MatchResult::Matched { benchmark_index, .. } => benchmarks.get(*benchmark_index),
        MatchResult::Unmatched { .. } => None,
    };

    let (base_metrics, category_values) = match matched {
        Some(bench) => (
            bench.base_metrics,
            categories
                .iter()
                .map(|key| bench.category_scores.value(key))
                .collect(),
        ),
        None => (BaseMetrics::default(), vec![None; categories.len()]),
    };

    ReportRow {
        source_id: source.id.clone(),
        display_name: source.display_name.clone(),
        context_length: source.context_length,
        match_result: result.clone(),
        base_metrics,
        category_values,
    }
}
