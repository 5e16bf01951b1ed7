use std::collections::BTreeMap;

use crate::model::{MatchMethod, MatchResult, ReconSummary, ReportRow};

/// Count rows by match provenance and unmatched reason.
pub fn compute_summary(rows: &[ReportRow], benchmark_rows: usize, categories: usize) -> ReconSummary {
    let mut unmatched_by_reason: BTreeMap<String, usize> = BTreeMap::new();
    let mut matched_alias = 0;
    let mut matched_fuzzy = 0;
    let mut unmatched = 0;

    for row in rows {
        match &row.match_result {
            MatchResult::Matched { method: MatchMethod::Alias, .. } => matched_alias += 1,
            MatchResult::Matched { method: MatchMethod::Fuzzy, .. } => matched_fuzzy += 1,
            MatchResult::Unmatched { reason, .. } => {
                unmatched += 1;
                *unmatched_by_reason.entry(reason.to_string()).or_insert(0) += 1;
            }
        }
    }

    ReconSummary {
        total_rows: rows.len(),
        matched_alias,
        matched_fuzzy,
        unmatched,
        unmatched_by_reason,
        benchmark_rows,
        categories,
    }
}
