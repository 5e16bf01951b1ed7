use std::collections::HashSet;

use crate::model::BenchmarkModel;

/// Union of every category key across the scrape, in first-seen order.
///
/// The result is the report's column order. Only keys observed in this input
/// appear; nothing is defaulted in from earlier runs.
pub fn discover_categories(benchmarks: &[BenchmarkModel]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keys = Vec::new();

    for model in benchmarks {
        for key in model.category_scores.keys() {
            if seen.insert(key) {
                keys.push(key.to_string());
            }
        }
    }

    tracing::debug!(categories = keys.len(), rows = benchmarks.len(), "discovered categories");
    keys
}
