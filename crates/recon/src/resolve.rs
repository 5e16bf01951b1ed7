use std::collections::HashMap;

use crate::alias::AliasRegistry;
use crate::matcher::FuzzyMatcher;
use crate::model::{BenchmarkModel, Candidate, MatchMethod, MatchResult, SourceModel, UnmatchedReason};

/// Decides, per source entry, which benchmark row (if any) it is.
///
/// Order of authority:
/// 1. Alias entry for the id: case-insensitive exact name lookup. A missing
///    target is `alias_target_not_found`; fuzzy matching is not attempted.
/// 2. Fuzzy best match on the display name, accepted at `score >= threshold`.
/// 3. Otherwise unmatched.
pub struct MatchResolver<'a> {
    aliases: &'a AliasRegistry,
    benchmarks: &'a [BenchmarkModel],
    matcher: FuzzyMatcher,
    threshold: f64,
    /// Lowercased name -> first row with that name.
    by_folded_name: HashMap<String, usize>,
    /// Exact name -> first row with that name.
    by_name: HashMap<&'a str, usize>,
}

impl<'a> MatchResolver<'a> {
    pub fn new(
        aliases: &'a AliasRegistry,
        benchmarks: &'a [BenchmarkModel],
        matcher: FuzzyMatcher,
        threshold: f64,
    ) -> Self {
        let mut by_folded_name = HashMap::new();
        let mut by_name = HashMap::new();
        for (i, model) in benchmarks.iter().enumerate() {
            by_folded_name.entry(model.name.to_lowercase()).or_insert(i);
            by_name.entry(model.name.as_str()).or_insert(i);
        }
        Self {
            aliases,
            benchmarks,
            matcher,
            threshold,
            by_folded_name,
            by_name,
        }
    }

    pub fn resolve(&self, source: &SourceModel) -> MatchResult {
        if let Some(target) = self.aliases.lookup(&source.id) {
            return self.resolve_alias(source, target);
        }
        self.resolve_fuzzy(source)
    }

    fn resolve_alias(&self, source: &SourceModel, target: &str) -> MatchResult {
        match self.by_folded_name.get(&target.to_lowercase()) {
            Some(&index) => {
                tracing::debug!(id = %source.id, alias_target = target, "alias match");
                MatchResult::Matched {
                    benchmark_index: index,
                    benchmark_name: self.benchmarks[index].name.clone(),
                    method: MatchMethod::Alias,
                    confidence: 1.0,
                }
            }
            None => {
                tracing::warn!(id = %source.id, alias_target = target, "alias target not in benchmark catalog");
                MatchResult::unmatched(UnmatchedReason::AliasTargetNotFound)
            }
        }
    }

    fn resolve_fuzzy(&self, source: &SourceModel) -> MatchResult {
        let names = self.benchmarks.iter().map(|b| b.name.as_str());
        let Some((name, score)) = self.matcher.best_match(&source.display_name, names) else {
            tracing::debug!(id = %source.id, "no fuzzy candidate");
            return MatchResult::unmatched(UnmatchedReason::NoAliasAndNoFuzzyCandidate);
        };

        let Some(&index) = self.by_name.get(name.as_str()) else {
            return MatchResult::unmatched(UnmatchedReason::NoAliasAndNoFuzzyCandidate);
        };

        if score >= self.threshold {
            tracing::debug!(id = %source.id, candidate = %name, score, "fuzzy match accepted");
            MatchResult::Matched {
                benchmark_index: index,
                benchmark_name: name,
                method: MatchMethod::Fuzzy,
                confidence: score,
            }
        } else {
            tracing::debug!(
                id = %source.id,
                candidate = %name,
                score,
                threshold = self.threshold,
                "fuzzy candidate below threshold"
            );
            MatchResult::Unmatched {
                reason: UnmatchedReason::FuzzyBelowThreshold,
                nearest: Some(Candidate { name, score }),
            }
        }
    }
}
