use std::collections::HashSet;

use crate::alias::AliasRegistry;
use crate::catalog::{parse_benchmark_table, parse_source_catalog};
use crate::config::ReconConfig;
use crate::discover::discover_categories;
use crate::error::ReconError;
use crate::matcher::FuzzyMatcher;
use crate::merge::merge_record;
use crate::model::{ReconInput, ReconMeta, ReconResult, SourceModel};
use crate::resolve::MatchResolver;
use crate::summary::compute_summary;

/// Run matching per config. Returns one row per free source entry plus the
/// discovered category columns.
///
/// Pure: no IO, no clock. The same inputs always give an equal result.
pub fn run(
    config: &ReconConfig,
    aliases: &AliasRegistry,
    input: &ReconInput,
) -> Result<ReconResult, ReconError> {
    config.validate()?;

    let free = free_sources(&input.sources);
    let categories = discover_categories(&input.benchmarks);

    let resolver = MatchResolver::new(
        aliases,
        &input.benchmarks,
        FuzzyMatcher::from_config(&config.matching),
        config.matching.threshold,
    );

    let rows: Vec<_> = free
        .iter()
        .map(|source| {
            let result = resolver.resolve(source);
            merge_record(source, &result, &input.benchmarks, &categories)
        })
        .collect();

    let summary = compute_summary(&rows, input.benchmarks.len(), categories.len());
    tracing::info!(
        sources = input.sources.len(),
        free = summary.total_rows,
        alias = summary.matched_alias,
        fuzzy = summary.matched_fuzzy,
        unmatched = summary.unmatched,
        categories = categories.len(),
        "matching complete"
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            threshold: config.matching.threshold,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        categories,
        rows,
        summary,
    })
}

/// Free entries, first occurrence per id, in catalog order.
fn free_sources(sources: &[SourceModel]) -> Vec<&SourceModel> {
    let mut seen: HashSet<&str> = HashSet::new();
    sources
        .iter()
        .filter(|s| s.is_free())
        .filter(|s| seen.insert(s.id.as_str()))
        .collect()
}

/// Parse both raw catalogs with the config's benchmark column mapping.
pub fn load_input(
    source_json: &str,
    benchmark_json: &str,
    config: &ReconConfig,
) -> Result<ReconInput, ReconError> {
    let sources = parse_source_catalog(source_json)?;
    let benchmarks = parse_benchmark_table(benchmark_json, &config.benchmarks.columns)?;
    tracing::debug!(sources = sources.len(), benchmarks = benchmarks.len(), "catalogs parsed");
    Ok(ReconInput { sources, benchmarks })
}
