use std::path::PathBuf;

use modelmatch_recon::config::ReconConfig;
use modelmatch_recon::engine::{load_input, run};
use modelmatch_recon::model::{
    BaseMetrics, BenchmarkModel, CategoryScores, MatchMethod, MatchResult, ReconInput, ReconResult,
    SourceModel, UnmatchedReason,
};
use modelmatch_recon::{assemble_table, AliasRegistry};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn load_and_run() -> (ReconConfig, ReconResult) {
    let config = ReconConfig::from_toml(&read_fixture("free-models.recon.toml")).unwrap();
    let source = read_fixture(config.source.file.as_deref().unwrap());
    let table = read_fixture(&config.benchmarks.file);
    let aliases = AliasRegistry::load(&fixtures_dir().join(&config.aliases.file)).unwrap();

    let input = load_input(&source, &table, &config).unwrap();
    let result = run(&config, &aliases, &input).unwrap();
    (config, result)
}

fn row<'a>(result: &'a ReconResult, id: &str) -> &'a modelmatch_recon::ReportRow {
    result
        .rows
        .iter()
        .find(|r| r.source_id == id)
        .unwrap_or_else(|| panic!("no row for {id}"))
}

// -------------------------------------------------------------------------
// Fixture pipeline
// -------------------------------------------------------------------------

#[test]
fn fixture_one_row_per_free_entry() {
    let (_, result) = load_and_run();

    let ids: Vec<&str> = result.rows.iter().map(|r| r.source_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "google/gemma-3-27b-it:free",
            "meta-llama/llama-3.3-70b-instruct:free",
            "deepseek/deepseek-r1:free",
            "mistralai/mistral-small-3.1-24b-instruct:free",
            "qwen/qwen3-8b:free",
            "acme/unknown-model:free",
        ]
    );
    assert_eq!(result.meta.config_name, "Free Models Fixture");
}

#[test]
fn fixture_categories_first_seen_order() {
    let (_, result) = load_and_run();
    assert_eq!(
        result.categories,
        vec![
            "MMLU-Pro(Reasoning &Knowledge)",
            "GPQA Diamond(Scientific Reasoning)",
            "LiveCodeBench(Coding)",
            "HumanityLast Exam(Reasoning &Knowledge)",
        ]
    );
    for r in &result.rows {
        assert_eq!(r.category_values.len(), result.categories.len());
    }
}

#[test]
fn fixture_fuzzy_matches_carry_metrics() {
    let (_, result) = load_and_run();

    let gemma = row(&result, "google/gemma-3-27b-it:free");
    assert_eq!(gemma.match_result.method(), Some(MatchMethod::Fuzzy));
    assert_eq!(gemma.match_result.confidence(), Some(1.0));
    assert_eq!(gemma.context_length, Some(96000));
    assert_eq!(
        gemma.base_metrics,
        BaseMetrics {
            intelligence_index: Some(38.0),
            tokens_per_sec: Some(45.2),
            time_to_first_token: Some(0.61),
        }
    );
    assert_eq!(gemma.category_values, vec![Some(67.0), Some(43.0), None, None]);

    // 3.3 beats the near-identical 3.1 row.
    let llama = row(&result, "meta-llama/llama-3.3-70b-instruct:free");
    match &llama.match_result {
        MatchResult::Matched { benchmark_name, method, .. } => {
            assert_eq!(benchmark_name, "Llama 3.3 70B");
            assert_eq!(*method, MatchMethod::Fuzzy);
        }
        other => panic!("expected fuzzy match, got {other:?}"),
    }
    assert_eq!(llama.category_values, vec![Some(71.0), Some(50.0), Some(29.0), None]);
}

#[test]
fn fixture_alias_and_stale_alias() {
    let (_, result) = load_and_run();

    let r1 = row(&result, "deepseek/deepseek-r1:free");
    assert_eq!(r1.match_result.method(), Some(MatchMethod::Alias));
    assert_eq!(r1.category_values, vec![Some(84.0), Some(71.0), Some(62.0), Some(9.3)]);

    let mistral = row(&result, "mistralai/mistral-small-3.1-24b-instruct:free");
    assert_eq!(mistral.match_result.reason(), Some(UnmatchedReason::AliasTargetNotFound));
    assert!(mistral.base_metrics.is_empty());
    assert!(mistral.category_values.iter().all(Option::is_none));
}

#[test]
fn fixture_below_threshold_keeps_nearest() {
    let (_, result) = load_and_run();
    let qwen = row(&result, "qwen/qwen3-8b:free");
    match &qwen.match_result {
        MatchResult::Unmatched { reason, nearest: Some(c) } => {
            assert_eq!(*reason, UnmatchedReason::FuzzyBelowThreshold);
            assert_eq!(c.name, "Qwen3 14B");
            assert!(c.score < 0.90);
        }
        other => panic!("expected nearest candidate, got {other:?}"),
    }
}

#[test]
fn fixture_summary() {
    let (_, result) = load_and_run();
    let s = &result.summary;
    assert_eq!(s.total_rows, 6);
    assert_eq!(s.matched_alias, 1);
    assert_eq!(s.matched_fuzzy, 2);
    assert_eq!(s.unmatched, 3);
    assert_eq!(s.unmatched_by_reason["alias_target_not_found"], 1);
    assert_eq!(s.unmatched_by_reason["fuzzy_below_threshold"], 2);
    assert_eq!(s.benchmark_rows, 6);
    assert_eq!(s.categories, 4);
}

#[test]
fn fixture_table_applies_priority_and_rename() {
    let (config, result) = load_and_run();
    let table = assemble_table(&result, &config.report);
    assert_eq!(
        &table.headers[7..],
        &[
            "LiveCodeBench",
            "MMLU-Pro(Reasoning &Knowledge)",
            "GPQA Diamond(Scientific Reasoning)",
            "HumanityLast Exam(Reasoning &Knowledge)",
        ]
    );
    assert_eq!(table.rows.len(), 6);
    assert!(table.rows.iter().all(|r| r.len() == table.width()));
    assert_eq!(table.rows[2][3], "alias");
    assert_eq!(table.rows[2][7], "62");
}

#[test]
fn fixture_stale_alias_report() {
    let config = ReconConfig::from_toml(&read_fixture("free-models.recon.toml")).unwrap();
    let table = read_fixture(&config.benchmarks.file);
    let input = load_input("[]", &table, &config).unwrap();
    let aliases = AliasRegistry::load(&fixtures_dir().join("model_aliases.json")).unwrap();
    let stale = aliases.stale_entries(input.benchmarks.iter().map(|b| b.name.as_str()));
    assert_eq!(
        stale,
        vec![("mistralai/mistral-small-3.1-24b-instruct:free", "Mistral Small 3")]
    );
}

#[test]
fn fixture_json_shape() {
    let (_, result) = load_and_run();
    let json = serde_json::to_value(&result).unwrap();
    let first = &json["rows"][0];
    assert_eq!(first["match"]["status"], "matched");
    assert_eq!(first["match"]["method"], "fuzzy");
    let mistral = &json["rows"][3];
    assert_eq!(mistral["match"]["status"], "unmatched");
    assert_eq!(mistral["match"]["reason"], "alias_target_not_found");
    assert!(mistral["category_values"][0].is_null());
}

// -------------------------------------------------------------------------
// Worked examples
// -------------------------------------------------------------------------

fn free_source() -> SourceModel {
    SourceModel {
        id: "vendor/model-a".into(),
        display_name: "Model A".into(),
        pricing: [("prompt", "0"), ("completion", "0")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        context_length: None,
        description: None,
    }
}

fn bench(name: &str, score: f64) -> BenchmarkModel {
    let mut category_scores = CategoryScores::new();
    category_scores.insert("GPQA", Some(score));
    BenchmarkModel {
        name: name.into(),
        base_metrics: BaseMetrics {
            intelligence_index: Some(40.0),
            ..BaseMetrics::default()
        },
        category_scores,
    }
}

fn run_one(aliases: &AliasRegistry, benchmarks: Vec<BenchmarkModel>) -> ReconResult {
    let input = ReconInput {
        sources: vec![free_source()],
        benchmarks,
    };
    run(&ReconConfig::default(), aliases, &input).unwrap()
}

#[test]
fn example_fuzzy_match_above_threshold() {
    let result = run_one(&AliasRegistry::new(), vec![bench("Model A (Free)", 0.5)]);
    let r = &result.rows[0];
    assert_eq!(r.match_result.method(), Some(MatchMethod::Fuzzy));
    assert!(r.match_result.confidence().unwrap() >= 0.90);
    assert_eq!(r.base_metrics.intelligence_index, Some(40.0));
    assert_eq!(r.category_values, vec![Some(0.5)]);
}

#[test]
fn example_fuzzy_below_threshold_row_still_emitted() {
    let result = run_one(&AliasRegistry::new(), vec![bench("Model Alpha", 0.5)]);
    assert_eq!(result.rows.len(), 1);
    let r = &result.rows[0];
    assert_eq!(r.match_result.reason(), Some(UnmatchedReason::FuzzyBelowThreshold));
    assert!(r.base_metrics.is_empty());
    assert_eq!(r.category_values, vec![None]);
}

#[test]
fn example_stale_alias_blocks_good_fuzzy_candidate() {
    let aliases: AliasRegistry = vec![("vendor/model-a", "Model A (Free)")].into_iter().collect();
    let result = run_one(&aliases, vec![bench("Model A", 0.5)]);
    let r = &result.rows[0];
    assert_eq!(r.match_result.reason(), Some(UnmatchedReason::AliasTargetNotFound));
    assert!(r.base_metrics.is_empty());
}
