use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One listing from the pricing catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceModel {
    pub id: String,
    pub display_name: String,
    /// Price field name -> decimal string, as published upstream.
    pub pricing: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SourceModel {
    /// True when every price field is numerically zero.
    ///
    /// An entry with no price fields at all counts as free, matching how the
    /// upstream catalog lists community endpoints.
    pub fn is_free(&self) -> bool {
        self.pricing.values().all(|v| is_zero_price(v))
    }
}

/// `"0"`, `"0.0"`, `"-0"`, `"0.000000"` are zero. Anything else (including
/// empty or non-numeric strings) is not.
pub fn is_zero_price(value: &str) -> bool {
    let v = value.trim();
    let v = v.strip_prefix(['-', '+']).unwrap_or(v);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in v.chars() {
        match c {
            '0' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// The fixed metrics every benchmark row carries (each may be blank).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BaseMetrics {
    pub intelligence_index: Option<f64>,
    pub tokens_per_sec: Option<f64>,
    pub time_to_first_token: Option<f64>,
}

impl BaseMetrics {
    pub fn is_empty(&self) -> bool {
        self.intelligence_index.is_none()
            && self.tokens_per_sec.is_none()
            && self.time_to_first_token.is_none()
    }
}

/// Category key -> score, kept in the order the scrape produced the columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScores {
    entries: Vec<(String, Option<f64>)>,
}

impl CategoryScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Overwriting keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<f64>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Score for `key`; `None` when the key is absent or the cell was blank.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).and_then(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Option<f64>)> for CategoryScores {
    fn from_iter<I: IntoIterator<Item = (K, Option<f64>)>>(iter: I) -> Self {
        let mut scores = CategoryScores::new();
        for (k, v) in iter {
            scores.insert(k, v);
        }
        scores
    }
}

impl Serialize for CategoryScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One scraped leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkModel {
    pub name: String,
    pub base_metrics: BaseMetrics,
    pub category_scores: CategoryScores,
}

/// Both catalogs, already fetched and parsed.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    /// Free-tier entries only, one per id.
    pub sources: Vec<SourceModel>,
    pub benchmarks: Vec<BenchmarkModel>,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Alias,
    Fuzzy,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alias => write!(f, "alias"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    NoAliasAndNoFuzzyCandidate,
    FuzzyBelowThreshold,
    AliasTargetNotFound,
}

impl UnmatchedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAliasAndNoFuzzyCandidate => "no_alias_and_no_fuzzy_candidate",
            Self::FuzzyBelowThreshold => "fuzzy_below_threshold",
            Self::AliasTargetNotFound => "alias_target_not_found",
        }
    }
}

impl std::fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored fuzzy candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub score: f64,
}

/// Outcome of resolving one source entry against the benchmark catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    Matched {
        /// Position of the matched row in the benchmark catalog.
        benchmark_index: usize,
        benchmark_name: String,
        method: MatchMethod,
        /// 1.0 for alias matches; the similarity score for fuzzy ones.
        confidence: f64,
    },
    Unmatched {
        reason: UnmatchedReason,
        /// Best rejected candidate, only for `fuzzy_below_threshold`.
        #[serde(skip_serializing_if = "Option::is_none")]
        nearest: Option<Candidate>,
    },
}

impl MatchResult {
    pub fn unmatched(reason: UnmatchedReason) -> Self {
        Self::Unmatched { reason, nearest: None }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    pub fn method(&self) -> Option<MatchMethod> {
        match self {
            Self::Matched { method, .. } => Some(*method),
            Self::Unmatched { .. } => None,
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Self::Matched { confidence, .. } => Some(*confidence),
            Self::Unmatched { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<UnmatchedReason> {
        match self {
            Self::Matched { .. } => None,
            Self::Unmatched { reason, .. } => Some(*reason),
        }
    }

    /// Short provenance label for report cells: `alias`, `fuzzy (0.95)`,
    /// `unmatched (fuzzy_below_threshold)`.
    pub fn label(&self) -> String {
        match self {
            Self::Matched { method: MatchMethod::Alias, .. } => "alias".to_string(),
            Self::Matched { method: MatchMethod::Fuzzy, confidence, .. } => {
                format!("fuzzy ({confidence:.2})")
            }
            Self::Unmatched { reason, .. } => format!("unmatched ({reason})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One report line: a free source entry plus whatever metrics it matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub source_id: String,
    pub display_name: String,
    pub context_length: Option<u64>,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
    pub base_metrics: BaseMetrics,
    /// One slot per discovered category, aligned with `ReconResult::categories`.
    pub category_values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    pub matched_alias: usize,
    pub matched_fuzzy: usize,
    pub unmatched: usize,
    pub unmatched_by_reason: BTreeMap<String, usize>,
    pub benchmark_rows: usize,
    pub categories: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub threshold: f64,
    pub engine_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    /// Discovered category keys, in column order.
    pub categories: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub summary: ReconSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pricing: &[(&str, &str)]) -> SourceModel {
        SourceModel {
            id: "vendor/model-a".into(),
            display_name: "Model A".into(),
            pricing: pricing.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            context_length: None,
            description: None,
        }
    }

    #[test]
    fn zero_price_forms() {
        assert!(is_zero_price("0"));
        assert!(is_zero_price("0.0"));
        assert!(is_zero_price("0.000000"));
        assert!(is_zero_price(" -0 "));
        assert!(!is_zero_price(""));
        assert!(!is_zero_price("."));
        assert!(!is_zero_price("0.0000001"));
        assert!(!is_zero_price("0..0"));
        assert!(!is_zero_price("free"));
    }

    #[test]
    fn free_requires_every_field_zero() {
        assert!(source(&[("prompt", "0"), ("completion", "0")]).is_free());
        assert!(!source(&[("prompt", "0"), ("completion", "0.000002")]).is_free());
        assert!(source(&[]).is_free());
    }

    #[test]
    fn category_scores_keep_insertion_order() {
        let mut scores = CategoryScores::new();
        scores.insert("MMLU-Pro", Some(0.8));
        scores.insert("GPQA", None);
        scores.insert("MMLU-Pro", Some(0.9));
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["MMLU-Pro", "GPQA"]);
        assert_eq!(scores.value("MMLU-Pro"), Some(0.9));
        assert_eq!(scores.value("GPQA"), None);
        assert!(scores.contains_key("GPQA"));
        assert!(!scores.contains_key("HLE"));
    }

    #[test]
    fn category_scores_serialize_as_ordered_map() {
        let scores: CategoryScores = vec![("b", Some(1.0)), ("a", None)].into_iter().collect();
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"b":1.0,"a":null}"#);
    }

    #[test]
    fn match_labels() {
        let alias = MatchResult::Matched {
            benchmark_index: 0,
            benchmark_name: "Model A".into(),
            method: MatchMethod::Alias,
            confidence: 1.0,
        };
        let fuzzy = MatchResult::Matched {
            benchmark_index: 0,
            benchmark_name: "Model A".into(),
            method: MatchMethod::Fuzzy,
            confidence: 0.954,
        };
        assert_eq!(alias.label(), "alias");
        assert_eq!(fuzzy.label(), "fuzzy (0.95)");
        assert_eq!(
            MatchResult::unmatched(UnmatchedReason::AliasTargetNotFound).label(),
            "unmatched (alias_target_not_found)"
        );
    }

    #[test]
    fn match_result_serializes_tagged() {
        let r = MatchResult::unmatched(UnmatchedReason::FuzzyBelowThreshold);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["status"], "unmatched");
        assert_eq!(v["reason"], "fuzzy_below_threshold");
        assert!(v.get("nearest").is_none());
    }
}
