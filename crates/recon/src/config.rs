use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ReconError;
use crate::matcher::DEFAULT_NOISE_TOKENS;

/// Fuzzy candidates scoring below this are reported unmatched.
pub const DEFAULT_THRESHOLD: f64 = 0.90;

pub const DEFAULT_SOURCE_URL: &str = "https://openrouter.ai/api/v1/models";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub benchmarks: BenchmarkConfig,
    #[serde(default)]
    pub aliases: AliasConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: "Free models".into(),
            source: SourceConfig::default(),
            benchmarks: BenchmarkConfig::default(),
            aliases: AliasConfig::default(),
            matching: MatchingConfig::default(),
            report: ReportConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Source catalog
// ---------------------------------------------------------------------------

/// Where the pricing catalog comes from. `file` wins over `url`; `url`
/// defaults to the public OpenRouter listing.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            file: None,
            cache_dir: default_cache_dir(),
            cache_key: default_cache_key(),
        }
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_cache_dir() -> String {
    "cache".into()
}

fn default_cache_key() -> String {
    "openrouter_models.json".into()
}

// ---------------------------------------------------------------------------
// Benchmark table
// ---------------------------------------------------------------------------

/// The scraped leaderboard table and how its headers map onto the model.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default = "default_benchmark_file")]
    pub file: String,
    #[serde(flatten)]
    pub columns: BenchmarkColumns,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            file: default_benchmark_file(),
            columns: BenchmarkColumns::default(),
        }
    }
}

fn default_benchmark_file() -> String {
    "cache/artificial_analysis_leaderboard.json".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkColumns {
    #[serde(default = "default_name_column")]
    pub name_column: String,
    #[serde(default = "default_ignore_columns")]
    pub ignore_columns: Vec<String>,
    #[serde(default)]
    pub base_columns: BaseColumns,
}

impl Default for BenchmarkColumns {
    fn default() -> Self {
        Self {
            name_column: default_name_column(),
            ignore_columns: default_ignore_columns(),
            base_columns: BaseColumns::default(),
        }
    }
}

impl BenchmarkColumns {
    /// True for the name, base-metric and ignored headers; everything else
    /// is a category.
    pub fn is_reserved(&self, header: &str) -> bool {
        header == self.name_column
            || self.base_columns.contains(header)
            || self.ignore_columns.iter().any(|c| c == header)
    }
}

fn default_name_column() -> String {
    "Model".into()
}

fn default_ignore_columns() -> Vec<String> {
    vec!["Creator".into(), "ContextWindow".into()]
}

/// Table headers holding the fixed base metrics.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseColumns {
    #[serde(default = "default_intelligence_column")]
    pub intelligence_index: String,
    #[serde(default = "default_tps_column")]
    pub tokens_per_sec: String,
    #[serde(default = "default_ttft_column")]
    pub time_to_first_token: String,
}

impl Default for BaseColumns {
    fn default() -> Self {
        Self {
            intelligence_index: default_intelligence_column(),
            tokens_per_sec: default_tps_column(),
            time_to_first_token: default_ttft_column(),
        }
    }
}

impl BaseColumns {
    pub fn contains(&self, header: &str) -> bool {
        header == self.intelligence_index
            || header == self.tokens_per_sec
            || header == self.time_to_first_token
    }

    fn all(&self) -> [&str; 3] {
        [&self.intelligence_index, &self.tokens_per_sec, &self.time_to_first_token]
    }
}

fn default_intelligence_column() -> String {
    "ArtificialAnalysisIntelligence Index".into()
}

fn default_tps_column() -> String {
    "MedianTokens/s".into()
}

fn default_ttft_column() -> String {
    "LatencyFirst Answer Chunk (s)".into()
}

// ---------------------------------------------------------------------------
// Aliases + Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AliasConfig {
    #[serde(default = "default_alias_file")]
    pub file: String,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self { file: default_alias_file() }
    }
}

fn default_alias_file() -> String {
    "model_aliases.json".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_true")]
    pub strip_provider_prefix: bool,
    #[serde(default = "default_noise_tokens")]
    pub noise_tokens: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strip_provider_prefix: true,
            noise_tokens: default_noise_tokens(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_noise_tokens() -> Vec<String> {
    DEFAULT_NOISE_TOKENS.iter().map(|t| t.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Report + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Category keys pulled to the front, in this order, when present.
    #[serde(default)]
    pub column_priority: Vec<String>,
    /// Category key -> display header.
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            column_priority: Vec::new(),
            rename: BTreeMap::new(),
        }
    }
}

fn default_title() -> String {
    "Free Models Performance Report".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let threshold = self.matching.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ReconError::ConfigValidation(format!(
                "matching.threshold must be within [0, 1], got {threshold}"
            )));
        }

        if self.source.file.is_none() && self.source.url.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "source.url must not be empty unless source.file is set".into(),
            ));
        }

        let cols = &self.benchmarks.columns;
        if cols.name_column.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "benchmarks.name_column must not be empty".into(),
            ));
        }

        let base = cols.base_columns.all();
        for (i, header) in base.iter().enumerate() {
            if *header == cols.name_column {
                return Err(ReconError::ConfigValidation(format!(
                    "base column '{header}' is also the name column"
                )));
            }
            if cols.ignore_columns.iter().any(|c| c == header) {
                return Err(ReconError::ConfigValidation(format!(
                    "base column '{header}' is also listed in ignore_columns"
                )));
            }
            if base[..i].contains(header) {
                return Err(ReconError::ConfigValidation(format!(
                    "base column '{header}' is mapped to more than one metric"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
