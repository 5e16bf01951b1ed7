use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::MatchingConfig;
use crate::model::Candidate;

/// Tokens dropped from both sides before scoring. They mark a serving
/// variant of a model rather than a different model.
pub const DEFAULT_NOISE_TOKENS: &[&str] =
    &["free", "instruct", "chat", "it", "preview", "exp", "experimental"];

/// Token-sort similarity over normalized model names.
///
/// Scores are in [0, 1], symmetric and deterministic. The matcher never
/// decides acceptance; that is the resolver's threshold.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    strip_provider_prefix: bool,
    noise_tokens: HashSet<String>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            strip_provider_prefix: true,
            noise_tokens: DEFAULT_NOISE_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl FuzzyMatcher {
    pub fn new(strip_provider_prefix: bool, noise_tokens: &[String]) -> Self {
        Self {
            strip_provider_prefix,
            noise_tokens: noise_tokens.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.strip_provider_prefix, &config.noise_tokens)
    }

    /// Lowercase, drop a `"Provider: "` prefix, turn punctuation into
    /// separators, drop noise tokens, then sort and re-join the tokens.
    pub fn normalize(&self, name: &str) -> String {
        let lower = name.to_lowercase();
        let body = match lower.split_once(':') {
            Some((_, rest)) if self.strip_provider_prefix => rest,
            _ => lower.as_str(),
        };

        let cleaned: String = body
            .chars()
            .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' { c } else { ' ' })
            .collect();

        let mut tokens: Vec<&str> = cleaned
            .split_whitespace()
            .map(|t| t.trim_matches('.'))
            .filter(|t| !t.is_empty() && !self.noise_tokens.contains(*t))
            .collect();
        tokens.sort_unstable();
        tokens.join(" ")
    }

    /// Similarity of two raw names. Zero when either side normalizes to nothing.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        similarity(&self.normalize(a), &self.normalize(b))
    }

    /// Highest-scoring candidate. Ties go to the shorter name, then to the
    /// lexically smaller one. Duplicate names are scored once.
    pub fn best_match<'a, I>(&self, source_name: &str, benchmark_names: I) -> Option<(String, f64)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.rank(source_name, benchmark_names)
            .into_iter()
            .next()
            .map(|c| (c.name, c.score))
    }

    /// Every distinct candidate, best first, in the same order `best_match` uses.
    pub fn rank<'a, I>(&self, source_name: &str, benchmark_names: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let source_key = self.normalize(source_name);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut candidates: Vec<Candidate> = benchmark_names
            .into_iter()
            .filter(|name| seen.insert(*name))
            .map(|name| Candidate {
                name: name.to_string(),
                score: similarity(&source_key, &self.normalize(name)),
            })
            .collect();
        candidates.sort_by(compare_candidates);
        candidates
    }
}

fn similarity(a_key: &str, b_key: &str) -> f64 {
    if a_key.is_empty() || b_key.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a_key, b_key)
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.name.chars().count().cmp(&b.name.chars().count()))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn normalize_strips_provider_and_noise() {
        let m = FuzzyMatcher::default();
        assert_eq!(m.normalize("Google: Gemma 3 27B (free)"), "27b 3 gemma");
        assert_eq!(m.normalize("Meta: Llama 3.3 70B Instruct"), "3.3 70b llama");
        assert_eq!(m.normalize("  Model   A  "), "a model");
    }

    #[test]
    fn normalize_without_prefix_stripping() {
        let m = FuzzyMatcher::new(false, &[]);
        assert_eq!(m.normalize("Google: Gemma"), "gemma google");
        assert_eq!(m.normalize("Model A (Free)"), "a free model");
    }

    #[test]
    fn identical_after_normalization() {
        let m = FuzzyMatcher::default();
        assert!(close(m.score("Model A (Free)", "Model A"), 1.0));
        assert!(close(m.score("Llama 3.3 70B Instruct", "Llama 3.3 Instruct 70B"), 1.0));
    }

    #[test]
    fn divergent_names_score_lower() {
        let m = FuzzyMatcher::default();
        // "a model" vs "alpha model": 4 edits over 11 chars
        assert!(close(m.score("Model A", "Model Alpha"), 1.0 - 4.0 / 11.0));
        // "27b 3 gemma" vs "12b 3 gemma": 2 edits over 11 chars
        assert!(close(m.score("Gemma 3 27B", "Gemma 3 12B"), 1.0 - 2.0 / 11.0));
    }

    #[test]
    fn empty_side_scores_zero() {
        let m = FuzzyMatcher::default();
        assert_eq!(m.score("(free)", "Model A"), 0.0);
        assert_eq!(m.score("Free", "(free)"), 0.0);
    }

    #[test]
    fn symmetric() {
        let m = FuzzyMatcher::default();
        let pairs = [
            ("Model A", "Model Alpha"),
            ("DeepSeek: R1 (free)", "DeepSeek R1 0528"),
            ("Qwen3 235B A22B", "Qwen3 235B"),
        ];
        for (a, b) in pairs {
            assert_eq!(m.score(a, b), m.score(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn best_match_picks_highest() {
        let m = FuzzyMatcher::default();
        let names = ["Model Alpha", "Model A", "Other Thing"];
        let (name, score) = m.best_match("Vendor: Model A (free)", names).unwrap();
        assert_eq!(name, "Model A");
        assert!(close(score, 1.0));
    }

    #[test]
    fn ties_prefer_shorter_then_lexical() {
        let m = FuzzyMatcher::default();
        let (name, _) = m.best_match("Model A", ["Model A (Free)", "Model A"]).unwrap();
        assert_eq!(name, "Model A");

        let (name, _) = m.best_match("Model A", ["model a", "Model A"]).unwrap();
        assert_eq!(name, "Model A");
    }

    #[test]
    fn no_candidates() {
        let m = FuzzyMatcher::default();
        assert!(m.best_match("Model A", std::iter::empty::<&str>()).is_none());
    }

    #[test]
    fn rank_deduplicates() {
        let m = FuzzyMatcher::default();
        let ranked = m.rank("Model A", ["Model A", "Model B", "Model A"]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Model A");
        assert_eq!(ranked[1].name, "Model B");
    }
}
