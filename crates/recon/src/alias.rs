//! Manual source-id -> benchmark-name overrides.
//!
//! The alias file is authoritative: when an id has an entry, the resolver
//! uses its target verbatim and never consults the fuzzy matcher.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::ReconError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasRegistry {
    entries: BTreeMap<String, String>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `"source_id": "Benchmark Name"` pairs.
    pub fn from_json(input: &str) -> Result<Self, ReconError> {
        Self::parse(input, "<inline>")
    }

    /// Load from disk. A missing file is an empty registry; a present but
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ReconError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "alias file not found, using empty registry");
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(ReconError::Io(format!("cannot read {}: {e}", path.display())));
            }
        };
        let registry = Self::parse(&text, &path.display().to_string())?;
        tracing::info!(path = %path.display(), aliases = registry.len(), "loaded alias registry");
        Ok(registry)
    }

    fn parse(input: &str, origin: &str) -> Result<Self, ReconError> {
        let malformed = |message: String| ReconError::AliasParse {
            path: origin.to_string(),
            message,
        };

        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| malformed(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| malformed("expected a JSON object of id -> name".into()))?;

        let mut entries = BTreeMap::new();
        for (id, target) in object {
            let name = target
                .as_str()
                .ok_or_else(|| malformed(format!("value for '{id}' is not a string")))?;
            if name.trim().is_empty() {
                return Err(malformed(format!("value for '{id}' is empty")));
            }
            entries.insert(id.clone(), name.to_string());
        }
        Ok(Self { entries })
    }

    pub fn insert(&mut self, source_id: impl Into<String>, benchmark_name: impl Into<String>) {
        self.entries.insert(source_id.into(), benchmark_name.into());
    }

    /// Exact-key lookup. No normalization of the id.
    pub fn lookup(&self, source_id: &str) -> Option<&str> {
        self.entries.get(source_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by source id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Aliases whose target does not name any benchmark row
    /// (case-insensitive), sorted by source id.
    pub fn stale_entries<'a, I>(&self, benchmark_names: I) -> Vec<(&str, &str)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: HashSet<String> = benchmark_names.into_iter().map(|n| n.to_lowercase()).collect();
        self.iter()
            .filter(|(_, target)| !known.contains(&target.to_lowercase()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = AliasRegistry::new();
        for (k, v) in iter {
            registry.insert(k, v);
        }
        registry
    }
}
