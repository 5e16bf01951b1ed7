//! A loaded `.recon.toml` plus the directory its relative paths resolve
//! against. Every command starts here.

use std::path::{Path, PathBuf};

use modelmatch_recon::{AliasRegistry, ReconConfig, ReconInput};

use crate::exit_codes::{EXIT_CONFIG_INVALID, EXIT_INPUT};
use crate::fetch::cache::{CacheStore, DirCache};
use crate::fetch::client::CatalogClient;
use crate::CliError;

/// How the source catalog may be obtained when no `[source].file` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Use the cache if present, download otherwise.
    Cached,
    /// Always download and overwrite the cache.
    Refresh,
    /// Never touch the network.
    Offline,
}

impl FetchMode {
    pub fn from_flags(refresh: bool, offline: bool) -> Result<Self, CliError> {
        match (refresh, offline) {
            (true, true) => Err(CliError::args("--refresh and --offline are mutually exclusive")),
            (true, false) => Ok(Self::Refresh),
            (false, true) => Ok(Self::Offline),
            (false, false) => Ok(Self::Cached),
        }
    }
}

pub struct Project {
    pub config: ReconConfig,
    pub config_path: PathBuf,
    pub base_dir: PathBuf,
}

impl Project {
    pub fn load(config_path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(config_path).map_err(|e| CliError {
            code: EXIT_CONFIG_INVALID,
            message: format!("cannot read config {}: {e}", config_path.display()),
            hint: None,
        })?;
        let config = ReconConfig::from_toml(&text)?;

        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        tracing::debug!(config = %config_path.display(), name = %config.name, "config loaded");
        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            base_dir,
        })
    }

    /// Config-relative path. Absolute paths pass through.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn cache(&self) -> DirCache {
        DirCache::new(self.resolve(&self.config.source.cache_dir))
    }

    pub fn alias_path(&self) -> PathBuf {
        self.resolve(&self.config.aliases.file)
    }

    pub fn load_aliases(&self) -> Result<AliasRegistry, CliError> {
        Ok(AliasRegistry::load(&self.alias_path())?)
    }

    /// Raw source catalog JSON: the configured file, else the cache or the
    /// network per `mode`.
    pub fn source_json(&self, mode: FetchMode) -> Result<String, CliError> {
        if let Some(file) = &self.config.source.file {
            return read_input(&self.resolve(file), "source catalog");
        }

        let url = self.config.source.url.as_str();
        let cache = self.cache();
        let key = &self.config.source.cache_key;

        let bytes = match mode {
            FetchMode::Offline => cache.get(key).ok_or_else(|| {
                CliError {
                    code: EXIT_INPUT,
                    message: format!(
                        "no cached source catalog at {} (offline)",
                        cache.dir().join(key).display()
                    ),
                    hint: None,
                }
                .with_hint(format!("run `modelmatch fetch {}` first", self.config_path.display()))
            })?,
            FetchMode::Cached | FetchMode::Refresh => {
                CatalogClient::new()?.fetch_cached(&cache, key, url, mode == FetchMode::Refresh)?
            }
        };

        String::from_utf8(bytes).map_err(|e| CliError {
            code: EXIT_INPUT,
            message: format!("source catalog is not UTF-8: {e}"),
            hint: None,
        })
    }

    pub fn benchmark_json(&self) -> Result<String, CliError> {
        read_input(&self.resolve(&self.config.benchmarks.file), "benchmark catalog").map_err(|e| {
            e.with_hint("export the leaderboard table as a JSON array of row objects")
        })
    }

    pub fn load_input(&self, mode: FetchMode) -> Result<ReconInput, CliError> {
        let benchmark_json = self.benchmark_json()?;
        let source_json = self.source_json(mode)?;
        Ok(modelmatch_recon::load_input(&source_json, &benchmark_json, &self.config)?)
    }
}

fn read_input(path: &Path, what: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_INPUT,
        message: format!("cannot read {what} {}: {e}", path.display()),
        hint: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("free.recon.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "name = \"t\"\n[aliases]\nfile = \"a.json\"\n");
        let project = Project::load(&path).unwrap();
        assert_eq!(project.alias_path(), dir.path().join("a.json"));
        assert_eq!(project.cache().dir(), dir.path().join("cache"));
    }

    #[test]
    fn missing_config_is_config_error() {
        let err = Project::load(Path::new("/nonexistent/x.recon.toml")).err().unwrap();
        assert_eq!(err.code, EXIT_CONFIG_INVALID);
    }

    #[test]
    fn invalid_threshold_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "name = \"t\"\n[matching]\nthreshold = 2.0\n");
        let err = Project::load(&path).err().unwrap();
        assert_eq!(err.code, EXIT_CONFIG_INVALID);
    }

    #[test]
    fn offline_without_cache_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "name = \"t\"\n");
        let project = Project::load(&path).unwrap();
        let err = project.source_json(FetchMode::Offline).err().unwrap();
        assert_eq!(err.code, EXIT_INPUT);
        assert!(err.hint.unwrap().contains("modelmatch fetch"));
    }

    #[test]
    fn offline_reads_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "name = \"t\"\n");
        let project = Project::load(&path).unwrap();
        project.cache().put("openrouter_models.json", b"{\"data\": []}").unwrap();
        assert_eq!(project.source_json(FetchMode::Offline).unwrap(), "{\"data\": []}");
    }

    #[test]
    fn fetch_mode_flags() {
        assert_eq!(FetchMode::from_flags(false, false).unwrap(), FetchMode::Cached);
        assert_eq!(FetchMode::from_flags(true, false).unwrap(), FetchMode::Refresh);
        assert_eq!(FetchMode::from_flags(false, true).unwrap(), FetchMode::Offline);
        assert!(FetchMode::from_flags(true, true).is_err());
    }
}
