//! `modelmatch fetch`: download the source catalog into the cache.

pub mod cache;
pub mod client;

use std::path::PathBuf;

use crate::project::{FetchMode, Project};
use crate::CliError;

pub fn cmd_fetch(config: PathBuf, refresh: bool) -> Result<(), CliError> {
    let project = Project::load(&config)?;

    if let Some(file) = &project.config.source.file {
        eprintln!(
            "source catalog is read from {}; nothing to fetch",
            project.resolve(file).display()
        );
        return Ok(());
    }

    let mode = if refresh { FetchMode::Refresh } else { FetchMode::Cached };
    let json = project.source_json(mode)?;
    let models = modelmatch_recon::catalog::parse_source_catalog(&json)?;
    let free = models.iter().filter(|m| m.is_free()).count();

    let cache = project.cache();
    eprintln!(
        "source catalog: {} models ({} free) in {}",
        models.len(),
        free,
        cache.dir().join(&project.config.source.cache_key).display(),
    );
    Ok(())
}
