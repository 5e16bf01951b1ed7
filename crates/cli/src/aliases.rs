//! `modelmatch aliases`: alias file maintenance.

use std::path::PathBuf;

use clap::Subcommand;

use crate::exit_codes::EXIT_STALE_ALIAS;
use crate::project::Project;
use crate::CliError;

#[derive(Subcommand)]
pub enum AliasCommands {
    /// List aliases whose target name is missing from the benchmark catalog
    #[command(after_help = "\
Examples:
  modelmatch aliases check free.recon.toml
  modelmatch aliases check free.recon.toml --json")]
    Check {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of a human list
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_aliases(cmd: AliasCommands) -> Result<(), CliError> {
    match cmd {
        AliasCommands::Check { config, json } => cmd_aliases_check(config, json),
    }
}

#[derive(serde::Serialize)]
struct StaleAlias<'a> {
    source_id: &'a str,
    target: &'a str,
}

fn cmd_aliases_check(config: PathBuf, json: bool) -> Result<(), CliError> {
    let project = Project::load(&config)?;
    let aliases = project.load_aliases()?;
    let table = project.benchmark_json()?;
    let benchmarks =
        modelmatch_recon::catalog::parse_benchmark_table(&table, &project.config.benchmarks.columns)?;

    let stale = aliases.stale_entries(benchmarks.iter().map(|b| b.name.as_str()));

    if json {
        let out: Vec<StaleAlias> = stale
            .iter()
            .map(|&(source_id, target)| StaleAlias { source_id, target })
            .collect();
        let text = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    } else {
        for (source_id, target) in &stale {
            println!("{source_id}\t{target}");
        }
    }

    eprintln!(
        "{} aliases, {} stale ({} benchmark rows)",
        aliases.len(),
        stale.len(),
        benchmarks.len()
    );

    if stale.is_empty() {
        Ok(())
    } else {
        Err(CliError {
            code: EXIT_STALE_ALIAS,
            message: format!("{} alias target(s) not found in the benchmark catalog", stale.len()),
            hint: Some(format!("update {}", project.alias_path().display())),
        })
    }
}
