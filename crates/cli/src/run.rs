//! `modelmatch run`, `validate` and `match`.

use std::path::{Path, PathBuf};

use clap::Args;
use modelmatch_recon::report::assemble_table;
use modelmatch_recon::{FuzzyMatcher, ReconResult};

use crate::exit_codes::EXIT_STALE_ALIAS;
use crate::project::{FetchMode, Project};
use crate::render::{self, RenderMeta};
use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Path to the .recon.toml config file
    pub config: PathBuf,

    /// Output JSON to stdout instead of human summary
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the Markdown report to file
    #[arg(long)]
    pub markdown: Option<PathBuf>,

    /// Write the sortable HTML report to file
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Write the report table as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Re-download the source catalog even if cached
    #[arg(long)]
    pub refresh: bool,

    /// Never touch the network; the source catalog must be cached or a file
    #[arg(long)]
    pub offline: bool,

    /// Exit 6 when any alias target is missing from the benchmark catalog
    #[arg(long)]
    pub fail_on_stale_alias: bool,
}

/// Where each output goes. CLI flags win over `[output]` in the config,
/// whose paths are config-relative.
struct OutputPaths {
    json: Option<PathBuf>,
    markdown: Option<PathBuf>,
    html: Option<PathBuf>,
    csv: Option<PathBuf>,
}

impl OutputPaths {
    fn new(args: &RunArgs, project: &Project) -> Self {
        let out = &project.config.output;
        let pick = |flag: &Option<PathBuf>, configured: &Option<String>| {
            flag.clone().or_else(|| configured.as_deref().map(|p| project.resolve(p)))
        };
        Self {
            json: pick(&args.output, &out.json),
            markdown: pick(&args.markdown, &out.markdown),
            html: pick(&args.html, &out.html),
            csv: pick(&args.csv, &out.csv),
        }
    }
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mode = FetchMode::from_flags(args.refresh, args.offline)?;
    let project = Project::load(&args.config)?;
    let aliases = project.load_aliases()?;
    let input = project.load_input(mode)?;

    let result = modelmatch_recon::run(&project.config, &aliases, &input)?;
    let stale = aliases.stale_entries(input.benchmarks.iter().map(|b| b.name.as_str()));

    let paths = OutputPaths::new(&args, &project);
    write_outputs(&result, &project, &paths)?;

    if args.json {
        println!("{}", to_json(&result)?);
    }

    print_summary(&result);
    for (source_id, target) in &stale {
        eprintln!("stale alias: {source_id} -> \"{target}\"");
    }

    if args.fail_on_stale_alias && !stale.is_empty() {
        return Err(CliError {
            code: EXIT_STALE_ALIAS,
            message: format!("{} stale alias(es) (--fail-on-stale-alias)", stale.len()),
            hint: Some(format!("update {}", project.alias_path().display())),
        });
    }
    Ok(())
}

fn to_json(result: &ReconResult) -> Result<String, CliError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))
}

fn write_outputs(result: &ReconResult, project: &Project, paths: &OutputPaths) -> Result<(), CliError> {
    if let Some(path) = &paths.json {
        write_file(path, to_json(result)?.as_bytes())?;
    }

    if paths.markdown.is_none() && paths.html.is_none() && paths.csv.is_none() {
        return Ok(());
    }

    let table = assemble_table(result, &project.config.report);
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let html_link = paths.html.as_deref().and_then(|html| relative_link(paths.markdown.as_deref(), html));
    let meta = RenderMeta {
        title: &project.config.report.title,
        generated_at: &generated_at,
        html_link: html_link.as_deref(),
    };

    if let Some(path) = &paths.markdown {
        write_file(path, render::markdown(&table, &meta).as_bytes())?;
    }
    if let Some(path) = &paths.html {
        write_file(path, render::html(&table, &meta).as_bytes())?;
    }
    if let Some(path) = &paths.csv {
        write_file(path, &render::csv(&table)?)?;
    }
    Ok(())
}

/// Link text for the HTML report from inside the Markdown report. Only
/// emitted when both live in the same directory.
fn relative_link(markdown: Option<&Path>, html: &Path) -> Option<String> {
    let markdown = markdown?;
    if markdown.parent() != html.parent() {
        return None;
    }
    html.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::io(format!("cannot create {}: {e}", parent.display())))?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "{}: {} free models, {} matched ({} alias, {} fuzzy), {} unmatched; {} benchmark rows, {} categories",
        result.meta.config_name,
        s.total_rows,
        s.matched_alias + s.matched_fuzzy,
        s.matched_alias,
        s.matched_fuzzy,
        s.unmatched,
        s.benchmark_rows,
        s.categories,
    );
    for (reason, count) in &s.unmatched_by_reason {
        eprintln!("  unmatched {reason}: {count}");
    }
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    let project = Project::load(&config)?;
    let aliases = project.load_aliases()?;
    eprintln!(
        "{}: config ok (threshold {}), {} aliases",
        project.config.name,
        project.config.matching.threshold,
        aliases.len()
    );
    Ok(())
}

// ============================================================================
// match
// ============================================================================

#[derive(serde::Serialize)]
struct MatchReport<'a> {
    query: &'a str,
    normalized: String,
    threshold: f64,
    candidates: Vec<CandidateLine>,
}

#[derive(serde::Serialize)]
struct CandidateLine {
    name: String,
    normalized: String,
    score: f64,
    accepted: bool,
}

/// Show how a display name scores against the benchmark catalog. Aliases
/// are not consulted; this is the fuzzy path only.
pub fn cmd_match(config: PathBuf, name: String, top: usize, json: bool) -> Result<(), CliError> {
    let project = Project::load(&config)?;
    let table = project.benchmark_json()?;
    let benchmarks =
        modelmatch_recon::catalog::parse_benchmark_table(&table, &project.config.benchmarks.columns)?;

    let matcher = FuzzyMatcher::from_config(&project.config.matching);
    let threshold = project.config.matching.threshold;
    let candidates: Vec<CandidateLine> = matcher
        .rank(&name, benchmarks.iter().map(|b| b.name.as_str()))
        .into_iter()
        .take(top.max(1))
        .map(|c| CandidateLine {
            normalized: matcher.normalize(&c.name),
            accepted: c.score >= threshold,
            name: c.name,
            score: c.score,
        })
        .collect();

    let report = MatchReport {
        query: &name,
        normalized: matcher.normalize(&name),
        threshold,
        candidates,
    };

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    println!("query: {} [{}]", report.query, report.normalized);
    if report.candidates.is_empty() {
        println!("no candidates (benchmark catalog is empty)");
    }
    for c in &report.candidates {
        println!(
            "{:.4}  {}  {} [{}]",
            c.score,
            if c.accepted { "accept" } else { "reject" },
            c.name,
            c.normalized,
        );
    }
    Ok(())
}
