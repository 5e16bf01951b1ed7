// modelmatch CLI - free-tier model catalog x benchmark leaderboard reports

mod aliases;
mod exit_codes;
mod fetch;
mod project;
mod render;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "modelmatch")]
#[command(about = "Match free-tier models to benchmark leaderboard rows and build reports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). MODELMATCH_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match free models against the benchmark catalog and write reports
    #[command(after_help = "\
Examples:
  modelmatch run free.recon.toml
  modelmatch run free.recon.toml --json
  modelmatch run free.recon.toml --markdown report.md --html report.html
  modelmatch run free.recon.toml --offline --fail-on-stale-alias")]
    Run(run::RunArgs),

    /// Validate a config and its alias file without running
    #[command(after_help = "\
Examples:
  modelmatch validate free.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },

    /// Download the source catalog into the cache
    #[command(after_help = "\
Examples:
  modelmatch fetch free.recon.toml
  modelmatch fetch free.recon.toml --refresh")]
    Fetch {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Re-download even if a cached copy exists
        #[arg(long)]
        refresh: bool,
    },

    /// Alias file maintenance
    Aliases {
        #[command(subcommand)]
        command: aliases::AliasCommands,
    },

    /// Show fuzzy candidates for a model name
    #[command(after_help = "\
Examples:
  modelmatch match free.recon.toml \"Google: Gemma 3 27B (free)\"
  modelmatch match free.recon.toml \"Llama 3.3 70B\" --top 10 --json")]
    Match {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Display name to score
        name: String,

        /// Number of candidates to show
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  modelmatch-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  modelmatch-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

/// Logs go to stderr so `--json` stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("MODELMATCH_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => run::cmd_run(args),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Fetch { config, refresh } => fetch::cmd_fetch(config, refresh),
        Commands::Aliases { command } => aliases::cmd_aliases(command),
        Commands::Match { config, name, top, json } => run::cmd_match(config, name, top, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
