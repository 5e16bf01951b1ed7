//! CLI Exit Code Registry
//!
//! Single source of truth for `modelmatch` exit codes. Scripts and CI jobs
//! rely on them, so existing values never change meaning.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                                    |
//! |---------|------------|------------------------------------------------|
//! | 0       | Universal  | Success                                        |
//! | 1       | Universal  | General error (unspecified)                    |
//! | 2       | Universal  | CLI usage error (bad args)                     |
//! | 3-9     | run        | Config, alias file, input catalogs, staleness  |
//! | 50-59   | fetch      | Source catalog download                        |

use modelmatch_recon::ReconError;

use crate::CliError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Run (3-9)
// =============================================================================

/// Config file unreadable, unparsable, or failed validation.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// Alias file present but malformed.
pub const EXIT_ALIAS_INVALID: u8 = 4;

/// A catalog is missing, unreadable, or unparsable.
pub const EXIT_INPUT: u8 = 5;

/// Alias targets missing from the benchmark catalog
/// (`aliases check`, or `run --fail-on-stale-alias`).
pub const EXIT_STALE_ALIAS: u8 = 6;

// =============================================================================
// Fetch (50-59)
// =============================================================================

/// Auth rejected by upstream (401/403).
pub const EXIT_FETCH_AUTH: u8 = 51;

/// Request rejected by upstream (400).
pub const EXIT_FETCH_VALIDATION: u8 = 52;

/// Rate limited after retries (429).
pub const EXIT_FETCH_RATE_LIMIT: u8 = 53;

/// Upstream error (other 4xx, 5xx, bad body) or network failure after retries.
pub const EXIT_FETCH_UPSTREAM: u8 = 54;

// =============================================================================
// Engine errors
// =============================================================================

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG_INVALID,
        ReconError::AliasParse { .. } => EXIT_ALIAS_INVALID,
        ReconError::CatalogParse { .. } | ReconError::Io(_) => EXIT_INPUT,
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::AliasParse { .. } => {
                Some("the alias file must be a JSON object of \"source id\": \"Benchmark Name\"".to_string())
            }
            ReconError::ConfigValidation(_) => {
                Some("run `modelmatch validate <config>` after editing".to_string())
            }
            _ => None,
        };
        CliError {
            code: recon_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_run_range() {
        assert_eq!(recon_exit_code(&ReconError::ConfigParse("x".into())), EXIT_CONFIG_INVALID);
        assert_eq!(recon_exit_code(&ReconError::ConfigValidation("x".into())), EXIT_CONFIG_INVALID);
        assert_eq!(
            recon_exit_code(&ReconError::AliasParse { path: "a.json".into(), message: "x".into() }),
            EXIT_ALIAS_INVALID
        );
        assert_eq!(
            recon_exit_code(&ReconError::CatalogParse { catalog: "source".into(), message: "x".into() }),
            EXIT_INPUT
        );
    }

    #[test]
    fn alias_errors_carry_hint() {
        let err: CliError = ReconError::AliasParse { path: "a.json".into(), message: "x".into() }.into();
        assert_eq!(err.code, EXIT_ALIAS_INVALID);
        assert!(err.hint.is_some());
    }
}
