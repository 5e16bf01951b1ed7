//! `modelmatch-recon`: Free-tier model catalog to benchmark catalog matching.
//!
//! Pure engine crate: receives pre-loaded catalogs and an alias registry,
//! returns one merged row per free source entry. No CLI, network or clock.

pub mod alias;
pub mod catalog;
pub mod config;
pub mod discover;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod model;
pub mod report;
pub mod resolve;
pub mod summary;

pub use alias::AliasRegistry;
pub use config::ReconConfig;
pub use engine::{load_input, run};
pub use error::ReconError;
pub use matcher::FuzzyMatcher;
pub use model::{
    BaseMetrics, BenchmarkModel, Candidate, CategoryScores, MatchMethod, MatchResult, ReconInput,
    ReconResult, ReconSummary, ReportRow, SourceModel, UnmatchedReason,
};
pub use report::{assemble_table, Table};
pub use resolve::MatchResolver;
