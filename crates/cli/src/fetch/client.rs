//! HTTP client for the source catalog.
//!
//! Retries 429, 5xx and network failures with exponential backoff, fails
//! fast on other 4xx, and maps every failure onto the fetch exit codes.
//! Bodies are checked to be JSON before they reach the cache.

use std::thread;
use std::time::Duration;

use crate::exit_codes;
use crate::fetch::cache::CacheStore;
use crate::CliError;

pub(crate) const MAX_RETRIES: u32 = 3;
/// Upper bound on a server-requested `Retry-After` wait.
pub(crate) const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);
pub(crate) const USER_AGENT: &str = concat!("modelmatch/", env!("CARGO_PKG_VERSION"));

pub struct CatalogClient {
    http: reqwest::blocking::Client,
    initial_backoff: Duration,
}

impl CatalogClient {
    pub fn new() -> Result<Self, CliError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError {
                code: exit_codes::EXIT_ERROR,
                message: format!("failed to build HTTP client: {e}"),
                hint: None,
            })?;
        Ok(Self {
            http,
            initial_backoff: Duration::from_secs(1),
        })
    }

    /// Override the first retry delay. Doubles on every retry.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Return cached bytes for `key` unless `refresh` is set; otherwise
    /// download `url` and store the body under `key`.
    pub fn fetch_cached(
        &self,
        store: &dyn CacheStore,
        key: &str,
        url: &str,
        refresh: bool,
    ) -> Result<Vec<u8>, CliError> {
        if !refresh {
            if let Some(bytes) = store.get(key) {
                tracing::info!(key, "using cached source catalog");
                return Ok(bytes);
            }
        }

        let bytes = self.get_json_bytes(url)?;
        if let Err(e) = store.put(key, &bytes) {
            // Not fatal: the body is still returned.
            tracing::warn!(key, error = %e, "could not write cache entry");
        }
        Ok(bytes)
    }

    /// GET with retry + exponential backoff. The body must parse as JSON.
    pub fn get_json_bytes(&self, url: &str) -> Result<Vec<u8>, CliError> {
        let mut backoff = self.initial_backoff;

        for attempt in 0..=MAX_RETRIES {
            tracing::info!(url, attempt = attempt + 1, "requesting source catalog");
            match self.http.get(url).send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    if status == 401 || status == 403 {
                        return Err(fetch_err(
                            exit_codes::EXIT_FETCH_AUTH,
                            format!("source catalog auth failed ({status})"),
                        ));
                    }
                    if status == 400 {
                        return Err(fetch_err(
                            exit_codes::EXIT_FETCH_VALIDATION,
                            format!("source catalog request rejected ({status})"),
                        ));
                    }
                    if (400..500).contains(&status) && status != 429 {
                        return Err(fetch_err(
                            exit_codes::EXIT_FETCH_UPSTREAM,
                            format!("source catalog error ({status})"),
                        ));
                    }

                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            let (code, what) = if status == 429 {
                                (exit_codes::EXIT_FETCH_RATE_LIMIT, "rate limited")
                            } else {
                                (exit_codes::EXIT_FETCH_UPSTREAM, "upstream error")
                            };
                            return Err(fetch_err(
                                code,
                                format!("source catalog {what} after {MAX_RETRIES} retries ({status})"),
                            ));
                        }

                        let wait = if status == 429 {
                            retry_after(&resp).unwrap_or(backoff)
                        } else {
                            backoff
                        };
                        tracing::warn!(
                            retry = attempt + 1,
                            max = MAX_RETRIES,
                            wait_ms = wait.as_millis() as u64,
                            status,
                            "retrying source catalog fetch"
                        );
                        thread::sleep(wait);
                        backoff *= 2;
                        continue;
                    }

                    let bytes = resp.bytes().map_err(|e| {
                        fetch_err(
                            exit_codes::EXIT_FETCH_UPSTREAM,
                            format!("failed to read source catalog body: {e}"),
                        )
                    })?;
                    if let Err(e) = serde_json::from_slice::<serde_json::Value>(&bytes) {
                        let preview = String::from_utf8_lossy(&bytes[..bytes.len().min(200)]).into_owned();
                        return Err(fetch_err(
                            exit_codes::EXIT_FETCH_UPSTREAM,
                            format!("source catalog is not JSON: {e} (body: {preview})"),
                        ));
                    }
                    return Ok(bytes.to_vec());
                }
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(fetch_err(
                            exit_codes::EXIT_FETCH_UPSTREAM,
                            format!("source catalog unreachable after {MAX_RETRIES} retries: {e}"),
                        )
                        .with_hint("use --offline with a cached catalog, or set [source].file"));
                    }
                    tracing::warn!(
                        retry = attempt + 1,
                        max = MAX_RETRIES,
                        error = %e,
                        "network error, retrying source catalog fetch"
                    );
                    thread::sleep(backoff);
                    backoff *= 2;
                }
            }
        }

        Err(fetch_err(exit_codes::EXIT_FETCH_UPSTREAM, "source catalog fetch failed"))
    }
}

fn retry_after(resp: &reqwest::blocking::Response) -> Option<Duration> {
    parse_retry_after(resp.headers().get("retry-after")?.to_str().ok()?)
}

/// Delta-seconds form only, clamped to `MAX_RETRY_AFTER`.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs = value.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

fn fetch_err(code: u8, message: impl Into<String>) -> CliError {
    CliError { code, message: message.into(), hint: None }
}
