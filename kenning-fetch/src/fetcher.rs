//! Multi-attempt page fetcher.
//!
//! A fetch walks a fixed, ordered attempt plan and stops at the first
//! success:
//!
//! 1. the normalised URL under the primary identity
//! 2. the same URL downgraded to plain HTTP (only when it was HTTPS)
//! 3. the normalised URL under the alternate identity
//!
//! HTTP 403 means "try the next identity". Server errors, other non-2xx
//! statuses and transport failures are recorded and the plan continues.
//! When the plan is exhausted the last recorded failure is reported.

use crate::config::FetchConfig;
use crate::content::build_fetch_result;
use crate::error::{FetchError, Result};
use crate::http::{build_client, Identity};
use crate::types::FetchResult;
use reqwest::StatusCode;
use url::Url;

/// Upper bound on attempts per fetch.
pub const MAX_ATTEMPTS: usize = 3;

/// One entry of the attempt plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// URL requested by this attempt.
    pub url: String,
    /// Header set presented by this attempt.
    pub identity: Identity,
}

/// Why a single attempt did not produce a page.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptFailure {
    /// The origin refused this identity.
    Forbidden,
    /// Transport error or unusable status.
    Failed(String),
}

/// Normalise user input into an absolute URL.
///
/// Input without a scheme gets `https://` prepended. Only `http` and
/// `https` are accepted.
///
/// # Errors
///
/// Returns [`FetchError::EmptyInput`] for blank input and
/// [`FetchError::InvalidUrl`] if the result does not parse.
pub fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::EmptyInput);
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| FetchError::InvalidUrl(format!("{candidate}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!(
            "{candidate}: unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    Ok(candidate)
}

fn has_scheme(input: &str) -> bool {
    input.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Build the ordered attempt plan for an already-normalised URL.
pub fn plan_attempts(normalized: &str) -> Vec<Attempt> {
    let mut attempts = vec![Attempt {
        url: normalized.to_owned(),
        identity: Identity::Primary,
    }];

    if let Some(rest) = strip_prefix_ignore_ascii_case(normalized, "https://") {
        attempts.push(Attempt {
            url: format!("http://{rest}"),
            identity: Identity::Primary,
        });
    }

    attempts.push(Attempt {
        url: normalized.to_owned(),
        identity: Identity::Alternate,
    });

    debug_assert!(attempts.len() <= MAX_ATTEMPTS);
    attempts
}

fn strip_prefix_ignore_ascii_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Fetches pages over HTTP, rotating identities and schemes on failure.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl PageFetcher {
    /// Create a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the configuration is invalid or the
    /// client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    /// The configuration this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch `url` and extract its readable text.
    ///
    /// # Errors
    ///
    /// - [`FetchError::EmptyInput`] / [`FetchError::InvalidUrl`] before any request
    /// - [`FetchError::Unreachable`] once every attempt has failed
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let normalized = normalize_url(url)?;
        let attempts = plan_attempts(&normalized);
        tracing::trace!(url = %normalized, attempts = attempts.len(), "fetching page");

        let mut last_failure: Option<String> = None;
        for (index, attempt) in attempts.iter().enumerate() {
            match self.send_attempt(attempt).await {
                Ok((final_url, body)) => {
                    tracing::debug!(
                        attempt = index + 1,
                        identity = %attempt.identity,
                        bytes = body.len(),
                        "page fetched"
                    );
                    return Ok(build_fetch_result(&body, url, final_url, &self.config));
                }
                Err(AttemptFailure::Forbidden) => {
                    tracing::debug!(
                        attempt = index + 1,
                        identity = %attempt.identity,
                        "origin refused identity, rotating"
                    );
                    if last_failure.is_none() {
                        last_failure = Some(format!("HTTP 403 Forbidden from {}", attempt.url));
                    }
                }
                Err(AttemptFailure::Failed(reason)) => {
                    tracing::warn!(
                        attempt = index + 1,
                        identity = %attempt.identity,
                        error = %reason,
                        "fetch attempt failed"
                    );
                    last_failure = Some(reason);
                }
            }
        }

        Err(FetchError::Unreachable(
            last_failure.unwrap_or_else(|| "unknown error".to_owned()),
        ))
    }

    /// Run one attempt, returning the final URL and the body on success.
    async fn send_attempt(
        &self,
        attempt: &Attempt,
    ) -> std::result::Result<(String, String), AttemptFailure> {
        let response = self
            .client
            .get(&attempt.url)
            .headers(attempt.identity.headers(&self.config.accept_language))
            .send()
            .await
            .map_err(|e| AttemptFailure::Failed(format!("request to {} failed: {e}", attempt.url)))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(AttemptFailure::Forbidden);
        }
        if !status.is_success() {
            return Err(AttemptFailure::Failed(format!(
                "HTTP {status} from {}",
                response.url()
            )));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptFailure::Failed(format!("reading {final_url} failed: {e}")))?;
        Ok((final_url, body))
    }
}
