//! # kenning-fetch
//!
//! Page fetching for kenning.
//!
//! Turns a user-supplied URL into readable text suitable for summarisation.
//! This crate knows nothing about summarisation or fallback tiers; it only
//! guarantees that a fetch terminates with either a page or an error.
//!
//! ## Design
//!
//! - Scheme-less input is treated as HTTPS
//! - At most three attempts per fetch: primary identity, plain-HTTP downgrade,
//!   alternate identity
//! - HTTP 403 rotates to the next identity instead of failing
//! - Boilerplate elements are stripped, short blocks dropped, and the
//!   extracted text capped at a fixed character budget
//!
//! ## Privacy
//!
//! - Requested URLs are logged only at trace level
//! - No cookies or bodies are persisted between fetches

pub mod config;
pub mod content;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod types;

pub use config::FetchConfig;
pub use error::{FetchError, Result};
pub use fetcher::{normalize_url, plan_attempts, Attempt, PageFetcher, MAX_ATTEMPTS};
pub use http::Identity;
pub use types::FetchResult;

/// Fetch a page with the default configuration.
///
/// Convenience wrapper around [`PageFetcher::fetch`] using
/// [`FetchConfig::default()`].
///
/// # Errors
///
/// Same as [`PageFetcher::fetch`], plus [`FetchError::Client`] if the HTTP
/// client cannot be built.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> kenning_fetch::Result<()> {
/// let page = kenning_fetch::fetch_page("example.com").await?;
/// println!("{}: {} chars", page.title, page.body_text.chars().count());
/// # Ok(())
/// # }
/// ```
pub async fn fetch_page(url: &str) -> Result<FetchResult> {
    PageFetcher::new(FetchConfig::default())?.fetch(url).await
}
