//! Encyclopedia access: summaries, search and disambiguation.
//!
//! [`EncyclopediaSource`] is the raw capability (one summary or one search
//! per call). [`DisambiguationResolver`] ranks and drills into ambiguous
//! candidate sets, and [`EncyclopediaLookup`] combines the two into the
//! keyword operations the pipeline exposes.
//!
//! Every call takes the target language explicitly. Nothing here keeps a
//! "current language".

pub mod disambiguation;
pub mod lookup;
pub mod wikipedia;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::Serialize;

pub use disambiguation::{DisambiguationResolver, Resolution, normalize_title, rank_candidates};
pub use lookup::EncyclopediaLookup;
pub use wikipedia::WikipediaClient;

/// Errors from an encyclopedia source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncyclopediaError {
    /// The title is a disambiguation page listing these options.
    #[error("ambiguous title ({} options)", .0.len())]
    Ambiguous(Vec<String>),

    /// No article with this title exists.
    #[error("no article found: {0}")]
    NotFound(String),

    /// The request could not be completed.
    #[error("encyclopedia request failed: {0}")]
    Request(String),

    /// The response could not be understood.
    #[error("encyclopedia response could not be parsed: {0}")]
    Parse(String),

    /// The language code is not a plausible wiki subdomain.
    #[error("invalid language code: {0:?}")]
    InvalidLanguage(String),
}

/// A resolved article summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub url: String,
}

/// A language-parameterised encyclopedia.
#[async_trait]
pub trait EncyclopediaSource: Send + Sync {
    /// Fetch the lead summary of `title`, at most `sentences` sentences.
    ///
    /// # Errors
    ///
    /// [`EncyclopediaError::Ambiguous`] for a disambiguation page,
    /// [`EncyclopediaError::NotFound`] when there is no such article.
    async fn summary(
        &self,
        title: &str,
        lang: &str,
        sentences: u32,
    ) -> Result<Article, EncyclopediaError>;

    /// Search titles matching `query`, best match first.
    async fn search(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
    ) -> Result<Vec<String>, EncyclopediaError>;
}

/// Check that `lang` looks like a wiki language subdomain (`ko`, `en`, `zh-yue`).
///
/// # Errors
///
/// Returns [`EncyclopediaError::InvalidLanguage`] otherwise.
pub fn validate_lang(lang: &str) -> Result<(), EncyclopediaError> {
    let valid = (2..=12).contains(&lang.len())
        && lang.starts_with(|c: char| c.is_ascii_lowercase())
        && lang.chars().all(|c| c.is_ascii_lowercase() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(EncyclopediaError::InvalidLanguage(lang.to_owned()))
    }
}

/// Public article URL for `title`: spaces become underscores, the rest is
/// percent-encoded.
pub fn article_url(template: &str, lang: &str, title: &str) -> String {
    let slug = title.trim().replace(' ', "_");
    template
        .replace("{lang}", lang)
        .replace("{title}", &urlencoding::encode(&slug))
}
