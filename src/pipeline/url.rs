//! URL flow: fetch a page, then summarise it.

use super::ResolutionPipeline;
use crate::error::{KenningError, Result};
use crate::types::{FallbackMeta, UrlSummary};

/// First line of every locally produced summary.
pub const LOCAL_SUMMARY_NOTICE: &str =
    "[Local summary] The summarization service could not be reached, so this is a plain excerpt of the page.";

const LOCAL_SUMMARY_LINES: usize = 5;
const LOCAL_SUMMARY_CHARS: usize = 500;

/// Deterministic summary built from the page text alone.
///
/// Uses the first five non-empty lines, or the first 500 characters when
/// the text is a single line.
pub fn local_summary(title: &str, text: &str) -> String {
    let text = text.trim();
    let snippet = if text.contains('\n') {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(LOCAL_SUMMARY_LINES)
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        text.chars().take(LOCAL_SUMMARY_CHARS).collect()
    };
    format!("{LOCAL_SUMMARY_NOTICE}\nTitle: {title}\n\n{snippet}")
}

impl ResolutionPipeline {
    /// Fetch `url` and summarise its text.
    ///
    /// When the summarisation service is unavailable or fails, the result
    /// carries a [`local_summary`] and the fallback reason instead.
    ///
    /// # Errors
    ///
    /// - [`KenningError::EmptyInput`] for a blank URL
    /// - [`KenningError::Fetch`] when the page cannot be loaded
    /// - [`KenningError::EmptyContent`] when the page has no extractable text
    pub async fn summarize_url(&self, url: &str) -> Result<UrlSummary> {
        let url = url.trim();
        if url.is_empty() {
            return Err(KenningError::EmptyInput("a URL is required".into()));
        }
        tracing::trace!(url, "summarising page");

        let page = self.pages.fetch(url).await?;
        if page.body_text.trim().is_empty() {
            return Err(KenningError::EmptyContent(page.final_url));
        }

        let attempt = match self.gateway.get() {
            Ok(gateway) => gateway
                .summarize(&page.title, &page.body_text)
                .await
                .map_err(|e| e.fallback_reason()),
            Err(reason) => Err(reason),
        };

        let (summary, citations, fallback) = match attempt {
            Ok(summary) => (summary.text, summary.citations, FallbackMeta::none()),
            Err(reason) => {
                tracing::warn!(%reason, "page summary fell back to local excerpt");
                (
                    local_summary(&page.title, &page.body_text),
                    Vec::new(),
                    FallbackMeta::used(reason),
                )
            }
        };

        Ok(UrlSummary {
            summary,
            citations,
            source_title: page.title,
            source_url: page.final_url,
            fallback,
            raw_markup: page.raw_markup,
        })
    }
}
