//! Keyword-resources flow: primary list, then encyclopedia, then curated.

use super::ResolutionPipeline;
use crate::config::MAX_RESOURCE_LIMIT;
use crate::error::{KenningError, Result};
use crate::gateway::ResourceParse;
use crate::keywords::{detect_language, raw_keywords, sanitize_keywords};
use crate::types::{FallbackMeta, KeywordInput, ResourceItem, ResourceReport, SourceTag};

/// The last-resort list: `(title, summary, url)`.
pub const CURATED_RESOURCES: [(&str, &str, &str); 3] = [
    (
        "OWASP Top 10",
        "The OWASP Foundation's ranking of the most critical web application security risks, with mitigation guidance.",
        "https://owasp.org/Top10/",
    ),
    (
        "MITRE ATT&CK",
        "MITRE's knowledge base of adversary tactics and techniques, with detection and response strategies.",
        "https://attack.mitre.org/",
    ),
    (
        "Google Scholar",
        "Search recent academic papers and patents by keyword.",
        "https://scholar.google.com/",
    ),
];

/// The curated list with the caller's `query` text appended to every summary.
pub fn curated_resources(query: &str) -> Vec<ResourceItem> {
    CURATED_RESOURCES
        .iter()
        .map(|(title, summary, url)| {
            ResourceItem::new(
                *title,
                format!("{summary} (query: {query})"),
                *url,
                SourceTag::Curated,
            )
        })
        .collect()
}

impl ResolutionPipeline {
    /// Recommend resources for raw keyword input.
    ///
    /// Tries the summarisation service first. If it is unavailable, fails,
    /// returns an unparseable list or returns nothing, each sanitised
    /// keyword is searched in the encyclopedia. If that finds nothing too,
    /// the curated list is returned, annotated with the keywords as typed.
    /// The result never holds more than `limit` items (default from config,
    /// capped at 10).
    ///
    /// # Errors
    ///
    /// Returns [`KenningError::EmptyInput`] when no keyword survives
    /// sanitising or `limit` is zero. Tier failures are reported in the
    /// result instead.
    pub async fn research_resources(
        &self,
        input: &KeywordInput,
        limit: Option<usize>,
    ) -> Result<ResourceReport> {
        let tokens = sanitize_keywords(input);
        if tokens.is_empty() {
            return Err(KenningError::EmptyInput(
                "no usable keywords after sanitising".into(),
            ));
        }
        let limit = match limit.unwrap_or(self.default_limit) {
            0 => {
                return Err(KenningError::EmptyInput(
                    "resource limit must be at least 1".into(),
                ));
            }
            n => n.min(MAX_RESOURCE_LIMIT),
        };
        let query = tokens.join(", ");
        tracing::trace!(%query, limit, "researching resources");

        let primary_failure = match self.primary_resources(&query).await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "primary tier answered");
                return Ok(report(query, items, limit, FallbackMeta::none()));
            }
            Err(reason) => reason,
        };
        tracing::warn!(reason = %primary_failure, "primary resource tier failed, trying encyclopedia");

        let (items, secondary_failure) = self.secondary_resources(&tokens, limit).await;
        if !items.is_empty() {
            tracing::debug!(count = items.len(), "secondary tier answered");
            return Ok(report(query, items, limit, FallbackMeta::used(primary_failure)));
        }

        let reason = format!("{primary_failure}; {secondary_failure}");
        tracing::warn!(%reason, "using curated resources");
        let items = curated_resources(&raw_keywords(input).join(", "));
        Ok(report(query, items, limit, FallbackMeta::used(reason)))
    }

    /// Ask the summarisation service; `Err` carries the fallback reason.
    async fn primary_resources(&self, query: &str) -> std::result::Result<Vec<ResourceItem>, String> {
        let gateway = self.gateway.get()?;
        match gateway.research_resources(query).await {
            Ok(ResourceParse::Parsed(items)) if !items.is_empty() => Ok(items),
            Ok(ResourceParse::Parsed(_)) => {
                Err("summarization service returned no resources".to_owned())
            }
            Ok(ResourceParse::Malformed { detail, .. }) => Err(format!(
                "summarization service returned an unreadable resource list: {detail}"
            )),
            Err(e) => Err(e.fallback_reason()),
        }
    }

    /// Search each keyword in its detected language until `limit` items are
    /// collected. Also returns a description of why nothing was found, used
    /// only when the list is empty.
    async fn secondary_resources(&self, tokens: &[String], limit: usize) -> (Vec<ResourceItem>, String) {
        let mut items = Vec::new();
        let mut failure = None;
        for token in tokens {
            let remaining = limit.saturating_sub(items.len());
            if remaining == 0 {
                break;
            }
            let lang = detect_language(token);
            match self.encyclopedia.resources_for(token, lang, remaining).await {
                Ok(found) => items.extend(found),
                Err(e) => {
                    tracing::warn!(error = %e, lang, "encyclopedia search failed for keyword");
                    failure = Some(e.to_string());
                }
            }
        }
        let failure = failure.unwrap_or_else(|| "encyclopedia returned no results".to_owned());
        (items, failure)
    }
}

fn report(
    query: String,
    mut results: Vec<ResourceItem>,
    limit: usize,
    fallback: FallbackMeta,
) -> ResourceReport {
    results.truncate(limit);
    ResourceReport {
        query,
        results,
        fallback,
    }
}
