//! Keyword lookups built on an [`EncyclopediaSource`].
//!
//! These operations never return a raw source error: every failure ends up
//! as a [`ResolutionOutcome`] message.

use std::sync::Arc;

use super::disambiguation::{DisambiguationResolver, Resolution};
use super::{EncyclopediaError, EncyclopediaSource, article_url};
use crate::config::{DisambiguationConfig, EncyclopediaConfig};
use crate::types::{ResolutionOutcome, ResourceItem, SourceTag};

/// Message for a keyword with no usable article.
pub const NOT_FOUND_MESSAGE: &str = "No matching article was found. Try a different term.";

/// Options listed in the summary of an ambiguous search hit.
const AMBIGUOUS_PREVIEW_OPTIONS: usize = 3;

/// Encyclopedia keyword operations.
#[derive(Clone)]
pub struct EncyclopediaLookup {
    source: Arc<dyn EncyclopediaSource>,
    resolver: DisambiguationResolver,
    article_url_template: String,
    summary_sentences: u32,
    resource_sentences: u32,
    search_limit: usize,
}

impl EncyclopediaLookup {
    pub fn new(
        source: Arc<dyn EncyclopediaSource>,
        config: &EncyclopediaConfig,
        disambiguation: &DisambiguationConfig,
    ) -> Self {
        Self {
            source,
            resolver: DisambiguationResolver::new(disambiguation, config.summary_sentences),
            article_url_template: config.article_url_template.clone(),
            summary_sentences: config.summary_sentences,
            resource_sentences: config.resource_sentences,
            search_limit: config.search_limit,
        }
    }

    /// Summarise `keyword`, resolving ambiguity if needed.
    ///
    /// An ambiguous keyword goes through the disambiguation resolver. A
    /// keyword with no page falls back to scanning search hits for the
    /// first one with a usable summary.
    pub async fn lookup(&self, keyword: &str, lang: &str) -> ResolutionOutcome {
        let keyword = keyword.trim();
        tracing::trace!(keyword, lang, "encyclopedia lookup");
        match self
            .source
            .summary(keyword, lang, self.summary_sentences)
            .await
        {
            Ok(article) => ResolutionOutcome::resolved(article.summary, article.url),
            Err(EncyclopediaError::Ambiguous(options)) => {
                self.resolve_ambiguous(keyword, &options, lang).await
            }
            Err(EncyclopediaError::NotFound(_)) => self.scan_search(keyword, lang).await,
            Err(e) => failure(&e),
        }
    }

    /// Search `keyword` and drill through the ranked hits.
    ///
    /// Unlike [`lookup`](Self::lookup) this never trusts a page titled
    /// exactly `keyword`; it always starts from search results.
    pub async fn force_lookup(&self, keyword: &str, lang: &str) -> ResolutionOutcome {
        let keyword = keyword.trim();
        tracing::trace!(keyword, lang, "forced encyclopedia lookup");
        let titles = match self.source.search(keyword, lang, self.search_limit).await {
            Ok(titles) => titles,
            Err(e) => return failure(&e),
        };
        match self
            .resolver
            .resolve(self.source.as_ref(), keyword, &titles, lang)
            .await
        {
            Ok(Resolution::Found(article)) => {
                ResolutionOutcome::resolved(article.summary, article.url)
            }
            Ok(Resolution::NotFound) => ResolutionOutcome::unresolved(NOT_FOUND_MESSAGE),
            Err(e) => failure(&e),
        }
    }

    /// Secondary-tier resources for `query`: one short entry per search hit.
    ///
    /// A hit that is a disambiguation page is kept, with a summary listing
    /// its first few options. Hits with no article are dropped.
    ///
    /// # Errors
    ///
    /// Returns the source error if the search or a summary request fails.
    pub async fn resources_for(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
    ) -> Result<Vec<ResourceItem>, EncyclopediaError> {
        let titles = self.source.search(query, lang, limit).await?;
        let mut items = Vec::with_capacity(titles.len());
        for title in titles.into_iter().take(limit) {
            match self
                .source
                .summary(&title, lang, self.resource_sentences)
                .await
            {
                Ok(article) => items.push(ResourceItem::new(
                    article.title,
                    article.summary,
                    article.url,
                    SourceTag::Secondary,
                )),
                Err(EncyclopediaError::Ambiguous(options)) => {
                    let preview = options
                        .iter()
                        .take(AMBIGUOUS_PREVIEW_OPTIONS)
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    let url = article_url(&self.article_url_template, lang, &title);
                    items.push(ResourceItem::new(
                        title,
                        format!("Several articles match: {preview}"),
                        url,
                        SourceTag::Secondary,
                    ));
                }
                Err(EncyclopediaError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(items)
    }

    async fn resolve_ambiguous(
        &self,
        keyword: &str,
        options: &[String],
        lang: &str,
    ) -> ResolutionOutcome {
        let ranked = self.resolver.rank(keyword, options);
        tracing::debug!(candidates = ranked.len(), "keyword is ambiguous");
        match self
            .resolver
            .resolve(self.source.as_ref(), keyword, &ranked, lang)
            .await
        {
            Ok(Resolution::Found(article)) => {
                ResolutionOutcome::resolved(article.summary, article.url)
            }
            Ok(Resolution::NotFound) => ResolutionOutcome::ambiguous(
                format!(
                    "\"{keyword}\" matches several articles and none could be summarised. \
                     Try a more specific term."
                ),
                ranked,
            ),
            Err(e) => failure(&e),
        }
    }

    async fn scan_search(&self, keyword: &str, lang: &str) -> ResolutionOutcome {
        let titles = match self.source.search(keyword, lang, self.search_limit).await {
            Ok(titles) => titles,
            Err(e) => return failure(&e),
        };
        for title in &titles {
            match self
                .source
                .summary(title, lang, self.summary_sentences)
                .await
            {
                Ok(article) => return ResolutionOutcome::resolved(article.summary, article.url),
                Err(EncyclopediaError::NotFound(_) | EncyclopediaError::Ambiguous(_)) => {}
                Err(e) => return failure(&e),
            }
        }
        ResolutionOutcome::unresolved(NOT_FOUND_MESSAGE)
    }
}

impl std::fmt::Debug for EncyclopediaLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncyclopediaLookup")
            .field("resolver", &self.resolver)
            .field("summary_sentences", &self.summary_sentences)
            .field("search_limit", &self.search_limit)
            .finish_non_exhaustive()
    }
}

fn failure(error: &EncyclopediaError) -> ResolutionOutcome {
    tracing::warn!(%error, "encyclopedia lookup failed");
    ResolutionOutcome::unresolved(format!("Encyclopedia lookup failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encyclopedia::fake::FakeEncyclopedia;

    fn lookup_with(source: FakeEncyclopedia) -> (EncyclopediaLookup, Arc<FakeEncyclopedia>) {
        let source = Arc::new(source);
        let lookup = EncyclopediaLookup::new(
            source.clone(),
            &EncyclopediaConfig::default(),
            &DisambiguationConfig::default(),
        );
        (lookup, source)
    }

    #[tokio::test]
    async fn direct_hit_is_resolved() {
        let (lookup, _) = lookup_with(FakeEncyclopedia::new().article("XSS", "Cross-site scripting."));
        let outcome = lookup.lookup("  XSS ", "en").await;
        assert_eq!(outcome.summary(), Some("Cross-site scripting."));
        assert_eq!(outcome.url(), Some("https://en.wikipedia.org/wiki/XSS"));
        assert!(outcome.message().is_none());
    }

    #[tokio::test]
    async fn ambiguous_keyword_uses_resolver() {
        let (lookup, source) = lookup_with(
            FakeEncyclopedia::new()
                .ambiguous("배", &["배(선박)", "배(동음이의어)", "배(과일)"])
                .article("배(과일)", "배나무의 열매."),
        );
        let outcome = lookup.lookup("배", "ko").await;
        assert_eq!(outcome.summary(), Some("배나무의 열매."));
        assert!(outcome.candidate_options().is_empty());
        assert_eq!(source.summary_titles(), vec!["배", "배(과일)"]);
    }

    #[tokio::test]
    async fn unresolvable_ambiguity_lists_ranked_options() {
        let (lookup, _) = lookup_with(
            FakeEncyclopedia::new().ambiguous("배", &["배(선박)", "배(과일)"]),
        );
        let outcome = lookup.lookup("배", "ko").await;
        assert!(!outcome.is_resolved());
        assert_eq!(outcome.candidate_options().to_vec(), vec!["배(과일)", "배(선박)"]);
        assert!(outcome.message().is_some_and(|m| m.contains("more specific")));
    }

    #[tokio::test]
    async fn ambiguous_options_are_capped() {
        let options: Vec<String> = (0..9).map(|i| format!("Term {i}")).collect();
        let refs: Vec<&str> = options.iter().map(String::as_str).collect();
        let (lookup, _) = lookup_with(FakeEncyclopedia::new().ambiguous("Term", &refs));
        let outcome = lookup.lookup("Term", "en").await;
        assert_eq!(outcome.candidate_options().len(), 5);
    }

    #[tokio::test]
    async fn missing_page_scans_search_hits() {
        let (lookup, source) = lookup_with(
            FakeEncyclopedia::new()
                .search("sqli", &["SQLi (disambiguation)", "Gone", "SQL injection"])
                .ambiguous("SQLi (disambiguation)", &["SQL injection"])
                .article("SQL injection", "A code injection technique."),
        );
        let outcome = lookup.lookup("sqli", "en").await;
        assert_eq!(outcome.summary(), Some("A code injection technique."));
        assert_eq!(
            source.summary_titles(),
            vec!["sqli", "SQLi (disambiguation)", "Gone", "SQL injection"]
        );
    }

    #[tokio::test]
    async fn nothing_anywhere_is_not_found_message() {
        let (lookup, _) = lookup_with(FakeEncyclopedia::new());
        let outcome = lookup.lookup("qwertyuiop", "en").await;
        assert_eq!(outcome.message(), Some(NOT_FOUND_MESSAGE));
        assert!(outcome.summary().is_none());
    }

    #[tokio::test]
    async fn source_failure_becomes_message() {
        let (lookup, _) = lookup_with(
            FakeEncyclopedia::new().failing("XSS", EncyclopediaError::Request("timed out".into())),
        );
        let outcome = lookup.lookup("XSS", "en").await;
        assert!(!outcome.is_resolved());
        assert_eq!(
            outcome.message(),
            Some("Encyclopedia lookup failed: encyclopedia request failed: timed out")
        );
    }

    #[tokio::test]
    async fn force_lookup_ranks_search_results() {
        let (lookup, source) = lookup_with(
            FakeEncyclopedia::new()
                .article("배", "should not be used")
                .search("배", &["배(선박)", "배(과일)"])
                .article("배(과일)", "열매.")
                .article("배(선박)", "선박."),
        );
        let outcome = lookup.force_lookup("배", "ko").await;
        assert_eq!(outcome.summary(), Some("열매."));
        assert_eq!(source.summary_titles(), vec!["배(과일)"]);
    }

    #[tokio::test]
    async fn force_lookup_with_no_hits() {
        let (lookup, _) = lookup_with(FakeEncyclopedia::new());
        let outcome = lookup.force_lookup("nothing", "en").await;
        assert_eq!(outcome.message(), Some(NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn force_lookup_search_failure() {
        let (lookup, _) = lookup_with(
            FakeEncyclopedia::new()
                .failing_search("x", EncyclopediaError::Parse("bad json".into())),
        );
        let outcome = lookup.force_lookup("x", "en").await;
        assert!(outcome.message().is_some_and(|m| m.contains("bad json")));
    }

    #[tokio::test]
    async fn resources_include_ambiguous_preview_and_skip_missing() {
        let (lookup, _) = lookup_with(
            FakeEncyclopedia::new()
                .search("XSS", &["Cross-site scripting", "Missing", "XSS (disambiguation)"])
                .article("Cross-site scripting", "A web vulnerability.")
                .ambiguous("XSS (disambiguation)", &["a", "b", "c", "d"]),
        );
        let items = lookup.resources_for("XSS", "en", 5).await.expect("resources");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Cross-site scripting");
        assert_eq!(items[0].source_tag, SourceTag::Secondary);
        assert_eq!(items[1].summary, "Several articles match: a, b, c");
        assert_eq!(
            items[1].url,
            "https://en.wikipedia.org/wiki/XSS_%28disambiguation%29"
        );
    }

    #[tokio::test]
    async fn resources_propagate_search_errors() {
        let (lookup, _) = lookup_with(
            FakeEncyclopedia::new()
                .failing_search("XSS", EncyclopediaError::Request("offline".into())),
        );
        assert!(lookup.resources_for("XSS", "en", 3).await.is_err());
    }
}
