//! MediaWiki action API client.
//!
//! Uses `formatversion=2` JSON throughout. A summary is the plain-text
//! intro extract; a page carrying the `disambiguation` page property is
//! reported as [`EncyclopediaError::Ambiguous`] with its article links as
//! the options.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Article, EncyclopediaError, EncyclopediaSource, article_url, validate_lang};
use crate::config::EncyclopediaConfig;

const USER_AGENT: &str = concat!("kenning/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Link {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

impl Page {
    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some())
    }
}

/// Wikipedia (or any MediaWiki) encyclopedia source.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    api_url_template: String,
    article_url_template: String,
}

impl WikipediaClient {
    /// Create a client for the configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`EncyclopediaError::Request`] if the HTTP client cannot be built.
    pub fn new(config: &EncyclopediaConfig) -> Result<Self, EncyclopediaError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EncyclopediaError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url_template: config.api_url_template.clone(),
            article_url_template: config.article_url_template.clone(),
        })
    }

    async fn query(
        &self,
        lang: &str,
        params: &[(&str, &str)],
    ) -> Result<QueryBody, EncyclopediaError> {
        validate_lang(lang)?;
        let endpoint = self.api_url_template.replace("{lang}", lang);

        let response = self
            .client
            .get(&endpoint)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| EncyclopediaError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EncyclopediaError::Request(format!(
                "HTTP {status} from {endpoint}"
            )));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| EncyclopediaError::Parse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(EncyclopediaError::Request(format!(
                "{}: {}",
                error.code, error.info
            )));
        }
        Ok(body.query.unwrap_or_default())
    }

    /// Article titles linked from a disambiguation page.
    async fn disambiguation_options(
        &self,
        title: &str,
        lang: &str,
    ) -> Result<Vec<String>, EncyclopediaError> {
        let body = self
            .query(
                lang,
                &[
                    ("prop", "links"),
                    ("titles", title),
                    ("plnamespace", "0"),
                    ("pllimit", "max"),
                    ("redirects", "1"),
                ],
            )
            .await?;
        Ok(body
            .pages
            .into_iter()
            .flat_map(|page| page.links)
            .map(|link| link.title)
            .collect())
    }
}

#[async_trait]
impl EncyclopediaSource for WikipediaClient {
    async fn summary(
        &self,
        title: &str,
        lang: &str,
        sentences: u32,
    ) -> Result<Article, EncyclopediaError> {
        tracing::trace!(title, lang, "encyclopedia summary");
        let sentences = sentences.max(1).to_string();
        let body = self
            .query(
                lang,
                &[
                    ("prop", "extracts|pageprops"),
                    ("titles", title),
                    ("redirects", "1"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("exsentences", &sentences),
                    ("ppprop", "disambiguation"),
                ],
            )
            .await?;

        let Some(page) = body.pages.into_iter().next() else {
            return Err(EncyclopediaError::NotFound(title.to_owned()));
        };
        if page.missing || page.invalid {
            return Err(EncyclopediaError::NotFound(title.to_owned()));
        }

        if page.is_disambiguation() {
            let options = self.disambiguation_options(&page.title, lang).await?;
            tracing::debug!(title = %page.title, options = options.len(), "disambiguation page");
            if options.is_empty() {
                return Err(EncyclopediaError::NotFound(page.title));
            }
            return Err(EncyclopediaError::Ambiguous(options));
        }

        let summary = page.extract.unwrap_or_default().trim().to_owned();
        if summary.is_empty() {
            return Err(EncyclopediaError::NotFound(page.title));
        }

        Ok(Article {
            url: article_url(&self.article_url_template, lang, &page.title),
            title: page.title,
            summary,
        })
    }

    async fn search(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
    ) -> Result<Vec<String>, EncyclopediaError> {
        tracing::trace!(query, lang, limit, "encyclopedia search");
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = limit.to_string();
        let body = self
            .query(
                lang,
                &[
                    ("list", "search"),
                    ("srsearch", query),
                    ("srlimit", &limit),
                    ("srprop", ""),
                ],
            )
            .await?;
        Ok(body.search.into_iter().map(|hit| hit.title).collect())
    }
}
