//! In-memory encyclopedia used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Article, EncyclopediaError, EncyclopediaSource, article_url};

type Generator = Box<dyn Fn(&str) -> Result<String, EncyclopediaError> + Send + Sync>;

/// Scripted encyclopedia. Unknown titles are `NotFound`, unknown searches
/// return no hits.
#[derive(Default)]
pub(crate) struct FakeEncyclopedia {
    pages: HashMap<String, Result<String, EncyclopediaError>>,
    searches: HashMap<String, Result<Vec<String>, EncyclopediaError>>,
    generator: Option<Generator>,
    summary_calls: Mutex<Vec<(String, String)>>,
    search_calls: Mutex<Vec<(String, String)>>,
}

impl FakeEncyclopedia {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn article(mut self, title: &str, summary: &str) -> Self {
        self.pages.insert(title.to_owned(), Ok(summary.to_owned()));
        self
    }

    pub(crate) fn ambiguous(mut self, title: &str, options: &[&str]) -> Self {
        let options = options.iter().map(|o| (*o).to_owned()).collect();
        self.pages
            .insert(title.to_owned(), Err(EncyclopediaError::Ambiguous(options)));
        self
    }

    pub(crate) fn failing(mut self, title: &str, error: EncyclopediaError) -> Self {
        self.pages.insert(title.to_owned(), Err(error));
        self
    }

    pub(crate) fn search(mut self, query: &str, titles: &[&str]) -> Self {
        let titles = titles.iter().map(|t| (*t).to_owned()).collect();
        self.searches.insert(query.to_owned(), Ok(titles));
        self
    }

    pub(crate) fn failing_search(mut self, query: &str, error: EncyclopediaError) -> Self {
        self.searches.insert(query.to_owned(), Err(error));
        self
    }

    /// Answer every title not scripted explicitly.
    pub(crate) fn generated(
        mut self,
        generator: impl Fn(&str) -> Result<String, EncyclopediaError> + Send + Sync + 'static,
    ) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Titles passed to `summary`, in call order.
    pub(crate) fn summary_titles(&self) -> Vec<String> {
        self.summary_calls
            .lock()
            .map(|calls| calls.iter().map(|(title, _)| title.clone()).collect())
            .unwrap_or_default()
    }

    /// `(query, lang)` pairs passed to `search`, in call order.
    pub(crate) fn search_calls(&self) -> Vec<(String, String)> {
        self.search_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EncyclopediaSource for FakeEncyclopedia {
    async fn summary(
        &self,
        title: &str,
        lang: &str,
        _sentences: u32,
    ) -> Result<Article, EncyclopediaError> {
        if let Ok(mut calls) = self.summary_calls.lock() {
            calls.push((title.to_owned(), lang.to_owned()));
        }
        let outcome = match (self.pages.get(title), &self.generator) {
            (Some(outcome), _) => outcome.clone(),
            (None, Some(generator)) => generator(title),
            (None, None) => Err(EncyclopediaError::NotFound(title.to_owned())),
        };
        outcome.map(|summary| Article {
            title: title.to_owned(),
            summary,
            url: article_url("https://{lang}.wikipedia.org/wiki/{title}", lang, title),
        })
    }

    async fn search(
        &self,
        query: &str,
        lang: &str,
        limit: usize,
    ) -> Result<Vec<String>, EncyclopediaError> {
        if let Ok(mut calls) = self.search_calls.lock() {
            calls.push((query.to_owned(), lang.to_owned()));
        }
        match self.searches.get(query) {
            Some(Ok(titles)) => Ok(titles.iter().take(limit).cloned().collect()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(Vec::new()),
        }
    }
}
