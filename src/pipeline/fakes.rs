//! Scripted page source and gateway for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kenning_fetch::{FetchError, FetchResult};

use crate::fetch::PageSource;
use crate::gateway::{GatewayError, ResourceParse, SummarizationGateway, Summary};

/// Page source answering from a fixed map; unknown URLs are unreachable.
#[derive(Default)]
pub(crate) struct FakePages {
    pages: HashMap<String, FetchResult>,
}

impl FakePages {
    pub(crate) fn with_page(mut self, url: &str, title: &str, body_text: &str) -> Self {
        self.pages.insert(
            url.to_owned(),
            FetchResult {
                title: title.to_owned(),
                body_text: body_text.to_owned(),
                final_url: format!("{url}#final"),
                raw_markup: format!("<html><title>{title}</title></html>"),
            },
        );
        self
    }
}

#[async_trait]
impl PageSource for FakePages {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Unreachable(format!("HTTP 503 from {url}")))
    }
}

/// Gateway returning fixed results and counting calls.
pub(crate) struct FakeGateway {
    summary: Result<Summary, GatewayError>,
    resources: Result<ResourceParse, GatewayError>,
    summarize_calls: AtomicUsize,
    research_topics: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub(crate) fn new(
        summary: Result<Summary, GatewayError>,
        resources: Result<ResourceParse, GatewayError>,
    ) -> Self {
        Self {
            summary,
            resources,
            summarize_calls: AtomicUsize::new(0),
            research_topics: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with the same error.
    pub(crate) fn failing(error: GatewayError) -> Self {
        Self::new(Err(error.clone()), Err(error))
    }

    pub(crate) fn summarize_calls(&self) -> usize {
        self.summarize_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn research_topics(&self) -> Vec<String> {
        self.research_topics
            .lock()
            .map(|topics| topics.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SummarizationGateway for FakeGateway {
    fn name(&self) -> &str {
        "fake"
    }

    async fn summarize(&self, _title: &str, _body_text: &str) -> Result<Summary, GatewayError> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        self.summary.clone()
    }

    async fn research_resources(&self, topic: &str) -> Result<ResourceParse, GatewayError> {
        if let Ok(mut topics) = self.research_topics.lock() {
            topics.push(topic.to_owned());
        }
        self.resources.clone()
    }
}
