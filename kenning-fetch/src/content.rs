//! HTML content extraction: strips boilerplate and returns readable text.
//!
//! Removes non-content elements (scripts, styles, frames, forms, footers,
//! navigation), then keeps only heading and paragraph blocks long enough to
//! be prose. The joined text is capped so downstream prompts stay bounded.

use crate::config::FetchConfig;
use crate::types::FetchResult;
use scraper::{Html, Selector};

/// Elements removed, with their content, before any text is read.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "form", "footer", "nav",
];

/// Block-level elements that text is extracted from.
const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p";

/// Build a [`FetchResult`] from a response body.
///
/// `requested_url` is the URL as the caller gave it; it becomes the title
/// when the document declares none.
pub fn build_fetch_result(
    html: &str,
    requested_url: &str,
    final_url: String,
    config: &FetchConfig,
) -> FetchResult {
    let document = Html::parse_document(&strip_boilerplate_tags(html));
    let title = extract_title(&document).unwrap_or_else(|| requested_url.to_owned());
    let body_text = extract_body_text(&document, config.min_block_chars, config.max_body_chars);

    FetchResult {
        title,
        body_text,
        final_url,
        raw_markup: html.to_owned(),
    }
}

/// Extract readable text from raw HTML.
///
/// Blocks shorter than `min_block_chars` are dropped; the result never
/// exceeds `max_chars` characters.
pub fn extract_text(html: &str, min_block_chars: usize, max_chars: usize) -> String {
    let document = Html::parse_document(&strip_boilerplate_tags(html));
    extract_body_text(&document, min_block_chars, max_chars)
}

/// Extract the page title from the `<title>` element.
///
/// Returns `None` only when the element is absent; an empty element yields
/// an empty title.
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_owned())
}

fn extract_body_text(document: &Html, min_block_chars: usize, max_chars: usize) -> String {
    let Ok(selector) = Selector::parse(BLOCK_SELECTOR) else {
        return String::new();
    };

    let blocks: Vec<String> = document
        .select(&selector)
        .map(|el| collapse_spaces(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|block| block.chars().count() >= min_block_chars)
        .collect();

    truncate_chars(&blocks.join("\n"), max_chars)
}

/// Remove boilerplate HTML tags and their content before parsing.
fn strip_boilerplate_tags(html: &str) -> String {
    let mut result = html.to_owned();
    for tag in BOILERPLATE_TAGS {
        result = strip_tag(&result, tag);
    }
    result
}

/// Remove all instances of a specific HTML tag and its content.
///
/// Matching is ASCII case-insensitive. ASCII lowering keeps byte offsets
/// aligned between the lowered copy and the original.
fn strip_tag(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let lower = html.to_ascii_lowercase();
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");

    let mut pos = 0;
    loop {
        let start = match lower[pos..].find(&open_tag) {
            Some(offset) => pos + offset,
            None => {
                result.push_str(&html[pos..]);
                break;
            }
        };

        // Reject prefixes of longer tag names (<navigate> for <nav>, <formula> for <form>).
        let after_tag = start + open_tag.len();
        if after_tag < lower.len() {
            let next_byte = lower.as_bytes()[after_tag];
            if !matches!(next_byte, b' ' | b'>' | b'/' | b'\n' | b'\r' | b'\t') {
                result.push_str(&html[pos..after_tag]);
                pos = after_tag;
                continue;
            }
        }

        result.push_str(&html[pos..start]);

        let end = match lower[start..].find(&close_tag) {
            Some(offset) => start + offset + close_tag.len(),
            None => match lower[start..].find('>') {
                Some(offset) => start + offset + 1,
                None => html.len(),
            },
        };

        pos = end;
    }

    result
}

/// Collapse every whitespace run to a single space and trim the ends.
fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_owned(),
        None => text.to_owned(),
    }
}
