//! Candidate ranking and bounded drill-down for ambiguous keywords.
//!
//! Ranking is a pure function of the keyword, the candidate titles and the
//! configured hints. Resolution walks the ranked list with an explicit
//! work-stack: a candidate that is itself ambiguous pushes a new frame of
//! its own (re-ranked) options, up to `max_depth` frames below the first.
//! Titles already tried are skipped by their normalised form.

use std::collections::{BTreeMap, HashSet};

use super::{Article, EncyclopediaError, EncyclopediaSource};
use crate::config::{DisambiguationConfig, MAX_DISAMBIGUATION_DEPTH};

/// Outcome of walking a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Article),
    NotFound,
}

/// Lowercase a title and keep only alphanumeric characters.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Order `candidates` for `keyword`, most promising first.
///
/// Lower ranks win:
/// - 0: normalised candidate equals the normalised keyword
/// - 1: candidate contains a hint configured for this keyword (earlier hints first)
/// - 2: normalised candidate contains the normalised keyword
/// - 3: candidate ends with a disambiguation marker
/// - 4: anything else
///
/// Ties are broken by the candidate string so the order never depends on
/// how the source listed them.
pub fn rank_candidates(
    keyword: &str,
    candidates: &[String],
    hints: &BTreeMap<String, Vec<String>>,
    markers: &[String],
) -> Vec<String> {
    let keyword = keyword.trim();
    let target = normalize_title(keyword);
    let hints: Vec<String> = hints
        .get(keyword)
        .map(|terms| terms.iter().map(|t| t.to_lowercase()).collect())
        .unwrap_or_default();

    let score = |candidate: &str| -> (u8, usize) {
        let normalized = normalize_title(candidate);
        if normalized == target {
            return (0, 0);
        }
        let lowered = candidate.to_lowercase();
        if let Some(idx) = hints.iter().position(|hint| lowered.contains(hint.as_str())) {
            return (1, idx);
        }
        if !target.is_empty() && normalized.contains(&target) {
            return (2, 0);
        }
        let trimmed = candidate.trim_end();
        if markers.iter().any(|marker| trimmed.ends_with(marker.as_str())) {
            return (3, 0);
        }
        (4, 0)
    };

    let mut scored: Vec<((u8, usize), &String)> =
        candidates.iter().map(|c| (score(c), c)).collect();
    scored.sort_by(|(a_score, a), (b_score, b)| a_score.cmp(b_score).then_with(|| a.cmp(b)));
    scored.into_iter().map(|(_, c)| c.clone()).collect()
}

struct Frame {
    depth: usize,
    pending: std::vec::IntoIter<String>,
}

/// Picks the first usable article among ambiguous candidates.
#[derive(Debug, Clone)]
pub struct DisambiguationResolver {
    max_depth: usize,
    max_candidates: usize,
    markers: Vec<String>,
    hints: BTreeMap<String, Vec<String>>,
    sentences: u32,
}

impl DisambiguationResolver {
    /// `sentences` is the summary length requested for each candidate.
    /// The depth bound never exceeds [`MAX_DISAMBIGUATION_DEPTH`].
    pub fn new(config: &DisambiguationConfig, sentences: u32) -> Self {
        Self {
            max_depth: config.max_depth.min(MAX_DISAMBIGUATION_DEPTH),
            max_candidates: config.max_candidates,
            markers: config.markers.clone(),
            hints: config.hints.clone(),
            sentences,
        }
    }

    /// Rank `candidates` for `keyword` and keep the top `max_candidates`.
    pub fn rank(&self, keyword: &str, candidates: &[String]) -> Vec<String> {
        let mut ranked = rank_candidates(keyword, candidates, &self.hints, &self.markers);
        ranked.truncate(self.max_candidates);
        ranked
    }

    /// Walk the ranked candidates until one yields an article.
    ///
    /// A `NotFound` candidate is skipped. An ambiguous candidate has its own
    /// options ranked against the original `keyword` and tried next, unless
    /// that would go deeper than `max_depth`, in which case it is skipped
    /// like a missing page.
    ///
    /// # Errors
    ///
    /// Any other source error stops the walk and is returned.
    pub async fn resolve(
        &self,
        source: &dyn EncyclopediaSource,
        keyword: &str,
        candidates: &[String],
        lang: &str,
    ) -> Result<Resolution, EncyclopediaError> {
        let mut seen = HashSet::new();
        let mut stack = vec![Frame {
            depth: 0,
            pending: self.rank(keyword, candidates).into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(candidate) = frame.pending.next() else {
                stack.pop();
                continue;
            };
            let depth = frame.depth;
            if !seen.insert(normalize_title(&candidate)) {
                continue;
            }

            tracing::debug!(depth, "trying disambiguation candidate");
            match source.summary(&candidate, lang, self.sentences).await {
                Ok(article) => return Ok(Resolution::Found(article)),
                Err(EncyclopediaError::NotFound(_)) => {}
                Err(EncyclopediaError::Ambiguous(options)) => {
                    if depth >= self.max_depth {
                        tracing::debug!(depth, "nested ambiguity beyond depth bound");
                        continue;
                    }
                    stack.push(Frame {
                        depth: depth + 1,
                        pending: self.rank(keyword, &options).into_iter(),
                    });
                }
                Err(other) => return Err(other),
            }
        }

        Ok(Resolution::NotFound)
    }
}
