//! Retrieval context
//!
//! The [`Context`] is the deduplicated, ranked evidence assembled for one
//! plan. It is built once by [`Context::merge`] and read-only afterwards.

use super::passage::RetrievedPassage;
use crate::core::string::collapse_blank_lines;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ordered, deduplicated evidence for one question.
///
/// Invariants: no two passages share a `source_id`; passages are sorted by
/// descending relevance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    passages: Vec<RetrievedPassage>,
}

impl Context {
    /// Context with no evidence.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pool passages from every sub-question into one context.
    ///
    /// Duplicates by `source_id` collapse to the occurrence with the highest
    /// score (the earliest sub-question wins a tie). The pool is then sorted
    /// by descending score and truncated to `max_passages` when given.
    pub fn merge(
        passages: impl IntoIterator<Item = RetrievedPassage>,
        max_passages: Option<usize>,
    ) -> Self {
        let mut best: HashMap<String, RetrievedPassage> = HashMap::new();

        for candidate in passages {
            match best.get_mut(candidate.source_id()) {
                Some(existing) => {
                    if outranks(&candidate, existing) {
                        *existing = candidate;
                    }
                }
                None => {
                    best.insert(candidate.source_id().to_string(), candidate);
                }
            }
        }

        let mut passages: Vec<RetrievedPassage> = best.into_values().collect();
        passages.sort_by(rank_order);
        if let Some(max) = max_passages {
            passages.truncate(max);
        }

        Self { passages }
    }

    pub fn passages(&self) -> &[RetrievedPassage] {
        &self.passages
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Number of `Chunk` labels in the rendered form.
    pub fn chunk_count(&self) -> usize {
        self.passages.len()
    }

    /// Human-readable rendering used in prompts and the `context` response field.
    ///
    /// Each passage is labelled `[Chunk N]` so it can be cited individually;
    /// passages are separated by a blank line. The labels are the only
    /// occurrences of `Chunk` in the output, so counting them recovers
    /// [`Context::chunk_count`].
    pub fn render(&self) -> String {
        self.passages
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut label = format!("[Chunk {}]", i + 1);
                match (&p.passage.document, p.passage.page) {
                    (Some(doc), Some(page)) => {
                        label.push_str(&format!(" source: {} p.{}", unmark(doc), page))
                    }
                    (Some(doc), None) => label.push_str(&format!(" source: {}", unmark(doc))),
                    (None, Some(page)) => label.push_str(&format!(" page {}", page)),
                    (None, None) => label.push_str(&format!(" id: {}", unmark(p.source_id()))),
                }
                label.push_str(&format!(
                    " (score {:.3}, sub-question {})",
                    p.relevance_score(),
                    p.origin_sub_question + 1
                ));
                format!("{}\n{}", label, unmark(&collapse_blank_lines(p.text())))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Lowercase `Chunk` in passage content so it cannot pass for a label.
fn unmark(text: &str) -> String {
    text.replace("Chunk", "chunk")
}

/// Whether `candidate` should replace `existing` for the same source.
fn outranks(candidate: &RetrievedPassage, existing: &RetrievedPassage) -> bool {
    match candidate
        .relevance_score()
        .partial_cmp(&existing.relevance_score())
    {
        Some(Ordering::Greater) => true,
        Some(Ordering::Equal) => candidate.origin_sub_question < existing.origin_sub_question,
        // NaN never displaces a real score
        Some(Ordering::Less) | None => existing.relevance_score().is_nan() && !candidate.relevance_score().is_nan(),
    }
}

/// Descending score, then sub-question order, then source id.
fn rank_order(a: &RetrievedPassage, b: &RetrievedPassage) -> Ordering {
    b.relevance_score()
        .total_cmp(&a.relevance_score())
        .then(a.origin_sub_question.cmp(&b.origin_sub_question))
        .then_with(|| a.source_id().cmp(b.source_id()))
}
