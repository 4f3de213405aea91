//! Draft answers produced by the Answerer.

use crate::retrieval::context::Context;

/// Answer text used when retrieval found no evidence.
pub const NO_INFORMATION_ANSWER: &str =
    "No relevant information was found in the indexed documents to answer this question.";

/// An unverified answer, tied to the context it was conditioned on.
///
/// Holds a reference to the [`Context`], so the context must outlive the
/// draft until verification has run.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftAnswer<'c> {
    text: String,
    context: &'c Context,
    grounded: bool,
}

impl<'c> DraftAnswer<'c> {
    /// Draft generated by the language model from `context`.
    pub fn grounded(text: impl Into<String>, context: &'c Context) -> Self {
        Self {
            text: text.into(),
            context,
            grounded: true,
        }
    }

    /// Draft stating that no information was found.
    pub fn no_information(context: &'c Context) -> Self {
        Self {
            text: NO_INFORMATION_ANSWER.to_string(),
            context,
            grounded: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn context(&self) -> &'c Context {
        self.context
    }

    /// `false` for the no-information draft, which makes no factual claims.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }
}
