//! Prompt templates for context injection

use crate::types::FilteredDocumentSet;

/// Opening line of the synthetic user turn carrying the retrieved excerpts
pub const CONTEXT_INTRO: &str =
    "Hey, here are some excerpts of documentation that you can use to help answer my future questions:";

/// Synthetic assistant turn accepting the excerpts
pub const CONTEXT_ACKNOWLEDGEMENT: &str =
    "Thank you, I'll use that information, if its relevant, to help answer the following prompt";

/// Separator placed before each excerpt
const EXCERPT_SEPARATOR: &str = "\n\n";

/// Prompt builder for context injection
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the content of the synthetic user turn: the intro line followed
    /// by each document's content, each preceded by a blank line
    pub fn build_context(docs: &FilteredDocumentSet) -> String {
        let capacity = CONTEXT_INTRO.len()
            + docs
                .iter()
                .map(|d| d.content.len() + EXCERPT_SEPARATOR.len())
                .sum::<usize>();

        let mut context = String::with_capacity(capacity);
        context.push_str(CONTEXT_INTRO);
        for doc in docs {
            context.push_str(EXCERPT_SEPARATOR);
            context.push_str(&doc.content);
        }
        context
    }
}
