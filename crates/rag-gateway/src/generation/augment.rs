//! Conversation rewriting with retrieved context

use crate::types::{ChatMessage, ChatRequest, ChatRole, FilteredDocumentSet};

use super::citation::citation_suffix;
use super::prompt::{PromptBuilder, CONTEXT_ACKNOWLEDGEMENT};

/// Injects retrieved documents into a conversation.
///
/// With documents present, the live (last) turn is preceded by a user turn
/// holding the excerpts and an assistant turn accepting them:
///
/// ```text
/// [m0 .. m(n-2)] + [user: excerpts] + [assistant: ack] + [user: m(n-1).content]
/// ```
pub struct MessageAugmenter;

impl MessageAugmenter {
    /// Rewrite `original` around `docs`, returning the new conversation and
    /// the citation suffix.
    ///
    /// An empty `docs` returns `original` unchanged with an empty suffix.
    /// An empty `original` has no live turn to anchor the context on and is
    /// also returned unchanged.
    pub fn augment(
        original: &[ChatMessage],
        docs: &FilteredDocumentSet,
    ) -> (Vec<ChatMessage>, String) {
        if docs.is_empty() {
            return (original.to_vec(), String::new());
        }

        let suffix = citation_suffix(docs);
        let Some((live, history)) = original.split_last() else {
            return (Vec::new(), suffix);
        };

        let mut messages = Vec::with_capacity(original.len() + 2);
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(PromptBuilder::build_context(docs)));
        messages.push(ChatMessage::assistant(CONTEXT_ACKNOWLEDGEMENT));
        messages.push(live.clone().with_role(ChatRole::User));

        (messages, suffix)
    }

    /// Apply [`augment`](Self::augment) to a whole request, keeping its model,
    /// stream flag and pass-through fields
    pub fn augment_request(
        request: ChatRequest,
        docs: &FilteredDocumentSet,
    ) -> (ChatRequest, String) {
        if docs.is_empty() {
            return (request, String::new());
        }
        let (messages, suffix) = Self::augment(&request.messages, docs);
        (request.with_messages(messages), suffix)
    }
}
