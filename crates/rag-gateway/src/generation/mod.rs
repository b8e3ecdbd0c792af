//! Conversation augmentation and citation handling

pub mod augment;
pub mod citation;
pub mod prompt;

pub use augment::MessageAugmenter;
pub use citation::citation_suffix;
pub use prompt::PromptBuilder;
