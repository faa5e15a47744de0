//! OpenAI image-generation client and structure-prompt handling.

pub mod api;
pub mod structure;

pub use api::{OpenAiApi, OpenAiApiError};
