pub mod llm_service;
pub mod quiz_cleaner;
pub mod text_extractor;

pub use llm_service::{ChatModel, LlmService};
pub use quiz_cleaner::clean_output;
pub use text_extractor::extract_text;
