//! Prompt domain
//!
//! Templates for the system and user prompts sent at each deliberation stage.

mod template;

pub use template::PromptTemplate;
