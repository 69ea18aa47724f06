pub mod catalog;
pub mod gateway;
pub mod prompt_log;
pub mod prompts;
pub mod providers;
pub mod reconciliation;
pub mod recommendations;

pub use catalog::Catalog;
pub use gateway::{Gateway, LlmSettings};
pub use prompt_log::PromptLog;
pub use recommendations::RecommendationService;
