pub mod prompt;

pub use prompt::{EnhanceReply, OpenRouterPromptClient};
