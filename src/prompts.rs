use crate::{Error, Result};

pub const ENHANCE_SYSTEM: &str = include_str!("../data/prompts/enhance_system.txt");
pub const ENHANCE_USER: &str = include_str!("../data/prompts/enhance_user.txt");
pub const SANITIZE_SYSTEM: &str = include_str!("../data/prompts/sanitize_system.txt");
pub const SANITIZE_USER: &str = include_str!("../data/prompts/sanitize_user.txt");

/// Longest prompt accepted before any remote call, in characters.
pub const MAX_PROMPT_LENGTH: usize = 4000;

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Reject blank prompts and prompts over [`MAX_PROMPT_LENGTH`].
pub fn validate(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(Error::InvalidPrompt("prompt is empty".to_string()));
    }
    let length = prompt.chars().count();
    if length > MAX_PROMPT_LENGTH {
        return Err(Error::InvalidPrompt(format!(
            "prompt is {} characters, limit is {}",
            length, MAX_PROMPT_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_prompts_are_non_empty() {
        assert!(!ENHANCE_SYSTEM.is_empty());
        assert!(!SANITIZE_SYSTEM.is_empty());
    }

    #[test]
    fn test_user_templates_have_prompt_placeholder() {
        assert!(ENHANCE_USER.contains("{{prompt}}"));
        assert!(SANITIZE_USER.contains("{{prompt}}"));
    }

    #[test]
    fn test_enhance_system_asks_for_structured_reply() {
        assert!(ENHANCE_SYSTEM.contains("enhanced_prompt"));
    }

    #[test]
    fn test_validate_rejects_blank_prompt() {
        assert!(matches!(validate("   "), Err(Error::InvalidPrompt(_))));
    }

    #[test]
    fn test_validate_length_limit() {
        assert!(validate(&"a".repeat(MAX_PROMPT_LENGTH)).is_ok());
        let err = validate(&"a".repeat(MAX_PROMPT_LENGTH + 1)).unwrap_err();
        assert!(err.to_string().contains("4000"));
    }
}
