//! Data models and structures
//!
//! Defines the generated-image record persisted in the gallery, batch progress
//! observations, prompt enhancement results, and runtime configuration.

use crate::aspect::AspectRatio;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One successfully generated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    /// Remote URL or a `data:` blob reference.
    pub url: String,
    /// Prompt as revised by the image service, or the caller's prompt.
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub created_at: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn new(url: String, prompt: String, aspect_ratio: AspectRatio) -> Self {
        Self {
            id: Self::new_id(),
            url,
            prompt,
            aspect_ratio,
            created_at: Utc::now(),
        }
    }

    /// `img_<unix-millis>_<9 random lowercase alphanumerics>`.
    ///
    /// No collision check; the random suffix keeps ids generated in the same
    /// millisecond apart.
    pub fn new_id() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        format!("img_{}_{}", Utc::now().timestamp_millis(), suffix)
    }

    /// File name used when saving this image locally.
    pub fn download_file_name(&self) -> String {
        format!("lyra-alchemist-{}.png", self.id)
    }
}

/// Progress of an in-flight batch: `current` of `total` slots settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.current * 100) / self.total) as u8
    }
}

/// Result of a prompt enhancement call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptEnhancement {
    pub enhanced_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_CHAT_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_BATCH_SIZE: usize = 4;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Checked lazily by the image client, never at startup.
    pub openai_api_key: Option<String>,
    /// Checked lazily by the prompt client, never at startup.
    pub openrouter_api_key: Option<String>,
    pub openai_base_url: String,
    pub openrouter_base_url: String,
    pub image_model: String,
    pub chat_model: String,
    pub gallery_dir: PathBuf,
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openrouter_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            gallery_dir: PathBuf::from(".image-alchemist"),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Gallery location alone; unlike [`Config::from_env`] this never fails.
    pub fn gallery_dir_from_env() -> PathBuf {
        dotenvy::dotenv().ok();
        non_empty_var("GALLERY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::default().gallery_dir)
    }

    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let batch_size = match non_empty_var("BATCH_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    crate::Error::Configuration(format!(
                        "BATCH_SIZE must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => defaults.batch_size,
        };

        Ok(Self {
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
            openai_base_url: non_empty_var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            openrouter_base_url: non_empty_var("OPENROUTER_BASE_URL")
                .unwrap_or(defaults.openrouter_base_url),
            image_model: non_empty_var("IMAGE_MODEL").unwrap_or(defaults.image_model),
            chat_model: non_empty_var("CHAT_MODEL").unwrap_or(defaults.chat_model),
            gallery_dir: Self::gallery_dir_from_env(),
            batch_size,
        })
    }
}
