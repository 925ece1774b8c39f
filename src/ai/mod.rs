//! Remote AI service integration for image generation and prompt rewriting
//!
//! Image generation goes to the OpenAI Images API; prompt enhancement and
//! sanitization go to an OpenRouter chat completion endpoint.

pub mod mock;
pub mod openai;
pub mod openrouter;

pub use mock::{MockImageGenerationClient, MockPromptClient};
pub use openai::OpenAiImageClient;
pub use openrouter::OpenRouterPromptClient;

use crate::aspect::AspectRatio;
use crate::models::{GeneratedImage, PromptEnhancement};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::future::join_all;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generate exactly one image. No retries.
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage>;

    /// Fan-out batch: issue `count` generations concurrently and keep the
    /// successes, in slot order. Fails only when every slot failed.
    async fn generate_batch(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        count: usize,
    ) -> Result<Vec<GeneratedImage>> {
        let attempts = (0..count).map(|_| self.generate_image(prompt, aspect_ratio));
        let results = join_all(attempts).await;

        let mut images = Vec::new();
        let mut errors = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(image) => images.push(image),
                Err(e) => errors.push(format!("Image {}: {}", index + 1, e)),
            }
        }

        if images.is_empty() {
            tracing::error!("All {} concurrent generations failed", count);
            return Err(Error::AggregateFailure(errors));
        }

        if !errors.is_empty() {
            tracing::warn!("Some images failed to generate: {}", errors.join(", "));
        }

        Ok(images)
    }
}

#[async_trait]
pub trait PromptService: Send + Sync {
    /// Rewrite a prompt with extra descriptive detail.
    async fn enhance(&self, prompt: &str) -> Result<PromptEnhancement>;

    /// Moderation pass. Never fails; falls back to the input prompt.
    async fn sanitize(&self, prompt: &str) -> String;
}
