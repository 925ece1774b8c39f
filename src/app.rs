//! Application controller owning the services and the gallery.

use crate::ai::{ImageGenerationService, OpenAiImageClient, OpenRouterPromptClient, PromptService};
use crate::aspect::AspectRatio;
use crate::batch::{BatchOrchestrator, BatchOutcome};
use crate::download::ImageDownloader;
use crate::gallery::Gallery;
use crate::models::{BatchProgress, Config, GeneratedImage, PromptEnhancement};
use crate::storage::{FileStorage, RecordStorage};
use crate::{prompts, Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Coordinates prompt rewriting, image generation, and the gallery.
pub struct App {
    image_gen: Box<dyn ImageGenerationService>,
    prompt: Box<dyn PromptService>,
    gallery: Gallery,
    orchestrator: BatchOrchestrator,
    downloader: ImageDownloader,
    batch_size: usize,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub image_gen: Box<dyn ImageGenerationService>,
    pub prompt: Box<dyn PromptService>,
    pub storage: Box<dyn RecordStorage>,
}

impl App {
    /// Build an app from concrete service dependencies. The gallery is
    /// hydrated from `services.storage` immediately.
    pub fn with_services(services: AppServices, batch_size: usize) -> Self {
        Self {
            image_gen: services.image_gen,
            prompt: services.prompt,
            gallery: Gallery::open(services.storage),
            orchestrator: BatchOrchestrator::new(),
            downloader: ImageDownloader::new(),
            batch_size,
        }
    }

    /// Construct an app from configuration. Missing credentials are not
    /// reported here; each client reports its own on first use.
    pub fn new(config: &Config) -> Self {
        info!(
            "Image model: {}, chat model: {}",
            config.image_model, config.chat_model
        );

        let image_gen = OpenAiImageClient::new(
            config.openai_api_key.clone(),
            config.image_model.clone(),
        )
        .with_base_url(config.openai_base_url.clone());

        let prompt = OpenRouterPromptClient::new(
            config.openrouter_api_key.clone(),
            config.chat_model.clone(),
        )
        .with_base_url(config.openrouter_base_url.clone());

        Self::with_services(
            AppServices {
                image_gen: Box::new(image_gen),
                prompt: Box::new(prompt),
                storage: Box::new(FileStorage::new(&config.gallery_dir)),
            },
            config.batch_size,
        )
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub async fn enhance_prompt(&self, prompt: &str) -> Result<PromptEnhancement> {
        prompts::validate(prompt)?;
        self.prompt.enhance(prompt).await
    }

    /// Best-effort moderation; invalid prompts are returned untouched.
    pub async fn sanitize_prompt(&self, prompt: &str) -> String {
        if let Err(e) = prompts::validate(prompt) {
            warn!("Skipping sanitization: {}", e);
            return prompt.to_string();
        }
        self.prompt.sanitize(prompt).await
    }

    /// Generate one image and add it to the gallery.
    pub async fn generate_single(
        &mut self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage> {
        prompts::validate(prompt)?;
        let image = self.image_gen.generate_image(prompt, aspect_ratio).await?;
        self.gallery.append(vec![image.clone()])?;
        Ok(image)
    }

    /// Run a sequential batch of `batch_size` slots. Successful images are
    /// appended to the gallery; a fully failed batch leaves it untouched.
    pub async fn generate_batch<F>(
        &mut self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        on_progress: F,
    ) -> Result<BatchOutcome>
    where
        F: FnMut(BatchProgress),
    {
        prompts::validate(prompt)?;
        let outcome = self
            .orchestrator
            .run(
                self.image_gen.as_ref(),
                prompt,
                aspect_ratio,
                self.batch_size,
                on_progress,
            )
            .await?;

        self.gallery.append(outcome.images.clone())?;
        Ok(outcome)
    }

    pub fn clear_gallery(&mut self) -> Result<()> {
        self.gallery.clear()
    }

    /// Save the gallery image with `id` into `dir`.
    pub async fn download(&self, id: &str, dir: &Path) -> Result<PathBuf> {
        let image = self
            .gallery
            .find(id)
            .ok_or_else(|| Error::ImageNotFound(id.to_string()))?;
        self.downloader.download(image, dir).await
    }
}
