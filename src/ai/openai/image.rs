use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::ImageGenerationService;
use crate::aspect::AspectRatio;
use crate::models::{GeneratedImage, DEFAULT_OPENAI_BASE_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Fixed generation profile sent with every request.
pub const IMAGE_QUALITY: &str = "standard";
pub const IMAGE_STYLE: &str = "natural";
const IMAGES_PER_REQUEST: u32 = 1;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: OpenAiHttpClient::new(
                "OpenAI",
                "OPENAI_API_KEY",
                api_key,
                DEFAULT_OPENAI_BASE_URL.to_string(),
                Duration::from_secs(120),
            ),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage> {
        self.http.require_api_key()?;

        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            size: aspect_ratio.spec().remote_size_code.to_string(),
            quality: IMAGE_QUALITY.to_string(),
            style: IMAGE_STYLE.to_string(),
            n: IMAGES_PER_REQUEST,
        };

        let response: ImageGenerationResponse =
            self.http.post("/images/generations", &request).await?;

        let image_data = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::remote("No image returned from OpenAI"))?;

        let url = match (image_data.url, image_data.b64_json) {
            (Some(url), _) if !url.is_empty() => url,
            (_, Some(b64)) if !b64.is_empty() => format!("data:image/png;base64,{}", b64),
            _ => return Err(Error::remote("No image returned from OpenAI")),
        };

        let prompt = image_data
            .revised_prompt
            .filter(|revised| !revised.trim().is_empty())
            .unwrap_or_else(|| prompt.to_string());

        let image = GeneratedImage::new(url, prompt, aspect_ratio);
        tracing::info!("Generated image {} ({})", image.id, aspect_ratio);
        Ok(image)
    }
}
