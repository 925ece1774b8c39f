use super::{ImageGenerationService, PromptService};
use crate::aspect::AspectRatio;
use crate::models::{GeneratedImage, PromptEnhancement};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Outcome {
    Image(String),
    Failure(String),
}

/// Scripted image generator. Outcomes are consumed in call order; once the
/// script runs out every call succeeds with a placeholder URL.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    outcomes: Arc<Mutex<VecDeque<Outcome>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_image(self, url: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Outcome::Image(url.to_string()));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Outcome::Failure(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received, in call order.
    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImage> {
        let call = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.prompts.lock().unwrap().push(prompt.to_string());

        let outcome = self.outcomes.lock().unwrap().pop_front();
        match outcome {
            Some(Outcome::Image(url)) => {
                Ok(GeneratedImage::new(url, prompt.to_string(), aspect_ratio))
            }
            Some(Outcome::Failure(message)) => Err(Error::remote(message)),
            None => Ok(GeneratedImage::new(
                format!("https://mock-images.example.com/{}.png", call),
                prompt.to_string(),
                aspect_ratio,
            )),
        }
    }
}

/// Prompt service double with fixed replies.
#[derive(Clone)]
pub struct MockPromptClient {
    enhancement: Arc<Mutex<Option<PromptEnhancement>>>,
    sanitized: Arc<Mutex<Option<String>>>,
    enhance_count: Arc<Mutex<usize>>,
    sanitize_count: Arc<Mutex<usize>>,
}

impl MockPromptClient {
    pub fn new() -> Self {
        Self {
            enhancement: Arc::new(Mutex::new(None)),
            sanitized: Arc::new(Mutex::new(None)),
            enhance_count: Arc::new(Mutex::new(0)),
            sanitize_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_enhancement(self, enhanced_prompt: &str, explanation: Option<&str>) -> Self {
        *self.enhancement.lock().unwrap() = Some(PromptEnhancement {
            enhanced_prompt: enhanced_prompt.to_string(),
            explanation: explanation.map(str::to_string),
        });
        self
    }

    pub fn with_sanitized(self, sanitized: &str) -> Self {
        *self.sanitized.lock().unwrap() = Some(sanitized.to_string());
        self
    }

    pub fn get_enhance_count(&self) -> usize {
        *self.enhance_count.lock().unwrap()
    }

    pub fn get_sanitize_count(&self) -> usize {
        *self.sanitize_count.lock().unwrap()
    }
}

impl Default for MockPromptClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptService for MockPromptClient {
    /// Fails with a remote error unless an enhancement was scripted.
    async fn enhance(&self, _prompt: &str) -> Result<PromptEnhancement> {
        *self.enhance_count.lock().unwrap() += 1;
        self.enhancement
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::remote("Mock enhancement unavailable"))
    }

    /// Echoes the input unless a sanitized reply was scripted.
    async fn sanitize(&self, prompt: &str) -> String {
        *self.sanitize_count.lock().unwrap() += 1;
        self.sanitized
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| prompt.to_string())
    }
}
