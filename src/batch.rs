//! Sequential batch generation with progress reporting
//!
//! Slots run strictly one after another: slot i+1 is not issued until slot i
//! has settled. A failed slot is recorded and skipped; the batch only fails
//! when no slot succeeded.

use crate::ai::ImageGenerationService;
use crate::aspect::AspectRatio;
use crate::models::{BatchProgress, GeneratedImage};
use crate::{Error, Result};
use tracing::{info, warn};

/// Lifecycle of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running(BatchProgress),
    Completed { succeeded: usize, total: usize },
    Failed { total: usize },
}

/// Result of a batch that produced at least one image.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Successful images in the order their slots completed.
    pub images: Vec<GeneratedImage>,
    /// One entry per failed slot, `Image <n>: <reason>`.
    pub failures: Vec<String>,
    pub total: usize,
}

impl BatchOutcome {
    /// Shortfall message for partial success; `None` when every slot succeeded.
    pub fn warning(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        Some(format!(
            "Generated {} out of {} images. Some generations failed.",
            self.images.len(),
            self.total
        ))
    }
}

pub struct BatchOrchestrator {
    state: BatchState,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOrchestrator {
    pub fn new() -> Self {
        Self {
            state: BatchState::Idle,
        }
    }

    pub fn state(&self) -> &BatchState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, BatchState::Running(_))
    }

    /// Run `total` generations in sequence.
    ///
    /// `on_progress` observes `current/total` before and after each slot.
    pub async fn run<F>(
        &mut self,
        service: &dyn ImageGenerationService,
        prompt: &str,
        aspect_ratio: AspectRatio,
        total: usize,
        mut on_progress: F,
    ) -> Result<BatchOutcome>
    where
        F: FnMut(BatchProgress),
    {
        let mut images = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for slot in 0..total {
            self.advance(
                BatchProgress {
                    current: slot,
                    total,
                },
                &mut on_progress,
            );

            match service.generate_image(prompt, aspect_ratio).await {
                Ok(image) => images.push(image),
                Err(e) => {
                    warn!("Failed to generate image {}: {}", slot + 1, e);
                    failures.push(format!("Image {}: {}", slot + 1, e));
                }
            }

            self.advance(
                BatchProgress {
                    current: slot + 1,
                    total,
                },
                &mut on_progress,
            );
        }

        if images.is_empty() {
            self.state = BatchState::Failed { total };
            return Err(Error::AggregateFailure(failures));
        }

        self.state = BatchState::Completed {
            succeeded: images.len(),
            total,
        };
        let outcome = BatchOutcome {
            images,
            failures,
            total,
        };
        match outcome.warning() {
            Some(warning) => warn!("{}", warning),
            None => info!("Generated all {} images", total),
        }
        Ok(outcome)
    }

    fn advance<F: FnMut(BatchProgress)>(&mut self, progress: BatchProgress, on_progress: &mut F) {
        self.state = BatchState::Running(progress);
        on_progress(progress);
    }
}
