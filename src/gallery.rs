//! Newest-first collection of generated images, persisted across sessions.

use crate::models::GeneratedImage;
use crate::storage::RecordStorage;
use crate::Result;
use tracing::{debug, info, warn};

/// Key of the single durable record holding the whole gallery.
pub const STORAGE_KEY: &str = "lyra-alchemist-images";

pub struct Gallery {
    images: Vec<GeneratedImage>,
    storage: Box<dyn RecordStorage>,
}

impl Gallery {
    /// Empty gallery; nothing is read from storage.
    pub fn new(storage: Box<dyn RecordStorage>) -> Self {
        Self {
            images: Vec::new(),
            storage,
        }
    }

    /// Gallery hydrated from storage.
    pub fn open(storage: Box<dyn RecordStorage>) -> Self {
        let mut gallery = Self::new(storage);
        gallery.images = gallery.hydrate();
        gallery
    }

    /// Read the durable record. A missing, unreadable, or malformed record
    /// yields an empty sequence; errors are logged, never returned.
    pub fn hydrate(&self) -> Vec<GeneratedImage> {
        let raw = match self.storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved gallery found");
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read saved images: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<GeneratedImage>>(&raw) {
            Ok(images) => {
                info!("Loaded {} saved images", images.len());
                images
            }
            Err(e) => {
                warn!("Failed to load saved images: {}", e);
                Vec::new()
            }
        }
    }

    /// Prepend a batch (keeping its internal order) and re-persist.
    pub fn append(&mut self, new_images: Vec<GeneratedImage>) -> Result<()> {
        let mut images = new_images;
        images.append(&mut self.images);
        self.images = images;
        self.persist()
    }

    /// Delete the durable record, then empty the gallery. If the delete
    /// fails the in-memory images are left as they were.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(STORAGE_KEY)?;
        self.images.clear();
        info!("Cleared gallery");
        Ok(())
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn find(&self, id: &str) -> Option<&GeneratedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn persist(&self) -> Result<()> {
        if self.images.is_empty() {
            return Ok(());
        }
        let json = serde_json::to_string(&self.images)?;
        self.storage.write(STORAGE_KEY, &json)
    }
}
