//! Saving gallery images to local files.

use crate::ai::openai::client::remote_error;
use crate::models::GeneratedImage;
use crate::{Error, Result};
use base64::Engine as _;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct ImageDownloader {
    client: Client,
}

impl Default for ImageDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageDownloader {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });
        Self { client }
    }

    /// Write the image to `<dir>/lyra-alchemist-<id>.png` and return the path.
    pub async fn download(&self, image: &GeneratedImage, dir: &Path) -> Result<PathBuf> {
        let bytes = if image.url.starts_with("data:") {
            decode_data_url(&image.url)?
        } else {
            self.fetch(&image.url).await?
        };

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(image.download_file_name());
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!("Saved image {} to {}", image.id, path.display());
        Ok(path)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to download image: {}", e);
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(status, &body));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Decode a `data:<mime>;base64,<payload>` reference.
fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| Error::remote("Malformed data URL"))?;
    if !header.ends_with(";base64") {
        return Err(Error::remote("Unsupported data URL encoding"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::remote(format!("Failed to decode base64 image: {}", e)))
}
