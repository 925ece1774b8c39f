pub mod client;
pub mod image;
pub mod types;

pub use client::OpenAiHttpClient;
pub use image::OpenAiImageClient;
