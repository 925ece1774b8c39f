//! Image Alchemist - prompt workshop and image studio for DALL-E
//!
//! Composes text prompts, optionally refines them through a language model,
//! generates images in single shots or sequential batches, and keeps a
//! persistent newest-first gallery of the results.

pub mod ai;
pub mod app;
pub mod aspect;
pub mod batch;
pub mod download;
pub mod error;
pub mod gallery;
pub mod models;
pub mod prompts;
pub mod storage;

pub use error::{Error, Result};
