//! Iconize Builder Library
//!
//! This library renders the images of an asset catalog from one or more source
//! images and writes them, together with their `Contents.json`, to disk.

pub mod catalog_builder;
pub mod png_codec;
pub mod progress_tracker;
pub mod transform;

pub use catalog_builder::{
    CatalogBuilder, CatalogDirectory, ExportReport, SourceImages, VariantFailure,
};
pub use png_codec::AlphaPolicy;

use iconize_core::{AspectMode, Platform};
use serde::{Deserialize, Serialize};

/// Result type for iconize-builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for iconize-builder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("iconize core error: {0}")]
    Core(#[from] iconize_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Rescaling image to {width}x{height} failed")]
    RescalingFailed { width: u32, height: u32 },

    #[error("No image could be generated ({} failures)", .0.len())]
    ExportFailed(Vec<VariantFailure>),
}

/// Export configuration, persisted by the caller between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Platforms to generate app icons or launch images for
    pub platforms: Vec<Platform>,
    /// How source images are mapped onto differently shaped targets
    pub aspect_mode: AspectMode,
    /// Write all platforms into one catalog instead of one per platform
    pub combined: bool,
    /// Author written into every manifest
    pub author: String,
    /// Top level directory created inside the output root
    pub assets_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            platforms: Vec::new(),
            aspect_mode: AspectMode::Fit,
            combined: false,
            author: "iconize".to_string(),
            assets_dir: "Iconize Assets".to_string(),
        }
    }
}
