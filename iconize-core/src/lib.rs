//! Iconize Core Library
//!
//! This library provides the data model for Xcode asset catalogs: the variant
//! value types, the bundled variant resources for every supported platform and
//! the `Contents.json` manifest format.

pub mod asset;
pub mod manifest;
pub mod spec_loader;
pub mod variant;

pub use asset::{AspectMode, AssetScale, AssetSize, ImageOrientation, Platform};
pub use manifest::{Manifest, ManifestImage, MANIFEST_FILE_NAME};
pub use spec_loader::AssetSpecLoader;
pub use variant::{AssetKind, Variant, VariantRecord};

use std::fmt;

/// Result type for iconize-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which piece of declarative data failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Size,
    Scale,
    Orientation,
    Platform,
    AspectMode,
    AssetKind,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatKind::Size => "size",
            FormatKind::Scale => "scale",
            FormatKind::Orientation => "orientation",
            FormatKind::Platform => "platform",
            FormatKind::AspectMode => "aspect mode",
            FormatKind::AssetKind => "asset kind",
        };
        f.write_str(name)
    }
}

/// Error types shared by every asset kind
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {kind} format: {value:?}")]
    InvalidFormat { kind: FormatKind, value: String },

    #[error("Variant resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Variant resource {name} is malformed: {source}")]
    ResourceMalformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Variant resource {name} contains an invalid entry: {source}")]
    InvalidResource {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("No source image supplied for orientation: {0}")]
    MissingImage(ImageOrientation),

    #[error("No platform selected")]
    MissingPlatform,

    #[error("{platform} is not a platform for {kind}")]
    UnsupportedPlatform { kind: AssetKind, platform: Platform },

    #[error("No catalog name given")]
    MissingName,
}
