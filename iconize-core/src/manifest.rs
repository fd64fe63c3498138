//! `Contents.json` manifest serialization

use crate::{ImageOrientation, Result, Variant};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// File name Xcode expects inside every catalog directory
pub const MANIFEST_FILE_NAME: &str = "Contents.json";

/// Manifest format version written into every manifest
pub const MANIFEST_VERSION: &str = "1.0";

/// Metadata of one image file in a catalog directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestImage {
    pub idiom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub scale: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(
        default,
        rename = "minimum-system-version",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_system_version: Option<String>,
}

impl ManifestImage {
    /// Builds the record for a variant, using the size text of its resource
    pub fn from_variant(variant: &Variant) -> Self {
        let size = if variant.kind.has_point_size() {
            variant.size.as_ref().map(|size| size.as_str().to_string())
        } else {
            None
        };

        let orientation = match variant.orientation {
            ImageOrientation::Unspecified => None,
            orientation => Some(orientation.as_str().to_string()),
        };

        Self {
            idiom: variant.idiom.clone(),
            size,
            scale: variant.scale.as_str().to_string(),
            filename: variant.filename(),
            orientation,
            extent: variant.extent.clone(),
            role: variant.role.clone(),
            subtype: variant.subtype.clone(),
            platform: variant.platform_tag.clone(),
            minimum_system_version: variant.minimum_system_version.clone(),
        }
    }
}

/// The `Contents.json` of one catalog directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub author: String,
    pub version: String,
    pub images: Vec<ManifestImage>,
}

impl Manifest {
    /// Creates an empty manifest
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            version: MANIFEST_VERSION.to_string(),
            images: Vec::new(),
        }
    }

    /// Appends the record of a variant; records keep insertion order
    pub fn record(&mut self, variant: &Variant) {
        self.images.push(ManifestImage::from_variant(variant));
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Drops all records so the manifest can be reused for the next directory
    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Serializes the manifest as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes `Contents.json` into `dir`, replacing any existing manifest.
    ///
    /// The file is written to a temporary file in `dir` first and then renamed
    /// into place, so readers never observe a partial manifest.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let json = self.to_json()?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        log::info!("Wrote {} ({} images)", path.display(), self.images.len());
        Ok(path)
    }

    /// Reads a manifest from a `Contents.json` file
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
