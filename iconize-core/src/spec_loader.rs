//! Resolution and parsing of variant resources
//!
//! Each resource is a JSON document with an `images` list describing the
//! variants Xcode expects for one asset kind, platform and (for launch images)
//! orientation. The resources ship inside the binary; a directory holding
//! files of the same names can override them.

use crate::{AssetKind, Error, ImageOrientation, Platform, Result, Variant, VariantRecord};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::PathBuf;

macro_rules! resource {
    ($name:literal) => {
        ($name, include_str!(concat!("../resources/", $name, ".json")))
    };
}

/// Variant resources bundled with the library
const EMBEDDED_RESOURCES: &[(&str, &str)] = &[
    resource!("AppIcon_Car"),
    resource!("AppIcon_iOS"),
    resource!("AppIcon_iPad"),
    resource!("AppIcon_iPhone"),
    resource!("AppIcon_Mac"),
    resource!("AppIcon_Watch"),
    resource!("ImageSet"),
    resource!("LaunchImage_iPad_Landscape"),
    resource!("LaunchImage_iPad_Portrait"),
    resource!("LaunchImage_iPhone_Landscape"),
    resource!("LaunchImage_iPhone_Portrait"),
    resource!("MessagesIcon_Messages"),
];

#[derive(Debug, Deserialize)]
struct ResourceDocument {
    images: Vec<VariantRecord>,
}

/// Loads the variant lists for asset kinds and platforms
#[derive(Debug, Clone, Default)]
pub struct AssetSpecLoader {
    override_dir: Option<PathBuf>,
}

impl AssetSpecLoader {
    /// A loader using only the bundled resources
    pub fn embedded() -> Self {
        Self::default()
    }

    /// A loader preferring `<dir>/<resource>.json` over the bundled resources
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    fn read_resource(&self, name: &str) -> Result<Cow<'static, str>> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(format!("{}.json", name));
            if path.is_file() {
                log::debug!("Reading variant resource {}", path.display());
                return Ok(Cow::Owned(std::fs::read_to_string(&path)?));
            }
        }

        EMBEDDED_RESOURCES
            .iter()
            .find(|(resource, _)| *resource == name)
            .map(|(_, contents)| Cow::Borrowed(*contents))
            .ok_or_else(|| Error::ResourceNotFound(name.to_string()))
    }

    /// Loads the variants of one resource.
    ///
    /// Any invalid record fails the whole resource.
    pub fn load(
        &self,
        kind: AssetKind,
        platform: Platform,
        orientation: ImageOrientation,
    ) -> Result<Vec<Variant>> {
        let name = kind.resource_name(platform, orientation);
        let contents = self.read_resource(&name)?;

        let document: ResourceDocument =
            serde_json::from_str(&contents).map_err(|source| Error::ResourceMalformed {
                name: name.clone(),
                source,
            })?;

        let variants = document
            .images
            .into_iter()
            .map(|record| Variant::from_record(kind, record))
            .collect::<Result<Vec<_>>>()
            .map_err(|source| Error::InvalidResource {
                name: name.clone(),
                source: Box::new(source),
            })?;

        log::debug!("Loaded {} variants from {}", variants.len(), name);
        Ok(variants)
    }

    /// Resolves the ordered variant catalog for a selection.
    ///
    /// Orientations are walked outermost, then platforms in selection order.
    /// For app icons, selecting iPhone or iPad also merges the iOS pseudo
    /// platform once. A resource selected twice is only loaded once.
    pub fn resolve(
        &self,
        kind: AssetKind,
        platforms: &[Platform],
        orientations: &[ImageOrientation],
    ) -> Result<Vec<Variant>> {
        let platforms = self.effective_platforms(kind, platforms)?;

        let orientations: Vec<ImageOrientation> = if kind.is_oriented() {
            orientations
                .iter()
                .copied()
                .filter(|orientation| *orientation != ImageOrientation::Unspecified)
                .collect()
        } else {
            vec![ImageOrientation::Unspecified]
        };
        if orientations.is_empty() {
            return Err(Error::MissingImage(ImageOrientation::Unspecified));
        }

        let mut loaded: Vec<String> = Vec::new();
        let mut catalog = Vec::new();

        for orientation in &orientations {
            for platform in &platforms {
                let name = kind.resource_name(*platform, *orientation);
                if loaded.contains(&name) {
                    continue;
                }
                catalog.extend(self.load(kind, *platform, *orientation)?);
                loaded.push(name);
            }
        }

        Ok(catalog)
    }

    fn effective_platforms(&self, kind: AssetKind, platforms: &[Platform]) -> Result<Vec<Platform>> {
        if let Some(platform) = kind.fixed_platform() {
            return Ok(vec![platform]);
        }

        let mut effective: Vec<Platform> = Vec::new();
        for platform in platforms {
            if *platform == Platform::Undefined || effective.contains(platform) {
                continue;
            }
            if !kind.supports(*platform) {
                return Err(Error::UnsupportedPlatform {
                    kind,
                    platform: *platform,
                });
            }
            effective.push(*platform);
        }
        if effective.is_empty() {
            return Err(Error::MissingPlatform);
        }

        if kind.merges_ios_variants()
            && effective.iter().any(|platform| platform.shares_ios_variants())
            && !effective.contains(&Platform::Ios)
        {
            effective.push(Platform::Ios);
        }

        Ok(effective)
    }
}
