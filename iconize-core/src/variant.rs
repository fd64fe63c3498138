//! Asset kinds and the variants they are made of

use crate::{AssetScale, AssetSize, Error, FormatKind, ImageOrientation, Platform, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Kind of asset catalog entry to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    AppIcon,
    ImageSet,
    LaunchImage,
    MessagesIcon,
}

impl AssetKind {
    /// Directory grouping all catalogs of this kind
    pub fn directory_name(self) -> &'static str {
        match self {
            AssetKind::AppIcon => "App Icons",
            AssetKind::ImageSet => "Image Sets",
            AssetKind::LaunchImage => "Launch Images",
            AssetKind::MessagesIcon => "iMessage Icons",
        }
    }

    /// Extension of the catalog directory, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::AppIcon => "appiconset",
            AssetKind::ImageSet => "imageset",
            AssetKind::LaunchImage => "launchimage",
            AssetKind::MessagesIcon => "stickersiconset",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::AppIcon => "app-icon",
            AssetKind::ImageSet => "image-set",
            AssetKind::LaunchImage => "launch-image",
            AssetKind::MessagesIcon => "messages-icon",
        }
    }

    fn resource_prefix(self) -> &'static str {
        match self {
            AssetKind::AppIcon => "AppIcon",
            AssetKind::ImageSet => "ImageSet",
            AssetKind::LaunchImage => "LaunchImage",
            AssetKind::MessagesIcon => "MessagesIcon",
        }
    }

    /// Name of the variant resource for a platform and orientation
    pub fn resource_name(self, platform: Platform, orientation: ImageOrientation) -> String {
        match self {
            AssetKind::ImageSet => self.resource_prefix().to_string(),
            _ => format!(
                "{}_{}",
                self.resource_prefix(),
                platform.resource_key(orientation)
            ),
        }
    }

    /// Platform implied by the kind itself, if the user does not choose one
    pub fn fixed_platform(self) -> Option<Platform> {
        match self {
            AssetKind::ImageSet => Some(Platform::Undefined),
            AssetKind::MessagesIcon => Some(Platform::Messages),
            AssetKind::AppIcon | AssetKind::LaunchImage => None,
        }
    }

    /// Whether `platform` can be selected for this kind
    pub fn supports(self, platform: Platform) -> bool {
        match self {
            AssetKind::AppIcon => matches!(
                platform,
                Platform::Watch
                    | Platform::IPhone
                    | Platform::IPad
                    | Platform::Ios
                    | Platform::Mac
                    | Platform::Car
            ),
            AssetKind::LaunchImage => matches!(platform, Platform::IPhone | Platform::IPad),
            AssetKind::ImageSet | AssetKind::MessagesIcon => self.fixed_platform() == Some(platform),
        }
    }

    /// Whether the variant resources carry a point size
    pub fn has_point_size(self) -> bool {
        !matches!(self, AssetKind::ImageSet)
    }

    /// Only app icons may be split into one catalog per platform
    pub fn supports_per_platform(self) -> bool {
        matches!(self, AssetKind::AppIcon)
    }

    /// Only app icons pull in the iOS pseudo platform for iPhone and iPad
    pub fn merges_ios_variants(self) -> bool {
        matches!(self, AssetKind::AppIcon)
    }

    /// Whether variants are split by the orientation of the source image
    pub fn is_oriented(self) -> bool {
        matches!(self, AssetKind::LaunchImage)
    }
}

impl FromStr for AssetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "app-icon" | "appicon" => Ok(AssetKind::AppIcon),
            "image-set" | "imageset" => Ok(AssetKind::ImageSet),
            "launch-image" | "launchimage" => Ok(AssetKind::LaunchImage),
            "messages-icon" | "imessage" | "messages" => Ok(AssetKind::MessagesIcon),
            _ => Err(Error::InvalidFormat {
                kind: FormatKind::AssetKind,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a variant resource, as written in the JSON document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantRecord {
    pub idiom: String,
    #[serde(default)]
    pub size: Option<String>,
    pub scale: String,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub extent: Option<String>,
    #[serde(default, rename = "minimum-system-version")]
    pub minimum_system_version: Option<String>,
}

/// A single image to generate
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub kind: AssetKind,
    pub idiom: String,
    /// Point size; image sets get theirs from the source image
    pub size: Option<AssetSize>,
    pub scale: AssetScale,
    pub orientation: ImageOrientation,
    pub role: Option<String>,
    pub subtype: Option<String>,
    pub platform_tag: Option<String>,
    pub extent: Option<String>,
    pub minimum_system_version: Option<String>,
}

impl Variant {
    /// Validates a raw resource record
    pub fn from_record(kind: AssetKind, record: VariantRecord) -> Result<Self> {
        let scale = record.scale.parse::<AssetScale>()?;

        let size = match record.size.as_deref() {
            Some(text) => Some(AssetSize::parse(text)?),
            None if kind.has_point_size() => {
                return Err(Error::InvalidFormat {
                    kind: FormatKind::Size,
                    value: String::new(),
                })
            }
            None => None,
        };

        let orientation = match record.orientation.as_deref() {
            Some(text) => text.parse::<ImageOrientation>()?,
            None => ImageOrientation::Unspecified,
        };

        Ok(Self {
            kind,
            idiom: record.idiom,
            size,
            scale,
            orientation,
            role: record.role,
            subtype: record.subtype,
            platform_tag: record.platform,
            extent: record.extent,
            minimum_system_version: record.minimum_system_version,
        })
    }

    /// Returns a copy of this variant with its point size set
    pub fn with_size(&self, size: AssetSize) -> Self {
        Self {
            size: Some(size),
            ..self.clone()
        }
    }

    /// Pixel dimensions of the image to render, once the size is known
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        self.size.as_ref().map(|size| size.pixel_size(self.scale))
    }

    /// Image set 3x images are the source image itself
    pub fn reproduces_source(&self) -> bool {
        self.kind == AssetKind::ImageSet && self.scale == AssetScale::X3
    }

    /// App Store marketing artwork (`ios-marketing`, `watch-marketing`)
    pub fn is_marketing(&self) -> bool {
        self.idiom.ends_with("-marketing")
    }

    /// Whether the image must be written without an alpha channel
    pub fn requires_opaque(&self) -> bool {
        self.is_marketing() || self.kind == AssetKind::LaunchImage
    }

    /// File name of the generated image inside the catalog directory
    pub fn filename(&self) -> String {
        match self.kind {
            AssetKind::AppIcon => self.app_icon_filename(),
            AssetKind::ImageSet => format!("image@{}.png", self.scale),
            AssetKind::LaunchImage => match self.pixel_size() {
                Some((width, height)) => format!("LaunchImage-{}x{}.png", width, height),
                None => format!("LaunchImage@{}.png", self.scale),
            },
            AssetKind::MessagesIcon => match self.pixel_size() {
                Some((width, height)) => format!("icon-{}x{}.png", width, height),
                None => format!("icon@{}.png", self.scale),
            },
        }
    }

    // Point size plus scale, so 16x16@2x and 32x32@1x stay distinct files
    // while identical sizes of different idioms share one.
    fn app_icon_filename(&self) -> String {
        if self.is_marketing() {
            return format!("{}.png", self.idiom);
        }

        let mut name = String::from("icon");
        if let Some(size) = &self.size {
            if size.is_square() {
                name.push_str(&format!("-{}", size.width()));
            } else {
                name.push_str(&format!("-{}", size));
            }
        }
        name.push_str(&format!("@{}", self.scale));
        if let Some(role) = &self.role {
            name.push_str(&format!("-{}", role));
        }
        if let Some(subtype) = &self.subtype {
            name.push_str(&format!("-{}", subtype));
        }
        name.push_str(".png");
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(idiom: &str, size: Option<&str>, scale: &str) -> VariantRecord {
        VariantRecord {
            idiom: idiom.to_string(),
            size: size.map(str::to_string),
            scale: scale.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(
            AssetKind::AppIcon.resource_name(Platform::Mac, ImageOrientation::Unspecified),
            "AppIcon_Mac"
        );
        assert_eq!(
            AssetKind::LaunchImage.resource_name(Platform::IPad, ImageOrientation::Landscape),
            "LaunchImage_iPad_Landscape"
        );
        assert_eq!(
            AssetKind::ImageSet.resource_name(Platform::Undefined, ImageOrientation::Unspecified),
            "ImageSet"
        );
        assert_eq!(
            AssetKind::MessagesIcon.resource_name(Platform::Messages, ImageOrientation::Unspecified),
            "MessagesIcon_Messages"
        );
    }

    #[test]
    fn test_app_icon_filenames() {
        let variant =
            Variant::from_record(AssetKind::AppIcon, record("mac", Some("16x16"), "2x")).unwrap();
        assert_eq!(variant.filename(), "icon-16@2x.png");

        let variant =
            Variant::from_record(AssetKind::AppIcon, record("ipad", Some("83.5x83.5"), "2x"))
                .unwrap();
        assert_eq!(variant.filename(), "icon-83.5@2x.png");
        assert_eq!(variant.pixel_size(), Some((167, 167)));

        let variant = Variant::from_record(
            AssetKind::AppIcon,
            record("ios-marketing", Some("1024x1024"), "1x"),
        )
        .unwrap();
        assert_eq!(variant.filename(), "ios-marketing.png");
        assert!(variant.requires_opaque());
    }

    #[test]
    fn test_watch_filenames_carry_role_and_subtype() {
        let mut raw = record("watch", Some("27.5x27.5"), "2x");
        raw.role = Some("notificationCenter".to_string());
        raw.subtype = Some("42mm".to_string());
        let variant = Variant::from_record(AssetKind::AppIcon, raw).unwrap();
        assert_eq!(variant.filename(), "icon-27.5@2x-notificationCenter-42mm.png");
        assert_eq!(variant.pixel_size(), Some((55, 55)));
    }

    #[test]
    fn test_identical_sizes_share_a_filename_across_idioms() {
        let iphone =
            Variant::from_record(AssetKind::AppIcon, record("iphone", Some("29x29"), "2x")).unwrap();
        let ipad =
            Variant::from_record(AssetKind::AppIcon, record("ipad", Some("29x29"), "2x")).unwrap();
        assert_eq!(iphone.filename(), ipad.filename());
    }

    #[test]
    fn test_messages_and_launch_filenames_use_pixels() {
        let variant =
            Variant::from_record(AssetKind::MessagesIcon, record("iphone", Some("60x45"), "3x"))
                .unwrap();
        assert_eq!(variant.filename(), "icon-180x135.png");
        assert!(!variant.requires_opaque());

        let mut raw = record("iphone", Some("375x812"), "3x");
        raw.orientation = Some("portrait".to_string());
        let variant = Variant::from_record(AssetKind::LaunchImage, raw).unwrap();
        assert_eq!(variant.filename(), "LaunchImage-1125x2436.png");
        assert_eq!(variant.orientation, ImageOrientation::Portrait);
        assert!(variant.requires_opaque());
    }

    #[test]
    fn test_image_set_size_is_bound_later() {
        let variant =
            Variant::from_record(AssetKind::ImageSet, record("universal", None, "2x")).unwrap();
        assert_eq!(variant.pixel_size(), None);
        assert_eq!(variant.filename(), "image@2x.png");

        let bound = variant.with_size(AssetSize::from_points(100.0, 50.0).unwrap());
        assert_eq!(bound.pixel_size(), Some((200, 100)));
        assert!(!bound.reproduces_source());

        let full =
            Variant::from_record(AssetKind::ImageSet, record("universal", None, "3x")).unwrap();
        assert!(full.reproduces_source());
    }

    #[test]
    fn test_supported_platforms() {
        assert!(AssetKind::AppIcon.supports(Platform::Mac));
        assert!(AssetKind::AppIcon.supports(Platform::Ios));
        assert!(!AssetKind::AppIcon.supports(Platform::Messages));
        assert!(AssetKind::LaunchImage.supports(Platform::IPad));
        assert!(!AssetKind::LaunchImage.supports(Platform::Mac));
        assert!(!AssetKind::LaunchImage.supports(Platform::Ios));
        assert!(AssetKind::MessagesIcon.supports(Platform::Messages));
        assert!(!AssetKind::ImageSet.supports(Platform::IPhone));
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let result = Variant::from_record(AssetKind::AppIcon, record("iphone", Some("60x60"), "5x"));
        assert!(matches!(
            result,
            Err(Error::InvalidFormat {
                kind: FormatKind::Scale,
                ..
            })
        ));

        let result = Variant::from_record(AssetKind::AppIcon, record("iphone", None, "2x"));
        assert!(matches!(
            result,
            Err(Error::InvalidFormat {
                kind: FormatKind::Size,
                ..
            })
        ));

        let mut raw = record("iphone", Some("320x480"), "2x");
        raw.orientation = Some("sideways".to_string());
        assert!(matches!(
            Variant::from_record(AssetKind::LaunchImage, raw),
            Err(Error::InvalidFormat {
                kind: FormatKind::Orientation,
                ..
            })
        ));
    }
}
