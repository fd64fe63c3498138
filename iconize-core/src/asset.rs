//! Value types describing a single asset variant: point size, scale,
//! orientation, target platform and aspect mode.

use crate::{Error, FormatKind, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `WIDTHxHEIGHT` in points, e.g. `60x60` or `83.5x83.5`.
///
/// `50.5.5x60.5.6` matches the pattern but is rejected when the numbers are parsed.
static SIZE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\d.]+)x([\d.]+)$").expect("size pattern is a valid regex"));

/// Point size of an asset, parsed from its textual form
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSize {
    width: f32,
    height: f32,
    text: String,
}

impl AssetSize {
    /// Parses a `WIDTHxHEIGHT` size string
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidFormat {
            kind: FormatKind::Size,
            value: text.to_string(),
        };

        let captures = SIZE_PATTERN.captures(text).ok_or_else(invalid)?;
        let width = captures[1].parse::<f32>().map_err(|_| invalid())?;
        let height = captures[2].parse::<f32>().map_err(|_| invalid())?;

        Ok(Self {
            width,
            height,
            text: text.to_string(),
        })
    }

    /// Builds a size from point dimensions by formatting and re-parsing them
    pub fn from_points(width: f32, height: f32) -> Result<Self> {
        Self::parse(&format!("{}x{}", width, height))
    }

    /// Width in points
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height in points
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The size exactly as it was specified
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Pixel dimensions of this size rendered at `scale`
    pub fn pixel_size(&self, scale: AssetScale) -> (u32, u32) {
        let factor = scale.multiplier() as f32;
        (
            (self.width * factor).round() as u32,
            (self.height * factor).round() as u32,
        )
    }
}

impl FromStr for AssetSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AssetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Display density multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetScale {
    X1,
    X2,
    X3,
}

impl AssetScale {
    pub const ALL: [AssetScale; 3] = [AssetScale::X1, AssetScale::X2, AssetScale::X3];

    pub fn multiplier(self) -> u32 {
        match self {
            AssetScale::X1 => 1,
            AssetScale::X2 => 2,
            AssetScale::X3 => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetScale::X1 => "1x",
            AssetScale::X2 => "2x",
            AssetScale::X3 => "3x",
        }
    }
}

impl FromStr for AssetScale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1x" => Ok(AssetScale::X1),
            "2x" => Ok(AssetScale::X2),
            "3x" => Ok(AssetScale::X3),
            _ => Err(Error::InvalidFormat {
                kind: FormatKind::Scale,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AssetScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orientation a variant (and its source image) is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageOrientation {
    Portrait,
    Landscape,
    /// Square or orientation-independent
    Unspecified,
}

impl ImageOrientation {
    /// Suffix appended to resource names of orientation-specific variant lists
    pub fn suffix(self) -> &'static str {
        match self {
            ImageOrientation::Portrait => "_Portrait",
            ImageOrientation::Landscape => "_Landscape",
            ImageOrientation::Unspecified => "",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageOrientation::Portrait => "portrait",
            ImageOrientation::Landscape => "landscape",
            ImageOrientation::Unspecified => "none",
        }
    }
}

impl FromStr for ImageOrientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(ImageOrientation::Portrait),
            "landscape" => Ok(ImageOrientation::Landscape),
            "none" | "" => Ok(ImageOrientation::Unspecified),
            _ => Err(Error::InvalidFormat {
                kind: FormatKind::Orientation,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ImageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target platform, used as the lookup key for variant resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Watch,
    IPhone,
    IPad,
    /// Variants shared by iPhone and iPad
    Ios,
    Mac,
    Car,
    Messages,
    Undefined,
}

impl Platform {
    /// Platforms a user can pick for an app icon
    pub const APP_ICON: [Platform; 5] = [
        Platform::Watch,
        Platform::IPhone,
        Platform::IPad,
        Platform::Mac,
        Platform::Car,
    ];

    /// Name used in resource names and per-platform directory names
    pub fn name(self) -> &'static str {
        match self {
            Platform::Watch => "Watch",
            Platform::IPhone => "iPhone",
            Platform::IPad => "iPad",
            Platform::Ios => "iOS",
            Platform::Mac => "Mac",
            Platform::Car => "Car",
            Platform::Messages => "Messages",
            Platform::Undefined => "",
        }
    }

    /// Resource key for this platform; only iPhone and iPad split by orientation
    pub fn resource_key(self, orientation: ImageOrientation) -> String {
        match self {
            Platform::IPhone | Platform::IPad => format!("{}{}", self.name(), orientation.suffix()),
            _ => self.name().to_string(),
        }
    }

    /// iPhone and iPad share the variants of the iOS pseudo platform
    pub fn shares_ios_variants(self) -> bool {
        matches!(self, Platform::IPhone | Platform::IPad)
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "watch" | "watchos" => Ok(Platform::Watch),
            "iphone" => Ok(Platform::IPhone),
            "ipad" => Ok(Platform::IPad),
            "ios" => Ok(Platform::Ios),
            "mac" | "macos" | "osx" => Ok(Platform::Mac),
            "car" | "carplay" => Ok(Platform::Car),
            "messages" | "imessage" => Ok(Platform::Messages),
            _ => Err(Error::InvalidFormat {
                kind: FormatKind::Platform,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a source image is mapped onto a target size of a different aspect ratio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectMode {
    /// Scale to fit inside the target and pad the remaining area
    #[default]
    Fit,
    /// Scale to cover the target and crop the overflow, centered
    Fill,
    /// Stretch to the exact target size
    #[serde(rename = "none")]
    Stretch,
}

impl AspectMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectMode::Fit => "fit",
            AspectMode::Fill => "fill",
            AspectMode::Stretch => "none",
        }
    }
}

impl FromStr for AspectMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fit" => Ok(AspectMode::Fit),
            "fill" => Ok(AspectMode::Fill),
            "none" | "stretch" => Ok(AspectMode::Stretch),
            _ => Err(Error::InvalidFormat {
                kind: FormatKind::AspectMode,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
