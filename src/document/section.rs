//! Sections and image geometry.
//!
//! Geometry fields are `Option`: `None` is an absent or unreadable value
//! (a cleared field, or a dimension typed as non-numeric text) and renders
//! as `null` in the front-matter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Edge length of a fresh section's image box, in pixels.
pub const DEFAULT_DIMENSION: u32 = 300;

/// Where a section image sits relative to its text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImagePosition {
    /// Centered block above the text.
    #[default]
    Top,
    /// Floated left, text wraps on the right.
    TopLeft,
    /// Floated right, text wraps on the left.
    TopRight,
}

impl ImagePosition {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
        }
    }
}

impl fmt::Display for ImagePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImagePosition {
    type Err = ();

    /// Only the three exact tags parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            _ => Err(()),
        }
    }
}

/// Which image dimension an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Height,
    Width,
}

impl FromStr for Dimension {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height" | "imageHeight" => Ok(Self::Height),
            "width" | "imageWidth" => Ok(Self::Width),
            _ => Err(()),
        }
    }
}

/// Provenance of an image read from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    /// Milliseconds since the Unix epoch.
    pub last_modified: Option<u64>,
}

/// A decoded image ready to be attached to a section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionImage {
    /// Reference stored in `Section::image` (a base64 data URL for files).
    pub reference: String,
    pub file: ImageFile,
    /// Natural pixel size.
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub text: String,
    /// Opaque reference: URL, path, data URL or empty.
    pub image: String,
    pub file: Option<ImageFile>,
    pub image_height: Option<u32>,
    pub image_width: Option<u32>,
    /// `width / height`, set when an image is decoded.
    pub aspect_ratio: Option<f64>,
    pub image_position: ImagePosition,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            text: String::new(),
            image: String::new(),
            file: None,
            image_height: Some(DEFAULT_DIMENSION),
            image_width: Some(DEFAULT_DIMENSION),
            aspect_ratio: None,
            image_position: ImagePosition::Top,
        }
    }
}

impl Section {
    /// Default section as created by a dimension edit: square ratio.
    pub fn with_unit_ratio() -> Self {
        Self {
            aspect_ratio: Some(1.0),
            ..Self::default()
        }
    }

    /// Attach a decoded image, replacing geometry with its natural size.
    pub fn attach(&mut self, image: SectionImage) {
        self.image = image.reference;
        self.file = Some(image.file);
        self.image_height = positive(image.height);
        self.image_width = positive(image.width);
        self.aspect_ratio = match (self.image_width, self.image_height) {
            (Some(w), Some(h)) => Some(f64::from(w) / f64::from(h)),
            _ => None,
        };
    }

    /// Set the image from a typed reference. Geometry is kept.
    pub fn set_reference(&mut self, reference: String) {
        self.image = reference;
        self.file = None;
    }

    /// Apply a dimension edit.
    ///
    /// With `locked` and a known aspect ratio the other dimension follows:
    /// `width = height * ratio` or `height = width / ratio`, rounded.
    /// An unreadable value clears the edited dimension and, when locked,
    /// its partner too.
    pub fn set_dimension(&mut self, dimension: Dimension, value: Option<u32>, locked: bool) {
        let ratio = self.aspect_ratio.filter(|_| locked);

        match dimension {
            Dimension::Height => {
                self.image_height = value;
                if let Some(r) = ratio {
                    self.image_width = value.and_then(|h| scale(h, r));
                }
            }
            Dimension::Width => {
                self.image_width = value;
                if let Some(r) = ratio {
                    self.image_height = value.and_then(|w| scale(w, r.recip()));
                }
            }
        }
    }
}

/// Parse a typed dimension. Anything but a positive integer is `None`.
pub fn parse_dimension(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().and_then(positive)
}

#[inline]
fn positive(n: u32) -> Option<u32> {
    (n > 0).then_some(n)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(n: u32, factor: f64) -> Option<u32> {
    let scaled = (f64::from(n) * factor).round();
    if !scaled.is_finite() || scaled <= 0.0 {
        return None;
    }
    Some(scaled.min(f64::from(u32::MAX)) as u32)
}
