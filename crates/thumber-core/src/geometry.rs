//! Textual resize geometries (`64x64`, `640x`, `x480`, `200x200#`).
//!
//! A geometry is a target box plus a mode modifier, in the spirit of
//! ImageMagick's geometry strings:
//!
//! | Text | Mode | Meaning |
//! |------|------|---------|
//! | `WxH` | [`ResizeMode::Fit`] | Fit inside the box, keep aspect ratio |
//! | `WxH!` | [`ResizeMode::Exact`] | Exactly `W×H`, aspect ratio ignored |
//! | `WxH^` | [`ResizeMode::Fill`] | Cover the box, keep aspect ratio |
//! | `WxH#` | [`ResizeMode::Crop`] | Cover the box, then center-crop to `W×H` |
//! | `WxH>` | [`ResizeMode::ShrinkOnly`] | Fit, only if the image is larger |
//! | `WxH<` | [`ResizeMode::EnlargeOnly`] | Fit, only if the image is smaller |
//!
//! Either dimension may be omitted for the aspect-preserving fit modes
//! (`640x`, `x480`, and bare `640` which means `640x`).
//!
//! [`Geometry`] renders back to a canonical text form; `parse(g.to_string())`
//! always yields `g`, so the canonical text is what policies match against.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::GeometryError;

/// How the target box is applied to the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeMode {
    #[default]
    Fit,
    Exact,
    Fill,
    Crop,
    ShrinkOnly,
    EnlargeOnly,
}

impl ResizeMode {
    fn from_modifier(c: char) -> Option<Self> {
        match c {
            '!' => Some(Self::Exact),
            '^' => Some(Self::Fill),
            '#' => Some(Self::Crop),
            '>' => Some(Self::ShrinkOnly),
            '<' => Some(Self::EnlargeOnly),
            _ => None,
        }
    }

    /// Modifier suffix used in canonical text (empty for `Fit`).
    pub fn modifier(self) -> &'static str {
        match self {
            Self::Fit => "",
            Self::Exact => "!",
            Self::Fill => "^",
            Self::Crop => "#",
            Self::ShrinkOnly => ">",
            Self::EnlargeOnly => "<",
        }
    }

    /// Human-readable mode name for error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Exact => "exact",
            Self::Fill => "fill",
            Self::Crop => "crop",
            Self::ShrinkOnly => "shrink-only",
            Self::EnlargeOnly => "enlarge-only",
        }
    }

    /// Whether this mode needs both width and height.
    pub fn requires_both_dimensions(self) -> bool {
        matches!(self, Self::Exact | Self::Fill | Self::Crop)
    }
}

/// A parsed resize specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: Option<u32>,
    height: Option<u32>,
    mode: ResizeMode,
}

impl Geometry {
    /// Parse a geometry string.
    pub fn parse(text: &str) -> Result<Self, GeometryError> {
        if text.is_empty() {
            return Err(GeometryError::Empty);
        }

        let (size, mode) = match text.chars().last().and_then(ResizeMode::from_modifier) {
            Some(mode) => (&text[..text.len() - 1], mode),
            None => (text, ResizeMode::Fit),
        };

        let (width, height) = match size.split_once('x') {
            Some((w, h)) => (
                parse_dimension(text, w)?,
                parse_dimension(text, h)?,
            ),
            None => (parse_dimension(text, size)?, None),
        };

        if width.is_none() && height.is_none() {
            return Err(GeometryError::MissingDimensions {
                geometry: text.to_string(),
            });
        }

        if mode.requires_both_dimensions() && (width.is_none() || height.is_none()) {
            return Err(GeometryError::IncompleteForMode {
                geometry: text.to_string(),
                mode: mode.name(),
            });
        }

        Ok(Self {
            width,
            height,
            mode,
        })
    }

    /// Build a geometry from parts, applying the same checks as [`Geometry::parse`].
    pub fn new(
        width: Option<u32>,
        height: Option<u32>,
        mode: ResizeMode,
    ) -> Result<Self, GeometryError> {
        Self::parse(
            &Self {
                width,
                height,
                mode,
            }
            .to_string(),
        )
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn mode(&self) -> ResizeMode {
        self.mode
    }
}

/// Parse one side of the `x`. Empty means "unconstrained".
fn parse_dimension(geometry: &str, token: &str) -> Result<Option<u32>, GeometryError> {
    if token.is_empty() {
        return Ok(None);
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        // Anything other than digits here is a grammar error, not a bad number
        if token.bytes().any(|b| !b.is_ascii_alphanumeric()) || token.contains('x') {
            return Err(GeometryError::Malformed {
                geometry: geometry.to_string(),
            });
        }
        return Err(GeometryError::InvalidNumber {
            geometry: geometry.to_string(),
            token: token.to_string(),
        });
    }
    let value: u32 = token.parse().map_err(|_| GeometryError::InvalidNumber {
        geometry: geometry.to_string(),
        token: token.to_string(),
    })?;
    if value == 0 {
        return Err(GeometryError::ZeroDimension {
            geometry: geometry.to_string(),
        });
    }
    Ok(Some(value))
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(w) = self.width {
            write!(f, "{w}")?;
        }
        f.write_str("x")?;
        if let Some(h) = self.height {
            write!(f, "{h}")?;
        }
        f.write_str(self.mode.modifier())
    }
}

impl FromStr for Geometry {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
