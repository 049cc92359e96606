//! Pure dimension math for applying a [`Geometry`] to a source size.

use crate::geometry::{Geometry, ResizeMode};

/// What a resize should do to the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    /// Leave the image as is (shrink-only/enlarge-only conditions not met)
    Keep,
    /// Scale to exactly these dimensions
    Scale { width: u32, height: u32 },
    /// Cover these dimensions, then center-crop to them
    Crop { width: u32, height: u32 },
}

impl ResizePlan {
    /// Output dimensions for a source of the given size.
    pub fn output_dimensions(self, source: (u32, u32)) -> (u32, u32) {
        match self {
            Self::Keep => source,
            Self::Scale { width, height } | Self::Crop { width, height } => (width, height),
        }
    }
}

/// Work out the resize for a `src_width × src_height` image.
pub fn plan_resize(src_width: u32, src_height: u32, geometry: &Geometry) -> ResizePlan {
    let (w, h) = (geometry.width(), geometry.height());

    match geometry.mode() {
        ResizeMode::Fit => fit(src_width, src_height, w, h),
        ResizeMode::Exact => match (w, h) {
            (Some(width), Some(height)) => ResizePlan::Scale { width, height },
            _ => fit(src_width, src_height, w, h),
        },
        ResizeMode::Fill => match (w, h) {
            (Some(bw), Some(bh)) => {
                let scale = (bw as f64 / src_width as f64).max(bh as f64 / src_height as f64);
                scaled(src_width, src_height, scale)
            }
            _ => fit(src_width, src_height, w, h),
        },
        ResizeMode::Crop => match (w, h) {
            (Some(width), Some(height)) => ResizePlan::Crop { width, height },
            _ => fit(src_width, src_height, w, h),
        },
        ResizeMode::ShrinkOnly => {
            let larger = w.is_some_and(|bw| src_width > bw) || h.is_some_and(|bh| src_height > bh);
            if larger {
                fit(src_width, src_height, w, h)
            } else {
                ResizePlan::Keep
            }
        }
        ResizeMode::EnlargeOnly => {
            let smaller = w.map_or(true, |bw| src_width < bw) && h.map_or(true, |bh| src_height < bh);
            if smaller {
                fit(src_width, src_height, w, h)
            } else {
                ResizePlan::Keep
            }
        }
    }
}

/// Aspect-preserving fit inside the (possibly half-open) box.
fn fit(src_width: u32, src_height: u32, w: Option<u32>, h: Option<u32>) -> ResizePlan {
    match (w, h) {
        (Some(bw), Some(bh)) => {
            let sx = bw as f64 / src_width as f64;
            let sy = bh as f64 / src_height as f64;
            if sx <= sy {
                ResizePlan::Scale {
                    width: bw,
                    height: scale_side(src_height, sx),
                }
            } else {
                ResizePlan::Scale {
                    width: scale_side(src_width, sy),
                    height: bh,
                }
            }
        }
        (Some(bw), None) => ResizePlan::Scale {
            width: bw,
            height: scale_side(src_height, bw as f64 / src_width as f64),
        },
        (None, Some(bh)) => ResizePlan::Scale {
            width: scale_side(src_width, bh as f64 / src_height as f64),
            height: bh,
        },
        (None, None) => ResizePlan::Keep,
    }
}

fn scaled(src_width: u32, src_height: u32, scale: f64) -> ResizePlan {
    ResizePlan::Scale {
        width: scale_side(src_width, scale),
        height: scale_side(src_height, scale),
    }
}

/// Scale one side, never below one pixel.
fn scale_side(side: u32, scale: f64) -> u32 {
    let value = (side as f64 * scale).round();
    if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        (value as u32).max(1)
    }
}
