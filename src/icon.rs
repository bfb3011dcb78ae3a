//! Canvas and geometry types for circular icons.
//!
//! This module provides the value types shared by the composer and the
//! export pipeline: the allowed canvas sizes, the validated canvas spec,
//! the ring layout derived from it, and the composited output image.

use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::color::MAX_COLORS;
use crate::error::{IconError, Result};

/// Smallest accepted border width in pixels.
pub const MIN_BORDER_WIDTH: u32 = 1;
/// Largest accepted border width in pixels.
pub const MAX_BORDER_WIDTH: u32 = 10;
/// Border width used when none is requested.
pub const DEFAULT_BORDER_WIDTH: u32 = 3;

/// Inner images narrower than this trigger the reduced-margin layout.
const MIN_IMAGE_SIZE: i64 = 4;

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// A square at `(offset, offset)` with side `size`.
    pub fn square(offset: u32, size: u32) -> Self {
        Self::new(offset, offset, size, size)
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Center point in floating point pixel space.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

// ============================================================================
// CanvasSize
// ============================================================================

/// The fixed set of square output sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CanvasSize {
    S16,
    S24,
    #[default]
    S32,
    S48,
    S64,
    S128,
}

impl CanvasSize {
    pub const ALL: [CanvasSize; 6] = [
        Self::S16,
        Self::S24,
        Self::S32,
        Self::S48,
        Self::S64,
        Self::S128,
    ];

    /// Side length in pixels.
    pub fn pixels(self) -> u32 {
        match self {
            Self::S16 => 16,
            Self::S24 => 24,
            Self::S32 => 32,
            Self::S48 => 48,
            Self::S64 => 64,
            Self::S128 => 128,
        }
    }
}

impl TryFrom<u32> for CanvasSize {
    type Error = IconError;

    fn try_from(px: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|size| size.pixels() == px)
            .ok_or_else(|| {
                IconError::InvalidCanvas(format!(
                    "size {px} is not one of 16, 24, 32, 48, 64, 128"
                ))
            })
    }
}

impl From<CanvasSize> for u32 {
    fn from(size: CanvasSize) -> Self {
        size.pixels()
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let px = self.pixels();
        write!(f, "{px}x{px}")
    }
}

// ============================================================================
// CanvasSpec
// ============================================================================

/// A validated canvas request: size, border width and ring count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub size: CanvasSize,
    pub border_width: u32,
    pub color_count: usize,
}

impl CanvasSpec {
    /// Validates border width (1-10) and color count (0-20).
    pub fn new(size: CanvasSize, border_width: u32, color_count: usize) -> Result<Self> {
        if !(MIN_BORDER_WIDTH..=MAX_BORDER_WIDTH).contains(&border_width) {
            return Err(IconError::InvalidCanvas(format!(
                "border width {border_width} is outside {MIN_BORDER_WIDTH}-{MAX_BORDER_WIDTH}"
            )));
        }
        if color_count > MAX_COLORS {
            return Err(IconError::InvalidColor(format!(
                "at most {MAX_COLORS} colors are allowed, got {color_count}"
            )));
        }
        Ok(Self {
            size,
            border_width,
            color_count,
        })
    }

    /// Derives the ring layout for this spec.
    pub fn geometry(&self) -> RingGeometry {
        RingGeometry::compute(self.size.pixels(), self.border_width, self.color_count)
    }
}

// ============================================================================
// RingGeometry
// ============================================================================

/// Placement of the inner disk and the concentric rings on the canvas.
///
/// All values are integral pixels. When the requested rings leave less than
/// four pixels for the inner image, the layout falls back to a one pixel
/// margin and `degenerate` is set; rings that no longer fit are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingGeometry {
    pub canvas_size: u32,
    pub border_width: u32,
    pub total_border_width: u32,
    pub margin: u32,
    pub image_size: u32,
    pub image_offset: u32,
    pub degenerate: bool,
}

impl RingGeometry {
    pub fn compute(canvas_size: u32, border_width: u32, color_count: usize) -> Self {
        let total_border_width = border_width.saturating_mul(color_count as u32);
        let margin = i64::from(total_border_width) + 2;
        let image_size = i64::from(canvas_size) - 2 * margin;

        if image_size < MIN_IMAGE_SIZE {
            return Self {
                canvas_size,
                border_width,
                total_border_width,
                margin: 1,
                image_size: canvas_size.saturating_sub(2),
                image_offset: 1,
                degenerate: true,
            };
        }

        Self {
            canvas_size,
            border_width,
            total_border_width,
            margin: margin as u32,
            image_size: image_size as u32,
            image_offset: margin as u32,
            degenerate: false,
        }
    }

    /// The square the inner disk is inscribed in.
    pub fn image_rect(&self) -> RectPx {
        RectPx::square(self.image_offset, self.image_size)
    }

    /// Bounding box of ring `index` (0 is the innermost).
    pub fn ring(&self, index: usize) -> RingBounds {
        let size = i64::from(self.image_size)
            + 2 * (index as i64 + 1) * i64::from(self.border_width);
        let offset = (i64::from(self.canvas_size) - size) / 2;
        RingBounds { size, offset }
    }

    /// True if ring `index` lies entirely within `[0, canvas_size]`.
    pub fn ring_fits(&self, index: usize) -> bool {
        self.ring(index).fits_within(self.canvas_size)
    }
}

/// Diameter and top-left offset of a ring's bounding square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingBounds {
    pub size: i64,
    pub offset: i64,
}

impl RingBounds {
    pub fn fits_within(&self, canvas_size: u32) -> bool {
        self.offset >= 0 && self.offset + self.size <= i64::from(canvas_size)
    }

    pub fn radius(&self) -> f32 {
        self.size as f32 / 2.0
    }
}

// ============================================================================
// CompositedImage
// ============================================================================

/// The finished RGBA icon, handed by value from the composer to export.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositedImage {
    data: RgbaImage,
}

impl CompositedImage {
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    pub fn size(&self) -> u32 {
        self.data.width()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.data
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.data
    }
}
