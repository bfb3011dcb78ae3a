//! Layer infrastructure for circular icon composition.
//!
//! A composition is a fixed stack of layers drawn onto one canvas pixmap:
//! the inner disk (a source image or a solid fill) followed by the
//! concentric rings. Each layer implements [`LayerEffect`] and reads the
//! shared [`RingGeometry`] from the [`RenderContext`].

pub mod disk;
pub mod raster;
pub mod ring;

pub use disk::{DiskFill, DiskLayer};
pub use ring::RingLayer;

use resvg::tiny_skia::{Color, Paint, Pixmap};

use crate::color::ParsedColor;
use crate::error::{IconError, Result};
use crate::icon::{CompositedImage, RingGeometry};

// ============================================================================
// Render Context
// ============================================================================

/// The canvas and layout shared by every layer during one composition.
///
/// Owns the pixmap for the duration of the render; it is released when the
/// context is dropped or consumed by [`finish`](Self::finish).
pub struct RenderContext {
    pub pixmap: Pixmap,
    pub geometry: RingGeometry,
}

impl RenderContext {
    /// Allocates a fully transparent canvas for `geometry`.
    pub fn new(geometry: RingGeometry) -> Result<Self> {
        let size = geometry.canvas_size;
        let pixmap = Pixmap::new(size, size).ok_or_else(|| {
            IconError::InvalidCanvas(format!("cannot allocate a {size}x{size} canvas"))
        })?;
        Ok(Self { pixmap, geometry })
    }

    /// Center of the canvas in pixel space.
    pub fn center(&self) -> (f32, f32) {
        let half = self.geometry.canvas_size as f32 / 2.0;
        (half, half)
    }

    /// Converts the canvas into the straight-alpha output image.
    pub fn finish(self) -> CompositedImage {
        CompositedImage::new(raster::pixmap_to_rgba_image(&self.pixmap))
    }
}

/// An antialiased solid paint.
pub(crate) fn solid_paint(color: ParsedColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(color.red, color.green, color.blue, 255));
    paint.anti_alias = true;
    paint
}

// ============================================================================
// Layer Traits
// ============================================================================

/// A layer that knows how to draw itself onto the render context.
pub trait LayerEffect {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Draws this layer onto `ctx.pixmap`.
    fn transform(&self, ctx: &mut RenderContext) -> Result<()>;
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// The fixed layer stack: disk first, rings on top.
///
/// ```text
/// transparent canvas
///     │
///     ▼
/// ┌─────────┐
/// │  Disk   │ ◄── source image clipped to a circle, or solid fill
/// └────┬────┘
///      ▼
/// ┌─────────┐
/// │  Rings  │ ◄── innermost first, each one border width farther out
/// └─────────┘
/// ```
pub struct LayerPipeline {
    pub disk: DiskLayer,
    pub rings: RingLayer,
}

impl LayerPipeline {
    pub fn new(disk: DiskLayer, rings: RingLayer) -> Self {
        Self { disk, rings }
    }

    /// Renders all layers onto a fresh canvas laid out by `geometry`.
    pub fn render(&self, geometry: RingGeometry) -> Result<CompositedImage> {
        let mut ctx = RenderContext::new(geometry)?;

        let layers: [&dyn LayerEffect; 2] = [&self.disk, &self.rings];
        for layer in layers {
            tracing::trace!(layer = layer.name(), "applying layer");
            layer.transform(&mut ctx)?;
        }

        Ok(ctx.finish())
    }
}
