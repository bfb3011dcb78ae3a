//! Inner disk layer: a source image clipped to a circle, or a solid fill.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba32FImage, RgbaImage};
use resvg::tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pattern, SpreadMode, Transform,
};

use super::{LayerEffect, RenderContext, raster, solid_paint};
use crate::color::ParsedColor;
use crate::error::{IconError, Result};

/// What fills the inner disk.
#[derive(Debug, Clone, PartialEq)]
pub enum DiskFill {
    Solid(ParsedColor),
    /// Pixels already cropped and scaled to the disk's bounding square.
    Image(RgbaImage),
}

/// Draws the inner disk inscribed in the geometry's image square.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskLayer {
    pub fill: DiskFill,
}

impl DiskLayer {
    pub fn new(fill: DiskFill) -> Self {
        Self { fill }
    }

    /// Builds an image-filled disk from a decoded source.
    ///
    /// Takes the largest centered square of `source` and resamples it with a
    /// bicubic filter to `size` x `size`. Only the first frame of animated
    /// inputs ever reaches this point.
    pub fn from_source(source: &DynamicImage, size: u32) -> Self {
        Self::new(DiskFill::Image(square_crop_scaled(source, size)))
    }
}

/// Largest centered square crop of `source`, resampled to `size`.
///
/// Resampling runs on premultiplied floating point pixels so the color of
/// fully transparent source pixels never reaches visible output pixels.
pub fn square_crop_scaled(source: &DynamicImage, size: u32) -> RgbaImage {
    let side = source.width().min(source.height());
    let x = (source.width() - side) / 2;
    let y = (source.height() - side) / 2;

    let mut square = source.crop_imm(x, y, side, side).into_rgba32f();
    premultiply(&mut square);
    let mut scaled = imageops::resize(&square, size, size, FilterType::CatmullRom);
    demultiply(&mut scaled);
    DynamicImage::ImageRgba32F(scaled).to_rgba8()
}

fn premultiply(img: &mut Rgba32FImage) {
    for px in img.pixels_mut() {
        let a = px[3];
        for channel in &mut px.0[..3] {
            *channel *= a;
        }
    }
}

fn demultiply(img: &mut Rgba32FImage) {
    for px in img.pixels_mut() {
        let a = px[3].clamp(0.0, 1.0);
        for channel in &mut px.0[..3] {
            *channel = if a > 0.0 {
                (*channel / a).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
        px[3] = a;
    }
}

impl LayerEffect for DiskLayer {
    fn name(&self) -> &'static str {
        "disk"
    }

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let rect = ctx.geometry.image_rect();
        let (cx, cy) = rect.center();
        let radius = rect.width as f32 / 2.0;
        let Some(circle) = PathBuilder::from_circle(cx, cy, radius) else {
            return Ok(());
        };

        match &self.fill {
            DiskFill::Solid(color) => {
                ctx.pixmap.fill_path(
                    &circle,
                    &solid_paint(*color),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
            DiskFill::Image(pixels) => {
                let source = raster::rgba_image_to_pixmap(pixels).ok_or_else(|| {
                    IconError::InvalidCanvas("source image scaled to zero size".into())
                })?;
                // The source is already at output resolution; place it on the
                // image square and let the circle path do the clipping.
                let mut paint = Paint::default();
                paint.anti_alias = true;
                paint.shader = Pattern::new(
                    source.as_ref(),
                    SpreadMode::Pad,
                    FilterQuality::Nearest,
                    1.0,
                    Transform::from_translate(rect.x as f32, rect.y as f32),
                );
                ctx.pixmap.fill_path(
                    &circle,
                    &paint,
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }

        tracing::debug!(
            offset = rect.x,
            size = rect.width,
            solid = matches!(self.fill, DiskFill::Solid(_)),
            "drew inner disk"
        );
        Ok(())
    }
}
