//! Circular icon composition.

use image::DynamicImage;

use crate::color::{FALLBACK_FILL, MAX_COLORS, ParsedColor};
use crate::error::Result;
use crate::icon::{CanvasSpec, CompositedImage, RingGeometry};
use crate::layer::{DiskFill, DiskLayer, LayerPipeline, RingLayer};

/// Composes a circular icon with optional concentric rings.
///
/// The composer has no I/O. It lays out the canvas from a [`CanvasSpec`],
/// builds the layer stack and renders it:
///
/// 1. **Disk** - the source image, center-cropped to a square, resampled and
///    clipped to a circle; or a solid `#ee4e04` circle when there is no source
/// 2. **Rings** - one antialiased stroke per color, innermost first
///
/// # Example
///
/// ```
/// use circlet_renderer::{CanvasSize, CanvasSpec, CircularComposer, ParsedColor};
///
/// let colors = vec![ParsedColor::new(0, 0, 0), ParsedColor::new(255, 255, 255)];
/// let spec = CanvasSpec::new(CanvasSize::S64, 3, colors.len()).unwrap();
///
/// let icon = CircularComposer::new(spec).compose(None, &colors).unwrap();
/// assert_eq!(icon.size(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircularComposer {
    spec: CanvasSpec,
}

impl CircularComposer {
    pub fn new(spec: CanvasSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &CanvasSpec {
        &self.spec
    }

    /// Layout for `color_count` rings on this composer's canvas.
    pub fn geometry(&self, color_count: usize) -> RingGeometry {
        RingGeometry::compute(self.spec.size.pixels(), self.spec.border_width, color_count)
    }

    /// Renders the icon.
    ///
    /// The ring layout follows `colors.len()`, which may not exceed
    /// [`MAX_COLORS`].
    #[tracing::instrument(level = "debug", skip_all, fields(size = %self.spec.size))]
    pub fn compose(
        &self,
        source: Option<&DynamicImage>,
        colors: &[ParsedColor],
    ) -> Result<CompositedImage> {
        let spec = CanvasSpec::new(self.spec.size, self.spec.border_width, colors.len())?;
        debug_assert!(spec.color_count <= MAX_COLORS);
        let geometry = spec.geometry();

        tracing::debug!(
            size = geometry.canvas_size,
            margin = geometry.margin,
            image_size = geometry.image_size,
            image_offset = geometry.image_offset,
            degenerate = geometry.degenerate,
            rings = colors.len(),
            "computed ring geometry"
        );

        let disk = match source {
            Some(image) => DiskLayer::from_source(image, geometry.image_size),
            None => DiskLayer::new(DiskFill::Solid(FALLBACK_FILL)),
        };
        let pipeline = LayerPipeline::new(disk, RingLayer::new(colors.to_vec()));
        pipeline.render(geometry)
    }
}

/// Composes an icon in one call.
pub fn compose(
    spec: CanvasSpec,
    source: Option<&DynamicImage>,
    colors: &[ParsedColor],
) -> Result<CompositedImage> {
    CircularComposer::new(spec).compose(source, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IconError;
    use crate::icon::CanvasSize;
    use image::{Rgba, RgbaImage};

    fn spec(size: CanvasSize, border: u32) -> CanvasSpec {
        CanvasSpec::new(size, border, 0).unwrap()
    }

    #[test]
    fn plain_fallback_circle() {
        let icon = compose(spec(CanvasSize::S32, 3), None, &[]).unwrap();
        let px = icon.pixels();
        assert_eq!(px.dimensions(), (32, 32));
        assert_eq!(px.get_pixel(16, 16).0, [0xee, 0x4e, 0x04, 255]);
        for (x, y) in [(0, 0), (31, 0), (0, 31), (31, 31)] {
            assert_eq!(px.get_pixel(x, y).0, [0, 0, 0, 0]);
        }
        // No border: every mostly-opaque pixel is the fallback color.
        assert!(
            px.pixels()
                .filter(|p| p.0[3] >= 128)
                .all(|p| p.0[..3]
                    .iter()
                    .zip([0xee, 0x4e, 0x04])
                    .all(|(c, want)| c.abs_diff(want) <= 2))
        );
    }

    #[test]
    fn every_size_has_matching_dimensions() {
        for size in CanvasSize::ALL {
            let icon = compose(spec(size, 2), None, &[ParsedColor::new(0, 0, 0)]).unwrap();
            assert_eq!(icon.size(), size.pixels());
            assert_eq!(icon.pixels().height(), size.pixels());
        }
    }

    #[test]
    fn source_image_fills_the_disk() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(80, 40, Rgba([0, 128, 255, 255])));
        let icon = compose(spec(CanvasSize::S48, 3), Some(&src), &[]).unwrap();
        let center = icon.pixels().get_pixel(24, 24).0;
        assert!(center[0] <= 1 && center[1].abs_diff(128) <= 1 && center[2] >= 254);
        assert_eq!(icon.pixels().get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn ring_count_follows_colors() {
        let composer = CircularComposer::new(spec(CanvasSize::S64, 3));
        let colors = [ParsedColor::new(255, 0, 0), ParsedColor::new(0, 255, 0)];
        let icon = composer.compose(None, &colors).unwrap();

        let geometry = composer.geometry(colors.len());
        assert_eq!(geometry.image_size, 64 - 2 * (6 + 2));
        // Ring 1 (green) sits at radius image/2 + 2 * border.
        let r = geometry.ring(1).radius() as u32;
        assert_eq!(icon.pixels().get_pixel(32 + r, 32).0, [0, 255, 0, 255]);
        let r = geometry.ring(0).radius() as u32;
        assert_eq!(icon.pixels().get_pixel(32 + r, 32).0, [255, 0, 0, 255]);
    }

    #[test]
    fn degenerate_layout_still_draws_disk() {
        let composer = CircularComposer::new(spec(CanvasSize::S16, 10));
        let colors = vec![ParsedColor::new(0, 0, 255); 20];
        let icon = composer.compose(None, &colors).unwrap();
        assert!(composer.geometry(20).degenerate);
        assert_eq!(icon.pixels().get_pixel(8, 8).0, [0xee, 0x4e, 0x04, 255]);
        assert!(icon.pixels().pixels().all(|p| p.0[2] != 255 || p.0[3] == 0));
    }

    #[test]
    fn too_many_colors_are_rejected() {
        let colors = vec![ParsedColor::new(0, 0, 0); 21];
        assert!(matches!(
            compose(spec(CanvasSize::S32, 1), None, &colors),
            Err(IconError::InvalidColor(_))
        ));
    }
}
