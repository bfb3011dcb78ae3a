//! Concentric ring layer.

use resvg::tiny_skia::{PathBuilder, Stroke, Transform};

use super::{LayerEffect, RenderContext, solid_paint};
use crate::color::ParsedColor;
use crate::error::Result;

/// Strokes one unfilled circle per color around the inner disk.
///
/// Ring `i` has diameter `image_size + 2 * (i + 1) * border_width` and is
/// stroked centered on its radius. Rings whose bounding square would leave
/// the canvas are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RingLayer {
    /// Innermost ring first.
    pub colors: Vec<ParsedColor>,
}

impl RingLayer {
    pub fn new(colors: Vec<ParsedColor>) -> Self {
        Self { colors }
    }
}

impl LayerEffect for RingLayer {
    fn name(&self) -> &'static str {
        "rings"
    }

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let (cx, cy) = ctx.center();
        let stroke = Stroke {
            width: ctx.geometry.border_width as f32,
            ..Stroke::default()
        };

        for (index, color) in self.colors.iter().enumerate() {
            let bounds = ctx.geometry.ring(index);
            if !bounds.fits_within(ctx.geometry.canvas_size) {
                tracing::debug!(index, size = bounds.size, "ring does not fit; skipped");
                continue;
            }
            let Some(circle) = PathBuilder::from_circle(cx, cy, bounds.radius()) else {
                continue;
            };
            ctx.pixmap.stroke_path(
                &circle,
                &solid_paint(*color),
                &stroke,
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }
}
