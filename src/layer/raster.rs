//! Conversion between `image` buffers and tiny-skia pixmaps.
//!
//! tiny-skia stores premultiplied RGBA; `image` buffers are straight alpha.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, IntSize, Pixmap};

/// Converts a straight-alpha RGBA image into a premultiplied pixmap.
///
/// Returns `None` for zero-sized images.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let data = img
        .pixels()
        .flat_map(|px| {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Converts a premultiplied pixmap back into a straight-alpha RGBA image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();

    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_pixels_survive_both_directions() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([238, 78, 4, 255]));
        img.put_pixel(2, 1, Rgba([1, 2, 3, 255]));

        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        assert_eq!(pixmap.width(), 3);
        assert_eq!(pixmap.height(), 2);
        assert_eq!(pixmap_to_rgba_image(&pixmap), img);
    }

    #[test]
    fn transparent_pixels_are_cleared() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 10, 10, 0]));
        let back = pixmap_to_rgba_image(&rgba_image_to_pixmap(&img).unwrap());
        assert_eq!(back.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn partial_alpha_survives_within_rounding() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([64, 0, 255, 120]));
        let back = pixmap_to_rgba_image(&rgba_image_to_pixmap(&img).unwrap());
        let [r, g, b, a] = back.get_pixel(0, 0).0;
        assert!(r.abs_diff(64) <= 2, "red {r}");
        assert_eq!((g, b, a), (0, 255, 120));
    }

    #[test]
    fn zero_sized_image_has_no_pixmap() {
        assert!(rgba_image_to_pixmap(&RgbaImage::new(0, 4)).is_none());
    }
}
