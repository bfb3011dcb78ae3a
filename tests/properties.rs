//! End-to-end properties of the icon pipeline.

use std::fs;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use circlet_renderer::{
    CanvasSize, CanvasSpec, CircularComposer, DATA_URI_PREFIX, IconError, IconGenerator,
    IconRequest, ImageKind, ParsedColor, PathResolver, ResolvedPath, export, parse_colors,
};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

fn generator(work: &TempDir) -> IconGenerator {
    IconGenerator::new(PathResolver::new(work.path(), None))
}

#[test]
fn bare_invocation_draws_plain_orange_circle() {
    let work = TempDir::new().unwrap();
    let report = generator(&work)
        .generate(&IconRequest::new().with_quiet(true))
        .unwrap();

    let entries: Vec<_> = fs::read_dir(work.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let icon = image::open(report.output.unwrap()).unwrap().to_rgba8();
    assert_eq!(icon.dimensions(), (32, 32));
    for (x, y) in [(0, 0), (31, 0), (0, 31), (31, 31)] {
        assert_eq!(icon.get_pixel(x, y).0, [0, 0, 0, 0]);
    }
    assert_eq!(icon.get_pixel(16, 16).0, [0xee, 0x4e, 0x04, 255]);
    // Nothing is drawn in the two pixel margin.
    assert!((0..32).all(|i| icon.get_pixel(i, 0).0[3] == 0 && icon.get_pixel(0, i).0[3] == 0));
}

#[test]
fn rings_appear_in_order_moving_outward() {
    let colors = parse_colors(&["#ff0000", "#00ff00", "#0000ff"]).unwrap();
    let spec = CanvasSpec::new(CanvasSize::S128, 4, colors.len()).unwrap();
    let icon = CircularComposer::new(spec).compose(None, &colors).unwrap();
    let px = icon.pixels();

    // Collect the distinct opaque colors met walking right from the center.
    let mut seen: Vec<[u8; 3]> = Vec::new();
    for x in 64..128 {
        let p = px.get_pixel(x, 64).0;
        if p[3] == 255 {
            let rgb = [p[0], p[1], p[2]];
            if seen.last() != Some(&rgb) {
                seen.push(rgb);
            }
        }
    }
    assert_eq!(
        seen,
        vec![[0xee, 0x4e, 0x04], [255, 0, 0], [0, 255, 0], [0, 0, 255]]
    );
}

#[test]
fn encoded_output_equals_file_output() {
    let work = TempDir::new().unwrap();
    let colors = vec![ParsedColor::new(10, 20, 30)];
    let spec = CanvasSpec::new(CanvasSize::S24, 2, 1).unwrap();
    let icon = CircularComposer::new(spec).compose(None, &colors).unwrap();

    let target = ResolvedPath {
        path: work.path().join("direct.png"),
        newly_generated: false,
        warnings: Vec::new(),
    };
    export(icon.clone(), Some(&target), false).unwrap();
    let encoded = export(icon, None, true).unwrap().data_uri.unwrap();

    let payload = encoded.strip_prefix(DATA_URI_PREFIX).unwrap();
    assert_eq!(STANDARD.decode(payload).unwrap(), fs::read(&target.path).unwrap());
}

#[test]
fn png_bytes_named_jpg_are_rejected() {
    let work = TempDir::new().unwrap();
    let path = work.path().join("photo.jpg");
    RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();

    let err = generator(&work)
        .generate(&IconRequest::new().with_input(&path).with_quiet(true))
        .unwrap_err();
    assert!(matches!(
        err,
        IconError::ExtensionMismatch {
            kind: ImageKind::Png,
            ..
        }
    ));
}

#[test]
fn repeated_runs_never_overwrite() {
    let work = TempDir::new().unwrap();
    let generator = generator(&work);
    let request = IconRequest::new().with_output("out/").with_quiet(true);

    let mut outputs = Vec::new();
    for _ in 0..5 {
        let output = generator.generate(&request).unwrap().output.unwrap();
        assert!(!outputs.contains(&output));
        outputs.push(output);
    }
    assert_eq!(outputs[4], work.path().join("out").join("icon_5.png"));
}

#[test]
fn existing_named_output_gets_suffix() {
    let work = TempDir::new().unwrap();
    let generator = generator(&work);
    let request = IconRequest::new().with_output("logo.png").with_quiet(true);

    let first = generator.generate(&request).unwrap().output.unwrap();
    let second = generator.generate(&request).unwrap().output.unwrap();
    assert_eq!(first, work.path().join("logo.png"));
    assert_eq!(second, work.path().join("logo_1.png"));
}

#[test]
fn jpeg_source_with_rings_and_base64() {
    let work = TempDir::new().unwrap();
    let path = work.path().join("wide.jpeg");
    RgbImage::from_pixel(90, 30, Rgb([20, 120, 220]))
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();

    let request = IconRequest::new()
        .with_input(&path)
        .with_colors(["#FFFFFF", "#000000"])
        .with_border_width(2)
        .with_size(64)
        .with_base64(true)
        .with_quiet(true);
    let report = generator(&work).generate(&request).unwrap();

    assert!(report.warnings.is_empty());
    assert_eq!(report.colors.len(), 2);
    let payload = report.data_uri.unwrap();
    let png = STANDARD
        .decode(payload.strip_prefix(DATA_URI_PREFIX).unwrap())
        .unwrap();
    let icon = image::load_from_memory_with_format(&png, ImageFormat::Png)
        .unwrap()
        .to_rgba8();
    assert_eq!(icon.dimensions(), (64, 64));
    assert_eq!(icon.get_pixel(0, 0).0[3], 0);
    let center = icon.get_pixel(32, 32).0;
    assert_eq!(center[3], 255);
    assert!(center[2] > center[0], "center should carry the source's blue");
}
