//! circlet-renderer: circular icon generation with concentric rings
//!
//! This crate turns a raster image (or nothing at all) into a small square
//! PNG icon: the image is center-cropped into a circle, optionally wrapped in
//! colored rings, and written to disk or returned as a `data:` URI.
//!
//! # Example
//!
//! ```
//! use circlet_renderer::{CanvasSize, CanvasSpec, CircularComposer, export, parse_colors};
//!
//! let colors = parse_colors(&["#1e90ff", "#ffffff"]).unwrap();
//! let spec = CanvasSpec::new(CanvasSize::S32, 3, colors.len()).unwrap();
//!
//! // No source image: a solid #ee4e04 circle inside the rings.
//! let icon = CircularComposer::new(spec).compose(None, &colors).unwrap();
//! let out = export(icon, None, true).unwrap();
//! assert!(out.data_uri.unwrap().starts_with("data:image/png;base64,"));
//! ```
//!
//! # Full Pipeline
//!
//! [`IconGenerator`] runs validation, color parsing, path resolution,
//! composition and export from a single [`IconRequest`]:
//!
//! ```no_run
//! use circlet_renderer::{IconGenerator, IconRequest};
//!
//! let report = IconGenerator::from_env()?
//!     .generate(&IconRequest::new().with_input("logo.jpg").with_size(64))?;
//! # Ok::<(), circlet_renderer::IconError>(())
//! ```
//!
//! Output paths are checked for collisions when they are resolved, not when
//! they are written; concurrent runs targeting the same directory can race.

mod color;
mod composer;
mod error;
mod export;
mod generator;
mod icon;
mod layer;
mod path;
mod request;
mod sniff;
#[cfg(test)]
mod testing;
mod validate;

pub use color::{FALLBACK_FILL, MAX_COLORS, ParsedColor, parse_colors};
pub use composer::{CircularComposer, compose};
pub use error::{IconError, Result};
pub use export::{DATA_URI_PREFIX, Exported, encode_png, export, to_data_uri};
pub use generator::{IconGenerator, IconReport};
pub use icon::{
    CanvasSize, CanvasSpec, CompositedImage, DEFAULT_BORDER_WIDTH, MAX_BORDER_WIDTH,
    MIN_BORDER_WIDTH, RectPx, RingBounds, RingGeometry,
};
pub use layer::{DiskFill, DiskLayer, LayerEffect, LayerPipeline, RenderContext, RingLayer};
pub use path::{MAX_NAME_ATTEMPTS, PathIntent, PathResolver, ResolvedPath, classify_intent};
pub use request::IconRequest;
pub use sniff::{ImageKind, ImageSignature, SIGNATURES, classify};
pub use validate::{
    ANIMATED_GIF_WARNING, CMYK_WARNING, ImageValidator, MAX_FILE_SIZE, MAX_PIXELS,
    ValidatedImage, ValidationResult, validate,
};
