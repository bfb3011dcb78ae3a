//! Input image validation.
//!
//! Checks run cheapest first: existence and size gates, magic bytes and
//! extension, a header-only dimension read, then the full decode. Any failure
//! aborts with an [`IconError`]; CMYK input and animated GIFs only produce
//! warnings.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{
    AnimationDecoder, DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, ImageReader,
};

use crate::error::{IconError, Result};
use crate::sniff::{self, HEADER_LEN, ImageKind};

/// Largest accepted input file (50 MiB).
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Largest accepted pixel count (width x height).
pub const MAX_PIXELS: u64 = 100_000_000;

/// Fewest header bytes that can identify any supported format.
const MIN_HEADER_LEN: usize = 2;

pub const CMYK_WARNING: &str = "image uses a CMYK color space; colors may not convert accurately";
pub const ANIMATED_GIF_WARNING: &str = "animated GIF detected; only first frame will be used";

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub path: PathBuf,
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
    /// Non-fatal findings, in the order they were detected.
    pub warnings: Vec<String>,
}

/// A validated input together with its decoded pixels.
#[derive(Debug)]
pub struct ValidatedImage {
    pub result: ValidationResult,
    pub image: DynamicImage,
}

/// Validates candidate input images against size and format limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageValidator {
    pub max_file_size: u64,
    pub max_pixels: u64,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_pixels: MAX_PIXELS,
        }
    }
}

impl ImageValidator {
    /// Validates the file at `path`, discarding the decoded pixels.
    pub fn validate(&self, path: &Path, quiet: bool) -> Result<ValidationResult> {
        self.load(path, quiet).map(|validated| validated.result)
    }

    /// Validates the file at `path` and returns its decoded pixels.
    ///
    /// `quiet` only silences the warning log lines; warnings are still
    /// collected in the result.
    pub fn load(&self, path: &Path, quiet: bool) -> Result<ValidatedImage> {
        check_path_text(path)?;

        let meta = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IconError::FileNotFound(path.to_path_buf()),
            _ => IconError::io(path, e),
        })?;
        if !meta.is_file() {
            return Err(IconError::InvalidPath(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        if meta.len() > self.max_file_size {
            return Err(IconError::FileTooLarge {
                path: path.to_path_buf(),
                size: meta.len(),
                limit: self.max_file_size,
            });
        }
        if meta.len() == 0 {
            return Err(IconError::EmptyFile(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|e| IconError::io(path, e))?;
        let header = &bytes[..bytes.len().min(HEADER_LEN)];
        if header.len() < MIN_HEADER_LEN {
            return Err(IconError::UnrecognizedFormat(path.to_path_buf()));
        }
        let kind =
            sniff::classify(header).ok_or_else(|| IconError::UnrecognizedFormat(path.to_path_buf()))?;

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !kind.accepts_extension(&extension) {
            return Err(IconError::ExtensionMismatch { kind, extension });
        }

        let decode_failure = |source| IconError::DecodeFailure {
            path: path.to_path_buf(),
            source,
        };

        // Header-only read so oversized images fail before allocating pixels.
        let ((width, height), original) = reader_for(&bytes, kind)
            .into_decoder()
            .map(|decoder| (decoder.dimensions(), decoder.original_color_type()))
            .map_err(decode_failure)?;
        let cmyk = is_cmyk(&bytes, kind, original);
        self.check_dimensions(width, height)?;

        let image = reader_for(&bytes, kind).decode().map_err(decode_failure)?;
        self.check_dimensions(image.width(), image.height())?;

        let mut warnings = Vec::new();
        if cmyk {
            warnings.push(CMYK_WARNING.to_string());
        }
        if kind.is_gif() && gif_is_animated(&bytes) {
            warnings.push(ANIMATED_GIF_WARNING.to_string());
        }
        if !quiet {
            for warning in &warnings {
                tracing::warn!(path = %path.display(), "{warning}");
            }
        }

        tracing::debug!(path = %path.display(), %kind, width, height, "validated input image");

        Ok(ValidatedImage {
            result: ValidationResult {
                path: path.to_path_buf(),
                kind,
                width,
                height,
                warnings,
            },
            image,
        })
    }

    /// Rejects zero-sized images and images above the pixel limit.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(IconError::DimensionError {
                width,
                height,
                reason: "width and height must be non-zero",
            });
        }
        if u64::from(width) * u64::from(height) > self.max_pixels {
            return Err(IconError::DimensionError {
                width,
                height,
                reason: "pixel count exceeds the 100,000,000 limit",
            });
        }
        Ok(())
    }
}

/// Validates `path` with the default limits.
pub fn validate(path: &Path, quiet: bool) -> Result<ValidationResult> {
    ImageValidator::default().validate(path, quiet)
}

fn check_path_text(path: &Path) -> Result<()> {
    let raw = path.as_os_str();
    if raw.to_string_lossy().trim().is_empty() {
        return Err(IconError::InvalidPath("input path is empty".into()));
    }
    if raw.as_encoded_bytes().contains(&0) {
        return Err(IconError::InvalidPath(
            "input path contains a null byte".into(),
        ));
    }
    Ok(())
}

fn reader_for(bytes: &[u8], kind: ImageKind) -> ImageReader<Cursor<&[u8]>> {
    let mut reader = ImageReader::new(Cursor::new(bytes));
    reader.set_format(image_format(kind));
    reader
}

fn image_format(kind: ImageKind) -> ImageFormat {
    match kind {
        ImageKind::Jpeg => ImageFormat::Jpeg,
        ImageKind::Png => ImageFormat::Png,
        ImageKind::Gif87 | ImageKind::Gif89 => ImageFormat::Gif,
        ImageKind::Bmp => ImageFormat::Bmp,
        ImageKind::TiffLe | ImageKind::TiffBe => ImageFormat::Tiff,
        ImageKind::Ico => ImageFormat::Ico,
    }
}

/// True if the source stores CMYK samples.
///
/// The JPEG codec reports CMYK frames as RGB, so JPEGs are judged by the
/// component count of their frame header instead.
fn is_cmyk(bytes: &[u8], kind: ImageKind, original: ExtendedColorType) -> bool {
    match original {
        ExtendedColorType::Cmyk8 | ExtendedColorType::Cmyk16 => true,
        _ => kind == ImageKind::Jpeg && jpeg_component_count(bytes) == Some(4),
    }
}

/// Returns true if the GIF has more than one frame.
///
/// Stops decoding after the second frame.
fn gif_is_animated(bytes: &[u8]) -> bool {
    GifDecoder::new(Cursor::new(bytes))
        .map(|decoder| decoder.into_frames().take(2).count() > 1)
        .unwrap_or(false)
}

/// Reads the component count from the first JPEG frame header.
///
/// Walks the marker segments up to the first SOFn marker. Returns `None` if
/// the stream ends, scan data starts, or a segment is truncated first.
pub(crate) fn jpeg_component_count(bytes: &[u8]) -> Option<u8> {
    let mut pos = 2;
    loop {
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        // Markers may be preceded by any number of fill bytes.
        while *bytes.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *bytes.get(pos)?;
        pos += 1;

        match marker {
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => continue,
            // Start of scan or end of image: no frame header seen.
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let len = u16::from_be_bytes([*bytes.get(pos)?, *bytes.get(pos + 1)?]) as usize;
        if len < 2 {
            return None;
        }

        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 7).copied();
        }
        pos += len;
    }
}
