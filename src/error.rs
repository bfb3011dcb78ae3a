//! Error taxonomy for validation, composition and export.

use std::path::PathBuf;

use thiserror::Error;

use crate::sniff::ImageKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IconError>;

/// Every failure the generator can raise.
///
/// Validation failures abort the whole operation; there is no degraded mode.
/// Non-fatal conditions (CMYK input, animated GIFs, missing downloads folder)
/// are reported as warnings instead.
#[derive(Debug, Error)]
pub enum IconError {
    /// Empty or whitespace path, embedded NUL byte, or an unresolvable path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("file too large: {} is {size} bytes (limit {limit} bytes)", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("unrecognized image format: {}", .0.display())]
    UnrecognizedFormat(PathBuf),

    #[error("extension mismatch: file contains {kind} data but has extension '{extension}'")]
    ExtensionMismatch { kind: ImageKind, extension: String },

    #[error("failed to decode {}: {source}", .path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid image dimensions {width}x{height}: {reason}")]
    DimensionError {
        width: u32,
        height: u32,
        reason: &'static str,
    },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Canvas size outside the supported set, or border width outside 1-10.
    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("no free file name found in {} after {attempts} attempts", .dir.display())]
    CollisionSearchExhausted { dir: PathBuf, attempts: u32 },

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IconError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures raised by the downstream codec or filesystem write.
    pub fn is_encode_or_write_failure(&self) -> bool {
        matches!(self, Self::Encode(_) | Self::Io { .. })
    }
}
