//! Magic-byte format detection.
//!
//! Classification is a pure prefix compare against a fixed signature table;
//! no codec is involved and the cost does not depend on file size.

use std::fmt;

/// Number of header bytes the validator reads before classifying.
pub const HEADER_LEN: usize = 16;

/// An image container recognised by its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif87,
    Gif89,
    Bmp,
    TiffLe,
    TiffBe,
    Ico,
}

impl ImageKind {
    /// Short lowercase name, as used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif87 => "gif87",
            Self::Gif89 => "gif89",
            Self::Bmp => "bmp",
            Self::TiffLe => "tiff-le",
            Self::TiffBe => "tiff-be",
            Self::Ico => "ico",
        }
    }

    /// Returns the signature record for this kind.
    pub fn signature(self) -> &'static ImageSignature {
        // Table rows are declared in variant order.
        &SIGNATURES[self as usize]
    }

    /// Returns true if `extension` (with or without the leading dot) is valid
    /// for this kind. The compare is case-insensitive.
    pub fn accepts_extension(self, extension: &str) -> bool {
        let ext = extension.trim_start_matches('.');
        self.signature()
            .extensions
            .iter()
            .any(|valid| valid.eq_ignore_ascii_case(ext))
    }

    pub fn is_gif(self) -> bool {
        matches!(self, Self::Gif87 | Self::Gif89)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A static signature record: kind, leading bytes, accepted extensions.
#[derive(Debug)]
pub struct ImageSignature {
    pub kind: ImageKind,
    pub magic: &'static [u8],
    /// Lowercase, without the leading dot.
    pub extensions: &'static [&'static str],
}

/// The fixed signature table. Ties resolve in declaration order.
pub static SIGNATURES: [ImageSignature; 8] = [
    ImageSignature {
        kind: ImageKind::Jpeg,
        magic: &[0xFF, 0xD8, 0xFF],
        extensions: &["jpg", "jpeg"],
    },
    ImageSignature {
        kind: ImageKind::Png,
        magic: &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        extensions: &["png"],
    },
    ImageSignature {
        kind: ImageKind::Gif87,
        magic: b"GIF87a",
        extensions: &["gif"],
    },
    ImageSignature {
        kind: ImageKind::Gif89,
        magic: b"GIF89a",
        extensions: &["gif"],
    },
    ImageSignature {
        kind: ImageKind::Bmp,
        magic: b"BM",
        extensions: &["bmp"],
    },
    ImageSignature {
        kind: ImageKind::TiffLe,
        magic: &[0x49, 0x49, 0x2A, 0x00],
        extensions: &["tiff", "tif"],
    },
    ImageSignature {
        kind: ImageKind::TiffBe,
        magic: &[0x4D, 0x4D, 0x00, 0x2A],
        extensions: &["tiff", "tif"],
    },
    ImageSignature {
        kind: ImageKind::Ico,
        magic: &[0x00, 0x00, 0x01, 0x00],
        extensions: &["ico"],
    },
];

/// Classifies a header prefix against the signature table.
///
/// Returns `None` when no signature matches in full, including when the
/// prefix is shorter than every signature that could match.
pub fn classify(prefix: &[u8]) -> Option<ImageKind> {
    SIGNATURES
        .iter()
        .find(|sig| prefix.starts_with(sig.magic))
        .map(|sig| sig.kind)
}
