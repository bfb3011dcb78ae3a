//! PNG export to a file or a `data:` URI.

use std::fs::{self, OpenOptions};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

use crate::error::{IconError, Result};
use crate::icon::CompositedImage;
use crate::path::ResolvedPath;

/// Prefix of every encoded result.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

const TEMP_PREFIX: &str = "circlet-";

/// Where the exported icon ended up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exported {
    /// Written PNG file, if a destination was given.
    pub path: Option<PathBuf>,
    /// `data:image/png;base64,...`, if requested.
    pub data_uri: Option<String>,
}

/// Encodes the icon as PNG bytes.
pub fn encode_png(image: &CompositedImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .pixels()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(IconError::Encode)?;
    Ok(bytes)
}

/// Wraps PNG bytes in a `data:` URI.
pub fn to_data_uri(png: &[u8]) -> String {
    format!("{DATA_URI_PREFIX}{}", STANDARD.encode(png))
}

/// Persists or encodes a composited icon, consuming it.
///
/// - With a destination, missing parent directories are created and the PNG
///   is written there. If `want_encoded` is also set, the data URI is built
///   from the same bytes.
/// - Without a destination, `want_encoded` must be set: the PNG is written to
///   a temporary file, read back and encoded. The temporary file is removed
///   on every exit path.
pub fn export(
    image: CompositedImage,
    destination: Option<&ResolvedPath>,
    want_encoded: bool,
) -> Result<Exported> {
    let png = encode_png(&image)?;
    drop(image);

    match destination {
        Some(dest) => {
            write_file(&dest.path, &png)?;
            tracing::debug!(path = %dest.path.display(), bytes = png.len(), "wrote icon");
            Ok(Exported {
                path: Some(dest.path.clone()),
                data_uri: want_encoded.then(|| to_data_uri(&png)),
            })
        }
        None if want_encoded => Ok(Exported {
            path: None,
            data_uri: Some(encode_via_temp(&std::env::temp_dir(), &png)?),
        }),
        None => Err(IconError::InvalidPath(
            "no output destination and no encoded output requested".into(),
        )),
    }
}

fn write_file(path: &Path, png: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IconError::io(parent, e))?;
    }
    // Never replace a file that appeared after the path was resolved.
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| IconError::io(path, e))?;
    file.write_all(png).and_then(|()| file.sync_all()).map_err(|e| {
        drop(file);
        // Best effort: do not leave a truncated file behind.
        let _ = fs::remove_file(path);
        IconError::io(path, e)
    })
}

/// Round-trips the PNG through a temporary file in `dir` and returns the
/// data URI.
fn encode_via_temp(dir: &Path, png: &[u8]) -> Result<String> {
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(|e| IconError::io(dir, e))?;

    temp.write_all(png)
        .and_then(|()| temp.flush())
        .map_err(|e| IconError::io(temp.path(), e))?;
    let bytes = fs::read(temp.path()).map_err(|e| IconError::io(temp.path(), e))?;

    // Dropping `temp` on the error paths above removes the file as well.
    if let Err(e) = temp.close() {
        tracing::debug!(error = %e, "failed to remove temporary icon file");
    }
    Ok(to_data_uri(&bytes))
}
