//! Output path resolution.
//!
//! Turns a user-supplied (or absent) output path into an absolute path that
//! does not exist yet. Requests that name a directory get a generated
//! `icon_{n}.png`; requests that name an existing file get a numeric suffix.
//!
//! Resolution reads the filesystem once and is not transactional: another
//! process can create the returned path between resolution and the write.
//! Concurrent runs targeting the same directory may therefore collide.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::{env, fs, io};

use path_clean::PathClean;

use crate::error::{IconError, Result};

/// Upper bound on candidate names tried before giving up.
pub const MAX_NAME_ATTEMPTS: u32 = 1000;

const GENERATED_STEM: &str = "icon";
const DEFAULT_EXTENSION: &str = "png";

/// An absolute destination that did not exist when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    /// True when the file name was generated or suffixed by the resolver.
    pub newly_generated: bool,
    /// Non-fatal findings, e.g. the downloads folder being unavailable.
    pub warnings: Vec<String>,
}

/// Whether a request names a directory to generate into or a file to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathIntent {
    Directory,
    File,
}

/// Classifies a cleaned request.
///
/// A request is a directory if it already exists as one, or if it has no
/// extension and either ends with a path separator or is `.`/`..`.
pub fn classify_intent(raw: &str, absolute: &Path) -> PathIntent {
    if absolute.is_dir() {
        return PathIntent::Directory;
    }
    let has_extension = Path::new(raw).extension().is_some();
    let trailing_separator = raw.ends_with('/') || raw.ends_with(MAIN_SEPARATOR);
    let dot_dir = raw == "." || raw == "..";
    if !has_extension && (trailing_separator || dot_dir) {
        PathIntent::Directory
    } else {
        PathIntent::File
    }
}

/// Resolves output paths relative to a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    working_dir: PathBuf,
    downloads_dir: Option<PathBuf>,
}

impl PathResolver {
    /// Uses the process working directory and the platform downloads folder.
    pub fn from_env() -> Result<Self> {
        let working_dir = env::current_dir().map_err(|e| {
            IconError::InvalidPath(format!("cannot read the current directory: {e}"))
        })?;
        Ok(Self::new(working_dir, dirs::download_dir()))
    }

    pub fn new(working_dir: impl Into<PathBuf>, downloads_dir: Option<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            downloads_dir,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Resolves `requested` into a destination that does not exist yet.
    ///
    /// An empty request generates a name in the downloads folder, falling
    /// back to the working directory with a warning.
    pub fn resolve(&self, requested: &str, quiet: bool) -> Result<ResolvedPath> {
        if requested.is_empty() {
            return self.resolve_default(quiet);
        }

        let cleaned = clean_request(requested)?;
        let absolute = self.absolutize(Path::new(cleaned));

        match classify_intent(cleaned, &absolute) {
            PathIntent::Directory => {
                let path = generate_in_dir(&absolute)?;
                Ok(ResolvedPath {
                    path,
                    newly_generated: true,
                    warnings: Vec::new(),
                })
            }
            PathIntent::File if !occupied(&absolute) => Ok(ResolvedPath {
                path: absolute,
                newly_generated: false,
                warnings: Vec::new(),
            }),
            PathIntent::File => {
                let path = suffix_existing(&absolute)?;
                Ok(ResolvedPath {
                    path,
                    newly_generated: true,
                    warnings: Vec::new(),
                })
            }
        }
    }

    fn resolve_default(&self, quiet: bool) -> Result<ResolvedPath> {
        let mut warnings = Vec::new();
        let dir = match self.downloads_dir.as_deref() {
            Some(dir) if dir.is_dir() => dir.to_path_buf(),
            _ => {
                let warning = format!(
                    "downloads folder not found; using current directory {}",
                    self.working_dir.display()
                );
                if !quiet {
                    tracing::warn!("{warning}");
                }
                warnings.push(warning);
                self.working_dir.clone()
            }
        };

        let path = generate_in_dir(&self.absolutize(&dir))?;
        Ok(ResolvedPath {
            path,
            newly_generated: true,
            warnings,
        })
    }

    fn absolutize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.clean()
        } else {
            self.working_dir.join(path).clean()
        }
    }
}

/// Strips whitespace and surrounding quotes, rejecting unusable input.
fn clean_request(requested: &str) -> Result<&str> {
    if requested.contains('\0') {
        return Err(IconError::InvalidPath(
            "output path contains a null byte".into(),
        ));
    }
    let cleaned = requested
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    if cleaned.is_empty() {
        return Err(IconError::InvalidPath(format!(
            "output path {requested:?} is blank"
        )));
    }
    Ok(cleaned)
}

/// True if anything, including a dangling symlink, already sits at `path`.
fn occupied(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}

/// Finds the smallest `n` for which `name(n)` does not exist.
fn first_free(dir: &Path, name: impl Fn(u32) -> String) -> Result<PathBuf> {
    (1..=MAX_NAME_ATTEMPTS)
        .map(|n| dir.join(name(n)))
        .find(|candidate| !occupied(candidate))
        .ok_or_else(|| IconError::CollisionSearchExhausted {
            dir: dir.to_path_buf(),
            attempts: MAX_NAME_ATTEMPTS,
        })
}

fn generate_in_dir(dir: &Path) -> Result<PathBuf> {
    first_free(dir, |n| format!("{GENERATED_STEM}_{n}.{DEFAULT_EXTENSION}"))
}

/// `name.ext` -> first free `name_{n}.ext`; a missing extension becomes `.png`.
fn suffix_existing(path: &Path) -> Result<PathBuf> {
    let dir = path
        .parent()
        .ok_or_else(|| IconError::InvalidPath(format!("{} has no parent", path.display())))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| IconError::InvalidPath(format!("{} has no file name", path.display())))?;
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    first_free(dir, |n| format!("{stem}_{n}.{extension}"))
}
