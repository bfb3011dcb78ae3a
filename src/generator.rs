//! End-to-end icon generation.

use std::path::PathBuf;

use crate::color::{ParsedColor, parse_colors};
use crate::composer::CircularComposer;
use crate::error::Result;
use crate::export::export;
use crate::icon::CanvasSize;
use crate::path::PathResolver;
use crate::request::IconRequest;
use crate::validate::ImageValidator;

/// What a generator run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconReport {
    /// Absolute path of the validated source image, if any.
    pub input: Option<PathBuf>,
    /// Written PNG file, if any.
    pub output: Option<PathBuf>,
    /// `data:image/png;base64,...`, if requested.
    pub data_uri: Option<String>,
    pub size: CanvasSize,
    /// Ring colors used, innermost first.
    pub colors: Vec<ParsedColor>,
    /// All non-fatal warnings from validation and path resolution.
    pub warnings: Vec<String>,
}

/// Runs the full pipeline for an [`IconRequest`].
///
/// # Pipeline
///
/// 1. **Validate** the source image (magic bytes, extension, size limits)
/// 2. **Parse** the ring colors and canvas settings
/// 3. **Resolve** a collision-free destination
/// 4. **Compose** the circle and rings
/// 5. **Export** to the destination and/or a data URI
///
/// Any failure aborts the run; nothing is written before step 5.
///
/// # Example
///
/// ```no_run
/// use circlet_renderer::{IconGenerator, IconRequest};
///
/// let generator = IconGenerator::from_env()?;
/// let report = generator.generate(
///     &IconRequest::new()
///         .with_input("logo.png")
///         .with_colors(["#ffffff", "#000000"])
///         .with_output("favicons/"),
/// )?;
/// println!("wrote {:?}", report.output);
/// # Ok::<(), circlet_renderer::IconError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IconGenerator {
    resolver: PathResolver,
    validator: ImageValidator,
}

impl IconGenerator {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            validator: ImageValidator::default(),
        }
    }

    /// A generator rooted at the process working directory that writes
    /// unnamed icons to the platform downloads folder.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(PathResolver::from_env()?))
    }

    pub fn with_validator(mut self, validator: ImageValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn generate(&self, request: &IconRequest) -> Result<IconReport> {
        let quiet = request.quiet;
        let mut warnings = Vec::new();

        let source = match &request.input {
            Some(input) => {
                let path = self.resolver.working_dir().join(input);
                let validated = self.validator.load(&path, quiet)?;
                warnings.extend(validated.result.warnings.iter().cloned());
                Some((path, validated.image))
            }
            None => None,
        };

        let colors = parse_colors(&request.colors)?;
        let spec = request.canvas_spec()?;

        // An encoded result without an explicit output never touches the
        // downloads folder.
        let destination = match (&request.output, request.base64) {
            (None, true) => None,
            (output, _) => {
                let resolved = self
                    .resolver
                    .resolve(output.as_deref().unwrap_or(""), quiet)?;
                warnings.extend(resolved.warnings.iter().cloned());
                Some(resolved)
            }
        };

        let image = CircularComposer::new(spec)
            .compose(source.as_ref().map(|(_, image)| image), &colors)?;
        let exported = export(image, destination.as_ref(), request.base64)?;

        let report = IconReport {
            input: source.map(|(path, _)| path),
            output: exported.path,
            data_uri: exported.data_uri,
            size: spec.size,
            colors,
            warnings,
        };
        if !quiet {
            log_report(&report);
        }
        Ok(report)
    }
}

fn log_report(report: &IconReport) {
    let input = match &report.input {
        Some(path) => path.display().to_string(),
        None => "none (fallback circle)".to_string(),
    };
    let colors = if report.colors.is_empty() {
        "none".to_string()
    } else {
        let hex: Vec<String> = report.colors.iter().map(|c| c.to_hex()).collect();
        hex.join(", ")
    };
    tracing::info!(%input, size = %report.size, %colors, "generated icon");

    if let Some(output) = &report.output {
        tracing::info!(output = %output.display(), "saved icon");
    }
    if report.data_uri.is_some() {
        tracing::info!("encoded icon as base64 data URI");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IconError;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::fs;
    use tempfile::TempDir;

    fn generator(work: &TempDir) -> IconGenerator {
        IconGenerator::new(PathResolver::new(work.path(), None))
    }

    #[test]
    fn default_request_writes_fallback_icon() {
        let work = TempDir::new().unwrap();
        let report = generator(&work)
            .generate(&IconRequest::new().with_quiet(true))
            .unwrap();

        let output = report.output.unwrap();
        assert_eq!(output, work.path().join("icon_1.png"));
        assert_eq!(report.warnings.len(), 1, "downloads fallback warning");
        assert!(report.input.is_none());
        assert!(report.data_uri.is_none());

        let icon = image::open(&output).unwrap().to_rgba8();
        assert_eq!(icon.dimensions(), (32, 32));
        assert_eq!(icon.get_pixel(16, 16).0, [0xee, 0x4e, 0x04, 255]);
    }

    #[test]
    fn relative_input_and_output() {
        let work = TempDir::new().unwrap();
        RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]))
            .save_with_format(work.path().join("src.png"), ImageFormat::Png)
            .unwrap();

        let request = IconRequest::new()
            .with_input("src.png")
            .with_colors(["#FF0000"])
            .with_size(48)
            .with_output("out/")
            .with_quiet(true);
        let report = generator(&work).generate(&request).unwrap();

        assert_eq!(report.input, Some(work.path().join("src.png")));
        assert_eq!(report.output, Some(work.path().join("out").join("icon_1.png")));
        assert_eq!(report.colors, vec![ParsedColor::new(255, 0, 0)]);
        assert_eq!(report.size, CanvasSize::S48);
    }

    #[test]
    fn base64_without_output_writes_nothing() {
        let work = TempDir::new().unwrap();
        let report = generator(&work)
            .generate(&IconRequest::new().with_base64(true).with_quiet(true))
            .unwrap();

        assert!(report.output.is_none());
        assert!(report.data_uri.unwrap().starts_with("data:image/png;base64,"));
        assert!(report.warnings.is_empty());
        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }

    #[test]
    fn failures_leave_no_files() {
        let work = TempDir::new().unwrap();
        let generator = generator(&work);

        let bad_color = IconRequest::new().with_colors(["red"]).with_quiet(true);
        assert!(matches!(
            generator.generate(&bad_color),
            Err(IconError::InvalidColor(_))
        ));

        let bad_size = IconRequest::new().with_size(20).with_quiet(true);
        assert!(matches!(
            generator.generate(&bad_size),
            Err(IconError::InvalidCanvas(_))
        ));

        let missing = IconRequest::new().with_input("nope.png").with_quiet(true);
        assert!(matches!(
            generator.generate(&missing),
            Err(IconError::FileNotFound(_))
        ));

        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }
}
