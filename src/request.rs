//! Serializable icon request.
//!
//! An [`IconRequest`] captures every input of one generator run in a format
//! that can be built in code, parsed from CLI flags, or loaded from JSON.
//!
//! # Example
//!
//! ```
//! use circlet_renderer::IconRequest;
//!
//! let request = IconRequest::new()
//!     .with_colors(["#112233", "#ffffff"])
//!     .with_size(64)
//!     .with_base64(true);
//!
//! let json = request.to_json().unwrap();
//! let restored = IconRequest::from_json(&json).unwrap();
//! assert_eq!(restored, request);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::icon::{CanvasSize, CanvasSpec, DEFAULT_BORDER_WIDTH};

fn default_border_width() -> u32 {
    DEFAULT_BORDER_WIDTH
}

fn default_size() -> u32 {
    CanvasSize::default().pixels()
}

/// All inputs of a single icon generation.
///
/// # JSON Format
///
/// ```json
/// {
///   "input": "logo.jpg",
///   "colors": ["#112233", "#ffffff"],
///   "borderWidth": 3,
///   "size": 32,
///   "output": "out/",
///   "base64": false,
///   "quiet": false
/// }
/// ```
///
/// Every field is optional; missing fields take the defaults shown by
/// [`IconRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRequest {
    /// Source image. `None` draws the solid fallback circle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    /// Ring colors as `#RRGGBB`, innermost first.
    #[serde(default)]
    pub colors: Vec<String>,

    /// Ring stroke width in pixels (1-10).
    #[serde(default = "default_border_width")]
    pub border_width: u32,

    /// Canvas side in pixels (16, 24, 32, 48, 64 or 128).
    #[serde(default = "default_size")]
    pub size: u32,

    /// Requested output path, file or directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Return a `data:image/png;base64,` string.
    #[serde(default)]
    pub base64: bool,

    /// Suppress non-error log output.
    #[serde(default)]
    pub quiet: bool,
}

impl Default for IconRequest {
    fn default() -> Self {
        Self {
            input: None,
            colors: Vec::new(),
            border_width: default_border_width(),
            size: default_size(),
            output: None,
            base64: false,
            quiet: false,
        }
    }
}

impl IconRequest {
    /// A request with all defaults: no input, no rings, 32px, border 3.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_border_width(mut self, border_width: u32) -> Self {
        self.border_width = border_width;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_base64(mut self, base64: bool) -> Self {
        self.base64 = base64;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Validates size, border width and color count.
    pub fn canvas_spec(&self) -> Result<CanvasSpec> {
        CanvasSpec::new(
            CanvasSize::try_from(self.size)?,
            self.border_width,
            self.colors.len(),
        )
    }

    /// Serializes the request to a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the request to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a request from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IconError;

    #[test]
    fn empty_json_gives_defaults() {
        let request = IconRequest::from_json("{}").unwrap();
        assert_eq!(request, IconRequest::new());
        assert_eq!(request.border_width, 3);
        assert_eq!(request.size, 32);
        assert!(request.colors.is_empty());
    }

    #[test]
    fn json_uses_camel_case() {
        let json = IconRequest::new()
            .with_border_width(5)
            .with_output("out/")
            .to_json_pretty()
            .unwrap();
        assert!(json.contains("\"borderWidth\": 5"));
        assert!(json.contains("\"output\": \"out/\""));
        assert!(!json.contains("\"input\""));
    }

    #[test]
    fn full_request_roundtrip() {
        let request = IconRequest::new()
            .with_input("photo.jpg")
            .with_colors(["#000000", "#FFFFFF"])
            .with_border_width(2)
            .with_size(128)
            .with_output("icons/logo.png")
            .with_base64(true)
            .with_quiet(true);
        let restored = IconRequest::from_json(&request.to_json().unwrap()).unwrap();
        assert_eq!(restored, request);
    }

    #[test]
    fn canvas_spec_validation() {
        let spec = IconRequest::new().with_colors(["#123456"]).canvas_spec().unwrap();
        assert_eq!(spec.size, CanvasSize::S32);
        assert_eq!(spec.color_count, 1);

        assert!(matches!(
            IconRequest::new().with_size(100).canvas_spec(),
            Err(IconError::InvalidCanvas(_))
        ));
        assert!(matches!(
            IconRequest::new().with_border_width(0).canvas_spec(),
            Err(IconError::InvalidCanvas(_))
        ));
    }
}
