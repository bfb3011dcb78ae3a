use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use circlet_renderer::{CanvasSize, IconGenerator, IconRequest};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

/// Generate a circular PNG icon, optionally wrapped in colored rings.
#[derive(Parser, Debug)]
#[command(name = "circlet", version)]
struct Cli {
    /// Source image (JPEG, PNG, GIF, BMP, TIFF or ICO). Omit for a solid circle.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Ring color as #RRGGBB, innermost first. Repeat or comma-separate (max 20).
    #[arg(short = 'c', long = "color", value_delimiter = ',')]
    colors: Vec<String>,

    /// Ring width in pixels, 1-10 [default: 3].
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=10))]
    border: Option<u32>,

    /// Canvas size: 16, 24, 32, 48, 64 or 128 [default: 32].
    #[arg(short, long, value_parser = parse_size)]
    size: Option<u32>,

    /// Output file or directory. Defaults to the downloads folder.
    #[arg(short, long)]
    output: Option<String>,

    /// Print a data:image/png;base64 string instead of (or as well as) saving.
    #[arg(long)]
    base64: bool,

    /// Suppress everything except errors and the base64 output.
    #[arg(short, long)]
    quiet: bool,

    /// Load the request from a JSON file; other flags override its fields.
    #[arg(long)]
    request: Option<PathBuf>,
}

fn parse_size(value: &str) -> Result<u32, String> {
    let px: u32 = value.parse().map_err(|e| format!("{e}"))?;
    CanvasSize::try_from(px)
        .map(u32::from)
        .map_err(|e| e.to_string())
}

impl Cli {
    fn into_request(self) -> Result<IconRequest, String> {
        let mut request = match &self.request {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
                IconRequest::from_json(&json)
                    .map_err(|e| format!("invalid request {}: {e}", path.display()))?
            }
            None => IconRequest::new(),
        };

        if let Some(input) = self.input {
            request.input = Some(input);
        }
        if !self.colors.is_empty() {
            request.colors = self.colors;
        }
        if let Some(border) = self.border {
            request.border_width = border;
        }
        if let Some(size) = self.size {
            request.size = size;
        }
        if let Some(output) = self.output {
            request.output = Some(output);
        }
        request.base64 |= self.base64;
        request.quiet |= self.quiet;
        Ok(request)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if quiet {
            LevelFilter::ERROR
        } else {
            LevelFilter::INFO
        })
        .init();

    let request = match cli.into_request() {
        Ok(request) => request,
        Err(message) => {
            tracing::error!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let report = match IconGenerator::from_env().and_then(|g| g.generate(&request)) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(uri) = report.data_uri {
        println!("{uri}");
    }
    ExitCode::SUCCESS
}
