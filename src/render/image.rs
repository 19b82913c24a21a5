// src/render/image.rs

//! SVG/PNG output through the Graphviz `dot` binary.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{Result, TfOrderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Files produced by [`render_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub output: PathBuf,
    /// Intermediate Graphviz source, left in place for inspection.
    pub dot_file: PathBuf,
}

/// Look for an executable `dot` on `PATH`.
pub fn find_dot() -> Option<PathBuf> {
    which::which("dot").ok()
}

/// Write `dot_source` to a temporary file and run
/// `dot -T<format> <tmp> -o <output>`.
///
/// Fails up front if `dot` is not installed.
pub async fn render_image(
    dot_source: &str,
    output: &Path,
    format: ImageFormat,
) -> Result<RenderedImage> {
    let dot = find_dot().ok_or_else(|| {
        TfOrderError::Render(format!(
            "'dot' (Graphviz) is required to generate {} output",
            format.as_str().to_uppercase()
        ))
    })?;
    debug!(dot = %dot.display(), "found graphviz");

    let dot_file = write_temp_dot(dot_source)?;

    let result = Command::new(&dot)
        .arg(format!("-T{format}"))
        .arg(&dot_file)
        .arg("-o")
        .arg(output)
        .output()
        .await?;

    if !result.status.success() {
        return Err(TfOrderError::Render(format!(
            "failed to generate {format}: {}\nTemp .dot file: {}",
            String::from_utf8_lossy(&result.stderr).trim(),
            dot_file.display()
        )));
    }

    info!(output = %output.display(), dot_file = %dot_file.display(), %format, "image rendered");
    Ok(RenderedImage {
        output: output.to_path_buf(),
        dot_file,
    })
}

/// Persist the Graphviz source under a fresh temp name. The file is kept
/// because its path is reported to the user.
fn write_temp_dot(dot_source: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("tforder-")
        .suffix(".dot")
        .tempfile()?;
    file.write_all(dot_source.as_bytes())?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}
