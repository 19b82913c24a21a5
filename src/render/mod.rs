// src/render/mod.rs

//! Output of a computed order: numbered list, Graphviz source, or an image.

pub mod dot;
pub mod image;
pub mod list;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dag::{DagGraph, NodeId};
use crate::errors::Result;

pub use dot::{chain_edges, escape_label, render_dot};
pub use image::{ImageFormat, RenderedImage, find_dot, render_image};
pub use list::{numbered_list, write_numbered_list};

/// Where rendered output goes, picked from the `--out` file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Numbered list on stdout.
    Stdout,
    /// Numbered list in a file (`.txt` or any unknown extension).
    ListFile(PathBuf),
    /// Graphviz source of the discovered edge set.
    Dot(PathBuf),
    /// Image rendered by Graphviz.
    Image { path: PathBuf, format: ImageFormat },
}

impl OutputTarget {
    pub fn from_out(out: Option<&str>) -> Self {
        let Some(out) = out.filter(|s| !s.is_empty()) else {
            return OutputTarget::Stdout;
        };
        let path = PathBuf::from(out);

        if out.ends_with(".svg") {
            OutputTarget::Image {
                path,
                format: ImageFormat::Svg,
            }
        } else if out.ends_with(".png") {
            OutputTarget::Image {
                path,
                format: ImageFormat::Png,
            }
        } else if out.ends_with(".dot") {
            OutputTarget::Dot(path)
        } else {
            OutputTarget::ListFile(path)
        }
    }
}

/// Render `order` (and, for `.dot`, the edges of `graph`) to `target`.
///
/// Returns the status line to show the user, if any. The stdout list is
/// written to `stdout` directly.
pub async fn render<W: Write>(
    target: &OutputTarget,
    graph: &DagGraph,
    order: &[NodeId],
    base: &Path,
    stdout: &mut W,
) -> Result<Option<String>> {
    match target {
        OutputTarget::Stdout => {
            write_numbered_list(stdout, order, base)?;
            Ok(None)
        }
        OutputTarget::ListFile(path) => {
            tokio::fs::write(path, numbered_list(order, base)).await?;
            info!(path = %path.display(), nodes = order.len(), "numbered list written");
            Ok(Some(format!("Numbered list written: {}", path.display())))
        }
        OutputTarget::Dot(path) => {
            tokio::fs::write(path, render_dot(graph.edges(), base, false)).await?;
            info!(path = %path.display(), edges = graph.edges().len(), "dot file written");
            Ok(None)
        }
        OutputTarget::Image { path, format } => {
            // Images show the run order as a chain, not the raw edge set.
            let source = render_dot(&chain_edges(order), base, true);
            let rendered = render_image(&source, path, *format).await?;
            Ok(Some(format!(
                "{} generated: {}\nTemp .dot file: {}",
                format.as_str().to_uppercase(),
                rendered.output.display(),
                rendered.dot_file.display()
            )))
        }
    }
}
