// src/render/dot.rs

use std::fmt::Write as _;
use std::path::Path;

use crate::dag::{Edge, NodeId};
use crate::paths::relative_label;

const PRETTY_STYLE: &str = r##"  rankdir=LR;
  node [shape=box, style=filled, fillcolor="#e3f2fd", fontname=Helvetica, color="#1976d2"];
  edge [color="#1976d2", penwidth=2, arrowsize=0.8];
  graph [splines=true, bgcolor="#fafafa"];
"##;

/// Graphviz source for `edges`, labels relative to `base`.
///
/// `pretty` adds the left-to-right boxed style used for rendered images.
pub fn render_dot(edges: &[Edge], base: &Path, pretty: bool) -> String {
    let mut out = String::from("digraph tforder {\n");
    if pretty {
        out.push_str(PRETTY_STYLE);
    }
    for edge in edges {
        let src = escape_label(&relative_label(base, &edge.source));
        let tgt = escape_label(&relative_label(base, &edge.target));
        // Infallible for String.
        let _ = writeln!(out, "  \"{src}\" -> \"{tgt}\";");
    }
    out.push_str("}\n");
    out
}

pub fn escape_label(label: &str) -> String {
    label.replace('"', "\\\"")
}

/// One edge between each pair of consecutive nodes in `order`.
pub fn chain_edges(order: &[NodeId]) -> Vec<Edge> {
    order
        .windows(2)
        .map(|pair| Edge::new(pair[0].clone(), pair[1].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dot_lists_edges_in_order() {
        let edges = vec![
            Edge::new("/tf/dev/vpc", "/tf/dev/eks"),
            Edge::new("/tf/dev/eks", "/tf/dev/app"),
        ];
        let dot = render_dot(&edges, Path::new("/tf/dev"), false);
        assert_eq!(
            dot,
            "digraph tforder {\n  \"vpc\" -> \"eks\";\n  \"eks\" -> \"app\";\n}\n"
        );
    }

    #[test]
    fn pretty_dot_carries_style_block() {
        let dot = render_dot(&[Edge::new("/a", "/b")], Path::new("/"), true);
        assert!(dot.starts_with("digraph tforder {\n  rankdir=LR;\n"));
        assert!(dot.contains("fillcolor=\"#e3f2fd\""));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(escape_label(r#"we"ird"#), r#"we\"ird"#);
    }

    #[test]
    fn chain_links_consecutive_nodes() {
        let order: Vec<NodeId> = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(chain_edges(&order), vec![Edge::new("a", "b"), Edge::new("b", "c")]);
        assert!(chain_edges(&order[..1]).is_empty());
    }
}
