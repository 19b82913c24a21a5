// src/render/list.rs

use std::io::{self, Write};
use std::path::Path;

use crate::dag::NodeId;
use crate::paths::relative_label;

/// Write `order` as a 1-based numbered list, one label per line.
pub fn write_numbered_list<W: Write>(w: &mut W, order: &[NodeId], base: &Path) -> io::Result<()> {
    for (i, node) in order.iter().enumerate() {
        writeln!(w, "{:2}. {}", i + 1, relative_label(base, node))?;
    }
    Ok(())
}

/// [`write_numbered_list`] into a `String`.
pub fn numbered_list(order: &[NodeId], base: &Path) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_numbered_list(&mut buf, order, base);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_relative_and_right_aligned() {
        let order: Vec<NodeId> = (1..=10)
            .map(|i| format!("/tf/dev/stack{i}"))
            .collect();
        let text = numbered_list(&order, Path::new("/tf"));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], " 1. dev/stack1");
        assert_eq!(lines[9], "10. dev/stack10");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn empty_order_writes_nothing() {
        assert_eq!(numbered_list(&[], Path::new("/tf")), "");
    }
}
