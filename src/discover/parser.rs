// src/discover/parser.rs

//! Line scanner for the dependency block of a stack's marker file:
//!
//! ```hcl
//! locals {
//!   dependencies {
//!     vpc = "../vpc"
//!   }
//! }
//! ```
//!
//! This is not an HCL parser. It only tracks whether the current line is
//! inside `locals { dependencies { ... } }` and collects `name = "path"`
//! pairs there; everything else is ignored.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static DEP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s*([a-zA-Z0-9_\-]+)\s*=\s*"([^"]+)""#)
        .unwrap_or_else(|e| unreachable!("invalid dependency regex: {e}"))
});

/// Extract the declared dependencies, keyed by name.
///
/// A later declaration with the same name replaces the earlier one.
pub fn parse_dependencies(text: &str) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();
    let mut in_locals = false;
    let mut in_deps = false;

    for line in text.lines() {
        let line = line.trim();

        if line.starts_with("locals") && line.contains('{') {
            in_locals = true;
            continue;
        }
        if in_locals && line.starts_with("dependencies") && line.contains('{') {
            in_deps = true;
            continue;
        }

        if in_deps {
            if line.contains('}') {
                in_deps = false;
                continue;
            }
            if let Some(caps) = DEP_LINE.captures(line) {
                deps.insert(caps[1].to_string(), caps[2].to_string());
            }
        } else if in_locals && line.contains('}') {
            in_locals = false;
        }
    }

    deps
}
