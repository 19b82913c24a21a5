use std::fs;
use std::path::{Path, PathBuf};

use tforder::config::{ConfigFile, RawConfigFile};
use tforder::dag::{DagGraph, Edge};

/// Builder for `DagGraph` to simplify test setup.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DagGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `source` must finish before `target` starts.
    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.graph.add_edge(source, target);
        self
    }

    /// `from` is a dependency of every node in `targets`.
    pub fn fan_out(mut self, from: &str, targets: &[&str]) -> Self {
        for target in targets {
            self.graph.add_edge(from, *target);
        }
        self
    }

    /// `a -> b -> c -> ...`
    pub fn chain(mut self, nodes: &[&str]) -> Self {
        for pair in nodes.windows(2) {
            self.graph.add_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn build(self) -> DagGraph {
        self.graph
    }
}

/// Shorthand for a graph from `(source, target)` pairs.
pub fn graph(edges: &[(&str, &str)]) -> DagGraph {
    DagGraph::from_edges(edges.iter().map(|(s, t)| Edge::new(*s, *t)))
}

/// Builder for `ConfigFile` to simplify test setup.
#[derive(Debug, Default)]
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_parallel(mut self, n: usize) -> Self {
        self.config.exec.max_parallel = Some(n);
        self
    }

    pub fn with_shell(mut self, shell: &str) -> Self {
        self.config.exec.shell = Some(shell.to_string());
        self
    }

    pub fn with_echo_output(mut self, echo: bool) -> Self {
        self.config.exec.echo_output = echo;
        self
    }

    pub fn with_marker_file(mut self, name: &str) -> Self {
        self.config.discover.marker_file = name.to_string();
        self
    }

    pub fn with_skip_dir(mut self, name: &str) -> Self {
        self.config.discover.skip_dirs.push(name.to_string());
        self
    }

    pub fn with_relative_to(mut self, base: &str) -> Self {
        self.config.render.relative_to = Some(base.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Write `<root>/<dir>/main.tf` declaring `deps` as `name = "path"` pairs.
///
/// Returns the stack directory.
pub fn write_stack(root: &Path, dir: &str, deps: &[(&str, &str)]) -> PathBuf {
    let stack_dir = root.join(dir);
    fs::create_dir_all(&stack_dir).expect("create stack dir");

    let mut text = String::from("terraform {}\n\nlocals {\n  dependencies {\n");
    for (name, path) in deps {
        text.push_str(&format!("    {name} = \"{path}\"\n"));
    }
    text.push_str("  }\n}\n");

    fs::write(stack_dir.join("main.tf"), text).expect("write main.tf");
    stack_dir
}
