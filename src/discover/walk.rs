// src/discover/walk.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::dag::DagGraph;
use crate::discover::DiscoverOptions;
use crate::discover::parser::parse_dependencies;
use crate::errors::{Result, TfOrderError};
use crate::fs::FileSystem;
use crate::paths::clean;

/// Build the graph reachable from `start` by following declared
/// dependencies.
///
/// `start` should be an absolute path. A directory without a marker file
/// simply contributes no edges.
pub fn discover_following(
    fs: &dyn FileSystem,
    start: &Path,
    opts: &DiscoverOptions,
) -> Result<DagGraph> {
    let mut graph = DagGraph::new();
    let mut visited = HashSet::new();
    follow(fs, &clean(start), opts, &mut graph, &mut visited);

    info!(
        start = %start.display(),
        nodes = graph.node_count(),
        edges = graph.edges().len(),
        "dependency discovery finished"
    );
    Ok(graph)
}

fn follow(
    fs: &dyn FileSystem,
    dir: &Path,
    opts: &DiscoverOptions,
    graph: &mut DagGraph,
    visited: &mut HashSet<PathBuf>,
) {
    if !visited.insert(dir.to_path_buf()) {
        return;
    }

    for dep_dir in declared_dependencies(fs, dir, opts) {
        add_dependency_edge(graph, &dep_dir, dir);
        follow(fs, &dep_dir, opts, graph, visited);
    }
}

/// Walk every directory under `root` and collect the edges of each stack
/// that has a marker file.
///
/// Directories named in `opts.skip_dirs` are not entered. Finding no marker
/// file at all is an error.
pub fn discover_recursive(
    fs: &dyn FileSystem,
    root: &Path,
    opts: &DiscoverOptions,
) -> Result<DagGraph> {
    let root = clean(root);
    if !fs.is_dir(&root) {
        return Err(TfOrderError::Discovery(format!(
            "recursive discovery needs a directory, got {}",
            root.display()
        )));
    }

    let mut graph = DagGraph::new();
    let mut stacks = 0usize;
    let mut pending = vec![root.clone()];

    while let Some(dir) = pending.pop() {
        if fs.is_file(&dir.join(&opts.marker_file)) {
            stacks += 1;
            for dep_dir in declared_dependencies(fs, &dir, opts) {
                add_dependency_edge(&mut graph, &dep_dir, &dir);
            }
        }

        let entries = fs.read_dir(&dir).map_err(|e| {
            TfOrderError::Discovery(format!("walking {}: {e:#}", dir.display()))
        })?;

        // Reverse so the stack pops children in sorted order.
        for entry in entries.into_iter().rev() {
            if !fs.is_dir(&entry) || is_skipped(&entry, opts) {
                continue;
            }
            pending.push(entry);
        }
    }

    if stacks == 0 {
        return Err(TfOrderError::Discovery(format!(
            "No {} files found under {}",
            opts.marker_file,
            root.display()
        )));
    }

    info!(
        root = %root.display(),
        stacks,
        nodes = graph.node_count(),
        edges = graph.edges().len(),
        "recursive discovery finished"
    );
    Ok(graph)
}

/// Dependency directories declared by the marker file in `dir`, cleaned.
fn declared_dependencies(fs: &dyn FileSystem, dir: &Path, opts: &DiscoverOptions) -> Vec<PathBuf> {
    let marker = dir.join(&opts.marker_file);
    if !fs.is_file(&marker) {
        debug!(dir = %dir.display(), "no marker file");
        return Vec::new();
    }

    let text = match fs.read_to_string(&marker) {
        Ok(text) => text,
        Err(e) => {
            warn!(file = %marker.display(), error = %e, "unreadable marker file; treating as no dependencies");
            return Vec::new();
        }
    };

    parse_dependencies(&text)
        .into_iter()
        .map(|(name, rel)| {
            let dep = clean(&dir.join(&rel));
            debug!(dir = %dir.display(), name = %name, dep = %dep.display(), "declared dependency");
            dep
        })
        .collect()
}

fn add_dependency_edge(graph: &mut DagGraph, dependency: &Path, dependent: &Path) {
    let source = dependency.to_string_lossy().into_owned();
    let target = dependent.to_string_lossy().into_owned();
    graph.add_edge(source, target);
}

fn is_skipped(dir: &Path, opts: &DiscoverOptions) -> bool {
    dir.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| opts.skip_dirs.iter().any(|s| s == name))
}
