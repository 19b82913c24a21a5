// src/paths.rs

//! Lexical path helpers.
//!
//! Node ids are compared as strings, so every path that becomes a node goes
//! through [`clean`] first: `.` segments dropped, `..` folded into its parent,
//! without touching the filesystem (no symlink resolution).

use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically normalise `path`.
///
/// `a/./b/../c` becomes `a/c`; `/..` stays `/`; leading `..` of a relative
/// path are kept. An empty result is `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Make `path` absolute against the current directory, then [`clean`] it.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(clean(path));
    }
    let cwd = std::env::current_dir()?;
    Ok(clean(&cwd.join(path)))
}

/// Lexical relative path from `base` to `path`, using `..` where needed.
///
/// Returns `None` if one path is absolute and the other is not, or if they
/// live under different prefixes (Windows drives).
pub fn relative_to(base: &Path, path: &Path) -> Option<PathBuf> {
    if base.is_absolute() != path.is_absolute() {
        return None;
    }

    let base = clean(base);
    let path = clean(path);
    let base_comps: Vec<Component<'_>> = base.components().collect();
    let path_comps: Vec<Component<'_>> = path.components().collect();

    if let (Some(Component::Prefix(a)), Some(Component::Prefix(b))) =
        (base_comps.first(), path_comps.first())
    {
        if a != b {
            return None;
        }
    }

    let common = base_comps
        .iter()
        .zip(path_comps.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // A relative base that climbs above the common prefix cannot be undone.
    if base_comps[common..]
        .iter()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }

    let mut rel = PathBuf::new();
    for _ in common..base_comps.len() {
        rel.push("..");
    }
    for comp in &path_comps[common..] {
        rel.push(comp.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

/// Label for a node in rendered output.
///
/// The node path relative to `base` with forward slashes; if that is `.` or
/// cannot be computed, the directory's own name.
pub fn relative_label(base: &Path, node: &str) -> String {
    let path = Path::new(node);
    match relative_to(base, path) {
        Some(rel) if rel != Path::new(".") => rel.to_string_lossy().replace('\\', "/"),
        _ => base_name(path),
    }
}

/// Last path component, or the whole path if it has none.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_folds_dots() {
        assert_eq!(clean(Path::new("/tf/dev/eks/../vpc")), PathBuf::from("/tf/dev/vpc"));
        assert_eq!(clean(Path::new("/tf/./dev//vpc/")), PathBuf::from("/tf/dev/vpc"));
        assert_eq!(clean(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(clean(Path::new("../a/../../b")), PathBuf::from("../../b"));
        assert_eq!(clean(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn relative_paths() {
        let base = Path::new("/tf/dev");
        assert_eq!(relative_to(base, Path::new("/tf/dev/vpc")), Some(PathBuf::from("vpc")));
        assert_eq!(
            relative_to(base, Path::new("/tf/prod/vpc")),
            Some(PathBuf::from("../prod/vpc"))
        );
        assert_eq!(relative_to(base, Path::new("/tf/dev")), Some(PathBuf::from(".")));
        assert_eq!(relative_to(base, Path::new("rel/path")), None);
    }

    #[test]
    fn labels_fall_back_to_base_name() {
        let base = Path::new("/tf/dev");
        assert_eq!(relative_label(base, "/tf/dev/eu-west-1/vpc"), "eu-west-1/vpc");
        assert_eq!(relative_label(base, "/tf/dev"), "dev");
        assert_eq!(relative_label(base, "relative/eks"), "eks");
    }

    #[test]
    fn absolutize_keeps_absolute_paths() {
        assert_eq!(
            absolutize(Path::new("/tf/a/../b")).unwrap(),
            PathBuf::from("/tf/b")
        );
        assert!(absolutize(Path::new("stack")).unwrap().is_absolute());
    }
}
