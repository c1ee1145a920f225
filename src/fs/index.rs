//! Path lookups over the in-memory tree.
//!
//! Paths are the join key between the filesystem and the tree: every node
//! stores its full path and paths are unique across the tree, so a
//! depth-first scan in child order finds at most one match.

use std::path::{Path, PathBuf};

use crate::fs::tree::TreeNode;

/// Result of resolving a path to a directory node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirLookup {
    /// Path of the node that was resolved.
    pub path: PathBuf,
    /// `true` when the wanted node was not in the tree and the root was
    /// substituted. Callers still refresh; the refresh re-derives the truth.
    pub stale: bool,
}

/// Depth-first search for the node whose path equals `target`.
///
/// The search starts at `node` itself and walks children in insertion
/// order, including children of collapsed directories. Comparison is
/// `Path` equality: `..` components and symlinks are not resolved.
pub fn find_node<'a>(node: &'a TreeNode, target: &Path) -> Option<&'a TreeNode> {
    if node.path == target {
        return Some(node);
    }
    node.children
        .iter()
        .flatten()
        .find_map(|child| find_node(child, target))
}

/// Mutable variant of [`find_node`].
pub fn find_node_mut<'a>(node: &'a mut TreeNode, target: &Path) -> Option<&'a mut TreeNode> {
    if node.path == target {
        return Some(node);
    }
    if let Some(children) = &mut node.children {
        for child in children.iter_mut() {
            if let Some(found) = find_node_mut(child, target) {
                return Some(found);
            }
        }
    }
    None
}

/// Resolve `path` to a node, falling back to the root when it is absent.
pub fn resolve_node(root: &TreeNode, path: &Path) -> DirLookup {
    match find_node(root, path) {
        Some(node) => DirLookup {
            path: node.path.clone(),
            stale: false,
        },
        None => DirLookup {
            path: root.path.clone(),
            stale: true,
        },
    }
}

/// Resolve the node of the directory containing `path`.
///
/// The path is split at its last separator and the parent half is looked up
/// with [`find_node`]; the root stands in when the parent is not in the tree.
pub fn containing_dir(root: &TreeNode, path: &Path) -> DirLookup {
    match path.parent() {
        Some(parent) => resolve_node(root, parent),
        None => DirLookup {
            path: root.path.clone(),
            stale: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::tree::TreeState;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup() -> (TempDir, TreeState) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a").join("deep")).unwrap();
        File::create(dir.path().join("a").join("x.txt")).unwrap();
        File::create(dir.path().join("top.txt")).unwrap();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.refresh_subtree(&dir.path().join("a"));
        (dir, state)
    }

    #[test]
    fn finds_root_itself() {
        let (dir, state) = setup();
        let node = find_node(&state.root, dir.path()).unwrap();
        assert_eq!(node.path, dir.path());
    }

    #[test]
    fn finds_nested_node() {
        let (dir, state) = setup();
        let target = dir.path().join("a").join("x.txt");
        let node = find_node(&state.root, &target).unwrap();
        assert_eq!(node.name, "x.txt");
    }

    #[test]
    fn finds_children_of_collapsed_directory() {
        let (dir, mut state) = setup();
        let a = dir.path().join("a");
        find_node_mut(&mut state.root, &a).unwrap().is_expanded = false;
        assert!(find_node(&state.root, &a.join("deep")).is_some());
    }

    #[test]
    fn missing_path_is_not_found() {
        let (dir, state) = setup();
        assert!(find_node(&state.root, &dir.path().join("nope")).is_none());
    }

    #[test]
    fn match_is_exact_without_normalization() {
        let (dir, state) = setup();
        let indirect = dir.path().join("a").join("deep").join("..").join("x.txt");
        assert!(find_node(&state.root, &indirect).is_none());
    }

    #[test]
    fn containing_dir_of_nested_file() {
        let (dir, state) = setup();
        let lookup = containing_dir(&state.root, &dir.path().join("a").join("x.txt"));
        assert_eq!(lookup.path, dir.path().join("a"));
        assert!(!lookup.stale);
    }

    #[test]
    fn containing_dir_of_top_level_entry_is_root() {
        let (dir, state) = setup();
        let lookup = containing_dir(&state.root, &dir.path().join("top.txt"));
        assert_eq!(lookup.path, dir.path());
        assert!(!lookup.stale);
    }

    #[test]
    fn containing_dir_falls_back_to_root_when_parent_unknown() {
        let (dir, state) = setup();
        let lookup = containing_dir(&state.root, &dir.path().join("ghost").join("f.txt"));
        assert_eq!(lookup.path, dir.path());
        assert!(lookup.stale);
    }

    #[test]
    fn resolve_node_falls_back_to_root() {
        let (dir, state) = setup();
        let lookup = resolve_node(&state.root, &dir.path().join("ghost"));
        assert_eq!(lookup.path, dir.path());
        assert!(lookup.stale);
    }
}
