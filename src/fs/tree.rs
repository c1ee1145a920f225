use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{AppError, Result};
use crate::fs::index::find_node_mut;
use crate::fs::listing::{list_directory, DirEntry};

/// Marker prepended to directory labels.
pub const DIR_MARKER: &str = "🗁 ";

/// File metadata captured from the listing, used for sorting and display.
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub is_hidden: bool,
}

/// A node in the filesystem tree.
///
/// `children` is a snapshot of the directory listing taken at the last
/// populate; `None` means the node was never populated.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub label: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub children: Option<Vec<TreeNode>>,
    pub is_expanded: bool,
    pub depth: usize,
    pub meta: FileMeta,
}

impl TreeNode {
    /// Create the root node for a starting directory.
    pub fn root(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self {
            label: format!("{DIR_MARKER}{name}"),
            name,
            path: path.to_path_buf(),
            is_dir: true,
            children: None,
            is_expanded: false,
            depth: 0,
            meta: FileMeta {
                size: metadata.len(),
                modified: metadata.modified().ok(),
                is_hidden: false,
            },
        })
    }

    /// Create a child node for one listing entry of `parent`.
    pub fn from_entry(parent: &Path, entry: DirEntry, depth: usize) -> Self {
        let label = if entry.is_dir {
            format!("{DIR_MARKER}{}", entry.name)
        } else {
            entry.name.clone()
        };
        Self {
            label,
            path: parent.join(&entry.name),
            is_dir: entry.is_dir,
            children: None,
            is_expanded: false,
            depth,
            meta: FileMeta {
                size: entry.size,
                modified: entry.modified,
                is_hidden: entry.name.starts_with('.'),
            },
            name: entry.name,
        }
    }

    /// Append one child per entry of this node's directory listing.
    ///
    /// Does not recurse and does not clear: existing children must be
    /// dropped first (see [`TreeNode::clear_children`]) or they will be
    /// duplicated.
    pub fn populate(&mut self) {
        let depth = self.depth + 1;
        let listing = list_directory(&self.path);
        let children = self.children.get_or_insert_with(Vec::new);
        for entry in listing {
            children.push(TreeNode::from_entry(&self.path, entry, depth));
        }
    }

    /// Drop all children and their descendants.
    pub fn clear_children(&mut self) {
        self.children = None;
    }

    /// Paths of the immediate children, in order.
    #[cfg(test)]
    pub fn child_paths(&self) -> Vec<PathBuf> {
        self.children
            .iter()
            .flatten()
            .map(|c| c.path.clone())
            .collect()
    }

    /// Post-order collapse of every descendant. The node's own flag is kept.
    fn collapse_descendants(&mut self) {
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                child.collapse_descendants();
                child.is_expanded = false;
            }
        }
    }

    /// Collect paths of expanded descendants (not including `self`).
    fn expanded_descendants(&self, out: &mut Vec<PathBuf>) {
        for child in self.children.iter().flatten() {
            if child.is_expanded {
                out.push(child.path.clone());
                child.expanded_descendants(out);
            }
        }
    }
}

/// A flattened representation of a tree node for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub label: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    pub is_hidden: bool,
}

/// Sort criteria for the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortBy {
    /// Alphabetical (case-insensitive), default.
    Name,
    /// By file size (largest first).
    Size,
    /// By modification time (newest first).
    Modified,
}

impl SortBy {
    /// Parse sort_by from config string.
    pub fn from_config(s: &str) -> Self {
        match s {
            "size" => SortBy::Size,
            "modified" => SortBy::Modified,
            _ => SortBy::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Name => "Name",
            SortBy::Size => "Size",
            SortBy::Modified => "Modified",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SortBy::Name => SortBy::Size,
            SortBy::Size => SortBy::Modified,
            SortBy::Modified => SortBy::Name,
        }
    }
}

/// Display options for the tree.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub show_hidden: bool,
    pub sort_by: SortBy,
    pub dirs_first: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            sort_by: SortBy::Name,
            dirs_first: true,
        }
    }
}

/// The tree model: the node hierarchy plus its flattened, selectable view.
pub struct TreeState {
    pub root: TreeNode,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub show_hidden: bool,
    pub sort_by: SortBy,
    pub dirs_first: bool,
}

impl TreeState {
    /// Create a TreeState rooted at `path` with default options.
    pub fn new(path: &Path) -> Result<Self> {
        Self::with_options(path, TreeOptions::default())
    }

    /// Create a TreeState rooted at `path`, with the root populated and expanded.
    pub fn with_options(path: &Path, options: TreeOptions) -> Result<Self> {
        let root = TreeNode::root(path)?;
        let mut state = Self {
            root,
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            show_hidden: options.show_hidden,
            sort_by: options.sort_by,
            dirs_first: options.dirs_first,
        };
        Self::load_node(&mut state.root, &state.sort_by, state.dirs_first);
        state.root.is_expanded = true;
        state.flatten();
        Ok(state)
    }

    /// Populate a node from disk and order its children.
    fn load_node(node: &mut TreeNode, sort_by: &SortBy, dirs_first: bool) {
        node.populate();
        Self::sort_children_of(node, sort_by, dirs_first);
    }

    /// Rebuild the flat items list from the tree, respecting `show_hidden`.
    ///
    /// The root node is always included regardless of hidden status.
    pub fn flatten(&mut self) {
        self.flat_items.clear();
        Self::flatten_node(&self.root, &mut self.flat_items, self.show_hidden, true, true);
        if !self.flat_items.is_empty() && self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    fn flatten_node(
        node: &TreeNode,
        items: &mut Vec<FlatItem>,
        show_hidden: bool,
        is_last: bool,
        is_root: bool,
    ) {
        if !is_root && !show_hidden && node.meta.is_hidden {
            return;
        }

        items.push(FlatItem {
            label: node.label.clone(),
            path: node.path.clone(),
            is_dir: node.is_dir,
            depth: node.depth,
            is_expanded: node.is_expanded,
            is_last_sibling: is_last,
            is_hidden: node.meta.is_hidden,
        });

        if !node.is_expanded {
            return;
        }
        if let Some(children) = &node.children {
            let visible: Vec<&TreeNode> = children
                .iter()
                .filter(|c| show_hidden || !c.meta.is_hidden)
                .collect();
            for (i, child) in visible.iter().enumerate() {
                let is_last_child = i == visible.len() - 1;
                Self::flatten_node(child, items, show_hidden, is_last_child, false);
            }
        }
    }

    /// The currently selected row, if any.
    pub fn selected_item(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    /// Path of the currently selected node, if any.
    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_item().map(|item| item.path.clone())
    }

    /// Whether the selection is on the root row.
    pub fn root_selected(&self) -> bool {
        self.selected_item()
            .is_some_and(|item| item.path == self.root.path)
    }

    /// Expand the currently selected directory node, loading it on first use.
    pub fn expand_selected(&mut self) {
        let Some(path) = self.selected_path() else {
            return;
        };
        let sort_by = self.sort_by.clone();
        let dirs_first = self.dirs_first;
        if let Some(node) = find_node_mut(&mut self.root, &path) {
            if node.is_dir && !node.is_expanded {
                if node.children.is_none() {
                    Self::load_node(node, &sort_by, dirs_first);
                }
                node.is_expanded = true;
                self.flatten();
            }
        }
    }

    /// Collapse the currently selected directory, or jump to parent.
    pub fn collapse_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let path = item.path.clone();

        if item.is_dir && item.is_expanded && path != self.root.path {
            if let Some(node) = find_node_mut(&mut self.root, &path) {
                node.is_expanded = false;
                self.flatten();
            }
            return;
        }

        if let Some(parent) = path.parent() {
            if let Some(idx) = self.find_index_by_path(parent) {
                self.selected_index = idx;
            }
        }
    }

    /// Expand a collapsed directory or collapse an expanded one.
    pub fn toggle_selected(&mut self) {
        let Some((is_dir, is_expanded)) = self
            .selected_item()
            .map(|item| (item.is_dir, item.is_expanded))
        else {
            return;
        };
        if is_dir && is_expanded {
            self.collapse_selected();
        } else if is_dir {
            self.expand_selected();
        }
    }

    /// Collapse every node below the root. The root stays expanded.
    ///
    /// The selection moves to the nearest still-visible ancestor.
    pub fn collapse_all(&mut self) {
        let selected = self.selected_path();
        self.root.collapse_descendants();
        self.flatten();
        if let Some(path) = selected {
            self.select_path_or_ancestor(&path);
        }
    }

    /// Rebuild the children of the directory node at `path` from disk.
    ///
    /// Falls back to the root if `path` is not in the tree. Expanded
    /// descendants that still exist are re-expanded, the refreshed node is
    /// marked expanded and becomes the selection. Returns the path of the
    /// node that was actually refreshed.
    pub fn refresh_subtree(&mut self, path: &Path) -> PathBuf {
        let sort_by = self.sort_by.clone();
        let dirs_first = self.dirs_first;

        let refreshed = if let Some(node) = find_node_mut(&mut self.root, path) {
            Self::rebuild(node, &sort_by, dirs_first);
            node.path.clone()
        } else {
            tracing::warn!(path = %path.display(), "refresh target not in tree, refreshing root");
            Self::rebuild(&mut self.root, &sort_by, dirs_first);
            self.root.path.clone()
        };

        tracing::debug!(path = %refreshed.display(), "refreshed subtree");
        self.reveal(&refreshed);
        self.flatten();
        if !self.select_path(&refreshed) {
            self.select_path_or_ancestor(&refreshed);
        }
        refreshed
    }

    /// Expand every ancestor of `path` below the root so its row is shown.
    fn reveal(&mut self, path: &Path) {
        let sort_by = self.sort_by.clone();
        let dirs_first = self.dirs_first;
        let mut ancestors: Vec<PathBuf> = path
            .ancestors()
            .skip(1)
            .take_while(|p| p.starts_with(&self.root.path))
            .map(Path::to_path_buf)
            .collect();
        ancestors.reverse();

        for ancestor in &ancestors {
            if let Some(node) = find_node_mut(&mut self.root, ancestor) {
                if node.is_dir && !node.is_expanded {
                    if node.children.is_none() {
                        Self::load_node(node, &sort_by, dirs_first);
                    }
                    node.is_expanded = true;
                }
            }
        }
    }

    fn rebuild(node: &mut TreeNode, sort_by: &SortBy, dirs_first: bool) {
        let mut expanded = Vec::new();
        node.expanded_descendants(&mut expanded);

        node.clear_children();
        if node.is_dir {
            Self::load_node(node, sort_by, dirs_first);
        }
        node.is_expanded = true;

        for path in Self::paths_in_restore_order(&expanded) {
            if let Some(descendant) = find_node_mut(node, path) {
                if descendant.is_dir && !descendant.is_expanded {
                    Self::load_node(descendant, sort_by, dirs_first);
                    descendant.is_expanded = true;
                }
            }
        }
    }

    /// Sort paths so ancestors are restored before descendants.
    fn paths_in_restore_order(paths: &[PathBuf]) -> Vec<&PathBuf> {
        let mut ordered: Vec<&PathBuf> = paths.iter().collect();
        ordered.sort_by(|a, b| {
            a.components()
                .count()
                .cmp(&b.components().count())
                .then_with(|| a.cmp(b))
        });
        ordered
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Toggle visibility of hidden files and re-flatten.
    pub fn toggle_hidden(&mut self) {
        let selected = self.selected_path();
        self.show_hidden = !self.show_hidden;
        self.flatten();
        if let Some(path) = selected {
            self.select_path_or_ancestor(&path);
        }
    }

    /// Sort a node's children (non-recursive, just immediate children).
    fn sort_children_of(node: &mut TreeNode, sort_by: &SortBy, dirs_first: bool) {
        if let Some(children) = &mut node.children {
            children.sort_by(|a, b| {
                let mut cmp = std::cmp::Ordering::Equal;

                if dirs_first {
                    cmp = b.is_dir.cmp(&a.is_dir);
                }

                cmp.then_with(|| match sort_by {
                    SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                    SortBy::Size => b.meta.size.cmp(&a.meta.size),
                    SortBy::Modified => b.meta.modified.cmp(&a.meta.modified),
                })
            });
        }
    }

    fn sort_all_children_recursive(node: &mut TreeNode, sort_by: &SortBy, dirs_first: bool) {
        Self::sort_children_of(node, sort_by, dirs_first);
        if let Some(children) = &mut node.children {
            for child in children.iter_mut() {
                Self::sort_all_children_recursive(child, sort_by, dirs_first);
            }
        }
    }

    /// Cycle to the next sort mode, re-sort every loaded directory and keep
    /// the selection on the same path.
    pub fn cycle_sort(&mut self) {
        let selected = self.selected_path();
        self.sort_by = self.sort_by.next();
        let sort_by = self.sort_by.clone();
        Self::sort_all_children_recursive(&mut self.root, &sort_by, self.dirs_first);
        self.flatten();
        if let Some(path) = selected {
            self.select_path(&path);
        }
    }

    /// Find the flat_items index of a node by its path.
    pub fn find_index_by_path(&self, path: &Path) -> Option<usize> {
        self.flat_items.iter().position(|item| item.path == path)
    }

    /// Select the row for `path`. Returns `false` if it is not visible.
    pub fn select_path(&mut self, path: &Path) -> bool {
        match self.find_index_by_path(path) {
            Some(idx) => {
                self.selected_index = idx;
                true
            }
            None => false,
        }
    }

    /// Select `path`, or the closest ancestor that is visible.
    pub fn select_path_or_ancestor(&mut self, path: &Path) {
        for candidate in path.ancestors() {
            if self.select_path(candidate) {
                return;
            }
        }
        self.selected_index = 0;
    }

    /// All currently expanded directory paths.
    #[cfg(test)]
    pub fn expanded_paths(&self) -> std::collections::HashSet<PathBuf> {
        let mut out = Vec::new();
        if self.root.is_expanded {
            out.push(self.root.path.clone());
        }
        self.root.expanded_descendants(&mut out);
        out.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::index::find_node;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        File::create(dir.path().join("file_a.txt")).unwrap();
        File::create(dir.path().join("file_b.rs")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        fs::create_dir(dir.path().join("alpha").join("nested")).unwrap();
        File::create(dir.path().join("alpha").join("inner.txt")).unwrap();
        dir
    }

    fn names(node: &TreeNode) -> Vec<String> {
        node.children
            .iter()
            .flatten()
            .map(|c| c.name.clone())
            .collect()
    }

    #[test]
    fn root_node_is_directory_with_marker() {
        let dir = setup_test_dir();
        let node = TreeNode::root(dir.path()).unwrap();
        assert!(node.is_dir);
        assert!(node.label.starts_with(DIR_MARKER));
        assert!(node.children.is_none());
    }

    #[test]
    fn root_node_rejects_file() {
        let dir = setup_test_dir();
        let err = TreeNode::root(&dir.path().join("file_a.txt")).unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn populate_sets_paths_and_markers() {
        let dir = setup_test_dir();
        let mut node = TreeNode::root(dir.path()).unwrap();
        node.populate();
        let children = node.children.as_ref().unwrap();
        let alpha = children.iter().find(|c| c.name == "alpha").unwrap();
        let file = children.iter().find(|c| c.name == "file_a.txt").unwrap();
        assert_eq!(alpha.path, dir.path().join("alpha"));
        assert!(alpha.is_dir);
        assert_eq!(alpha.label, format!("{DIR_MARKER}alpha"));
        assert_eq!(file.label, "file_a.txt");
        assert!(!file.is_dir);
        assert_eq!(alpha.depth, 1);
    }

    #[test]
    fn populate_does_not_recurse() {
        let dir = setup_test_dir();
        let mut node = TreeNode::root(dir.path()).unwrap();
        node.populate();
        let alpha = node
            .children
            .as_ref()
            .unwrap()
            .iter()
            .find(|c| c.name == "alpha")
            .unwrap();
        assert!(alpha.children.is_none());
    }

    #[test]
    fn populate_without_clear_duplicates_children() {
        let dir = setup_test_dir();
        let mut node = TreeNode::root(dir.path()).unwrap();
        node.populate();
        let once = node.children.as_ref().unwrap().len();
        node.populate();
        assert_eq!(node.children.as_ref().unwrap().len(), once * 2);
        node.clear_children();
        node.populate();
        assert_eq!(node.children.as_ref().unwrap().len(), once);
    }

    #[test]
    fn populate_unreadable_path_yields_no_children() {
        let dir = setup_test_dir();
        let mut node = TreeNode::root(dir.path()).unwrap();
        node.path = dir.path().join("vanished");
        node.populate();
        assert!(node.children.as_ref().unwrap().is_empty());
    }

    #[test]
    fn tree_state_sorts_dirs_first_by_default() {
        let dir = setup_test_dir();
        let state = TreeState::new(dir.path()).unwrap();
        assert_eq!(state.flat_items[1].path, dir.path().join("alpha"));
        assert_eq!(state.flat_items[2].path, dir.path().join("beta"));
    }

    #[test]
    fn flatten_hides_dot_files_by_default() {
        let dir = setup_test_dir();
        let state = TreeState::new(dir.path()).unwrap();
        // root + alpha + beta + file_a.txt + file_b.rs
        assert_eq!(state.flat_items.len(), 5);
        // the snapshot still mirrors the listing
        assert!(names(&state.root).contains(&".hidden".to_string()));
    }

    #[test]
    fn toggle_hidden_twice_restores() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.toggle_hidden();
        assert_eq!(state.flat_items.len(), 6);
        state.toggle_hidden();
        assert_eq!(state.flat_items.len(), 5);
    }

    #[test]
    fn cycle_sort_changes_mode() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        assert_eq!(state.sort_by, SortBy::Name);
        state.cycle_sort();
        assert_eq!(state.sort_by, SortBy::Size);
        state.cycle_sort();
        assert_eq!(state.sort_by, SortBy::Modified);
        state.cycle_sort();
        assert_eq!(state.sort_by, SortBy::Name);
    }

    #[test]
    fn sort_by_size_orders_files_largest_first() {
        let dir = setup_test_dir();
        fs::write(dir.path().join("file_a.txt"), "small").unwrap();
        fs::write(dir.path().join("file_b.rs"), "this is a much larger file").unwrap();
        let state = TreeState::with_options(
            dir.path(),
            TreeOptions {
                sort_by: SortBy::Size,
                ..TreeOptions::default()
            },
        )
        .unwrap();
        let files: Vec<&FlatItem> = state.flat_items.iter().filter(|i| !i.is_dir).collect();
        assert_eq!(files[0].path, dir.path().join("file_b.rs"));
        assert_eq!(files[1].path, dir.path().join("file_a.txt"));
    }

    #[test]
    fn expand_selected_loads_children() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.selected_index = 1; // alpha
        state.expand_selected();
        assert!(state.flat_items[1].is_expanded);
        assert!(state
            .find_index_by_path(&dir.path().join("alpha").join("inner.txt"))
            .is_some());
    }

    #[test]
    fn collapse_selected_on_file_jumps_to_parent() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.selected_index = 1;
        state.expand_selected();
        let inner = dir.path().join("alpha").join("inner.txt");
        state.select_path(&inner);
        state.collapse_selected();
        assert_eq!(state.selected_path().unwrap(), dir.path().join("alpha"));
    }

    #[test]
    fn collapse_selected_never_collapses_root() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.collapse_selected();
        assert!(state.root.is_expanded);
        assert_eq!(state.flat_items.len(), 5);
    }

    #[test]
    fn toggle_selected_expands_then_collapses() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.selected_index = 1;
        state.toggle_selected();
        assert!(state.flat_items[1].is_expanded);
        state.toggle_selected();
        assert!(!state.flat_items[1].is_expanded);
    }

    #[test]
    fn collapse_all_keeps_root_expanded() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.selected_index = 1;
        state.expand_selected();
        let nested = dir.path().join("alpha").join("nested");
        state.select_path(&nested);
        state.expand_selected();

        state.collapse_all();

        assert!(state.root.is_expanded);
        assert_eq!(state.expanded_paths().len(), 1);
        assert_eq!(state.flat_items.len(), 5);
        assert_eq!(state.selected_path().unwrap(), dir.path().join("alpha"));
    }

    #[test]
    fn refresh_is_idempotent() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.refresh_subtree(dir.path());
        let first = state.root.child_paths();
        state.refresh_subtree(dir.path());
        let second = state.root.child_paths();
        assert_eq!(first, second);
    }

    #[test]
    fn refresh_picks_up_new_entries_and_selects_node() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        let alpha = dir.path().join("alpha");
        File::create(alpha.join("fresh.txt")).unwrap();

        let refreshed = state.refresh_subtree(&alpha);

        assert_eq!(refreshed, alpha);
        assert_eq!(state.selected_path().unwrap(), alpha);
        let node = find_node(&state.root, &alpha).unwrap();
        assert!(node.is_expanded);
        assert!(node.child_paths().contains(&alpha.join("fresh.txt")));
    }

    #[test]
    fn refresh_under_collapsed_ancestor_reveals_node() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        let alpha = dir.path().join("alpha");
        let nested = alpha.join("nested");
        state.select_path(&alpha);
        state.expand_selected();
        state.collapse_selected();
        state.select_path(&dir.path().join("file_a.txt"));
        assert!(state.find_index_by_path(&nested).is_none());

        state.refresh_subtree(&nested);

        assert!(state.expanded_paths().contains(&alpha));
        assert_eq!(state.selected_path().unwrap(), nested);
    }

    #[test]
    fn refresh_of_unknown_path_refreshes_root() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        File::create(dir.path().join("late.txt")).unwrap();
        let refreshed = state.refresh_subtree(&dir.path().join("nowhere"));
        assert_eq!(refreshed, dir.path());
        assert!(state.root.child_paths().contains(&dir.path().join("late.txt")));
    }

    #[test]
    fn refresh_restores_expanded_descendants() {
        let dir = setup_test_dir();
        let deep_file = dir.path().join("alpha").join("nested").join("deep.txt");
        File::create(&deep_file).unwrap();

        let mut state = TreeState::new(dir.path()).unwrap();
        let alpha = dir.path().join("alpha");
        let nested = alpha.join("nested");
        state.select_path(&alpha);
        state.expand_selected();
        state.select_path(&nested);
        state.expand_selected();

        state.refresh_subtree(dir.path());

        assert!(state.expanded_paths().contains(&alpha));
        assert!(state.expanded_paths().contains(&nested));
        assert!(state.find_index_by_path(&deep_file).is_some());
    }

    #[test]
    fn refresh_drops_expansion_of_removed_directory() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        let alpha = dir.path().join("alpha");
        state.select_path(&alpha);
        state.expand_selected();
        fs::remove_dir_all(&alpha).unwrap();

        state.refresh_subtree(dir.path());

        assert!(find_node(&state.root, &alpha).is_none());
        assert!(!state.expanded_paths().contains(&alpha));
    }

    #[test]
    fn restore_order_is_parent_first() {
        let root = PathBuf::from("/tmp/root");
        let alpha = root.join("alpha");
        let nested = alpha.join("nested");
        let paths = vec![nested.clone(), alpha.clone()];
        let ordered: Vec<PathBuf> = TreeState::paths_in_restore_order(&paths)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(ordered, vec![alpha, nested]);
    }

    #[test]
    fn is_last_sibling_correctness() {
        let dir = setup_test_dir();
        let state = TreeState::new(dir.path()).unwrap();
        assert!(state.flat_items.last().unwrap().is_last_sibling);
        assert!(!state.flat_items[1].is_last_sibling);
    }

    #[test]
    fn select_path_or_ancestor_falls_back() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.select_path_or_ancestor(&dir.path().join("alpha").join("inner.txt"));
        assert_eq!(state.selected_path().unwrap(), dir.path().join("alpha"));
    }

    #[test]
    fn update_scroll_follows_selection() {
        let dir = setup_test_dir();
        let mut state = TreeState::new(dir.path()).unwrap();
        state.selected_index = 4;
        state.update_scroll(2);
        assert_eq!(state.scroll_offset, 3);
        state.selected_index = 0;
        state.update_scroll(2);
        assert_eq!(state.scroll_offset, 0);
    }
}
