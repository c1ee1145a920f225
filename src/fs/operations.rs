//! Structural mutations: run the external command, then re-derive the
//! affected subtrees from disk.
//!
//! The exit status of a command never changes which subtrees are refreshed.
//! Failures are logged and the refresh shows whatever the filesystem holds.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::fs::clipboard::{PendingTransfer, TransferKind};
use crate::fs::index::{containing_dir, resolve_node};
use crate::fs::shell::{Shell, ShellStatus, SystemShell};
use crate::fs::tree::TreeState;

/// Outcome of committing a staged move or copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Source or destination not staged yet; nothing was consumed.
    Incomplete,
    /// Destination is not an existing directory; the pair was discarded.
    InvalidDestination(PathBuf),
    /// The root was staged as a move source; the pair was discarded.
    RootProtected,
    /// The command ran and the affected subtrees were refreshed.
    Committed {
        source: PathBuf,
        destination: PathBuf,
        status: ShellStatus,
    },
}

/// Orchestrates create/delete/move/copy against a [`TreeState`].
pub struct MutationCoordinator<S: Shell = SystemShell> {
    shell: S,
}

impl Default for MutationCoordinator<SystemShell> {
    fn default() -> Self {
        Self::new(SystemShell)
    }
}

impl<S: Shell> MutationCoordinator<S> {
    pub fn new(shell: S) -> Self {
        Self { shell }
    }

    #[cfg(test)]
    pub fn shell(&self) -> &S {
        &self.shell
    }

    fn run(&self, program: &str, args: &[&OsStr]) -> ShellStatus {
        let status = self.shell.execute(program, args);
        if !status.success() {
            tracing::warn!(program, ?args, ?status, "command did not succeed");
        }
        status
    }

    /// Directory new entries are created in: the selection if it is a
    /// directory, otherwise the directory containing it.
    pub fn create_target_dir(tree: &TreeState) -> PathBuf {
        match tree.selected_item() {
            Some(item) if item.is_dir => item.path.clone(),
            Some(item) => containing_dir(&tree.root, &item.path).path,
            None => tree.root.path.clone(),
        }
    }

    /// Create `name` in the target directory: a directory when the name ends
    /// with `/`, an empty file otherwise. Returns the path of the new entry.
    pub fn create(&self, tree: &mut TreeState, name: &str) -> Result<PathBuf> {
        // Leading separators stay inside the target directory.
        let relative = name.trim_start_matches('/');
        if relative.trim_end_matches('/').is_empty() {
            return Err(AppError::InvalidName("name is empty".into()));
        }

        let target_dir = Self::create_target_dir(tree);
        let path = target_dir.join(relative);
        let status = if relative.ends_with('/') {
            self.run("mkdir", &[path.as_os_str()])
        } else {
            self.run("touch", &[path.as_os_str()])
        };
        tracing::info!(path = %path.display(), ?status, "create");

        tree.refresh_subtree(&target_dir);
        Ok(target_dir.join(relative.trim_end_matches('/')))
    }

    /// Recursively remove the selected entry and refresh its parent, which
    /// becomes the selection. The root is never removed.
    pub fn delete(&self, tree: &mut TreeState) -> Option<PathBuf> {
        let target = tree.selected_path()?;
        if target == tree.root.path {
            return None;
        }

        let status = self.run("rm", &[OsStr::new("-rf"), target.as_os_str()]);
        tracing::info!(path = %target.display(), ?status, "delete");

        let parent = containing_dir(&tree.root, &target);
        if parent.stale {
            tracing::debug!(path = %target.display(), "parent not in tree, refreshing root");
        }
        tree.refresh_subtree(&parent.path);
        Some(target)
    }

    /// Commit a staged transfer of the given kind.
    ///
    /// A complete pair is consumed whether or not the command is run.
    pub fn commit(
        &self,
        tree: &mut TreeState,
        pending: &mut PendingTransfer,
        kind: TransferKind,
    ) -> TransferOutcome {
        let Some((source, destination)) = pending.take_ready() else {
            return TransferOutcome::Incomplete;
        };
        if !destination.is_dir() {
            tracing::info!(
                destination = %destination.display(),
                kind = kind.label(),
                "destination is not a directory, discarding staged transfer"
            );
            return TransferOutcome::InvalidDestination(destination);
        }

        match kind {
            TransferKind::Move => self.commit_move(tree, source, destination),
            TransferKind::Copy => self.commit_copy(tree, source, destination),
        }
    }

    fn commit_move(
        &self,
        tree: &mut TreeState,
        source: PathBuf,
        destination: PathBuf,
    ) -> TransferOutcome {
        if source == tree.root.path {
            return TransferOutcome::RootProtected;
        }

        let status = self.run("mv", &[source.as_os_str(), destination.as_os_str()]);
        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            ?status,
            "move"
        );

        // Source parent first, so a destination below it is not rebuilt
        // collapsed after being refreshed.
        let former_parent = containing_dir(&tree.root, &source);
        tree.refresh_subtree(&former_parent.path);
        self.refresh_destination(tree, &destination);

        TransferOutcome::Committed {
            source,
            destination,
            status,
        }
    }

    fn commit_copy(
        &self,
        tree: &mut TreeState,
        source: PathBuf,
        destination: PathBuf,
    ) -> TransferOutcome {
        let status = self.run(
            "cp",
            &[OsStr::new("-r"), source.as_os_str(), destination.as_os_str()],
        );
        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            ?status,
            "copy"
        );

        self.refresh_destination(tree, &destination);

        TransferOutcome::Committed {
            source,
            destination,
            status,
        }
    }

    fn refresh_destination(&self, tree: &mut TreeState, destination: &Path) {
        let target = resolve_node(&tree.root, destination);
        if target.stale {
            tracing::debug!(
                destination = %destination.display(),
                "destination not in tree, refreshing root"
            );
        }
        tree.refresh_subtree(&target.path);
    }
}
