use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::error::Result;
use crate::fs::clipboard::{ClipboardState, MarkSlot, TransferKind};
use crate::fs::operations::{MutationCoordinator, TransferOutcome};
use crate::fs::shell::ShellStatus;
use crate::fs::tree::TreeState;
use crate::panel::SidePanel;
use crate::theme::{resolve_theme, ThemeColors};

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// Name prompt; a trailing `/` creates a directory.
    Create,
    DeleteConfirm { target: PathBuf },
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
}

/// State for a dialog's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    /// Byte offset into `input`, always on a char boundary.
    pub cursor_position: usize,
}

/// Main application state: the browsing session.
pub struct App {
    pub tree_state: TreeState,
    pub panel: SidePanel,
    pub clipboard: ClipboardState,
    pub coordinator: MutationCoordinator,
    pub should_quit: bool,
    pub mode: AppMode,
    pub dialog_state: DialogState,
    pub status_message: Option<(String, Instant)>,
    pub confirm_delete: bool,
    pub open_command: String,
    /// Path waiting to be opened by the event loop, which owns the terminal.
    pub pending_open: Option<PathBuf>,
    pub theme: ThemeColors,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl App {
    /// Create a new App rooted at the given path.
    pub fn new(path: &Path, config: &AppConfig) -> Result<Self> {
        let tree_state = TreeState::with_options(path, config.tree_options())?;
        tracing::info!(root = %path.display(), "session started");
        Ok(Self {
            tree_state,
            panel: SidePanel::default(),
            clipboard: ClipboardState::new(),
            coordinator: MutationCoordinator::default(),
            should_quit: false,
            mode: AppMode::Normal,
            dialog_state: DialogState::default(),
            status_message: None,
            confirm_delete: config.confirm_delete(),
            open_command: config.open_command().to_string(),
            pending_open: None,
            theme: resolve_theme(config.theme_scheme()),
        })
    }

    // ── Dialogs ─────────────────────────────────────────────────────────────

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    /// Insert a character at the current cursor position.
    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn dialog_delete_char(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(prev) = self.dialog_state.input[..pos].chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
            self.dialog_state
                .input
                .remove(self.dialog_state.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn dialog_move_cursor_left(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(prev) = self.dialog_state.input[..pos].chars().next_back() {
            self.dialog_state.cursor_position -= prev.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn dialog_move_cursor_right(&mut self) {
        let pos = self.dialog_state.cursor_position;
        if let Some(next) = self.dialog_state.input[pos..].chars().next() {
            self.dialog_state.cursor_position += next.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message once it has been shown long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    // ── Structural operations ───────────────────────────────────────────────

    /// Create the entry named in the dialog input, then close the dialog.
    pub fn submit_create(&mut self) {
        let name = self.dialog_state.input.clone();
        self.close_dialog();
        self.panel.close();

        match self.coordinator.create(&mut self.tree_state, &name) {
            Ok(path) => {
                if path.exists() {
                    self.set_status_message(format!("Created {}", display_name(&path)));
                } else {
                    self.set_status_message(format!("Could not create {}", display_name(&path)));
                }
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    /// Delete the selection, asking first when configured to.
    pub fn request_delete(&mut self) {
        let Some(target) = self.tree_state.selected_path() else {
            return;
        };
        if self.tree_state.root_selected() {
            self.set_status_message("The root cannot be deleted".to_string());
            return;
        }
        if self.confirm_delete {
            self.open_dialog(DialogKind::DeleteConfirm { target });
        } else {
            self.delete_selected();
        }
    }

    /// Answer to the delete confirmation dialog.
    pub fn confirm_delete_dialog(&mut self, accepted: bool) {
        self.close_dialog();
        if accepted {
            self.delete_selected();
        }
    }

    fn delete_selected(&mut self) {
        if let Some(target) = self.coordinator.delete(&mut self.tree_state) {
            self.panel.close_if_under(&target);
            if target.exists() {
                self.set_status_message(format!("Could not delete {}", display_name(&target)));
            } else {
                self.set_status_message(format!("Deleted {}", display_name(&target)));
            }
        }
    }

    /// Stage the selection as the source (first mark) or destination (later
    /// marks) of a move or copy.
    pub fn mark(&mut self, kind: TransferKind) {
        let Some(path) = self.tree_state.selected_path() else {
            return;
        };
        let fills_source = self.clipboard.pending(kind).source.is_none();
        if kind == TransferKind::Move && fills_source && path == self.tree_state.root.path {
            self.set_status_message("The root cannot be moved".to_string());
            return;
        }
        let slot = self.clipboard.pending_mut(kind).mark(path.clone());
        let msg = match slot {
            MarkSlot::Source => format!("Marked {} to {}", display_name(&path), kind.label()),
            MarkSlot::Destination => format!("{} destination: {}", kind.label(), path.display()),
        };
        self.set_status_message(msg);
    }

    /// Commit the staged move or copy.
    pub fn commit(&mut self, kind: TransferKind) {
        let pending = self.clipboard.pending_mut(kind);
        let outcome = self
            .coordinator
            .commit(&mut self.tree_state, pending, kind);

        let msg = match outcome {
            TransferOutcome::Incomplete => format!("Nothing staged to {}", kind.label()),
            TransferOutcome::InvalidDestination(dest) => {
                format!("{} is not a directory", dest.display())
            }
            TransferOutcome::RootProtected => "The root cannot be moved".to_string(),
            TransferOutcome::Committed {
                source,
                destination,
                status,
            } => {
                if kind == TransferKind::Move {
                    self.panel.close_if_under(&source);
                }
                let verb = match kind {
                    TransferKind::Move => "Moved",
                    TransferKind::Copy => "Copied",
                };
                if status.success() {
                    format!("{} {} to {}", verb, display_name(&source), destination.display())
                } else {
                    format!("Could not {} {}", kind.label(), display_name(&source))
                }
            }
        };
        self.set_status_message(msg);
    }

    /// Discard every staged transfer.
    pub fn clear_staging(&mut self) {
        if !self.clipboard.is_empty() {
            self.clipboard.clear();
            self.set_status_message("Staging cleared".to_string());
        }
    }

    // ── Side panel ──────────────────────────────────────────────────────────

    pub fn toggle_info(&mut self) {
        if let Some(path) = self.tree_state.selected_path() {
            self.panel.show_info(&path);
        }
    }

    pub fn toggle_preview(&mut self) {
        if let Some(path) = self.tree_state.selected_path() {
            let root = self.tree_state.root.path.clone();
            self.panel.show_preview(&path, &root);
        }
    }

    // ── Open with ───────────────────────────────────────────────────────────

    /// Queue the selection for the external open command. A blank command
    /// template does nothing.
    pub fn request_open(&mut self) {
        if self.open_command.trim().is_empty() {
            return;
        }
        self.pending_open = self.tree_state.selected_path();
    }

    /// Record how the external open command finished.
    pub fn finish_open(&mut self, path: &Path, status: ShellStatus) {
        match status {
            ShellStatus::Success => {}
            ShellStatus::Failed(code) => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                self.set_status_message(format!(
                    "Open command failed for {} ({})",
                    display_name(path),
                    code
                ));
            }
            ShellStatus::SpawnFailed => {
                self.set_status_message(format!("Could not run `{}`", self.open_command));
            }
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.tree_state.flat_items.len();
        if len > 0 && self.tree_state.selected_index < len - 1 {
            self.tree_state.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.tree_state.selected_index > 0 {
            self.tree_state.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.tree_state.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.tree_state.flat_items.len();
        if len > 0 {
            self.tree_state.selected_index = len - 1;
        }
    }

    pub fn expand_selected(&mut self) {
        self.tree_state.expand_selected();
    }

    /// Collapse the selected directory, or jump to parent.
    pub fn collapse_selected(&mut self) {
        self.tree_state.collapse_selected();
    }

    pub fn toggle_selected(&mut self) {
        self.tree_state.toggle_selected();
    }

    pub fn collapse_all(&mut self) {
        self.tree_state.collapse_all();
    }

    pub fn toggle_hidden(&mut self) {
        self.tree_state.toggle_hidden();
        let state = if self.tree_state.show_hidden {
            "shown"
        } else {
            "hidden"
        };
        self.set_status_message(format!("Hidden files {}", state));
    }

    pub fn cycle_sort(&mut self) {
        self.tree_state.cycle_sort();
        self.set_status_message(format!("Sort: {}", self.tree_state.sort_by.label()));
    }
}
