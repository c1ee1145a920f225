use std::path::PathBuf;

/// The kind of staged transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Move,
    Copy,
}

impl TransferKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransferKind::Move => "move",
            TransferKind::Copy => "copy",
        }
    }
}

/// Which slot a mark filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkSlot {
    Source,
    Destination,
}

/// A staged `(source, destination)` pair for a move or copy.
///
/// Set by mark actions, consumed by the matching commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingTransfer {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
}

impl PendingTransfer {
    /// Fill the source slot if empty, otherwise (re)set the destination.
    pub fn mark(&mut self, path: PathBuf) -> MarkSlot {
        if self.source.is_none() {
            self.source = Some(path);
            MarkSlot::Source
        } else {
            self.destination = Some(path);
            MarkSlot::Destination
        }
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.destination = None;
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.destination.is_none()
    }

    /// Whether both slots are filled.
    pub fn is_ready(&self) -> bool {
        self.source.is_some() && self.destination.is_some()
    }

    /// Take the pair if both slots are filled, clearing it. An incomplete
    /// pair is left in place and `None` is returned.
    pub fn take_ready(&mut self) -> Option<(PathBuf, PathBuf)> {
        if !self.is_ready() {
            return None;
        }
        let source = self.source.take()?;
        let destination = self.destination.take()?;
        Some((source, destination))
    }
}

/// Both staging slots of a session.
#[derive(Debug, Clone, Default)]
pub struct ClipboardState {
    pub moves: PendingTransfer,
    pub copies: PendingTransfer,
}

impl ClipboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self, kind: TransferKind) -> &PendingTransfer {
        match kind {
            TransferKind::Move => &self.moves,
            TransferKind::Copy => &self.copies,
        }
    }

    pub fn pending_mut(&mut self, kind: TransferKind) -> &mut PendingTransfer {
        match kind {
            TransferKind::Move => &mut self.moves,
            TransferKind::Copy => &mut self.copies,
        }
    }

    /// Discard every staged transfer.
    pub fn clear(&mut self) {
        self.moves.clear();
        self.copies.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.copies.is_empty()
    }

    /// Short description of staged transfers for the status bar.
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<String> = [TransferKind::Move, TransferKind::Copy]
            .into_iter()
            .filter_map(|kind| {
                let pending = self.pending(kind);
                let source = pending.source.as_ref()?;
                let name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| source.to_string_lossy().to_string());
                let arrow = match &pending.destination {
                    Some(dest) => format!(" → {}", dest.display()),
                    None => " → ?".to_string(),
                };
                Some(format!("{} {}{}", kind.label(), name, arrow))
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}
