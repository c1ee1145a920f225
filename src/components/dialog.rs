use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    fn frame(&self, title: &str, width: u16, height: u16, area: Rect, buf: &mut Buffer) -> Rect {
        let rect = Self::centered_rect(width, height, area);
        Clear.render(rect, buf);

        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);
        inner
    }

    fn render_hint(&self, hint: &str, inner: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);
        buf.set_line(
            inner.x,
            inner.y + inner.height - 1,
            &Line::from(Span::styled(hint, style)),
            inner.width,
        );
    }

    fn render_create(&self, area: Rect, buf: &mut Buffer) {
        let width = 50.min(area.width.saturating_sub(4));
        let inner = self.frame("New entry", width, 6, area, buf);
        if inner.height < 3 || inner.width == 0 {
            return;
        }

        let help = Line::from(Span::styled(
            "Name (end with / for a folder):",
            Style::default().fg(self.theme.panel_fg),
        ));
        buf.set_line(inner.x, inner.y, &help, inner.width);

        let input_line = input_line(self.dialog_state, inner.width as usize, self.theme);
        buf.set_line(inner.x, inner.y + 1, &input_line, inner.width);

        self.render_hint("[Enter] Create  [Esc] Cancel", inner, buf);
    }

    fn render_delete_confirm(&self, target: &Path, area: Rect, buf: &mut Buffer) {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| target.display().to_string());
        let width = (name.chars().count() as u16 + 12)
            .max(36)
            .min(area.width.saturating_sub(4));
        let inner = self.frame("Delete", width, 5, area, buf);
        if inner.height < 2 || inner.width == 0 {
            return;
        }

        let question = Line::from(vec![
            Span::styled("Delete ", Style::default().fg(self.theme.warning_fg)),
            Span::styled(
                name,
                Style::default()
                    .fg(self.theme.error_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("?", Style::default().fg(self.theme.warning_fg)),
        ]);
        buf.set_line(inner.x, inner.y, &question, inner.width);

        self.render_hint("[y] Yes  [n/Esc] Cancel", inner, buf);
    }
}

/// The input text with a block cursor, scrolled so the cursor stays visible.
fn input_line<'a>(state: &'a DialogState, max_width: usize, theme: &ThemeColors) -> Line<'a> {
    let input = state.input.as_str();
    let pos = state.cursor_position.min(input.len());
    let (before, rest) = input.split_at(pos);
    let mut rest_chars = rest.chars();
    let cursor_char = rest_chars.next().map(String::from).unwrap_or_else(|| " ".into());
    let after = rest_chars.as_str();

    let keep = max_width.saturating_sub(1);
    let before_len = before.chars().count();
    let before_display = if before_len > keep {
        let skip = before_len - keep;
        before.char_indices().nth(skip).map_or("", |(i, _)| &before[i..])
    } else {
        before
    };

    let input_style = Style::default().fg(theme.panel_fg);
    let cursor_style = Style::default()
        .bg(theme.panel_fg)
        .fg(theme.dialog_bg)
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled(before_display, input_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after, input_style),
    ])
}

impl Widget for DialogWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let AppMode::Dialog(kind) = self.mode else {
            return;
        };

        match kind {
            DialogKind::Create => self.render_create(area, buf),
            DialogKind::DeleteConfirm { target } => self.render_delete_confirm(target, area, buf),
        }
    }
}
