use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " a:new d:del m/M:move y/P:copy i:info p:preview q:quit ";

/// Status bar: selected path, staged transfers and key hints, or a
/// transient status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    staged: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            theme,
            status_message: None,
            staged: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }

    pub fn staged(mut self, summary: &'a str) -> Self {
        self.staged = Some(summary);
        self
    }
}

/// Keep the last `budget` chars of `s`, marking the cut with `...`.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().skip(len - budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{}", tail)
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        buf.set_style(area, base);

        if let Some(msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {}", msg),
                base.fg(self.theme.accent_fg),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let hints_len = KEY_HINTS.chars().count();
        let staged = self.staged.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let path_budget = width
            .saturating_sub(hints_len)
            .saturating_sub(staged.chars().count())
            .saturating_sub(1);
        let path_display = format!(" {}", truncate_left(self.path_str, path_budget));

        let used = path_display.chars().count() + staged.chars().count();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);

        let line = Line::from(vec![
            Span::styled(path_display, base),
            Span::styled(
                staged,
                base.fg(self.theme.status_staged_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ".repeat(pad), base),
            Span::styled(KEY_HINTS, base.fg(self.theme.dim_fg)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
