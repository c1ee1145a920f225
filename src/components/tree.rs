use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::tree::{FlatItem, TreeState};
use crate::theme::ThemeColors;

/// Tree widget that renders the flattened tree with box-drawing guides.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_state: &'a TreeState, theme: &'a ThemeColors) -> Self {
        Self {
            tree_state,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Guide prefix for `items[index]`: a continuation bar for every
    /// ancestor level that still has siblings below, then this row's
    /// connector.
    fn build_prefix(items: &[FlatItem], index: usize) -> String {
        let item = &items[index];
        if item.depth == 0 {
            return String::new();
        }

        let mut prefix = String::new();
        for level in 1..item.depth {
            // Nearest row above at `level` is this row's ancestor there.
            let ancestor_is_last = items[..index]
                .iter()
                .rev()
                .take_while(|row| row.depth >= level)
                .find(|row| row.depth == level)
                .is_some_and(|row| row.is_last_sibling);
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if item.is_last_sibling { "└── " } else { "├── " });
        prefix
    }

    fn item_style(&self, item: &FlatItem, is_selected: bool) -> Style {
        if is_selected {
            Style::default()
                .bg(self.theme.tree_selected_bg)
                .fg(self.theme.tree_selected_fg)
                .add_modifier(Modifier::BOLD)
        } else if item.is_hidden {
            Style::default().fg(self.theme.tree_hidden_fg)
        } else if item.is_dir && item.is_expanded {
            Style::default()
                .fg(self.theme.tree_dir_fg)
                .add_modifier(Modifier::BOLD)
        } else if item.is_dir {
            Style::default().fg(self.theme.tree_dir_fg)
        } else {
            Style::default().fg(self.theme.tree_fg)
        }
    }
}

impl Widget for TreeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let items = &self.tree_state.flat_items;
        let visible_height = inner_area.height as usize;
        if items.is_empty() || visible_height == 0 {
            return;
        }

        let guide_style = Style::default().fg(self.theme.tree_guide_fg);
        let rows = items
            .iter()
            .enumerate()
            .skip(self.tree_state.scroll_offset)
            .take(visible_height);

        for (row, (idx, item)) in rows.enumerate() {
            let y = inner_area.y + row as u16;
            let style = self.item_style(item, idx == self.tree_state.selected_index);
            let line = Line::from(vec![
                Span::styled(Self::build_prefix(items, idx), guide_style),
                Span::styled(item.label.as_str(), style),
            ]);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
