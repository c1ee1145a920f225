use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::dialog::DialogWidget;
use crate::components::side_panel::SidePanelWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let main_area = if app.panel.is_open() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[0]);
        frame.render_widget(SidePanelWidget::new(&app.panel, &app.theme), cols[1]);
        cols[0]
    } else {
        rows[0]
    };

    // Keep the selected row visible inside the bordered tree.
    let visible_height = main_area.height.saturating_sub(2) as usize;
    app.tree_state.update_scroll(visible_height);

    let block = Block::default()
        .title(format!(" {} ", app.tree_state.root.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    frame.render_widget(
        TreeWidget::new(&app.tree_state, &app.theme).block(block),
        main_area,
    );

    let path_str = app
        .tree_state
        .selected_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let staged = app.clipboard.summary();
    let mut status_bar = StatusBarWidget::new(&path_str, &app.theme);
    if let Some((msg, _)) = &app.status_message {
        status_bar = status_bar.status_message(msg);
    }
    if let Some(summary) = &staged {
        status_bar = status_bar.staged(summary);
    }
    frame.render_widget(status_bar, rows[1]);

    if matches!(app.mode, AppMode::Dialog(_)) {
        frame.render_widget(
            DialogWidget::new(&app.mode, &app.dialog_state, &app.theme),
            area,
        );
    }
}
