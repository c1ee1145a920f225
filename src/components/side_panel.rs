use image::imageops::{self, FilterType};
use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::panel::{FileInfo, PreviewContent, SidePanel};
use crate::theme::ThemeColors;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "▀";
const TAB_WIDTH: usize = 4;

/// Renders whichever side panel is open; nothing for [`SidePanel::None`].
pub struct SidePanelWidget<'a> {
    panel: &'a SidePanel,
    theme: &'a ThemeColors,
}

impl<'a> SidePanelWidget<'a> {
    pub fn new(panel: &'a SidePanel, theme: &'a ThemeColors) -> Self {
        Self { panel, theme }
    }

    fn title(&self) -> String {
        let name = self
            .panel
            .target()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match self.panel {
            SidePanel::Info { .. } => format!(" Info: {} ", name),
            SidePanel::Preview { .. } => format!(" Preview: {} ", name),
            SidePanel::None => String::new(),
        }
    }

    fn render_info(&self, info: &FileInfo, area: Rect, buf: &mut Buffer) {
        let label_style = Style::default()
            .fg(self.theme.panel_label_fg)
            .add_modifier(Modifier::BOLD);
        let value_style = Style::default().fg(self.theme.panel_fg);

        for (row, text) in info.lines().iter().take(area.height as usize).enumerate() {
            let line = match text.split_once(": ") {
                Some((label, value)) => Line::from(vec![
                    Span::styled(format!("{}: ", label), label_style),
                    Span::styled(value.to_string(), value_style),
                ]),
                None => Line::from(Span::styled(text.clone(), value_style)),
            };
            buf.set_line(area.x, area.y + row as u16, &line, area.width);
        }
    }

    fn render_text(&self, text: &str, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.theme.panel_fg);
        let tab = " ".repeat(TAB_WIDTH);
        for (row, raw) in text.lines().take(area.height as usize).enumerate() {
            let line = Line::from(Span::styled(raw.replace('\t', &tab), style));
            buf.set_line(area.x, area.y + row as u16, &line, area.width);
        }
    }

    fn render_image(img: &RgbaImage, area: Rect, buf: &mut Buffer) {
        let Some(scaled) = fit_image(img, area.width as u32, area.height as u32 * 2) else {
            return;
        };
        let pixel = |x: u32, y: u32| {
            scaled.get_pixel_checked(x, y).map(|p| {
                let [r, g, b, _] = p.0;
                Color::Rgb(r, g, b)
            })
        };

        for cy in 0..scaled.height().div_ceil(2) {
            for cx in 0..scaled.width() {
                let Some(top) = pixel(cx, cy * 2) else {
                    continue;
                };
                let bottom = pixel(cx, cy * 2 + 1).unwrap_or(Color::Reset);
                if let Some(cell) = buf.cell_mut((area.x + cx as u16, area.y + cy as u16)) {
                    cell.set_symbol(HALF_BLOCK).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// Scale `img` to fit within `max_w` x `max_h` pixels keeping its aspect
/// ratio. Never upscales. `None` when either bound is zero.
pub fn fit_image(img: &RgbaImage, max_w: u32, max_h: u32) -> Option<RgbaImage> {
    let (w, h) = img.dimensions();
    if max_w == 0 || max_h == 0 || w == 0 || h == 0 {
        return None;
    }
    let scale = (max_w as f64 / w as f64)
        .min(max_h as f64 / h as f64)
        .min(1.0);
    let nw = ((w as f64 * scale).round() as u32).clamp(1, max_w);
    let nh = ((h as f64 * scale).round() as u32).clamp(1, max_h);
    if (nw, nh) == (w, h) {
        return Some(img.clone());
    }
    Some(imageops::resize(img, nw, nh, FilterType::Triangle))
}

impl Widget for SidePanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.panel.is_open() {
            return;
        }

        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_fg));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        match self.panel {
            SidePanel::Info { info, .. } => self.render_info(info, inner, buf),
            SidePanel::Preview { content, .. } => match content {
                PreviewContent::Directory => {}
                PreviewContent::Text(text) => self.render_text(text, inner, buf),
                PreviewContent::Image(img) => Self::render_image(img, inner, buf),
            },
            SidePanel::None => {}
        }
    }
}
