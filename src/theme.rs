//! Built-in color palettes and their resolution from the `[theme]` scheme.

use ratatui::style::Color;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree
    pub tree_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_hidden_fg: Color,
    pub tree_guide_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,

    // Side panel
    pub panel_fg: Color,
    pub panel_label_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,
    pub status_staged_fg: Color,

    // Chrome
    pub border_fg: Color,
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    pub error_fg: Color,
    pub warning_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme (Gruvbox dark).
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(235, 219, 178),          // #ebdbb2 fg
        tree_dir_fg: Color::Rgb(131, 165, 152),      // #83a598 blue
        tree_hidden_fg: Color::Rgb(146, 131, 116),   // #928374 gray
        tree_guide_fg: Color::Rgb(102, 92, 84),      // #665c54 bg3
        tree_selected_bg: Color::Rgb(80, 73, 69),    // #504945 bg2
        tree_selected_fg: Color::Rgb(251, 241, 199), // #fbf1c7 fg0

        panel_fg: Color::Rgb(235, 219, 178),
        panel_label_fg: Color::Rgb(250, 189, 47), // #fabd2f yellow

        status_bg: Color::Rgb(60, 56, 54), // #3c3836 bg1
        status_fg: Color::Rgb(213, 196, 161),
        status_staged_fg: Color::Rgb(184, 187, 38), // #b8bb26 green

        border_fg: Color::Rgb(102, 92, 84),
        dialog_bg: Color::Rgb(50, 48, 47), // #32302f bg0_s
        dialog_border_fg: Color::Rgb(131, 165, 152),

        error_fg: Color::Rgb(251, 73, 52),    // #fb4934 red
        warning_fg: Color::Rgb(254, 128, 25), // #fe8019 orange
        accent_fg: Color::Rgb(211, 134, 155), // #d3869b purple
        dim_fg: Color::Rgb(146, 131, 116),
    }
}

/// Light theme (Gruvbox light).
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(60, 56, 54),             // #3c3836 fg
        tree_dir_fg: Color::Rgb(7, 102, 120),        // #076678 blue
        tree_hidden_fg: Color::Rgb(146, 131, 116),   // #928374 gray
        tree_guide_fg: Color::Rgb(189, 174, 147),    // #bdae93 bg3
        tree_selected_bg: Color::Rgb(213, 196, 161), // #d5c4a1 bg2
        tree_selected_fg: Color::Rgb(40, 40, 40),    // #282828 fg0

        panel_fg: Color::Rgb(60, 56, 54),
        panel_label_fg: Color::Rgb(181, 118, 20), // #b57614 yellow

        status_bg: Color::Rgb(235, 219, 178), // #ebdbb2 bg1
        status_fg: Color::Rgb(80, 73, 69),
        status_staged_fg: Color::Rgb(121, 116, 14), // #79740e green

        border_fg: Color::Rgb(189, 174, 147),
        dialog_bg: Color::Rgb(242, 229, 188), // #f2e5bc bg0_s
        dialog_border_fg: Color::Rgb(7, 102, 120),

        error_fg: Color::Rgb(157, 0, 6),      // #9d0006 red
        warning_fg: Color::Rgb(175, 58, 3),   // #af3a03 orange
        accent_fg: Color::Rgb(143, 63, 113),  // #8f3f71 purple
        dim_fg: Color::Rgb(146, 131, 116),
    }
}

/// Resolve a scheme name. Unknown names fall back to dark.
pub fn resolve_theme(scheme: &str) -> ThemeColors {
    match scheme {
        "light" => light_theme(),
        "dark" => dark_theme(),
        other => {
            tracing::warn!(scheme = other, "unknown theme scheme, using dark");
            dark_theme()
        }
    }
}
