use ratatui::style::Color;

use crate::model::{Indicator, ProgressState, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    /// In-progress indicator
    pub amber: Color,
    /// Complete indicator
    pub green: Color,
    pub purple: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x14, 0x1A, 0x12),
            text: Color::Rgb(0xD8, 0xCF, 0xB0),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x6F, 0xC2, 0xFF),
            dim: Color::Rgb(0x7A, 0x7A, 0x6A),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            amber: Color::Rgb(0xFF, 0xC1, 0x07),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            selection_bg: Color::Rgb(0x2A, 0x33, 0x24),
            selection_border: Color::Rgb(0x6F, 0xC2, 0xFF),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x14, 0x1A, 0x12),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from `[ui.colors]`, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "amber" | "yellow" => theme.amber = color,
                "green" => theme.green = color,
                "purple" => theme.purple = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                _ => tracing::warn!(key = %key, "unknown color name"),
            }
        }

        theme
    }

    /// Color for a progress indicator. Hidden draws in the dim color.
    pub fn indicator_color(&self, indicator: Indicator) -> Color {
        match indicator {
            Indicator::Hidden => self.dim,
            Indicator::Amber => self.amber,
            Indicator::Green => self.green,
        }
    }

    pub fn state_color(&self, state: ProgressState) -> Color {
        match state {
            ProgressState::Unknown => self.text,
            _ => self.indicator_color(state.indicator()),
        }
    }
}
