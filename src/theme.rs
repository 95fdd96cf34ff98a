//! Theme colors, optionally taken from the Omarchy/Hyprland system theme
//! at ~/.config/omarchy/current/theme/kitty.conf

use ratatui::style::Color;
use std::collections::HashMap;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,       // Focused borders, key hints
    pub text: Color,
    pub text_dim: Color,     // Emails, hints
    pub chip_bg: Color,
    pub chip_fg: Color,
    pub chip_focus: Color,   // Chip clicked with the mouse
    pub chip_armed: Color,   // Chip waiting for a second Backspace
    pub avatar: Color,       // Person glyph in chips and rows
    pub row_selected: Color, // Highlighted dropdown row
    pub border: Color,
    pub danger: Color,       // Chip `x`
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(137, 180, 250),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            chip_bg: Color::Rgb(69, 71, 90),
            chip_fg: Color::Rgb(205, 214, 244),
            chip_focus: Color::Rgb(88, 91, 112),
            chip_armed: Color::Yellow,
            avatar: Color::Rgb(76, 175, 80), // #4CAF50
            row_selected: Color::Rgb(69, 71, 90),
            border: Color::Rgb(88, 91, 112),
            danger: Color::Rgb(243, 139, 168),
        }
    }
}

impl Theme {
    /// System theme if one is installed, defaults otherwise
    pub fn load() -> Self {
        Self::load_omarchy_theme().unwrap_or_default()
    }

    fn load_omarchy_theme() -> Option<Self> {
        let path = dirs::home_dir()?.join(".config/omarchy/current/theme/kitty.conf");
        let content = std::fs::read_to_string(&path).ok()?;
        let theme = Self::from_kitty_conf(&content);
        if theme.is_some() {
            tracing::debug!("Loaded theme from {}", path.display());
        }
        theme
    }

    /// Map kitty palette entries onto chip colors. Missing entries keep
    /// their defaults; a file with no colors at all yields `None`.
    fn from_kitty_conf(content: &str) -> Option<Self> {
        let colors = parse_kitty_conf(content);
        if colors.is_empty() {
            return None;
        }

        let pick = |keys: &[&str], fallback: Color| {
            keys.iter()
                .find_map(|k| colors.get(*k).copied())
                .unwrap_or(fallback)
        };

        let base = Self::default();
        Some(Self {
            accent: pick(&["color4", "color12"], base.accent),
            text: pick(&["foreground"], base.text),
            text_dim: pick(&["color8"], base.text_dim),
            chip_bg: pick(&["selection_background", "color0"], base.chip_bg),
            chip_fg: pick(&["selection_foreground", "foreground"], base.chip_fg),
            chip_focus: pick(&["active_border_color", "color8"], base.chip_focus),
            chip_armed: pick(&["color3", "color11"], base.chip_armed),
            avatar: pick(&["color2", "color10"], base.avatar),
            row_selected: pick(&["selection_background", "color0"], base.row_selected),
            border: pick(&["inactive_border_color", "color8"], base.border),
            danger: pick(&["color1", "color9"], base.danger),
        })
    }
}

/// Parse `key #hexcolor` lines, skipping comments and non-color values
fn parse_kitty_conf(content: &str) -> HashMap<String, Color> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once(char::is_whitespace)?;
            Some((key.to_string(), parse_hex_color(value)?))
        })
        .collect()
}

/// `#RRGGBB` or `#RGB`
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();

    match hex.len() {
        6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Some(Color::Rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
        _ => None,
    }
}
