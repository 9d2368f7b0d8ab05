//! Static style rules for keys
//!
//! Each button carries a [`KeyStyle`] tag; the style sheet maps the tag and the
//! pressed state to colors once, at draw time.

use ratatui::style::{Color, Modifier, Style};

/// Panel background (`#e0e0e0`)
pub const PANEL_BACKGROUND: Color = Color::Rgb(0xe0, 0xe0, 0xe0);
/// Ordinary key background
pub const KEY_BACKGROUND: Color = Color::White;
/// Special key background (`#d0d0d0`)
pub const SPECIAL_KEY_BACKGROUND: Color = Color::Rgb(0xd0, 0xd0, 0xd0);
/// Pressed key background (`#a0a0a0`)
pub const PRESSED_KEY_BACKGROUND: Color = Color::Rgb(0xa0, 0xa0, 0xa0);
/// Key border (`#808080`)
pub const KEY_BORDER: Color = Color::Rgb(0x80, 0x80, 0x80);
/// Label text
pub const KEY_TEXT: Color = Color::Black;

/// Visual tag attached to each button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyStyle {
    #[default]
    Normal,
    /// Darker background: function row and delete keys
    Special,
}

impl KeyStyle {
    pub fn from_special(is_special: bool) -> Self {
        if is_special {
            KeyStyle::Special
        } else {
            KeyStyle::Normal
        }
    }
}

/// Resolved colors for the whole panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSheet {
    pub background: Color,
    pub key: Color,
    pub special_key: Color,
    pub pressed_key: Color,
    pub border: Color,
    pub text: Color,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            background: PANEL_BACKGROUND,
            key: KEY_BACKGROUND,
            special_key: SPECIAL_KEY_BACKGROUND,
            pressed_key: PRESSED_KEY_BACKGROUND,
            border: KEY_BORDER,
            text: KEY_TEXT,
        }
    }
}

impl StyleSheet {
    /// Background color for a key; the pressed rule wins over the style tag
    pub fn key_background(&self, style: KeyStyle, pressed: bool) -> Color {
        match (style, pressed) {
            (_, true) => self.pressed_key,
            (KeyStyle::Special, false) => self.special_key,
            (KeyStyle::Normal, false) => self.key,
        }
    }

    /// Full ratatui style for a key face
    pub fn key(&self, style: KeyStyle, pressed: bool) -> Style {
        let base = Style::default()
            .fg(self.text)
            .bg(self.key_background(style, pressed));
        if pressed {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        }
    }

    /// Style of the panel surface and its frame
    pub fn panel(&self) -> Style {
        Style::default().fg(self.border).bg(self.background)
    }
}
