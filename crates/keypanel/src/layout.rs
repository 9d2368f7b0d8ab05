//! Keyboard layout table
//!
//! The panel is built from a static table of rows, each an ordered list of
//! key definitions. Sizes are given in layout units, the same units as the
//! 800x300 panel.
//!
//! ```text
//!  Esc F1  F2  F3  F4  F5  F6  F7  F8  F9  F10 F11 F12 Del ⌦      (special)
//!  `   1   2   3   4   5   6   7   8   9   0   -   =   Backspace
//!  Tab   Q   W   E   R   T   Y   U   I   O   P   [   ]   \
//!  Caps   A   S   D   F   G   H   J   K   L   ;   '   Enter
//!  Shift    Z   X   C   V   B   N   M   ,   .   /   Shift
//!  Ctrl Win Alt         Space          Alt  Fn  Ctrl
//! ```

use std::fmt;

/// Default minimum key width in layout units
pub const DEFAULT_KEY_WIDTH: u16 = 40;

/// Default minimum key height in layout units
pub const DEFAULT_KEY_HEIGHT: u16 = 40;

/// A single key of the layout table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    /// Printed label, also the identifier emitted when the key is activated
    pub label: String,
    /// Whether the key uses the darker special-key styling
    pub is_special: bool,
    /// Minimum width override (default 40)
    pub min_width: Option<u16>,
    /// Minimum height override (default 40)
    pub min_height: Option<u16>,
    /// Maximum height cap
    pub max_height: Option<u16>,
}

impl KeyDefinition {
    /// An ordinary key with default sizing
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_special: false,
            min_width: None,
            min_height: None,
            max_height: None,
        }
    }

    /// A key rendered with the special-key style
    pub fn special(label: impl Into<String>) -> Self {
        Self {
            is_special: true,
            ..Self::new(label)
        }
    }

    /// Override the minimum width
    pub fn with_min_width(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Override the minimum height
    pub fn with_min_height(mut self, height: u16) -> Self {
        self.min_height = Some(height);
        self
    }

    /// Cap the height
    pub fn with_max_height(mut self, height: u16) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Effective minimum width
    pub fn width(&self) -> u16 {
        self.min_width.unwrap_or(DEFAULT_KEY_WIDTH)
    }

    /// Effective minimum height
    pub fn height(&self) -> u16 {
        self.min_height.unwrap_or(DEFAULT_KEY_HEIGHT)
    }
}

/// Which logical row of the keyboard a row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Esc, F1-F12, Del
    Function,
    /// Number row
    Digits,
    /// Tab + QWERTY letters
    Qwerty,
    /// Caps + home letters + Enter
    Home,
    /// Shift + bottom letters + Shift
    Bottom,
    /// Ctrl/Win/Alt + Space
    Modifier,
}

impl RowKind {
    /// All row kinds in top-to-bottom order
    pub const ALL: [RowKind; 6] = [
        RowKind::Function,
        RowKind::Digits,
        RowKind::Qwerty,
        RowKind::Home,
        RowKind::Bottom,
        RowKind::Modifier,
    ];

    /// Short name used in listings
    pub fn name(&self) -> &'static str {
        match self {
            RowKind::Function => "function",
            RowKind::Digits => "digits",
            RowKind::Qwerty => "qwerty",
            RowKind::Home => "home",
            RowKind::Bottom => "bottom",
            RowKind::Modifier => "modifier",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A horizontal strip of keys, rendered left to right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub keys: Vec<KeyDefinition>,
}

impl Row {
    /// Sum of the minimum widths plus the spacing between keys
    pub fn min_width(&self, spacing: u16) -> u16 {
        let keys = self
            .keys
            .iter()
            .map(KeyDefinition::width)
            .fold(0u16, u16::saturating_add);
        let gap_count = u16::try_from(self.keys.len().saturating_sub(1)).unwrap_or(u16::MAX);
        keys.saturating_add(spacing.saturating_mul(gap_count))
    }
}

/// Ordered rows of the keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub rows: Vec<Row>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::standard()
    }
}

impl Layout {
    /// The built-in PC-style layout
    pub fn standard() -> Self {
        let rows = RowKind::ALL
            .iter()
            .map(|&kind| Row {
                kind,
                keys: standard_row(kind),
            })
            .collect();
        Self { rows }
    }

    /// Look up a row by kind
    pub fn row(&self, kind: RowKind) -> Option<&Row> {
        self.rows.iter().find(|r| r.kind == kind)
    }

    /// Iterate over every key, top row first
    pub fn keys(&self) -> impl Iterator<Item = &KeyDefinition> {
        self.rows.iter().flat_map(|r| r.keys.iter())
    }

    /// Total number of keys
    pub fn key_count(&self) -> usize {
        self.rows.iter().map(|r| r.keys.len()).sum()
    }
}

fn standard_row(kind: RowKind) -> Vec<KeyDefinition> {
    match kind {
        RowKind::Function => [
            "Esc", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
            "Del", "⌦",
        ]
        .into_iter()
        .map(KeyDefinition::special)
        .collect(),

        RowKind::Digits => [
            "`", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "Backspace",
        ]
        .into_iter()
        .map(|label| match label {
            "Backspace" => KeyDefinition::new(label).with_min_width(90),
            _ => KeyDefinition::new(label),
        })
        .collect(),

        RowKind::Qwerty => [
            "Tab", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "[", "]", "\\",
        ]
        .into_iter()
        .map(|label| match label {
            "Tab" => KeyDefinition::new(label).with_min_width(60),
            "\\" => KeyDefinition::new(label).with_min_width(70),
            _ => KeyDefinition::new(label),
        })
        .collect(),

        RowKind::Home => [
            "Caps", "A", "S", "D", "F", "G", "H", "J", "K", "L", ";", "'", "Enter",
        ]
        .into_iter()
        .map(|label| match label {
            "Caps" => KeyDefinition::new(label).with_min_width(70),
            "Enter" => KeyDefinition::new(label).with_min_width(110),
            _ => KeyDefinition::new(label),
        })
        .collect(),

        RowKind::Bottom => {
            let labels = ["Shift", "Z", "X", "C", "V", "B", "N", "M", ",", ".", "/", "Shift"];
            let last = labels.len() - 1;
            labels
                .into_iter()
                .enumerate()
                .map(|(i, label)| match (label, i) {
                    ("Shift", 0) => KeyDefinition::new(label).with_min_width(90),
                    ("Shift", i) if i == last => KeyDefinition::new(label).with_min_width(140),
                    _ => KeyDefinition::new(label),
                })
                .collect()
        }

        RowKind::Modifier => ["Ctrl", "Win", "Alt", "Space", "Alt", "Fn", "Ctrl"]
            .into_iter()
            .map(|label| match label {
                "Space" => KeyDefinition::new(label).with_min_width(340),
                _ => KeyDefinition::new(label).with_min_width(60).with_max_height(30),
            })
            .collect(),
    }
}
