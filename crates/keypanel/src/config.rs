//! Configuration file support for keypanel
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/keypanel/config.toml`
//! - macOS: `~/Library/Application Support/keypanel/config.toml`
//! - Windows: `%APPDATA%\keypanel\config.toml`

use crate::error::{Error, Result};
use crate::panel::KeyboardPanel;
use crate::screen::CellScale;
use crate::style::StyleSheet;
use directories::ProjectDirs;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r##"# keypanel configuration file

[theme]
# Colors: a name ("white", "dark_gray", ...) or "#rrggbb"
background = "#e0e0e0"
key = "white"
special_key = "#d0d0d0"
pressed_key = "#a0a0a0"
border = "#808080"
text = "black"

[display]
# Layout units covered by one terminal cell.
# The panel is 800x300 units; the defaults draw it as 80x20 cells.
units_per_column = 10
units_per_row = 15
"##;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Colors
    pub theme: Theme,
    /// Terminal scaling
    pub display: DisplaySettings,
}

impl Config {
    /// Load configuration from the default config file location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Err(Error::Config(format!("Config file not found at {:?}", path)))
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.display.validate(&KeyboardPanel::new())?;
        Ok(config)
    }

    /// Load configuration or return default if not found
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "keypanel") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            Err(Error::Config("Could not determine config directory".to_string()))
        }
    }

    /// Create a default config file with comments
    pub fn create_default_config_file() -> Result<PathBuf> {
        let path = Self::config_path()?;
        write_default_config(&path)?;
        Ok(path)
    }
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}

/// Terminal display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Layout units per terminal column
    pub units_per_column: u16,
    /// Layout units per terminal row
    pub units_per_row: u16,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let scale = CellScale::default();
        Self {
            units_per_column: scale.units_per_column,
            units_per_row: scale.units_per_row,
        }
    }
}

impl DisplaySettings {
    pub fn cell_scale(&self) -> CellScale {
        CellScale::new(self.units_per_column, self.units_per_row)
    }

    /// Check that every key of the panel stays at least one cell in size
    pub fn validate(&self, panel: &KeyboardPanel) -> Result<()> {
        let scale = self.cell_scale();
        if panel.supports_scale(scale) {
            return Ok(());
        }
        let (width, height) = panel.smallest_key().unwrap_or((0, 0));
        Err(Error::Config(format!(
            "Display scale {}x{} is coarser than the smallest key ({}x{} units)",
            scale.units_per_column, scale.units_per_row, width, height
        )))
    }

    /// Scale to draw the panel with, falling back to the default when the
    /// configured one would hide keys
    pub fn cell_scale_for(&self, panel: &KeyboardPanel) -> CellScale {
        match self.validate(panel) {
            Ok(()) => self.cell_scale(),
            Err(e) => {
                log::warn!("{}, using default scale", e);
                CellScale::default()
            }
        }
    }
}

/// Theme/UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Panel background
    pub background: String,
    /// Ordinary key background
    pub key: String,
    /// Special key background
    pub special_key: String,
    /// Background of a key while held
    pub pressed_key: String,
    /// Frame color
    pub border: String,
    /// Label color
    pub text: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#e0e0e0".to_string(),
            key: "white".to_string(),
            special_key: "#d0d0d0".to_string(),
            pressed_key: "#a0a0a0".to_string(),
            border: "#808080".to_string(),
            text: "black".to_string(),
        }
    }
}

impl Theme {
    /// Parse a color string to ratatui Color
    pub fn parse_color(s: &str) -> Color {
        match s.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "grey" => Color::Gray,
            "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Color::DarkGray,
            "light_red" | "lightred" => Color::LightRed,
            "light_green" | "lightgreen" => Color::LightGreen,
            "light_yellow" | "lightyellow" => Color::LightYellow,
            "light_blue" | "lightblue" => Color::LightBlue,
            "light_magenta" | "lightmagenta" => Color::LightMagenta,
            "light_cyan" | "lightcyan" => Color::LightCyan,
            "white" => Color::White,
            s if s.starts_with('#') && s.len() == 7 => {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&s[1..3], 16),
                    u8::from_str_radix(&s[3..5], 16),
                    u8::from_str_radix(&s[5..7], 16),
                ) {
                    Color::Rgb(r, g, b)
                } else {
                    log::warn!("Invalid hex color {:?}, using white", s);
                    Color::White
                }
            }
            other => {
                log::warn!("Unknown color {:?}, using white", other);
                Color::White
            }
        }
    }

    /// Resolve the color strings into a style sheet
    pub fn style_sheet(&self) -> StyleSheet {
        StyleSheet {
            background: Self::parse_color(&self.background),
            key: Self::parse_color(&self.key),
            special_key: Self::parse_color(&self.special_key),
            pressed_key: Self::parse_color(&self.pressed_key),
            border: Self::parse_color(&self.border),
            text: Self::parse_color(&self.text),
        }
    }
}
