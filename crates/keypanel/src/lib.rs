//! keypanel - On-screen Virtual Keyboard
//!
//! A clickable keyboard panel for applications that can't rely on a physical
//! keyboard (kiosks, touch screens). Features include:
//!
//! - PC-style layout: function, digit, QWERTY, home, bottom and modifier rows
//! - Key press notifications delivered to registered listeners
//! - Terminal rendering with ratatui and mouse input via crossterm
//! - Configurable colors via TOML file
//!
//! # Usage as a Library
//!
//! ```no_run
//! use keypanel::{KeyboardPanel, TerminalScreen};
//!
//! let mut panel = KeyboardPanel::new();
//! panel.subscribe(|key| println!("Key pressed: {}", key));
//!
//! // Center on the terminal and make the panel clickable
//! panel.show(&TerminalScreen::default());
//!
//! // Activations report the printed label, e.g. "Enter" or "F5"
//! if let Some(enter) = panel.find("Enter") {
//!     panel.activate(enter);
//! }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod panel;
pub mod screen;
pub mod style;
pub mod ui;

// Re-export main types
pub use config::{Config, DisplaySettings, Theme};
pub use error::{Error, Result};
pub use layout::{KeyDefinition, Layout, Row, RowKind, DEFAULT_KEY_HEIGHT, DEFAULT_KEY_WIDTH};
pub use panel::{
    Bounds, ButtonId, KeyButton, KeyboardPanel, SubscriptionId, PANEL_HEIGHT, PANEL_TITLE,
    PANEL_WIDTH,
};
pub use screen::{CellScale, FixedScreen, NoScreen, Point, ScreenInfo, ScreenSize, TerminalScreen};
pub use style::{KeyStyle, StyleSheet};
pub use ui::{panel_point, render_keyboard, KeyboardWidget};
