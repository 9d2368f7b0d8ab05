//! Screen geometry
//!
//! The panel asks a [`ScreenInfo`] collaborator for the display size when it is
//! shown. Everything here works in layout units; [`CellScale`] converts between
//! those and terminal cells.

use crate::error::{Error, Result};

/// Display size in layout units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A point in layout units. May be negative when the panel is larger than the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Source of the display dimensions
pub trait ScreenInfo {
    /// Current screen size, or `None` if it can't be determined
    fn screen_size(&self) -> Option<ScreenSize>;
}

/// A screen with a known, constant size
#[derive(Debug, Clone, Copy)]
pub struct FixedScreen(pub ScreenSize);

impl ScreenInfo for FixedScreen {
    fn screen_size(&self) -> Option<ScreenSize> {
        Some(self.0)
    }
}

/// A screen whose geometry is unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScreen;

impl ScreenInfo for NoScreen {
    fn screen_size(&self) -> Option<ScreenSize> {
        None
    }
}

/// How many layout units one terminal cell covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    pub units_per_column: u16,
    pub units_per_row: u16,
}

impl Default for CellScale {
    fn default() -> Self {
        Self {
            units_per_column: 10,
            units_per_row: 15,
        }
    }
}

impl CellScale {
    /// Build a scale, treating zero as one to keep the arithmetic defined
    pub fn new(units_per_column: u16, units_per_row: u16) -> Self {
        Self {
            units_per_column: units_per_column.max(1),
            units_per_row: units_per_row.max(1),
        }
    }

    /// Terminal columns needed for a horizontal span of layout units
    pub fn columns(&self, units: i32) -> i32 {
        units.div_euclid(i32::from(self.units_per_column))
    }

    /// Terminal rows needed for a vertical span of layout units
    pub fn rows(&self, units: i32) -> i32 {
        units.div_euclid(i32::from(self.units_per_row))
    }

    /// Layout-unit point at the center of a terminal cell
    pub fn cell_center(&self, column: i32, row: i32) -> Point {
        let w = i32::from(self.units_per_column);
        let h = i32::from(self.units_per_row);
        Point::new(column * w + w / 2, row * h + h / 2)
    }

    /// Convert a terminal size to layout units
    pub fn screen_size(&self, columns: u16, rows: u16) -> ScreenSize {
        ScreenSize::new(
            u32::from(columns) * u32::from(self.units_per_column),
            u32::from(rows) * u32::from(self.units_per_row),
        )
    }
}

/// The terminal the process is attached to
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalScreen {
    pub scale: CellScale,
}

impl TerminalScreen {
    pub fn new(scale: CellScale) -> Self {
        Self { scale }
    }

    /// Query the terminal size, in layout units
    pub fn query(&self) -> Result<ScreenSize> {
        let (columns, rows) = crossterm::terminal::size()
            .map_err(|e| Error::Terminal(format!("Could not query terminal size: {}", e)))?;
        Ok(self.scale.screen_size(columns, rows))
    }
}

impl ScreenInfo for TerminalScreen {
    fn screen_size(&self) -> Option<ScreenSize> {
        match self.query() {
            Ok(size) => Some(size),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}

/// Top-left position that centers a panel of the given size on the screen
///
/// Uses floor division, so a panel wider than the screen gets a negative offset.
pub fn centered_origin(screen: ScreenSize, panel_width: u16, panel_height: u16) -> Point {
    let x = (i64::from(screen.width) - i64::from(panel_width)).div_euclid(2);
    let y = (i64::from(screen.height) - i64::from(panel_height)).div_euclid(2);
    Point::new(clamp_i32(x), clamp_i32(y))
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
