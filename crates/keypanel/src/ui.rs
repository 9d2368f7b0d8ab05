//! TUI rendering for the keyboard panel
//!
//! The panel's layout units are mapped onto terminal cells through a
//! [`CellScale`]. A cell belongs to a key when the layout point at the cell's
//! center lies inside the key, so drawing and mouse hit testing always agree.

use crate::panel::{Bounds, KeyboardPanel, PANEL_HEIGHT, PANEL_WIDTH};
use crate::screen::{CellScale, Point};
use crate::style::StyleSheet;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

/// Cells covered by a key, relative to the panel's top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub column: i32,
    pub row: i32,
    pub width: i32,
    pub height: i32,
}

/// Keyboard widget for rendering in ratatui
pub struct KeyboardWidget<'a> {
    panel: &'a KeyboardPanel,
    styles: StyleSheet,
    scale: CellScale,
    status: Option<&'a str>,
}

impl<'a> KeyboardWidget<'a> {
    /// Create a new keyboard widget
    pub fn new(panel: &'a KeyboardPanel) -> Self {
        Self {
            panel,
            styles: StyleSheet::default(),
            scale: CellScale::default(),
            status: None,
        }
    }

    /// Set the colors
    pub fn styles(mut self, styles: StyleSheet) -> Self {
        self.styles = styles;
        self
    }

    /// Set the cell scale
    pub fn scale(mut self, scale: CellScale) -> Self {
        self.scale = scale;
        self
    }

    /// Text shown on the bottom edge of the frame
    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for KeyboardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.panel.is_visible() || area.is_empty() {
            return;
        }

        let (origin_column, origin_row) = panel_origin(area, self.panel, self.scale);
        let columns = self.scale.columns(i32::from(PANEL_WIDTH));
        let rows = self.scale.rows(i32::from(PANEL_HEIGHT));

        // Frame sits one cell outside the panel surface
        let frame = clip(area, origin_column - 1, origin_row - 1, columns + 2, rows + 2);
        if let Some(frame) = frame {
            let mut block = Block::default()
                .title(format!(" {} ", self.panel.title()))
                .borders(Borders::ALL)
                .border_style(self.styles.panel())
                .style(self.styles.panel());
            if let Some(status) = self.status {
                block = block.title_bottom(format!(" {} ", status));
            }
            block.render(frame, buf);
        }

        if let Some(surface) = clip(area, origin_column, origin_row, columns, rows) {
            buf.set_style(surface, self.styles.panel());
        }

        let pressed = self.panel.pressed();
        for (id, button) in self.panel.buttons().iter().enumerate() {
            let span = key_cells(self.scale, button.bounds());
            let Some(rect) = clip(
                area,
                origin_column + span.column,
                origin_row + span.row,
                span.width,
                span.height,
            ) else {
                continue;
            };

            let style = self.styles.key(button.style(), pressed == Some(id));
            buf.set_style(rect, style);

            let label_row = origin_row + span.row + span.height / 2;
            draw_label(
                buf,
                area,
                origin_column + span.column,
                label_row,
                span.width,
                button.label(),
                style,
            );
        }
    }
}

/// Render the panel to a frame, filling the given area
pub fn render_keyboard(
    frame: &mut Frame,
    area: Rect,
    panel: &KeyboardPanel,
    styles: StyleSheet,
    scale: CellScale,
    status: Option<&str>,
) {
    let widget = KeyboardWidget::new(panel)
        .styles(styles)
        .scale(scale)
        .status(status);
    frame.render_widget(widget, area);
}

/// Terminal cell of the panel's top-left corner, as absolute buffer coordinates
pub fn panel_origin(area: Rect, panel: &KeyboardPanel, scale: CellScale) -> (i32, i32) {
    let position = panel.position();
    (
        i32::from(area.x) + scale.columns(position.x),
        i32::from(area.y) + scale.rows(position.y),
    )
}

/// Convert a terminal cell (e.g. from a mouse event) to a panel-relative point
pub fn panel_point(
    area: Rect,
    panel: &KeyboardPanel,
    scale: CellScale,
    column: u16,
    row: u16,
) -> Point {
    let (origin_column, origin_row) = panel_origin(area, panel, scale);
    scale.cell_center(i32::from(column) - origin_column, i32::from(row) - origin_row)
}

/// Cells whose centers fall inside the given bounds
pub fn key_cells(scale: CellScale, bounds: Bounds) -> CellSpan {
    let per_column = i32::from(scale.units_per_column);
    let per_row = i32::from(scale.units_per_row);
    let column = first_cell(i32::from(bounds.x), per_column);
    let row = first_cell(i32::from(bounds.y), per_row);
    let end_column = first_cell(i32::from(bounds.right()), per_column);
    let end_row = first_cell(i32::from(bounds.bottom()), per_row);
    CellSpan {
        column,
        row,
        width: end_column - column,
        height: end_row - row,
    }
}

/// First cell whose center is at or after `units`
fn first_cell(units: i32, per_cell: i32) -> i32 {
    (units - per_cell / 2 + per_cell - 1).div_euclid(per_cell)
}

/// Intersect a cell rectangle given in signed coordinates with the area
fn clip(area: Rect, x: i32, y: i32, width: i32, height: i32) -> Option<Rect> {
    if width <= 0 || height <= 0 {
        return None;
    }
    let left = x.max(i32::from(area.left()));
    let top = y.max(i32::from(area.top()));
    let right = (x + width).min(i32::from(area.right()));
    let bottom = (y + height).min(i32::from(area.bottom()));
    if left >= right || top >= bottom {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Draw `[label]` centered in a key, dropping the brackets when there's no room
fn draw_label(
    buf: &mut Buffer,
    area: Rect,
    column: i32,
    row: i32,
    width: i32,
    label: &str,
    style: Style,
) {
    if width <= 0 || row < i32::from(area.top()) || row >= i32::from(area.bottom()) {
        return;
    }
    let label_width = label.chars().count() as i32;
    let text = if label_width + 2 <= width {
        format!("[{}]", label)
    } else {
        label.to_string()
    };
    let text_width = (text.chars().count() as i32).min(width);
    let start = column + (width - text_width) / 2;

    for (i, ch) in text.chars().take(text_width as usize).enumerate() {
        let x = start + i as i32;
        if x < i32::from(area.left()) || x >= i32::from(area.right()) {
            continue;
        }
        buf.set_stringn(x as u16, row as u16, ch.to_string(), 1, style);
    }
}
