//! Keyboard panel
//!
//! Owns the buttons built from a [`Layout`], their geometry, and the listeners
//! that receive key presses. All coordinates are layout units relative to the
//! panel's top-left corner unless stated otherwise.

use std::fmt;

use crate::layout::{KeyDefinition, Layout, RowKind, DEFAULT_KEY_HEIGHT, DEFAULT_KEY_WIDTH};
use crate::screen::{centered_origin, CellScale, Point, ScreenInfo};
use crate::style::KeyStyle;

/// Fixed panel width in layout units
pub const PANEL_WIDTH: u16 = 800;

/// Fixed panel height in layout units
pub const PANEL_HEIGHT: u16 = 300;

/// Outer margin around the rows
pub const PANEL_MARGIN: u16 = 10;

/// Gap between rows and between keys in a row
pub const KEY_SPACING: u16 = 5;

/// Window title shown on the panel frame
pub const PANEL_TITLE: &str = "Virtual Keyboard";

/// Index of a button in [`KeyboardPanel::buttons`]
pub type ButtonId = usize;

/// Handle returned by [`KeyboardPanel::subscribe`]
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&str)>;

/// Rectangle in panel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Whether the point lies inside (right and bottom edges excluded)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= i32::from(self.x)
            && point.x < i32::from(self.right())
            && point.y >= i32::from(self.y)
            && point.y < i32::from(self.bottom())
    }
}

/// A pressable key on the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyButton {
    label: String,
    style: KeyStyle,
    min_width: u16,
    min_height: u16,
    max_height: Option<u16>,
    row: Option<RowKind>,
    bounds: Bounds,
}

impl KeyButton {
    /// Create a button with the default 40x40 minimum size
    pub fn new(label: impl Into<String>, is_special: bool) -> Self {
        Self {
            label: label.into(),
            style: KeyStyle::from_special(is_special),
            min_width: DEFAULT_KEY_WIDTH,
            min_height: DEFAULT_KEY_HEIGHT,
            max_height: None,
            row: None,
            bounds: Bounds::default(),
        }
    }

    /// Create a button from a layout entry, applying its size overrides
    pub fn from_definition(definition: &KeyDefinition) -> Self {
        Self {
            min_width: definition.width(),
            min_height: definition.height(),
            max_height: definition.max_height,
            ..Self::new(definition.label.clone(), definition.is_special)
        }
    }

    /// The label; also the key identifier emitted on activation
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> KeyStyle {
        self.style
    }

    pub fn is_special(&self) -> bool {
        self.style == KeyStyle::Special
    }

    pub fn min_width(&self) -> u16 {
        self.min_width
    }

    pub fn min_height(&self) -> u16 {
        self.min_height
    }

    pub fn max_height(&self) -> Option<u16> {
        self.max_height
    }

    /// Row this button was placed in, if it belongs to a panel
    pub fn row(&self) -> Option<RowKind> {
        self.row
    }

    /// Placement inside the panel
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Height the button takes in a row of the given height
    fn height_in(&self, row_height: u16) -> u16 {
        let height = row_height.max(self.min_height);
        match self.max_height {
            Some(max) => height.min(max),
            None => height,
        }
    }
}

/// The on-screen keyboard
///
/// Listeners registered with [`subscribe`](Self::subscribe) are called
/// synchronously, in registration order, once per activation with the
/// button's label. No modifier state is tracked: `Shift` and `Caps` are keys
/// like any other and never change what other keys report.
pub struct KeyboardPanel {
    layout: Layout,
    buttons: Vec<KeyButton>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
    position: Point,
    visible: bool,
    pressed: Option<ButtonId>,
}

impl Default for KeyboardPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyboardPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardPanel")
            .field("buttons", &self.buttons.len())
            .field("listeners", &self.listeners.len())
            .field("position", &self.position)
            .field("visible", &self.visible)
            .field("pressed", &self.pressed)
            .finish()
    }
}

impl KeyboardPanel {
    /// Build the panel from the standard layout
    pub fn new() -> Self {
        Self::with_layout(Layout::standard())
    }

    /// Build the panel from a custom layout table
    pub fn with_layout(layout: Layout) -> Self {
        let buttons = arrange(&layout);
        log::debug!(
            "Built keyboard panel with {} rows and {} keys",
            layout.rows.len(),
            buttons.len()
        );
        Self {
            layout,
            buttons,
            listeners: Vec::new(),
            next_subscription: 0,
            position: Point::default(),
            visible: false,
            pressed: None,
        }
    }

    /// Window title
    pub fn title(&self) -> &'static str {
        PANEL_TITLE
    }

    /// Fixed panel size `(width, height)`; independent of the screen
    pub fn size(&self) -> (u16, u16) {
        (PANEL_WIDTH, PANEL_HEIGHT)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn buttons(&self) -> &[KeyButton] {
        &self.buttons
    }

    pub fn button(&self, id: ButtonId) -> Option<&KeyButton> {
        self.buttons.get(id)
    }

    /// First button with the given label
    pub fn find(&self, label: &str) -> Option<ButtonId> {
        self.buttons.iter().position(|b| b.label == label)
    }

    /// Buttons of one row, left to right
    pub fn row_buttons(&self, kind: RowKind) -> impl Iterator<Item = (ButtonId, &KeyButton)> {
        self.buttons
            .iter()
            .enumerate()
            .filter(move |(_, b)| b.row == Some(kind))
    }

    /// Top-left corner on the screen
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the panel
    ///
    /// When the panel was hidden it is centered on the screen first. If the
    /// screen size is unknown the current position is kept.
    pub fn show(&mut self, screen: &dyn ScreenInfo) -> Point {
        if !self.visible {
            self.recenter(screen);
            self.visible = true;
        }
        self.position
    }

    /// Center on the screen without changing visibility
    pub fn recenter(&mut self, screen: &dyn ScreenInfo) -> Point {
        match screen.screen_size() {
            Some(size) => {
                self.position = centered_origin(size, PANEL_WIDTH, PANEL_HEIGHT);
                log::debug!(
                    "Centered panel on {}x{} screen at ({}, {})",
                    size.width,
                    size.height,
                    self.position.x,
                    self.position.y
                );
            }
            None => log::warn!("Screen size unavailable, keeping panel position"),
        }
        self.position
    }

    /// Hide the panel and drop any pending press
    pub fn hide(&mut self) {
        self.visible = false;
        self.pressed = None;
    }

    /// Button under a panel-relative point
    pub fn button_at(&self, point: Point) -> Option<ButtonId> {
        self.buttons.iter().position(|b| b.bounds.contains(point))
    }

    /// Button currently held down
    pub fn pressed(&self) -> Option<ButtonId> {
        self.pressed
    }

    /// Pointer went down at a panel-relative point
    ///
    /// Returns the button that is now held, if any.
    pub fn press_at(&mut self, point: Point) -> Option<ButtonId> {
        if !self.visible {
            return None;
        }
        self.pressed = self.button_at(point);
        self.pressed
    }

    /// Pointer went up at a panel-relative point
    ///
    /// Activates the held button when the pointer is released over it and
    /// returns its id; releasing anywhere else cancels the press.
    pub fn release_at(&mut self, point: Point) -> Option<ButtonId> {
        let held = self.pressed.take()?;
        if !self.visible || self.button_at(point) != Some(held) {
            return None;
        }
        self.activate(held).then_some(held)
    }

    /// Drop the held button without activating it
    pub fn cancel_press(&mut self) {
        self.pressed = None;
    }

    /// Activate a button, notifying every listener with its label
    ///
    /// Returns false for an unknown id.
    pub fn activate(&mut self, id: ButtonId) -> bool {
        let Some(button) = self.buttons.get(id) else {
            return false;
        };
        log::trace!("Key pressed: {}", button.label);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&button.label);
        }
        true
    }

    /// Register a listener for key presses
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&str) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Narrowest and shortest button `(width, height)`, or `None` for an empty panel
    pub fn smallest_key(&self) -> Option<(u16, u16)> {
        let width = self.buttons.iter().map(|b| b.bounds.width).min()?;
        let height = self.buttons.iter().map(|b| b.bounds.height).min()?;
        Some((width, height))
    }

    /// Whether every button covers at least one terminal cell at this scale
    ///
    /// A span of `n` units always contains the center of some cell when a cell
    /// is at most `n` units wide.
    pub fn supports_scale(&self, scale: CellScale) -> bool {
        match self.smallest_key() {
            Some((width, height)) => {
                scale.units_per_column <= width && scale.units_per_row <= height
            }
            None => true,
        }
    }
}

/// Compute every button's bounds
///
/// Rows share the inner height evenly. Within a row each key gets its minimum
/// width and the leftover width is shared evenly; leftovers that don't divide
/// go to the leftmost keys/rows.
fn arrange(layout: &Layout) -> Vec<KeyButton> {
    let inner_width = PANEL_WIDTH - 2 * PANEL_MARGIN;
    let inner_height = PANEL_HEIGHT - 2 * PANEL_MARGIN;
    let row_count = u16::try_from(layout.rows.len()).unwrap_or(u16::MAX);
    let row_heights = share(
        inner_height.saturating_sub(KEY_SPACING.saturating_mul(row_count.saturating_sub(1))),
        row_count,
    );

    let mut buttons = Vec::with_capacity(layout.key_count());
    let mut y = PANEL_MARGIN;

    for (row, row_height) in layout.rows.iter().zip(row_heights) {
        let key_count = u16::try_from(row.keys.len()).unwrap_or(u16::MAX);
        let extra = share(
            inner_width.saturating_sub(row.min_width(KEY_SPACING)),
            key_count,
        );
        let mut x = PANEL_MARGIN;

        for (definition, extra_width) in row.keys.iter().zip(extra) {
            let mut button = KeyButton::from_definition(definition);
            let width = button.min_width.saturating_add(extra_width);
            let height = button.height_in(row_height);
            button.row = Some(row.kind);
            button.bounds = Bounds {
                x,
                y: y.saturating_add(row_height.saturating_sub(height) / 2),
                width,
                height,
            };
            x = x.saturating_add(width).saturating_add(KEY_SPACING);
            buttons.push(button);
        }

        y = y.saturating_add(row_height).saturating_add(KEY_SPACING);
    }

    buttons
}

/// Split `total` into `parts` near-equal pieces
fn share(total: u16, parts: u16) -> Vec<u16> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let remainder = total % parts;
    (0..parts).map(|i| base + u16::from(i < remainder)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{FixedScreen, NoScreen, ScreenSize};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_panel() -> (KeyboardPanel, Rc<RefCell<Vec<String>>>) {
        let mut panel = KeyboardPanel::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        panel.subscribe(move |key| sink.borrow_mut().push(key.to_string()));
        (panel, received)
    }

    fn center_of(bounds: Bounds) -> Point {
        Point::new(
            i32::from(bounds.x + bounds.width / 2),
            i32::from(bounds.y + bounds.height / 2),
        )
    }

    #[test]
    fn test_every_button_emits_its_label_once() {
        let (mut panel, received) = recording_panel();
        let labels: Vec<String> = panel.buttons().iter().map(|b| b.label().to_string()).collect();

        for id in 0..panel.buttons().len() {
            assert!(panel.activate(id));
        }

        assert_eq!(*received.borrow(), labels);
    }

    #[test]
    fn test_no_modifier_state() {
        let (mut panel, received) = recording_panel();
        let shift = panel.find("Shift").unwrap();
        let caps = panel.find("Caps").unwrap();
        let a = panel.find("A").unwrap();
        let one = panel.find("1").unwrap();

        panel.activate(shift);
        panel.activate(a);
        panel.activate(caps);
        panel.activate(a);
        panel.activate(one);

        assert_eq!(*received.borrow(), vec!["Shift", "A", "Caps", "A", "1"]);
    }

    #[test]
    fn test_listeners_called_in_registration_order() {
        let mut panel = KeyboardPanel::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            panel.subscribe(move |key| calls.borrow_mut().push(format!("{}:{}", tag, key)));
        }

        let enter = panel.find("Enter").unwrap();
        panel.activate(enter);

        assert_eq!(
            *calls.borrow(),
            vec!["first:Enter", "second:Enter", "third:Enter"]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let (mut panel, received) = recording_panel();
        let other = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&other);
        let id = panel.subscribe(move |_| *counter.borrow_mut() += 1);
        assert_eq!(panel.listener_count(), 2);

        let f5 = panel.find("F5").unwrap();
        panel.activate(f5);
        assert!(panel.unsubscribe(id));
        assert!(!panel.unsubscribe(id));
        panel.activate(f5);

        assert_eq!(*other.borrow(), 1);
        assert_eq!(*received.borrow(), vec!["F5", "F5"]);
    }

    #[test]
    fn test_activate_without_listeners_and_unknown_id() {
        let mut panel = KeyboardPanel::new();
        assert!(panel.activate(0));
        assert!(!panel.activate(panel.buttons().len()));
    }

    #[test]
    fn test_size_is_fixed() {
        let mut panel = KeyboardPanel::new();
        assert_eq!(panel.size(), (800, 300));
        panel.show(&FixedScreen(ScreenSize::new(320, 240)));
        assert_eq!(panel.size(), (800, 300));
        panel.hide();
        panel.show(&FixedScreen(ScreenSize::new(3840, 2160)));
        assert_eq!(panel.size(), (800, 300));
    }

    #[test]
    fn test_show_centers_on_screen() {
        let mut panel = KeyboardPanel::new();
        assert!(!panel.is_visible());

        let position = panel.show(&FixedScreen(ScreenSize::new(1920, 1080)));

        assert!(panel.is_visible());
        assert_eq!(position, Point::new(560, 390));
        assert_eq!(panel.position(), Point::new(560, 390));
    }

    #[test]
    fn test_show_when_visible_keeps_position() {
        let mut panel = KeyboardPanel::new();
        panel.show(&FixedScreen(ScreenSize::new(1920, 1080)));
        panel.move_to(Point::new(5, 5));

        panel.show(&FixedScreen(ScreenSize::new(1000, 1000)));
        assert_eq!(panel.position(), Point::new(5, 5));

        panel.hide();
        panel.show(&FixedScreen(ScreenSize::new(1000, 1000)));
        assert_eq!(panel.position(), Point::new(100, 350));
    }

    #[test]
    fn test_show_without_screen_uses_default_position() {
        let mut panel = KeyboardPanel::new();
        assert_eq!(panel.show(&NoScreen), Point::new(0, 0));
        assert!(panel.is_visible());
    }

    #[test]
    fn test_geometry_stays_inside_panel() {
        let panel = KeyboardPanel::new();
        for button in panel.buttons() {
            let b = button.bounds();
            assert!(b.x >= PANEL_MARGIN && b.y >= PANEL_MARGIN, "{:?}", button.label());
            assert!(b.right() <= PANEL_WIDTH - PANEL_MARGIN, "{:?}", button.label());
            assert!(b.bottom() <= PANEL_HEIGHT - PANEL_MARGIN, "{:?}", button.label());
            assert!(b.width >= button.min_width());
        }
    }

    #[test]
    fn test_rows_fill_width_and_do_not_overlap() {
        let panel = KeyboardPanel::new();
        for kind in RowKind::ALL {
            let row: Vec<_> = panel.row_buttons(kind).map(|(_, b)| b.bounds()).collect();
            for pair in row.windows(2) {
                assert_eq!(pair[0].right() + KEY_SPACING, pair[1].x);
            }
            assert_eq!(row.last().unwrap().right(), PANEL_WIDTH - PANEL_MARGIN);
        }
    }

    #[test]
    fn test_modifier_keys_are_capped_in_height() {
        let panel = KeyboardPanel::new();
        for (_, button) in panel.row_buttons(RowKind::Modifier) {
            if button.label() == "Space" {
                assert!(button.bounds().height >= 40);
            } else {
                assert_eq!(button.bounds().height, 30);
                assert_eq!(button.min_width(), 60);
            }
        }
        let space = panel.button(panel.find("Space").unwrap()).unwrap();
        assert_eq!(space.min_width(), 340);
        let q = panel.button(panel.find("Q").unwrap()).unwrap();
        assert_eq!((q.min_width(), q.min_height()), (40, 40));
    }

    #[test]
    fn test_button_at() {
        let panel = KeyboardPanel::new();
        let esc = panel.find("Esc").unwrap();
        let bounds = panel.button(esc).unwrap().bounds();

        assert_eq!(panel.button_at(center_of(bounds)), Some(esc));
        assert_eq!(panel.button_at(Point::new(0, 0)), None);
        assert_eq!(panel.button_at(Point::new(i32::from(bounds.right()), 20)), None);
        assert_eq!(panel.button_at(Point::new(-1, -1)), None);
    }

    #[test]
    fn test_click_activates_on_release_over_same_button() {
        let (mut panel, received) = recording_panel();
        panel.show(&NoScreen);
        let a = panel.find("A").unwrap();
        let point = center_of(panel.button(a).unwrap().bounds());

        assert_eq!(panel.press_at(point), Some(a));
        assert_eq!(panel.pressed(), Some(a));
        assert_eq!(panel.release_at(point), Some(a));
        assert_eq!(panel.pressed(), None);
        assert_eq!(*received.borrow(), vec!["A"]);
    }

    #[test]
    fn test_release_elsewhere_cancels() {
        let (mut panel, received) = recording_panel();
        panel.show(&NoScreen);
        let a = panel.button(panel.find("A").unwrap()).unwrap().bounds();
        let s = panel.button(panel.find("S").unwrap()).unwrap().bounds();

        panel.press_at(center_of(a));
        assert_eq!(panel.release_at(center_of(s)), None);
        assert_eq!(panel.release_at(center_of(s)), None);
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn test_hidden_panel_ignores_pointer() {
        let (mut panel, received) = recording_panel();
        let a = panel.button(panel.find("A").unwrap()).unwrap().bounds();

        assert_eq!(panel.press_at(center_of(a)), None);
        assert_eq!(panel.release_at(center_of(a)), None);

        panel.show(&NoScreen);
        panel.press_at(center_of(a));
        panel.hide();
        assert_eq!(panel.pressed(), None);
        assert_eq!(panel.release_at(center_of(a)), None);
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn test_create_button_defaults() {
        let button = KeyButton::new("X", false);
        assert_eq!(button.label(), "X");
        assert!(!button.is_special());
        assert_eq!((button.min_width(), button.min_height()), (40, 40));
        assert_eq!(button.row(), None);

        let special = KeyButton::new("Del", true);
        assert_eq!(special.style(), KeyStyle::Special);
    }

    #[test]
    fn test_custom_layout() {
        use crate::layout::Row;

        let layout = Layout {
            rows: vec![Row {
                kind: RowKind::Function,
                keys: vec![
                    KeyDefinition::special("Esc").with_min_height(60),
                    KeyDefinition::new("Go").with_min_width(100),
                ],
            }],
        };
        let mut panel = KeyboardPanel::with_layout(layout);
        assert_eq!(panel.size(), (800, 300));
        assert_eq!(panel.buttons().len(), 2);

        // A single row takes the whole inner height
        let esc = panel.button(0).unwrap().bounds();
        assert_eq!((esc.y, esc.height), (10, 280));
        let go = panel.button(1).unwrap().bounds();
        assert_eq!(go.right(), 790);

        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        panel.subscribe(move |key| sink.borrow_mut().push(key.to_string()));
        panel.activate(1);
        assert_eq!(*received.borrow(), vec!["Go"]);
    }

    #[test]
    fn test_oversized_layout_saturates() {
        use crate::layout::Row;

        let layout = Layout {
            rows: vec![Row {
                kind: RowKind::Digits,
                keys: vec![
                    KeyDefinition::new("A").with_min_width(400),
                    KeyDefinition::new("B").with_min_width(400),
                    KeyDefinition::new("C").with_min_width(65000),
                ],
            }],
        };
        assert_eq!(layout.rows[0].min_width(KEY_SPACING), u16::MAX);

        let mut panel = KeyboardPanel::with_layout(layout);
        assert_eq!(panel.size(), (800, 300));
        assert_eq!(panel.buttons().len(), 3);
        let c = panel.button(2).unwrap().bounds();
        assert_eq!(c.right(), u16::MAX);

        assert!(panel.activate(2));
    }

    #[test]
    fn test_cancel_press() {
        let (mut panel, received) = recording_panel();
        panel.show(&NoScreen);
        let a = panel.find("A").unwrap();
        let point = center_of(panel.button(a).unwrap().bounds());

        panel.press_at(point);
        panel.cancel_press();
        assert_eq!(panel.pressed(), None);
        assert_eq!(panel.release_at(point), None);
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn test_supports_scale() {
        let panel = KeyboardPanel::new();
        let (width, height) = panel.smallest_key().unwrap();
        assert_eq!(height, 30);
        assert!(width >= DEFAULT_KEY_WIDTH);

        assert!(panel.supports_scale(CellScale::default()));
        assert!(panel.supports_scale(CellScale::new(width, height)));
        assert!(!panel.supports_scale(CellScale::new(width + 1, height)));
        assert!(!panel.supports_scale(CellScale::new(10, height + 1)));
        assert!(!panel.supports_scale(CellScale::new(60, 60)));

        let empty = KeyboardPanel::with_layout(Layout { rows: Vec::new() });
        assert_eq!(empty.smallest_key(), None);
        assert!(empty.supports_scale(CellScale::new(500, 500)));
    }

    #[test]
    fn test_share() {
        assert_eq!(share(10, 3), vec![4, 3, 3]);
        assert_eq!(share(0, 2), vec![0, 0]);
        assert!(share(5, 0).is_empty());
    }
}
