//! Input event types shared by all widgets.

/// Modifier keys state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key held
    pub ctrl: bool,
    /// Shift key held
    pub shift: bool,
    /// Alt key held
    pub alt: bool,
    /// Meta (command/windows) key held
    pub meta: bool,
}

/// Mouse button (or keyboard equivalent) behind a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClickKind {
    /// Primary action (left click, Enter)
    #[default]
    Primary,
    /// Secondary action (right click)
    Secondary,
    /// Middle button
    Auxiliary,
}

/// Pointer position in host coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Click event forwarded by the host
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClickEvent {
    /// Type of click
    pub kind: ClickKind,
    /// Position where the click occurred
    pub position: Position,
    /// Modifier keys held during the click
    pub modifiers: Modifiers,
}

impl ClickEvent {
    /// Create a primary click event
    pub fn primary(position: Position, modifiers: Modifiers) -> Self {
        Self {
            kind: ClickKind::Primary,
            position,
            modifiers,
        }
    }
}
