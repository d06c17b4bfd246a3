//! Pointer input for the frame loop.
//!
//! Events are applied to an [`InputState`] in arrival order; the hit tester reads
//! the resulting pointer position and primary button state once per frame.

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) button.
    Left,
    /// Secondary (right) button.
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

/// A raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The pointer moved to surface coordinates.
    PointerMoved {
        /// Surface x.
        x: f32,
        /// Surface y.
        y: f32,
    },
    /// A button went down.
    ButtonDown(MouseButton),
    /// A button went up.
    ButtonUp(MouseButton),
}

/// Pointer state carried from frame to frame.
///
/// Only the primary button engages widgets; other buttons are accepted and
/// ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Current pointer X position.
    pub mouse_x: f32,
    /// Current pointer Y position.
    pub mouse_y: f32,
    primary_down: bool,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => self.set_mouse_pos(x, y),
            InputEvent::ButtonDown(MouseButton::Left) => self.primary_down = true,
            InputEvent::ButtonUp(MouseButton::Left) => self.primary_down = false,
            InputEvent::ButtonDown(_) | InputEvent::ButtonUp(_) => {}
        }
    }

    /// Applies events in order.
    pub fn apply_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Updates the pointer position.
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    /// Returns true while the primary button is held.
    #[must_use]
    pub const fn primary_down(&self) -> bool {
        self.primary_down
    }

    /// Current pointer position.
    #[must_use]
    pub const fn pointer(&self) -> (f32, f32) {
        (self.mouse_x, self.mouse_y)
    }
}
