//! Input event types for pointer, keyboard, and viewport changes

use sift_core::{Point, Size};

/// Input events routed from the host to a widget
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer (mouse, pen, or touch) event
    Pointer(PointerEvent),
    /// Keyboard event
    Keyboard(KeyboardEvent),
    /// Page or viewport geometry changed
    Viewport(ViewportEvent),
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        InputEvent::Pointer(event)
    }
}

impl From<KeyboardEvent> for InputEvent {
    fn from(event: KeyboardEvent) -> Self {
        InputEvent::Keyboard(event)
    }
}

impl From<ViewportEvent> for InputEvent {
    fn from(event: ViewportEvent) -> Self {
        InputEvent::Viewport(event)
    }
}

// ============================================================================
// Pointer Events
// ============================================================================

/// Pointer phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Button pressed or finger touched down
    Down,
    /// Pointer moved
    Move,
    /// Button released or finger lifted
    Up,
}

/// Unified pointer event in viewport coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Phase of the pointer sequence
    pub phase: PointerPhase,
    /// X position in viewport coordinates
    pub x: f32,
    /// Y position in viewport coordinates
    pub y: f32,
}

impl PointerEvent {
    /// Pointer pressed at position
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Down,
            x,
            y,
        }
    }

    /// Pointer moved to position
    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
            y,
        }
    }

    /// Pointer released at position
    pub fn up(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Up,
            x,
            y,
        }
    }

    /// Position as a point
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed or released
    pub key: Key,
    /// Whether the key was pressed or released
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Key press
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    /// Key release
    pub fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
        }
    }
}

/// Key press/release state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key was pressed
    Pressed,
    /// Key was released
    Released,
}

/// Key codes
///
/// Only keys the widgets interpret get dedicated variants; printable input
/// arrives as [`Key::Char`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    Space,
    Backspace,
    Home,
    End,
    PageUp,
    PageDown,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,

    // Character input (for text input)
    Char(char),

    // Unknown key
    Unknown,
}

impl Key {
    /// Parse a DOM-style key name (`"ArrowDown"`, `"Escape"`, `"a"`)
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            " " | "Space" => Key::Space,
            "Backspace" => Key::Backspace,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "ArrowLeft" | "Left" => Key::Left,
            "ArrowRight" | "Right" => Key::Right,
            "ArrowUp" | "Up" => Key::Up,
            "ArrowDown" | "Down" => Key::Down,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Unknown,
                }
            }
        }
    }
}

// ============================================================================
// Viewport Events
// ============================================================================

/// Viewport geometry events
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// The page (or any scroll container) scrolled
    Scrolled,
    /// The viewport was resized
    Resized(Size),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("ArrowDown"), Key::Down);
        assert_eq!(Key::from_name("ArrowUp"), Key::Up);
        assert_eq!(Key::from_name("Esc"), Key::Escape);
        assert_eq!(Key::from_name("a"), Key::Char('a'));
        assert_eq!(Key::from_name("ñ"), Key::Char('ñ'));
        assert_eq!(Key::from_name("F13"), Key::Unknown);
    }

    #[test]
    fn test_pointer_constructors() {
        let e = PointerEvent::down(3.0, 4.0);
        assert_eq!(e.phase, PointerPhase::Down);
        assert_eq!(e.position(), Point::new(3.0, 4.0));
        assert_eq!(PointerEvent::up(0.0, 0.0).phase, PointerPhase::Up);
    }
}
