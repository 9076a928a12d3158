//! Host input to tick input
//!
//! Tracks raw key/button state between frames and turns it into the
//! [`TickInput`] the simulation consumes: held actions plus the set of
//! actions pressed since the previous frame.
//!
//! Bindings:
//! - Left click: attach rope
//! - Right click or X: detach rope
//! - A/D: pump the swing (air control when not on the rope)
//! - Space: jump
//! - F or middle click: shoot
//! - R: restart

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::{HeldActions, PressedActions, TickInput};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    D,
    F,
    R,
    X,
    Space,
}

impl Key {
    /// Map a browser-style key name (`KeyboardEvent.key`) to a game key
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "a" => Some(Key::A),
            "d" => Some(Key::D),
            "f" => Some(Key::F),
            "r" => Some(Key::R),
            "x" => Some(Key::X),
            " " | "space" | "spacebar" => Some(Key::Space),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index
    pub fn from_index(index: i16) -> Option<Self> {
        match index {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

/// Tracks keyboard and mouse state across frames
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<Key>,
    pointer: Vec2,
    pressed: PressedActions,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press; auto-repeat of a held key is not a new press
    pub fn key_down(&mut self, key: Key) {
        if !self.keys_down.insert(key) {
            return;
        }
        match key {
            Key::Space => self.pressed.jump = true,
            Key::F => self.pressed.shoot = true,
            Key::X => self.pressed.detach = true,
            Key::R => self.pressed.reset = true,
            Key::A | Key::D => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys_down.remove(&key);
    }

    pub fn mouse_down(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => self.pressed.attach = true,
            MouseButton::Middle => self.pressed.shoot = true,
            MouseButton::Right => self.pressed.detach = true,
        }
    }

    /// Pointer position in viewport coordinates
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    /// Input for the coming frame, without consuming pressed actions
    pub fn peek(&self) -> TickInput {
        TickInput {
            held: HeldActions {
                left: self.keys_down.contains(&Key::A),
                right: self.keys_down.contains(&Key::D),
            },
            pointer: self.pointer,
            pressed: self.pressed,
        }
    }

    /// Input for the coming frame; pressed actions are cleared afterwards
    pub fn take_frame(&mut self) -> TickInput {
        let input = self.peek();
        self.pressed = PressedActions::default();
        input
    }

    /// Forget held keys (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }
}
