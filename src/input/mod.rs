use crate::math::Vec2;
use std::collections::{HashSet, VecDeque};
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: KeyCode,
}

/// Keyboard and mouse state fed by the window layer and read once per frame.
///
/// Held keys answer `is_key_pressed`/`is_key_released`. Edge queries (`is_key_down`,
/// `is_key_up`) look at the single key event taken off the queue by
/// [`InputState::begin_frame`].
pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
    key_events: VecDeque<KeyEvent>,
    current_event: Option<KeyEvent>,
    chars: VecDeque<char>,
    mouse_position: Vec2,
    mouse_delta: (f32, f32),
}

impl InputState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            key_events: VecDeque::new(),
            current_event: None,
            chars: VecDeque::new(),
            mouse_position: Vec2::zero(),
            mouse_delta: (0.0, 0.0),
        }
    }

    pub fn key_pressed(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
        self.key_events.push_back(KeyEvent {
            kind: KeyEventKind::Pressed,
            key,
        });
    }

    pub fn key_released(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
        self.key_events.push_back(KeyEvent {
            kind: KeyEventKind::Released,
            key,
        });
    }

    pub fn char_typed(&mut self, c: char) {
        self.chars.push_back(c);
    }

    /// Takes the next queued key event as this frame's event.
    pub fn begin_frame(&mut self) {
        self.current_event = self.key_events.pop_front();
    }

    #[must_use]
    pub fn current_event(&self) -> Option<KeyEvent> {
        self.current_event
    }

    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        !self.is_key_pressed(key)
    }

    /// True when this frame's event is a press of `key`.
    #[must_use]
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.current_event
            .is_some_and(|e| e.kind == KeyEventKind::Pressed && e.key == key)
    }

    /// True when this frame's event is a release of `key`.
    #[must_use]
    pub fn is_key_up(&self, key: KeyCode) -> bool {
        self.current_event
            .is_some_and(|e| e.kind == KeyEventKind::Released && e.key == key)
    }

    #[must_use]
    pub fn key_buffer_empty(&self) -> bool {
        self.key_events.is_empty()
    }

    #[must_use]
    pub fn char_buffer_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn read_char(&mut self) -> Option<char> {
        self.chars.pop_front()
    }

    /// Records raw mouse motion; the absolute position accumulates every delta.
    pub fn mouse_moved(&mut self, delta_x: f32, delta_y: f32) {
        self.mouse_delta = (delta_x, delta_y);
        self.mouse_position += Vec2::new(delta_x, delta_y);
    }

    pub fn reset_mouse_delta(&mut self) {
        self.mouse_delta = (0.0, 0.0);
    }

    #[must_use]
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
