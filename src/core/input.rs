//! Keyboard input state tracking

use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Tracks keyboard state for the current frame
///
/// The host calls [`InputState::press`] / [`InputState::release`] as key
/// events arrive and [`InputState::end_frame`] once the frame is done.
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed this frame, in arrival order
    keys_just_pressed: Vec<KeyCode>,
    /// Keys released this frame
    keys_just_released: HashSet<KeyCode>,
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            keys_just_pressed: Vec::new(),
            keys_just_released: HashSet::new(),
        }
    }

    /// Record a key-down. Auto-repeat while held does not count as a new press.
    pub fn press(&mut self, key: KeyCode) {
        if self.keys_pressed.insert(key) {
            self.keys_just_pressed.push(key);
        }
    }

    /// Record a key-up
    pub fn release(&mut self, key: KeyCode) {
        self.keys_pressed.remove(&key);
        self.keys_just_released.insert(key);
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }

    /// Check if key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if key was just pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Check if key was just released this frame
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Keys pressed this frame, in the order they arrived
    pub fn just_pressed(&self) -> &[KeyCode] {
        &self.keys_just_pressed
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
