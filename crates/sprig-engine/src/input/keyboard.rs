use std::collections::HashSet;

use super::{InputFrame, InputState, Key};

/// Snapshot of the keyboard taken at the start of a frame.
///
/// Scripts query this instead of the live state so every call inside one
/// `update`/`draw` pair sees the same answers.
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    down: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl KeyboardState {
    pub fn capture(state: &InputState, frame: &InputFrame) -> Self {
        Self {
            down: state.keys_down.clone(),
            pressed: frame.keys_pressed.clone(),
        }
    }

    /// Held this frame.
    pub fn key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Went down this frame (not held over from a previous one).
    pub fn key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyState};

    #[test]
    fn pressed_only_on_the_first_frame() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::Enter, state: KeyState::Pressed, repeat: false },
        );

        let first = KeyboardState::capture(&state, &frame);
        assert!(first.key_down(Key::Enter));
        assert!(first.key_pressed(Key::Enter));

        frame.clear();
        let second = KeyboardState::capture(&state, &frame);
        assert!(second.key_down(Key::Enter));
        assert!(!second.key_pressed(Key::Enter));
    }
}
