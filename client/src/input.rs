//! Keyboard sampling for the outbound sync path

use macroquad::prelude::*;
use shared::InputState;

/// Samples movement keys once per frame. W/Up moves forward, A/Left and
/// D/Right rotate.
#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    pub fn sample(&self) -> InputState {
        Self::from_keys(
            is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        )
    }

    fn from_keys(forward: bool, rotate_left: bool, rotate_right: bool) -> InputState {
        InputState {
            forward,
            rotate_left,
            rotate_right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keys() {
        let input = InputManager::from_keys(true, false, true);
        assert!(input.forward);
        assert!(!input.rotate_left);
        assert!(input.rotate_right);
        assert!(InputManager::from_keys(false, false, false).is_idle());
    }
}
