use serde::{Deserialize, Serialize};
use std::fmt;

pub mod codec;
pub mod protocol;

pub use codec::{decode, encode, CodecError, MAX_MESSAGE_BYTES};
pub use protocol::{
    Envelope, EstablishConnection, Message, MessageType, PlayerConnected, RemotePlayer,
    UpdatePosition,
};

/// Distance covered by one `forward` step, in world units.
pub const MOVE_STEP: f64 = 4.0;
/// Heading change of one rotate step, in radians.
pub const ROTATION_STEP: f64 = std::f64::consts::PI / 45.0;
pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;

/// Server-assigned participant identifier. Immutable once handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position and heading of one ship. The angle is in radians and is never
/// normalized; angle 0 faces up the screen (negative y).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionData {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl PositionData {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    /// Advances along the current heading by `MOVE_STEP`.
    pub fn forward(&mut self) {
        self.x += MOVE_STEP * self.angle.sin();
        self.y -= MOVE_STEP * self.angle.cos();
    }

    pub fn rotate_left(&mut self) {
        self.angle -= ROTATION_STEP;
    }

    pub fn rotate_right(&mut self) {
        self.angle += ROTATION_STEP;
    }
}

/// Point-in-time sample of the directional controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub forward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl InputState {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.rotate_left || self.rotate_right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_position_creation() {
        let position = PositionData::new(100.0, 200.0, 0.5);
        assert_eq!(position.x, 100.0);
        assert_eq!(position.y, 200.0);
        assert_eq!(position.angle, 0.5);
    }

    #[test]
    fn test_forward_at_zero_heading_moves_up() {
        let mut position = PositionData::new(10.0, 10.0, 0.0);
        position.forward();
        assert_approx_eq!(position.x, 10.0, 1e-9);
        assert_approx_eq!(position.y, 10.0 - MOVE_STEP, 1e-9);
        assert_eq!(position.angle, 0.0);
    }

    #[test]
    fn test_forward_is_monotonic_along_heading() {
        let start = PositionData::new(50.0, 75.0, 1.2);
        let mut position = start;

        let mut previous = 0.0;
        for step in 1..=20 {
            position.forward();

            // Projection of the displacement onto the heading vector.
            let dx = position.x - start.x;
            let dy = position.y - start.y;
            let along = dx * start.angle.sin() - dy * start.angle.cos();

            assert!(along > previous);
            assert_approx_eq!(along, MOVE_STEP * step as f64, 1e-9);
            assert_approx_eq!(position.angle, start.angle, 1e-12);
            previous = along;
        }
    }

    #[test]
    fn test_forward_is_deterministic() {
        let mut a = PositionData::new(3.0, 4.0, -0.7);
        let mut b = a;
        for _ in 0..10 {
            a.forward();
            b.forward();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_rotate_left_then_right_restores_heading() {
        for angle in [0.0, 0.3, -2.5, 7.0] {
            let mut position = PositionData::new(1.0, 2.0, angle);
            position.rotate_left();
            assert_approx_eq!(position.angle, angle - ROTATION_STEP, 1e-12);
            position.rotate_right();
            assert_approx_eq!(position.angle, angle, 1e-12);
            assert_eq!(position.x, 1.0);
            assert_eq!(position.y, 2.0);
        }
    }

    #[test]
    fn test_angle_is_not_normalized() {
        let mut position = PositionData::default();
        for _ in 0..200 {
            position.rotate_right();
        }
        assert!(position.angle > 2.0 * std::f64::consts::PI);
    }

    #[test]
    fn test_input_state_idle() {
        assert!(InputState::default().is_idle());
        let input = InputState {
            forward: false,
            rotate_left: true,
            rotate_right: false,
        };
        assert!(!input.is_idle());
    }

    #[test]
    fn test_player_id_ordering_and_display() {
        assert!(PlayerId(1) < PlayerId(2));
        assert_eq!(PlayerId(42).to_string(), "42");
    }
}
