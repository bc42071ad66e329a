use crate::controller::input::{InputProcessor, InputState};
use crate::model::{Camera, CameraMovement};

/// Turns pressed keys and pointer deltas into camera commands.
pub struct CameraController {
    pub constrain_pitch: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self { constrain_pitch: true }
    }

    /// Apply a pointer delta in screen space (y grows downward).
    pub fn apply_look(&self, camera: &mut Camera, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        camera.process_look(dx, -dy, self.constrain_pitch);
    }

    /// Step the camera for every held movement key. Returns whether it moved.
    pub fn update_movement(
        &self,
        camera: &mut Camera,
        processor: &InputProcessor,
        input: &InputState,
        dt: f32,
        airborne: bool,
    ) -> bool {
        let mut moved = false;
        let held = [
            (processor.is_moving_forward(input), CameraMovement::Forward),
            (processor.is_moving_backward(input), CameraMovement::Backward),
            (processor.is_moving_left(input), CameraMovement::Left),
            (processor.is_moving_right(input), CameraMovement::Right),
        ];
        for (pressed, direction) in held {
            if pressed {
                camera.process_movement(direction, dt, airborne);
                moved = true;
            }
        }
        moved
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputEvent;
    use crate::model::camera::{GROUND_HEIGHT, PITCH_LIMIT, SPAWN, SPEED};

    #[test]
    fn mouse_up_looks_up() {
        let controller = CameraController::new();
        let mut camera = Camera::default();
        controller.apply_look(&mut camera, 0.0, -50.0);
        assert!(camera.pitch() > 0.0);
        assert!(camera.front().y > 0.0);
    }

    #[test]
    fn look_is_pitch_clamped() {
        let controller = CameraController::new();
        let mut camera = Camera::default();
        controller.apply_look(&mut camera, 0.0, -100_000.0);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
    }

    #[test]
    fn opposite_keys_cancel() {
        let controller = CameraController::new();
        let processor = InputProcessor::default();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown("w".into()));
        input.process_event(&InputEvent::KeyDown("s".into()));

        let mut camera = Camera::default();
        assert!(controller.update_movement(&mut camera, &processor, &input, 0.5, false));
        assert!(camera.position.abs_diff_eq(SPAWN, 1e-5));
    }

    #[test]
    fn forward_walks_along_front() {
        let controller = CameraController::new();
        let processor = InputProcessor::default();
        let mut input = InputState::new();
        input.process_event(&InputEvent::KeyDown("w".into()));

        let mut camera = Camera::default();
        controller.update_movement(&mut camera, &processor, &input, 1.0, false);
        assert!((camera.position.z - (SPAWN.z - SPEED)).abs() < 1e-5);
        assert_eq!(camera.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn no_keys_no_movement() {
        let controller = CameraController::new();
        let mut camera = Camera::default();
        let moved = controller.update_movement(
            &mut camera,
            &InputProcessor::default(),
            &InputState::new(),
            1.0,
            false,
        );
        assert!(!moved);
        assert_eq!(camera.position, SPAWN);
    }
}
