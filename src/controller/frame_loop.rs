use tracing::{debug, info, trace};

use crate::controller::camera_controller::CameraController;
use crate::controller::input::{Action, InputProcessor, InputState, KeyBindings};
use crate::controller::physics::JumpPhysics;
use crate::model::{Camera, GameState};

/// Longest step a single frame may take, in seconds.
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Exit,
}

/// Main game loop state and update logic
pub struct FrameLoop {
    pub camera: Camera,
    pub state: GameState,
    pub input: InputState,
    processor: InputProcessor,
    camera_controller: CameraController,
    physics: JumpPhysics,
    time: f32,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::with_bindings(KeyBindings::default())
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            camera: Camera::default(),
            state: GameState::new(),
            input: InputState::new(),
            processor: InputProcessor::new(bindings),
            camera_controller: CameraController::new(),
            physics: JumpPhysics::new(),
            time: 0.0,
        }
    }

    /// Seconds of game time since start. Drives bobbing and spinning.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn processor(&self) -> &InputProcessor {
        &self.processor
    }

    pub fn reset(&mut self) {
        self.camera.reset();
        self.state.reset();
    }

    /// Advance one frame: timers, outcome, carried objects, pursuit, jump, then input.
    pub fn update(&mut self, dt: f32) -> FrameStatus {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.time += dt;

        self.state.tick_debounce();
        self.physics.advance_clock(&mut self.state.jump);

        self.state.evaluate_outcome(self.camera.position);
        if self.state.is_over() {
            self.show_outcome_screen();
        }

        self.state.carry_held_objects(self.camera.position, self.camera.front(), self.time);

        self.state.pursue_player(self.camera.position, dt);

        if self.physics.integrate(&mut self.state.jump, &mut self.camera.position) {
            debug!(y = self.camera.position.y, "landed");
        }

        let status = self.process_input(dt);

        let (dx, dy) = self.input.consume_look();
        if !self.state.is_over() {
            self.camera_controller.apply_look(&mut self.camera, dx, dy);
        }

        trace!(
            pos = ?self.camera.position,
            yaw = self.camera.yaw(),
            pitch = self.camera.pitch(),
            "frame"
        );
        status
    }

    fn process_input(&mut self, dt: f32) -> FrameStatus {
        if self.processor.is_quit(&self.input) {
            info!("quit requested");
            return FrameStatus::Exit;
        }

        if self.processor.is_active(&self.input, Action::Reset) {
            self.reset();
            return FrameStatus::Continue;
        }

        // outcome screen only listens for reset and quit
        if self.state.is_over() {
            return FrameStatus::Continue;
        }

        if self.processor.is_jumping(&self.input)
            && self.physics.start(&mut self.state.jump, self.camera.position.y)
        {
            debug!(takeoff = self.camera.position.y, "jump");
        }

        let airborne = self.state.jump.airborne;
        if self.camera_controller.update_movement(
            &mut self.camera,
            &self.processor,
            &self.input,
            dt,
            airborne,
        ) {
            self.state.follow_camera(self.camera.position, self.camera.front(), self.time);
        }

        let eye = self.camera.position;
        if self.processor.is_active(&self.input, Action::PickUpLamp) {
            self.state.toggle_lamp(eye);
        }
        if self.processor.is_active(&self.input, Action::PickUpCompanion) {
            self.state.toggle_companion(eye);
        }
        if self.processor.is_active(&self.input, Action::ToggleProjection) {
            self.state.toggle_projection();
        }
        if self.processor.is_active(&self.input, Action::ToggleDarkness) {
            self.state.toggle_darkness();
        }
        if self.processor.is_active(&self.input, Action::WeakenLight) {
            self.state.attenuation.weaken();
        }
        if self.processor.is_active(&self.input, Action::StrengthenLight) {
            self.state.attenuation.strengthen();
        }

        FrameStatus::Continue
    }

    /// Full-screen "game over"/"you won" view: camera pinned, ortho, dark.
    fn show_outcome_screen(&mut self) {
        self.camera.face_default();
        self.camera.position.x = 0.0;
        self.camera.position.z = 0.0;
        self.state.orthographic = true;
        self.state.is_dark = true;
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputEvent;
    use crate::model::camera::{GROUND_HEIGHT, SPAWN};
    use crate::model::game_state::TOGGLE_COOLDOWN;

    const DT: f32 = 1.0 / 60.0;

    fn press(frame: &mut FrameLoop, key: &str) {
        frame.input.process_event(&InputEvent::KeyDown(key.into()));
    }

    fn release(frame: &mut FrameLoop, key: &str) {
        frame.input.process_event(&InputEvent::KeyUp(key.into()));
    }

    #[test]
    fn escape_exits() {
        let mut frame = FrameLoop::new();
        assert_eq!(frame.update(DT), FrameStatus::Continue);
        press(&mut frame, "Escape");
        assert_eq!(frame.update(DT), FrameStatus::Exit);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut frame = FrameLoop::new();
        frame.update(5.0);
        assert!((frame.time() - MAX_FRAME_DT).abs() < 1e-6);
        frame.update(-1.0);
        assert!((frame.time() - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn held_toggle_fires_once_per_cooldown() {
        let mut frame = FrameLoop::new();
        press(&mut frame, "p");
        let mut flips = 0;
        let mut last = frame.state.orthographic;
        for _ in 0..(TOGGLE_COOLDOWN * 3) {
            frame.update(DT);
            if frame.state.orthographic != last {
                flips += 1;
                last = frame.state.orthographic;
            }
        }
        assert_eq!(flips, 3);
    }

    #[test]
    fn jump_lands_back_on_the_ground() {
        let mut frame = FrameLoop::new();
        press(&mut frame, " ");
        frame.update(DT);
        release(&mut frame, " ");
        assert!(frame.state.jump.airborne);

        let mut peak: f32 = 0.0;
        for _ in 0..200 {
            frame.update(DT);
            peak = peak.max(frame.camera.position.y);
            if !frame.state.jump.airborne {
                break;
            }
        }
        assert!(!frame.state.jump.airborne);
        assert!(peak > GROUND_HEIGHT);
        assert_eq!(frame.camera.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn pointer_motion_turns_the_camera() {
        let mut frame = FrameLoop::new();
        frame.input.process_event(&InputEvent::PointerLockChanged { locked: true });
        frame.input.process_event(&InputEvent::MouseMove { dx: 100.0, dy: 0.0 });
        let before = frame.camera.yaw();
        frame.update(DT);
        assert!(frame.camera.yaw() > before);
    }

    #[test]
    fn reset_key_restores_camera() {
        let mut frame = FrameLoop::new();
        press(&mut frame, "d");
        for _ in 0..30 {
            frame.update(DT);
        }
        release(&mut frame, "d");
        assert!(frame.camera.position.x > 0.0);

        press(&mut frame, "r");
        frame.update(DT);
        assert_eq!(frame.camera.position, SPAWN);
    }

    #[test]
    fn outcome_is_checked_before_carrying() {
        let mut frame = FrameLoop::new();
        frame.state.horror_mode = true;
        frame.state.companion.held = true;
        frame.camera.position = frame.state.portal_pos + glam::Vec3::new(0.0, 0.6, 1.0);

        frame.update(DT);
        assert!(!frame.state.is_won());
        assert!((frame.state.companion_pos - frame.state.portal_pos).length() < 1.0);

        frame.update(DT);
        assert!(frame.state.is_won());
    }

    #[test]
    fn attenuation_keys_are_not_debounced() {
        let mut frame = FrameLoop::new();
        press(&mut frame, "k");
        frame.update(DT);
        frame.update(DT);
        let linear = frame.state.attenuation.linear;
        assert!((linear - 0.8).abs() < 1e-6, "0.7 * 1.2 clamps to 0.8, got {linear}");
    }
}
