use glam::{Mat4, Vec3};

pub const YAW: f32 = -90.0;
pub const PITCH: f32 = 0.0;
pub const SPEED: f32 = 2.5;
pub const SENSITIVITY: f32 = 0.1;
pub const PITCH_LIMIT: f32 = 89.0;

/// Eye height while walking on the ground plane.
pub const GROUND_HEIGHT: f32 = 0.6;

/// Where the player starts (and returns to on reset).
pub const SPAWN: Vec3 = Vec3::new(0.0, 0.6, 9.0);

pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;
pub const ORTHO_HALF_EXTENT: f32 = 20.0;
pub const ORTHO_DEPTH: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// First-person camera driven by Euler angles (degrees).
///
/// `front`, `right` and `up` are derived from `yaw`/`pitch` and only change
/// through [`Camera::process_look`], [`Camera::face_default`] or [`Camera::reset`].
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    spawn: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self::with_orientation(position, Vec3::Y, YAW, PITCH)
    }

    pub fn with_orientation(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            spawn: position,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 { self.front }
    pub fn right(&self) -> Vec3 { self.right }
    pub fn up(&self) -> Vec3 { self.up }
    pub fn yaw(&self) -> f32 { self.yaw }
    pub fn pitch(&self) -> f32 { self.pitch }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, projection: Projection, aspect: f32) -> Mat4 {
        match projection {
            Projection::Perspective => {
                Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR)
            }
            Projection::Orthographic => Mat4::orthographic_rh(
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                0.0,
                ORTHO_DEPTH,
            ),
        }
    }

    /// Move one step. Walking forward/backward on the ground keeps the eye at
    /// [`GROUND_HEIGHT`] so the player can neither sink nor fly.
    pub fn process_movement(&mut self, direction: CameraMovement, dt: f32, airborne: bool) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => {
                self.position += self.front * velocity;
                if !airborne {
                    self.position.y = GROUND_HEIGHT;
                }
            }
            CameraMovement::Backward => {
                self.position -= self.front * velocity;
                if !airborne {
                    self.position.y = GROUND_HEIGHT;
                }
            }
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    pub fn process_look(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_vectors();
    }

    /// Look straight down -Z, level with the horizon.
    pub fn face_default(&mut self) {
        self.yaw = YAW;
        self.pitch = PITCH;
        self.update_vectors();
    }

    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.world_up = Vec3::Y;
        self.face_default();
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(SPAWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        assert!((f.length() - 1.0).abs() < EPS, "front not unit: {f:?}");
        assert!((r.length() - 1.0).abs() < EPS, "right not unit: {r:?}");
        assert!((u.length() - 1.0).abs() < EPS, "up not unit: {u:?}");
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(camera.right().abs_diff_eq(Vec3::X, EPS));
        assert!(camera.up().abs_diff_eq(Vec3::Y, EPS));
        assert_eq!(camera.position, SPAWN);
    }

    #[test]
    fn basis_stays_orthonormal_across_look_inputs() {
        let mut camera = Camera::default();
        let deltas = [
            (10.0, 5.0), (-300.0, 40.0), (1234.5, -987.0), (0.3, 0.0),
            (-45.0, -600.0), (720.0, 720.0), (-1.0, 1.0),
        ];
        for (dx, dy) in deltas {
            camera.process_look(dx, dy, true);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn pitch_is_clamped_regardless_of_input_size() {
        let mut camera = Camera::default();
        for _ in 0..50 {
            camera.process_look(0.0, 1000.0, true);
            assert!(camera.pitch() <= PITCH_LIMIT);
        }
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        for _ in 0..50 {
            camera.process_look(0.0, -1000.0, true);
            assert!(camera.pitch() >= -PITCH_LIMIT);
        }
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn unconstrained_look_can_exceed_the_limit() {
        let mut camera = Camera::default();
        camera.process_look(0.0, 1000.0, false);
        assert!(camera.pitch() > PITCH_LIMIT);
    }

    #[test]
    fn look_scales_by_sensitivity() {
        let mut camera = Camera::default();
        camera.process_look(10.0, 20.0, true);
        assert!((camera.yaw() - (YAW + 1.0)).abs() < EPS);
        assert!((camera.pitch() - 2.0).abs() < EPS);
    }

    #[test]
    fn grounded_forward_and_backward_pin_eye_height() {
        let mut camera = Camera::default();
        camera.process_look(0.0, 300.0, true);
        camera.position.y = 3.0;

        camera.process_movement(CameraMovement::Forward, 0.5, false);
        assert_eq!(camera.position.y, GROUND_HEIGHT);

        camera.position.y = -1.0;
        camera.process_movement(CameraMovement::Backward, 0.5, false);
        assert_eq!(camera.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn airborne_forward_follows_front_vector() {
        let mut camera = Camera::default();
        camera.process_look(0.0, 300.0, true);
        let start = camera.position;
        camera.process_movement(CameraMovement::Forward, 1.0, true);
        let expected = start + camera.front() * SPEED;
        assert!(camera.position.abs_diff_eq(expected, EPS));
        assert!(camera.position.y > GROUND_HEIGHT);
    }

    #[test]
    fn strafing_ignores_ground_pin() {
        let mut camera = Camera::default();
        camera.position.y = 2.0;
        camera.process_movement(CameraMovement::Right, 1.0, false);
        assert_eq!(camera.position.y, 2.0);
        assert!((camera.position.x - SPEED).abs() < EPS);

        camera.process_movement(CameraMovement::Left, 2.0, false);
        assert!((camera.position.x + SPEED).abs() < EPS);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        camera.process_look(25.0, -10.0, true);
        let eye_in_view = camera.view_matrix().transform_point3(camera.position);
        assert!(eye_in_view.abs_diff_eq(Vec3::ZERO, 1e-4));
        let ahead = camera.view_matrix().transform_point3(camera.position + camera.front());
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn reset_restores_spawn_and_orientation() {
        let mut camera = Camera::default();
        camera.process_look(123.0, 45.0, true);
        camera.process_movement(CameraMovement::Left, 3.0, false);
        camera.reset();
        assert_eq!(camera.position, SPAWN);
        assert_eq!(camera.yaw(), YAW);
        assert_eq!(camera.pitch(), PITCH);
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPS));
    }
}
