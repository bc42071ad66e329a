// MODEL: Camera and game state
pub mod camera;
pub mod game_state;

pub use camera::{Camera, CameraMovement, Projection};
pub use game_state::{Attenuation, GameState, Holdable, JumpState, Outcome};
