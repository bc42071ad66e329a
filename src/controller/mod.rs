// CONTROLLER: Input, game logic, and update loop
pub mod input;
pub mod physics;
pub mod pursuit;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{Action, InputEvent, InputProcessor, InputState, KeyBindings};
pub use physics::JumpPhysics;
pub use camera_controller::CameraController;
pub use frame_loop::{FrameLoop, FrameStatus};
