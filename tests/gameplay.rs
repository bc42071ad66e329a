use glam::Vec3;

use watersheep::controller::{FrameLoop, FrameStatus, InputEvent};
use watersheep::model::camera::SPAWN;
use watersheep::model::game_state::{COMPANION_SPAWN, LAMP_SPAWN};
use watersheep::model::{Outcome, Projection};

const DT: f32 = 1.0 / 60.0;

fn press(frame: &mut FrameLoop, key: &str) {
    frame.input.process_event(&InputEvent::KeyDown(key.into()));
}

fn release(frame: &mut FrameLoop, key: &str) {
    frame.input.process_event(&InputEvent::KeyUp(key.into()));
}

fn run(frame: &mut FrameLoop, frames: usize) {
    for _ in 0..frames {
        assert_eq!(frame.update(DT), FrameStatus::Continue);
    }
}

/// Walk up to Sven, pick him up and let one more frame turn on horror mode.
fn pick_up_companion(frame: &mut FrameLoop) {
    frame.camera.position = COMPANION_SPAWN + Vec3::new(0.5, 0.25, 0.0);
    press(frame, "e");
    run(frame, 1);
    release(frame, "e");
    run(frame, 1);
}

#[test]
fn picking_up_sven_starts_horror_mode() {
    let mut frame = FrameLoop::new();
    run(&mut frame, 10);
    assert!(!frame.state.horror_mode);

    pick_up_companion(&mut frame);
    assert!(frame.state.companion.held);
    assert!(frame.state.horror_mode);

    let before = frame.state.stalker_pos;
    run(&mut frame, 30);
    let player = frame.camera.position;
    assert!(frame.state.stalker_pos.distance(player) < before.distance(player));
    assert_eq!(frame.state.outcome(), Outcome::Playing);
}

#[test]
fn lamp_follows_the_player_once_held() {
    let mut frame = FrameLoop::new();
    assert!(frame.camera.position.distance(LAMP_SPAWN) < 1.2);

    press(&mut frame, "f");
    run(&mut frame, 1);
    release(&mut frame, "f");
    assert!(frame.state.lamp.held);

    press(&mut frame, "a");
    run(&mut frame, 30);
    release(&mut frame, "a");
    run(&mut frame, 1);

    let expected = frame.camera.position + frame.camera.front();
    assert!(frame.state.lamp_pos.distance(expected) < 0.1);
}

#[test]
fn getting_caught_ends_the_game_until_reset() {
    let mut frame = FrameLoop::new();
    pick_up_companion(&mut frame);

    frame.camera.position = frame.state.hostile_pos + Vec3::new(0.0, 0.6, 0.0);
    run(&mut frame, 1);
    assert_eq!(frame.state.outcome(), Outcome::Lost);

    // outcome screen: pinned, orthographic and dark
    assert_eq!(frame.camera.position.x, 0.0);
    assert_eq!(frame.camera.position.z, 0.0);
    assert_eq!(frame.state.projection(), Projection::Orthographic);
    assert!(frame.state.is_dark);

    press(&mut frame, "w");
    run(&mut frame, 20);
    release(&mut frame, "w");
    assert_eq!(frame.camera.position.z, 0.0);
    assert!(frame.state.is_lost());

    press(&mut frame, "r");
    run(&mut frame, 1);
    release(&mut frame, "r");
    assert_eq!(frame.state.outcome(), Outcome::Playing);
    assert!(!frame.state.horror_mode);
    assert!(!frame.state.companion.held);
    assert_eq!(frame.state.companion_pos, COMPANION_SPAWN);
    assert!(frame.camera.position.abs_diff_eq(SPAWN, 1e-5));
}

#[test]
fn carrying_sven_into_the_portal_wins() {
    let mut frame = FrameLoop::new();
    pick_up_companion(&mut frame);

    // facing -Z, so Sven is carried one unit ahead into the portal; the win lands a frame later
    frame.camera.position = frame.state.portal_pos + Vec3::new(0.0, 0.6, 1.0);
    run(&mut frame, 1);
    assert!(!frame.state.is_won());
    run(&mut frame, 1);
    assert!(frame.state.is_won());

    run(&mut frame, 10);
    assert!(frame.state.is_won());

    press(&mut frame, "Escape");
    assert_eq!(frame.update(DT), FrameStatus::Exit);
}
