use glam::Vec3;

use crate::model::JumpState;

/// Closed-form jump arc: `y = takeoff + scale * (2t + gravity * t^2)`.
///
/// The clock advances a fixed amount per frame rather than by wall time, so
/// the arc has the same shape at any frame rate.
pub struct JumpPhysics {
    pub gravity: f32,
    pub scale: f32,
    pub clock_step: f32,
    pub clock_cap: f32,
}

impl JumpPhysics {
    pub fn new() -> Self {
        Self {
            gravity: -6.0,
            scale: 6.0,
            clock_step: 0.01,
            clock_cap: 0.5,
        }
    }

    /// Leave the ground from `height`. Ignored while already airborne.
    pub fn start(&self, state: &mut JumpState, height: f32) -> bool {
        if state.airborne {
            return false;
        }
        state.clock = 0.0;
        state.airborne = true;
        state.takeoff_height = height;
        true
    }

    /// Per-frame clock tick, runs whether or not the player is airborne.
    pub fn advance_clock(&self, state: &mut JumpState) {
        if state.clock < self.clock_cap {
            state.clock += self.clock_step;
        }
    }

    pub fn height_at(&self, takeoff_height: f32, clock: f32) -> f32 {
        takeoff_height + self.scale * (2.0 * clock + self.gravity * clock * clock)
    }

    /// Apply the arc to `position.y`. Returns `true` on the frame the player lands.
    pub fn integrate(&self, state: &mut JumpState, position: &mut Vec3) -> bool {
        if !state.airborne {
            return false;
        }
        position.y = self.height_at(state.takeoff_height, state.clock);

        if position.y < state.takeoff_height && state.clock > 0.0 {
            state.airborne = false;
            position.y = state.takeoff_height;
            return true;
        }
        false
    }
}

impl Default for JumpPhysics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One frame in the order the frame loop runs it.
    fn step(physics: &JumpPhysics, state: &mut JumpState, pos: &mut Vec3) -> bool {
        physics.advance_clock(state);
        physics.integrate(state, pos)
    }

    #[test]
    fn jump_rises_then_falls_and_lands_exactly() {
        let physics = JumpPhysics::new();
        let mut state = JumpState::default();
        let mut pos = Vec3::new(0.0, 0.6, 0.0);

        assert!(physics.start(&mut state, pos.y));

        let mut heights = Vec::new();
        let mut landed = false;
        for _ in 0..100 {
            if step(&physics, &mut state, &mut pos) {
                landed = true;
                break;
            }
            heights.push(pos.y);
        }

        assert!(landed, "never landed");
        assert!(!state.airborne);
        assert_eq!(pos.y, 0.6);

        // strictly up to the apex, strictly down after it
        let apex = heights
            .iter()
            .enumerate()
            .fold(0, |best, (i, h)| if *h > heights[best] { i } else { best });
        assert!(apex > 0 && apex < heights.len() - 1);
        for w in heights[..=apex].windows(2) {
            assert!(w[1] > w[0]);
        }
        for w in heights[apex..].windows(2) {
            assert!(w[1] < w[0]);
        }
        for h in &heights {
            assert!(*h >= 0.6);
        }
    }

    #[test]
    fn landing_happens_on_first_frame_below_takeoff() {
        let physics = JumpPhysics::new();
        let mut state = JumpState::default();
        let mut pos = Vec3::new(0.0, 1.0, 0.0);
        physics.start(&mut state, pos.y);

        loop {
            physics.advance_clock(&mut state);
            let predicted = physics.height_at(state.takeoff_height, state.clock);
            let landed = physics.integrate(&mut state, &mut pos);
            assert_eq!(landed, predicted < 1.0);
            if landed {
                break;
            }
        }
    }

    #[test]
    fn cannot_start_while_airborne() {
        let physics = JumpPhysics::new();
        let mut state = JumpState::default();
        assert!(physics.start(&mut state, 0.6));
        state.clock = 0.1;
        assert!(!physics.start(&mut state, 5.0));
        assert_eq!(state.takeoff_height, 0.6);
        assert_eq!(state.clock, 0.1);
    }

    #[test]
    fn clock_is_capped() {
        let physics = JumpPhysics::new();
        let mut state = JumpState::default();
        for _ in 0..1000 {
            physics.advance_clock(&mut state);
        }
        assert!(state.clock < physics.clock_cap + physics.clock_step);
    }

    #[test]
    fn grounded_integrate_leaves_height_alone() {
        let physics = JumpPhysics::new();
        let mut state = JumpState::default();
        let mut pos = Vec3::new(0.0, 3.0, 0.0);
        assert!(!physics.integrate(&mut state, &mut pos));
        assert_eq!(pos.y, 3.0);
    }
}
