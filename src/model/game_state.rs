use glam::Vec3;
use tracing::{debug, info};

use super::camera::Projection;
use crate::controller::pursuit::{self, DEFAULT_FACING};

/// How close the player must be to pick something up.
pub const PICKUP_RANGE: f32 = 1.2;
/// The zombie catches the player at this distance.
pub const HOSTILE_CATCH_RANGE: f32 = 1.0;
/// The water sheep has to get closer before it counts.
pub const STALKER_CATCH_RANGE: f32 = 0.5;
/// Companion within this distance of the portal wins the game.
pub const GOAL_RANGE: f32 = 1.0;

/// Frames a toggle stays locked after it fires.
pub const TOGGLE_COOLDOWN: u32 = 20;

pub const LAMP_SPAWN: Vec3 = Vec3::new(0.0, 0.4, 8.0);
pub const COMPANION_SPAWN: Vec3 = Vec3::new(-3.5, 0.35, -1.0);
pub const STALKER_SPAWN: Vec3 = Vec3::new(-2.5, 0.35, -7.0);
pub const HOSTILE_SPAWN: Vec3 = Vec3::new(1.0, 0.0, 8.0);
pub const PORTAL_SPAWN: Vec3 = Vec3::new(9.0, 0.0, 0.0);

pub const LAMP_MIN_HEIGHT: f32 = 0.2;
pub const COMPANION_MIN_HEIGHT: f32 = 0.35;

pub const LINEAR_DEFAULT: f32 = 0.7;
pub const QUADRATIC_DEFAULT: f32 = 0.25;
pub const LINEAR_RANGE: (f32, f32) = (0.05, 0.8);
pub const QUADRATIC_RANGE: (f32, f32) = (0.0075, 2.0);
pub const LINEAR_FACTOR: f32 = 1.2;
pub const QUADRATIC_FACTOR: f32 = LINEAR_FACTOR * LINEAR_FACTOR;

pub fn check_proximity(a: Vec3, b: Vec3, threshold: f32) -> bool {
    a.distance(b) <= threshold
}

/// Something the player can carry: the lamp or the companion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Holdable {
    pub held: bool,
    pub in_reach: bool,
}

/// Frame countdown gating a toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Debounce(u32);

impl Debounce {
    pub fn ready(self) -> bool {
        self.0 == 0
    }

    pub fn remaining(self) -> u32 {
        self.0
    }

    pub fn arm(&mut self, frames: u32) {
        self.0 = frames;
    }

    pub fn tick(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceCounters {
    pub lamp: Debounce,
    pub companion: Debounce,
    pub projection: Debounce,
    pub darkness: Debounce,
}

impl DebounceCounters {
    pub fn tick(&mut self) {
        self.lamp.tick();
        self.companion.tick();
        self.projection.tick();
        self.darkness.tick();
    }
}

/// Pick up or drop `holdable`. Only fires when `debounce` has run out.
///
/// Returns `true` if the press was consumed (the cooldown was armed), even
/// when nothing was in reach.
pub fn toggle_held(holdable: &mut Holdable, debounce: &mut Debounce) -> bool {
    if !debounce.ready() {
        return false;
    }
    debounce.arm(TOGGLE_COOLDOWN);

    if holdable.held {
        holdable.held = false;
    } else if holdable.in_reach {
        holdable.held = true;
    }
    true
}

/// Point-light falloff coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn new() -> Self {
        Self { linear: LINEAR_DEFAULT, quadratic: QUADRATIC_DEFAULT }
    }

    /// Light falls off faster (shorter reach).
    pub fn strengthen(&mut self) {
        self.linear = (self.linear * LINEAR_FACTOR).min(LINEAR_RANGE.1);
        self.quadratic = (self.quadratic * QUADRATIC_FACTOR).min(QUADRATIC_RANGE.1);
    }

    /// Light falls off slower (longer reach).
    pub fn weaken(&mut self) {
        self.linear = (self.linear / LINEAR_FACTOR).max(LINEAR_RANGE.0);
        self.quadratic = (self.quadratic / QUADRATIC_FACTOR).max(QUADRATIC_RANGE.0);
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Playing,
    Lost,
    Won,
}

/// Airborne bookkeeping for the player's jump (see `controller::physics`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpState {
    pub airborne: bool,
    pub takeoff_height: f32,
    pub clock: f32,
}

/// Everything about a run besides the camera.
#[derive(Debug, Clone)]
pub struct GameState {
    pub lamp: Holdable,
    pub companion: Holdable,
    pub orthographic: bool,
    pub horror_mode: bool,
    pub is_dark: bool,
    outcome: Outcome,
    pub jump: JumpState,

    pub lamp_pos: Vec3,
    pub companion_pos: Vec3,
    pub hostile_pos: Vec3,
    pub stalker_pos: Vec3,
    pub portal_pos: Vec3,
    pub hostile_facing: f32,
    pub stalker_facing: f32,

    pub attenuation: Attenuation,
    pub debounce: DebounceCounters,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            lamp: Holdable::default(),
            companion: Holdable::default(),
            orthographic: false,
            horror_mode: false,
            is_dark: false,
            outcome: Outcome::Playing,
            jump: JumpState::default(),
            lamp_pos: LAMP_SPAWN,
            companion_pos: COMPANION_SPAWN,
            hostile_pos: HOSTILE_SPAWN,
            stalker_pos: STALKER_SPAWN,
            portal_pos: PORTAL_SPAWN,
            hostile_facing: DEFAULT_FACING,
            stalker_facing: DEFAULT_FACING,
            attenuation: Attenuation::new(),
            debounce: DebounceCounters::default(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
        info!("game reset");
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_lost(&self) -> bool {
        self.outcome == Outcome::Lost
    }

    pub fn is_won(&self) -> bool {
        self.outcome == Outcome::Won
    }

    pub fn is_over(&self) -> bool {
        self.outcome != Outcome::Playing
    }

    pub fn projection(&self) -> Projection {
        if self.orthographic {
            Projection::Orthographic
        } else {
            Projection::Perspective
        }
    }

    pub fn tick_debounce(&mut self) {
        self.debounce.tick();
    }

    pub fn toggle_lamp(&mut self, player: Vec3) -> bool {
        self.lamp.in_reach = check_proximity(player, self.lamp_pos, PICKUP_RANGE);
        let was_held = self.lamp.held;
        let fired = toggle_held(&mut self.lamp, &mut self.debounce.lamp);
        if self.lamp.held != was_held {
            info!(held = self.lamp.held, "lamp");
        }
        fired
    }

    pub fn toggle_companion(&mut self, player: Vec3) -> bool {
        self.companion.in_reach = check_proximity(player, self.companion_pos, PICKUP_RANGE);
        let was_held = self.companion.held;
        let fired = toggle_held(&mut self.companion, &mut self.debounce.companion);
        if self.companion.held != was_held {
            info!(held = self.companion.held, "companion");
        }
        fired
    }

    pub fn toggle_projection(&mut self) -> bool {
        if !self.debounce.projection.ready() {
            return false;
        }
        self.debounce.projection.arm(TOGGLE_COOLDOWN);
        self.orthographic = !self.orthographic;
        debug!(orthographic = self.orthographic, "projection toggled");
        true
    }

    pub fn toggle_darkness(&mut self) -> bool {
        if !self.debounce.darkness.ready() {
            return false;
        }
        self.debounce.darkness.arm(TOGGLE_COOLDOWN);
        self.is_dark = !self.is_dark;
        debug!(is_dark = self.is_dark, "darkness toggled");
        true
    }

    /// Win/loss check, horror mode only. Lost and Won are terminal until reset,
    /// and a win on the same frame as a catch counts as a win.
    pub fn evaluate_outcome(&mut self, player: Vec3) -> Outcome {
        if !self.horror_mode || self.is_over() {
            return self.outcome;
        }

        if check_proximity(player, self.hostile_pos, HOSTILE_CATCH_RANGE)
            || check_proximity(player, self.stalker_pos, STALKER_CATCH_RANGE)
        {
            self.outcome = Outcome::Lost;
        }

        if check_proximity(self.companion_pos, self.portal_pos, GOAL_RANGE) {
            self.outcome = Outcome::Won;
        }

        match self.outcome {
            Outcome::Lost => info!("caught, game lost"),
            Outcome::Won => info!("companion reached the portal, game won"),
            Outcome::Playing => {}
        }
        self.outcome
    }

    /// Keep held objects in front of the camera. `time` drives the lamp bob.
    pub fn follow_camera(&mut self, eye: Vec3, front: Vec3, time: f32) {
        if self.lamp.held {
            let mut anchor = eye;
            let mut ahead = front;
            anchor.y += time.sin() / 60.0;
            ahead.y += (time * 3.0).sin() / 40.0;
            self.lamp_pos = anchor + ahead;
            self.lamp_pos.y = self.lamp_pos.y.max(LAMP_MIN_HEIGHT);
        }

        if self.companion.held {
            self.companion_pos = eye + front;
            self.companion_pos.y = self.companion_pos.y.max(COMPANION_MIN_HEIGHT);
        }
    }

    /// Once-per-frame carry update: held objects follow the camera, a free
    /// lamp floats in place, and holding the companion starts horror mode.
    pub fn carry_held_objects(&mut self, eye: Vec3, front: Vec3, time: f32) {
        self.follow_camera(eye, front, time);

        if !self.lamp.held {
            self.lamp_pos.y += (time * 10.0).sin() / 250.0;
            self.lamp_pos.y = self.lamp_pos.y.max(LAMP_MIN_HEIGHT);
        }

        if self.companion.held && !self.horror_mode {
            self.horror_mode = true;
            info!("horror mode");
        }
    }

    /// Both hostiles chase `player`. No-op outside horror mode or after the game ended.
    pub fn pursue_player(&mut self, player: Vec3, dt: f32) {
        if !self.horror_mode || self.is_over() {
            return;
        }

        let hostile = pursuit::pursue(self.hostile_pos, player, dt);
        self.hostile_pos = hostile.position;
        self.hostile_facing = hostile.facing;

        let stalker = pursuit::pursue(self.stalker_pos, player, dt);
        self.stalker_pos = stalker.position;
        self.stalker_facing = stalker.facing;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
