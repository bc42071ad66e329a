//! Chase behaviour for the hostile NPCs.
//!
//! Pursuers walk on the XZ plane. The axis with the larger gap is walked
//! proportionally faster so the pursuer heads roughly straight at its target.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

/// Speed along the shorter axis, in world units per second.
pub const PURSUIT_SPEED: f32 = 0.25;

/// Pursuers stop closing in once this close, so they don't jitter on contact.
pub const CONTACT_RANGE: f32 = 0.5;

/// Axis gaps smaller than this count as zero when forming the speed ratio.
pub const RATIO_EPSILON: f32 = 1e-4;

/// Facing used when a pursuer is idle.
pub const DEFAULT_FACING: f32 = PI;

/// Relative speed factors for two axes, taken by magnitude.
///
/// The smaller axis gets `1.0` and the larger gets `larger / smaller`. When
/// the smaller gap is within [`RATIO_EPSILON`] of zero only the larger axis
/// moves: `(1.0, 0.0)` or `(0.0, 1.0)`.
pub fn axis_ratio(a: f32, b: f32) -> (f32, f32) {
    let (a, b) = (a.abs(), b.abs());
    if a > b {
        if b < RATIO_EPSILON {
            (1.0, 0.0)
        } else {
            (a / b, 1.0)
        }
    } else if a < b {
        if a < RATIO_EPSILON {
            (0.0, 1.0)
        } else {
            (1.0, b / a)
        }
    } else {
        (1.0, 1.0)
    }
}

/// Which side of the pursuer the target is on, by sign of the XZ offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// +x, +z
    PlusXPlusZ,
    /// +x, -z
    PlusXMinusZ,
    /// -x, -z
    MinusXMinusZ,
    /// -x, +z
    MinusXPlusZ,
    /// Offset lies on one axis (or is zero).
    AlongAxis,
}

impl Heading {
    pub fn of(offset: Vec3) -> Self {
        let (dx, dz) = (offset.x, offset.z);
        if dx > 0.0 && dz > 0.0 {
            Heading::PlusXPlusZ
        } else if dx > 0.0 && dz < 0.0 {
            Heading::PlusXMinusZ
        } else if dx < 0.0 && dz < 0.0 {
            Heading::MinusXMinusZ
        } else if dx < 0.0 && dz > 0.0 {
            Heading::MinusXPlusZ
        } else {
            Heading::AlongAxis
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitStep {
    pub position: Vec3,
    /// Rotation about +Y (radians) that turns the model toward the target.
    pub facing: f32,
}

/// Advance `npc` one frame toward `target`.
pub fn pursue(npc: Vec3, target: Vec3, dt: f32) -> PursuitStep {
    let offset = target - npc;
    let (x_ratio, z_ratio) = axis_ratio(offset.x, offset.z);
    let x_speed = PURSUIT_SPEED * x_ratio * dt;
    let z_speed = PURSUIT_SPEED * z_ratio * dt;

    let (step_x, step_z, facing) = match Heading::of(offset) {
        Heading::PlusXPlusZ => (x_speed, z_speed, PI + (offset.x / offset.z).atan()),
        Heading::PlusXMinusZ => (x_speed, -z_speed, (offset.x / offset.z).atan()),
        Heading::MinusXMinusZ => (-x_speed, -z_speed, (offset.x / offset.z).atan()),
        Heading::MinusXPlusZ => (-x_speed, z_speed, PI + (offset.x / offset.z).atan()),
        Heading::AlongAxis => {
            let facing = if offset.z > 0.0 {
                PI
            } else if offset.z < 0.0 {
                0.0
            } else if offset.x > 0.0 {
                -FRAC_PI_2
            } else if offset.x < 0.0 {
                FRAC_PI_2
            } else {
                DEFAULT_FACING
            };
            (axis_step(offset.x, x_speed), axis_step(offset.z, z_speed), facing)
        }
    };

    // a huge ratio on one axis must not carry the pursuer past the target
    let step_x = step_x.clamp(-offset.x.abs(), offset.x.abs());
    let step_z = step_z.clamp(-offset.z.abs(), offset.z.abs());

    if offset.length() > CONTACT_RANGE {
        PursuitStep {
            position: Vec3::new(npc.x + step_x, npc.y, npc.z + step_z),
            facing,
        }
    } else {
        PursuitStep { position: npc, facing }
    }
}

fn axis_step(gap: f32, speed: f32) -> f32 {
    if gap > 0.0 {
        speed
    } else if gap < 0.0 {
        -speed
    } else {
        0.0
    }
}
