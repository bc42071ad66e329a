//! What gets drawn each frame, and how, given the camera and game state.

use glam::{Mat4, Vec3};

use crate::model::{Camera, GameState, Outcome};
use crate::view::backend::{RenderBackend, Shader};
use crate::view::texture::{SceneTextures, TextureHandle};

pub const AMBIENT_DARK: f32 = 2.1;
pub const AMBIENT_BRIGHT: f32 = 0.4;
pub const DIFFUSE: f32 = 0.3;
pub const SPECULAR: f32 = 1.0;
pub const LIGHT_CONSTANT: f32 = 1.0;
pub const SHININESS: f32 = 32.0;
pub const LAMP_INTENSITY: f32 = 1.0;

const SKY_PANELS: [(Vec3, Vec3); 5] = [
    (Vec3::new(0.0, 5.0, 10.0), Vec3::new(20.0, 20.0, 0.01)),
    (Vec3::new(0.0, 5.0, -10.0), Vec3::new(20.0, 20.0, 0.01)),
    (Vec3::new(10.0, 5.0, 0.0), Vec3::new(0.01, 20.0, 20.0)),
    (Vec3::new(-10.0, 5.0, 0.0), Vec3::new(0.01, 20.0, 20.0)),
    (Vec3::new(0.0, 10.0, 0.0), Vec3::new(20.0, 0.01, 20.0)),
];

pub const TREE_POSITIONS: [Vec3; 36] = [
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, -1.0),
    Vec3::new(2.0, 0.0, 2.0),
    Vec3::new(2.0, 0.0, -2.0),
    Vec3::new(-2.0, 0.0, 2.0),
    Vec3::new(-2.0, 0.0, -2.0),
    Vec3::new(4.0, 0.0, 4.0),
    Vec3::new(4.0, 0.0, -4.0),
    Vec3::new(-4.0, 0.0, 4.0),
    Vec3::new(-4.0, 0.0, -4.0),
    Vec3::new(2.0, 0.0, 4.0),
    Vec3::new(2.0, 0.0, -4.0),
    Vec3::new(-2.0, 0.0, 4.0),
    Vec3::new(-2.0, 0.0, -4.0),
    Vec3::new(4.0, 0.0, 2.0),
    Vec3::new(4.0, 0.0, -2.0),
    Vec3::new(-4.0, 0.0, 2.0),
    Vec3::new(-4.0, 0.0, -2.0),
    Vec3::new(8.0, 0.0, 8.0),
    Vec3::new(8.0, 0.0, -8.0),
    Vec3::new(-8.0, 0.0, 8.0),
    Vec3::new(-8.0, 0.0, -8.0),
    Vec3::new(6.0, 0.0, 8.0),
    Vec3::new(6.0, 0.0, -8.0),
    Vec3::new(-6.0, 0.0, 8.0),
    Vec3::new(-6.0, 0.0, -8.0),
    Vec3::new(4.0, 0.0, 8.0),
    Vec3::new(4.0, 0.0, -8.0),
    Vec3::new(-4.0, 0.0, 8.0),
    Vec3::new(-4.0, 0.0, -8.0),
    Vec3::new(2.0, 0.0, 8.0),
    Vec3::new(2.0, 0.0, -8.0),
    Vec3::new(-2.0, 0.0, 8.0),
    Vec3::new(-2.0, 0.0, -8.0),
];

const TRUNK_BLOCKS: [f32; 4] = [0.1, 0.55, 1.0, 1.45];

const PORTAL_FRAME: [Vec3; 14] = [
    Vec3::new(0.0, 0.2, 0.2),
    Vec3::new(0.0, 0.2, 0.6),
    Vec3::new(0.0, 0.6, 0.6),
    Vec3::new(0.0, 1.0, 0.6),
    Vec3::new(0.0, 1.4, 0.6),
    Vec3::new(0.0, 1.8, 0.6),
    Vec3::new(0.0, 1.8, 0.2),
    Vec3::new(0.0, 0.2, -0.2),
    Vec3::new(0.0, 0.2, -0.6),
    Vec3::new(0.0, 0.6, -0.6),
    Vec3::new(0.0, 1.0, -0.6),
    Vec3::new(0.0, 1.4, -0.6),
    Vec3::new(0.0, 1.8, -0.6),
    Vec3::new(0.0, 1.8, -0.2),
];

const PORTAL_PANES: [Vec3; 6] = [
    Vec3::new(0.0, 0.6, 0.2),
    Vec3::new(0.0, 1.0, 0.2),
    Vec3::new(0.0, 1.4, 0.2),
    Vec3::new(0.0, 0.6, -0.2),
    Vec3::new(0.0, 1.0, -0.2),
    Vec3::new(0.0, 1.4, -0.2),
];

/// Quadruped legs, relative to the head.
const LEGS: [Vec3; 4] = [
    Vec3::new(-0.075, -0.2, 0.05),
    Vec3::new(0.075, -0.2, 0.05),
    Vec3::new(-0.075, -0.2, 0.4),
    Vec3::new(0.075, -0.2, 0.4),
];

/// Pursuers turn about a point half a unit in front of their origin.
const PIVOT: Vec3 = Vec3::new(0.0, 0.0, -0.5);

fn translate(offset: Vec3) -> Mat4 {
    Mat4::from_translation(offset)
}

fn scale(factors: Vec3) -> Mat4 {
    Mat4::from_scale(factors)
}

fn cube<B: RenderBackend + ?Sized>(backend: &mut B, texture: TextureHandle, model: Mat4) {
    backend.bind_texture(0, texture);
    backend.bind_texture(1, texture);
    backend.set_mat4("model", model);
    backend.draw_cube();
}

/// Record a full frame. `time` is game time in seconds and only drives animation.
pub fn draw_scene<B: RenderBackend + ?Sized>(
    backend: &mut B,
    camera: &Camera,
    state: &GameState,
    textures: &SceneTextures,
    aspect: f32,
    time: f32,
) {
    let projection = camera.projection_matrix(state.projection(), aspect);
    let view = camera.view_matrix();

    backend.use_shader(Shader::Lighting);
    set_lighting(backend, camera, state);
    backend.set_mat4("projection", projection);
    backend.set_mat4("view", view);

    match state.outcome() {
        Outcome::Lost => outcome_panel(backend, textures.game_over),
        Outcome::Won => outcome_panel(backend, textures.game_won),
        Outcome::Playing => {
            if !state.horror_mode {
                sky(backend, textures.sky);
            }
            sky(backend, textures.bars);
            trees(backend, state, textures, time);
            portal(backend, state.portal_pos, textures);
            ground(backend, state, textures);
            companion(backend, state, textures, time);
            stalker(backend, state, textures);
            hostile(backend, state, textures, time);
            lamp(backend, state, textures, projection, view, time);
        }
    }
}

fn set_lighting<B: RenderBackend + ?Sized>(backend: &mut B, camera: &Camera, state: &GameState) {
    let ambient = if state.is_dark { AMBIENT_DARK } else { AMBIENT_BRIGHT };
    backend.set_vec3("light.position", state.lamp_pos);
    backend.set_vec3("viewPos", camera.position);
    backend.set_vec3("light.ambient", Vec3::splat(ambient));
    backend.set_vec3("light.diffuse", Vec3::splat(DIFFUSE));
    backend.set_vec3("light.specular", Vec3::splat(SPECULAR));
    backend.set_float("light.constant", LIGHT_CONSTANT);
    backend.set_float("light.linear", state.attenuation.linear);
    backend.set_float("light.quadratic", state.attenuation.quadratic);
    backend.set_float("material.shininess", SHININESS);
}

fn outcome_panel<B: RenderBackend + ?Sized>(backend: &mut B, texture: TextureHandle) {
    let model = translate(Vec3::new(0.0, 0.0, 0.1)) * scale(Vec3::new(30.0, 20.0, 5.0));
    cube(backend, texture, model);
}

fn sky<B: RenderBackend + ?Sized>(backend: &mut B, texture: TextureHandle) {
    for (position, size) in SKY_PANELS {
        cube(backend, texture, translate(position) * scale(size));
    }
}

fn ground<B: RenderBackend + ?Sized>(backend: &mut B, state: &GameState, textures: &SceneTextures) {
    let texture = if state.horror_mode { textures.bloody_dirt } else { textures.dirt };
    cube(backend, texture, scale(Vec3::new(20.0, 0.01, 20.0)));
}

fn trees<B: RenderBackend + ?Sized>(
    backend: &mut B,
    state: &GameState,
    textures: &SceneTextures,
    time: f32,
) {
    let (wood, leaves) = if state.horror_mode {
        (textures.obsidian, textures.netherrack)
    } else {
        (textures.wood, textures.leaf)
    };
    let sway = if state.horror_mode { (time * 10.0).sin() / 10.0 } else { 0.0 };

    for tree in TREE_POSITIONS {
        for height in TRUNK_BLOCKS {
            let model = translate(tree) * translate(Vec3::new(0.0, height, 0.0)) * scale(Vec3::splat(0.45));
            cube(backend, wood, model);
        }
        let model = translate(tree)
            * translate(Vec3::new(0.0, sway, 0.0))
            * translate(Vec3::new(0.0, 2.5, 0.0))
            * scale(Vec3::splat(1.7));
        cube(backend, leaves, model);
    }
}

fn portal<B: RenderBackend + ?Sized>(backend: &mut B, origin: Vec3, textures: &SceneTextures) {
    for block in PORTAL_FRAME {
        cube(backend, textures.glowstone, translate(origin) * translate(block) * scale(Vec3::splat(0.4)));
    }
    for pane in PORTAL_PANES {
        let model = translate(origin) * translate(pane) * scale(Vec3::new(0.01, 0.4, 0.4));
        cube(backend, textures.portal, model);
    }
}

fn companion<B: RenderBackend + ?Sized>(
    backend: &mut B,
    state: &GameState,
    textures: &SceneTextures,
    time: f32,
) {
    let at = translate(state.companion_pos);

    cube(backend, textures.sven_head, at * scale(Vec3::splat(0.25)));
    cube(
        backend,
        textures.sven_body,
        at * translate(Vec3::new(0.0, 0.0, 0.25)) * scale(Vec3::new(0.275, 0.275, 0.5)),
    );
    for leg in LEGS {
        cube(backend, textures.sven_body, at * translate(leg) * scale(Vec3::new(0.075, 0.3, 0.075)));
    }

    // tail wags while carried
    let wag = if state.companion.held {
        Mat4::from_rotation_z((time * 5.0).sin())
    } else {
        Mat4::IDENTITY
    };
    let tail = at * wag * translate(Vec3::new(0.0, -0.1, 0.525)) * scale(Vec3::new(0.075, 0.3, 0.075));
    cube(backend, textures.sven_body, tail);
}

fn stalker<B: RenderBackend + ?Sized>(backend: &mut B, state: &GameState, textures: &SceneTextures) {
    let face = if state.horror_mode { textures.sheep_face } else { textures.sheep_head };
    let base = translate(state.stalker_pos) * Mat4::from_rotation_y(state.stalker_facing) * translate(PIVOT);

    cube(backend, face, base * scale(Vec3::splat(0.25)));
    cube(
        backend,
        textures.sheep_body,
        base * translate(Vec3::new(0.0, 0.0, 0.25)) * scale(Vec3::new(0.275, 0.275, 0.5)),
    );
    for leg in LEGS {
        cube(backend, textures.sheep_body, base * translate(leg) * scale(Vec3::new(0.075, 0.3, 0.075)));
    }
}

fn hostile<B: RenderBackend + ?Sized>(
    backend: &mut B,
    state: &GameState,
    textures: &SceneTextures,
    time: f32,
) {
    let at = translate(state.hostile_pos);

    if !state.horror_mode {
        // buried: head and one arm poking out of a podzol patch
        cube(backend, textures.zombie_head, at * scale(Vec3::splat(0.25)));
        cube(backend, textures.podzol, at * scale(Vec3::new(0.5, 0.1, 0.5)));
        cube(
            backend,
            textures.zombie_body,
            at * translate(Vec3::new(0.3, 0.0, 0.0)) * scale(Vec3::new(0.15, 0.4, 0.15)),
        );
        return;
    }

    let base = at * Mat4::from_rotation_y(state.hostile_facing) * translate(PIVOT);

    cube(
        backend,
        textures.zombie_head,
        base * translate(Vec3::new(0.0, 1.0, 0.0)) * scale(Vec3::splat(0.25)),
    );
    cube(
        backend,
        textures.zombie_body,
        base * translate(Vec3::new(0.0, 0.7, 0.0)) * scale(Vec3::new(0.3, 0.4, 0.15)),
    );
    for x in [-0.225, 0.225] {
        cube(
            backend,
            textures.zombie_body,
            base * translate(Vec3::new(x, 0.8, -0.15)) * scale(Vec3::new(0.15, 0.15, 0.45)),
        );
    }

    let stride = time * 5.0;
    for (x, swing) in [(0.075, stride.cos()), (-0.075, stride.sin())] {
        let model = base
            * translate(Vec3::new(x, 0.3, 0.0))
            * translate(Vec3::new(0.0, 0.2, 0.0))
            * Mat4::from_rotation_x(swing)
            * translate(Vec3::new(0.0, -0.2, 0.0))
            * scale(Vec3::new(0.125, 0.5, 0.125));
        cube(backend, textures.denim, model);
    }
}

fn lamp<B: RenderBackend + ?Sized>(
    backend: &mut B,
    state: &GameState,
    textures: &SceneTextures,
    projection: Mat4,
    view: Mat4,
    time: f32,
) {
    let at = translate(state.lamp_pos);

    backend.bind_texture(0, textures.handle);
    backend.bind_texture(1, TextureHandle::INVALID);
    backend.set_mat4("model", at * scale(Vec3::new(0.1, 0.3, 0.1)));
    backend.draw_cube();

    let spin = if state.lamp.held { time * 10.0 } else { time };
    backend.use_shader(Shader::Lamp);
    backend.set_mat4("projection", projection);
    backend.set_mat4("view", view);
    backend.set_float("intensity", LAMP_INTENSITY);
    backend.set_mat4(
        "model",
        at * translate(Vec3::new(0.0, 0.2, 0.0)) * Mat4::from_rotation_y(spin) * scale(Vec3::splat(0.1)),
    );
    backend.draw_cube();
    backend.use_shader(Shader::Lighting);
}
