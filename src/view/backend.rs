//! The seam between scene composition and the GPU.
//!
//! Scene code talks to a [`RenderBackend`] the way a classic shader wrapper
//! works: pick a program, set uniforms by name, bind textures, draw. The
//! [`DrawRecorder`] backend captures that into a [`Frame`] the wgpu renderer
//! can replay, which also keeps scene composition testable without a GPU.

use glam::{Mat4, Vec3};
use tracing::trace;

use crate::utils::CUBE_VERTEX_COUNT;
use crate::view::texture::TextureHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shader {
    /// Textured, lit by the lamp.
    Lighting,
    /// Unlit emissive cube for the lamp itself.
    Lamp,
}

/// Texture units a draw can sample: 0 = diffuse, 1 = specular map.
pub const TEXTURE_UNITS: usize = 2;

pub trait RenderBackend {
    fn use_shader(&mut self, shader: Shader);
    fn set_mat4(&mut self, name: &str, value: Mat4);
    fn set_vec3(&mut self, name: &str, value: Vec3);
    fn set_float(&mut self, name: &str, value: f32);
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);
    fn draw(&mut self, vertex_count: u32);

    fn draw_cube(&mut self) {
        self.draw(CUBE_VERTEX_COUNT);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

/// Per-shader uniforms that stay fixed for the whole frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub view_pos: Vec3,
    pub light: PointLight,
    pub shininess: f32,
}

impl Default for LightingUniforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            view_pos: Vec3::ZERO,
            light: PointLight::default(),
            shininess: 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub intensity: f32,
}

impl Default for LampUniforms {
    fn default() -> Self {
        Self { projection: Mat4::IDENTITY, view: Mat4::IDENTITY, intensity: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedDraw {
    pub shader: Shader,
    pub model: Mat4,
    pub textures: [TextureHandle; TEXTURE_UNITS],
    pub vertex_count: u32,
}

/// One frame's worth of draws. Shader-wide uniforms keep the last value set.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub lighting: LightingUniforms,
    pub lamp: LampUniforms,
    pub draws: Vec<RecordedDraw>,
}

impl Frame {
    pub fn draws_with(&self, shader: Shader) -> impl Iterator<Item = &RecordedDraw> {
        self.draws.iter().filter(move |d| d.shader == shader)
    }
}

pub struct DrawRecorder {
    shader: Shader,
    lighting_model: Mat4,
    lamp_model: Mat4,
    textures: [TextureHandle; TEXTURE_UNITS],
    frame: Frame,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self {
            shader: Shader::Lighting,
            lighting_model: Mat4::IDENTITY,
            lamp_model: Mat4::IDENTITY,
            textures: [TextureHandle::INVALID; TEXTURE_UNITS],
            frame: Frame::default(),
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn finish(self) -> Frame {
        self.frame
    }
}

fn ignored(shader: Shader, kind: &str, name: &str) {
    trace!(?shader, kind, name, "uniform not used by shader");
}

impl Default for DrawRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for DrawRecorder {
    fn use_shader(&mut self, shader: Shader) {
        self.shader = shader;
    }

    fn set_mat4(&mut self, name: &str, value: Mat4) {
        match (self.shader, name) {
            (Shader::Lighting, "model") => self.lighting_model = value,
            (Shader::Lighting, "view") => self.frame.lighting.view = value,
            (Shader::Lighting, "projection") => self.frame.lighting.projection = value,
            (Shader::Lamp, "model") => self.lamp_model = value,
            (Shader::Lamp, "view") => self.frame.lamp.view = value,
            (Shader::Lamp, "projection") => self.frame.lamp.projection = value,
            _ => ignored(self.shader, "mat4", name),
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        let lighting = &mut self.frame.lighting;
        match (self.shader, name) {
            (Shader::Lighting, "viewPos") => lighting.view_pos = value,
            (Shader::Lighting, "light.position") => lighting.light.position = value,
            (Shader::Lighting, "light.ambient") => lighting.light.ambient = value,
            (Shader::Lighting, "light.diffuse") => lighting.light.diffuse = value,
            (Shader::Lighting, "light.specular") => lighting.light.specular = value,
            _ => ignored(self.shader, "vec3", name),
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        let frame = &mut self.frame;
        match (self.shader, name) {
            (Shader::Lighting, "light.constant") => frame.lighting.light.constant = value,
            (Shader::Lighting, "light.linear") => frame.lighting.light.linear = value,
            (Shader::Lighting, "light.quadratic") => frame.lighting.light.quadratic = value,
            (Shader::Lighting, "material.shininess") => frame.lighting.shininess = value,
            (Shader::Lamp, "intensity") => frame.lamp.intensity = value,
            _ => ignored(self.shader, "float", name),
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        match self.textures.get_mut(unit as usize) {
            Some(slot) => *slot = texture,
            None => trace!(unit, "texture unit out of range"),
        }
    }

    fn draw(&mut self, vertex_count: u32) {
        let model = match self.shader {
            Shader::Lighting => self.lighting_model,
            Shader::Lamp => self.lamp_model,
        };
        self.frame.draws.push(RecordedDraw {
            shader: self.shader,
            model,
            textures: self.textures,
            vertex_count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_snapshot_model_and_textures() {
        let mut rec = DrawRecorder::new();
        rec.bind_texture(0, TextureHandle(3));
        rec.bind_texture(1, TextureHandle(4));
        rec.set_mat4("model", Mat4::from_translation(Vec3::X));
        rec.draw_cube();

        rec.bind_texture(0, TextureHandle(5));
        rec.set_mat4("model", Mat4::from_translation(Vec3::Y));
        rec.draw(6);

        let frame = rec.finish();
        assert_eq!(frame.draws.len(), 2);
        assert_eq!(frame.draws[0].textures, [TextureHandle(3), TextureHandle(4)]);
        assert_eq!(frame.draws[0].vertex_count, CUBE_VERTEX_COUNT);
        assert_eq!(frame.draws[0].model, Mat4::from_translation(Vec3::X));
        assert_eq!(frame.draws[1].textures, [TextureHandle(5), TextureHandle(4)]);
        assert_eq!(frame.draws[1].vertex_count, 6);
    }

    #[test]
    fn uniforms_route_to_the_active_shader() {
        let mut rec = DrawRecorder::new();
        rec.set_mat4("projection", Mat4::from_scale(Vec3::splat(2.0)));
        rec.set_float("light.linear", 0.7);
        rec.use_shader(Shader::Lamp);
        rec.set_mat4("projection", Mat4::from_scale(Vec3::splat(3.0)));
        rec.set_float("intensity", 0.5);
        rec.set_mat4("model", Mat4::from_translation(Vec3::Z));
        rec.draw_cube();

        let frame = rec.finish();
        assert_eq!(frame.lighting.projection, Mat4::from_scale(Vec3::splat(2.0)));
        assert_eq!(frame.lamp.projection, Mat4::from_scale(Vec3::splat(3.0)));
        assert_eq!(frame.lighting.light.linear, 0.7);
        assert_eq!(frame.lamp.intensity, 0.5);
        assert_eq!(frame.draws_with(Shader::Lamp).count(), 1);
        assert_eq!(frame.draws[0].model, Mat4::from_translation(Vec3::Z));
    }

    #[test]
    fn unknown_uniforms_and_units_are_ignored() {
        let mut rec = DrawRecorder::new();
        rec.set_float("material.unknown", 1.0);
        rec.set_vec3("intensity", Vec3::ONE);
        rec.bind_texture(7, TextureHandle(9));
        rec.draw_cube();
        let frame = rec.finish();
        assert_eq!(frame.lighting, LightingUniforms::default());
        assert_eq!(frame.draws[0].textures, [TextureHandle::INVALID; TEXTURE_UNITS]);
    }
}
