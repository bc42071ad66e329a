use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use tracing::{debug, trace};

use crate::utils::{create_cube_mesh, MeshBuffer, Vertex};
use crate::view::backend::{Frame, RecordedDraw, Shader};
use crate::view::texture::{DecodedTexture, TextureHandle, TextureSink};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const INITIAL_DRAW_CAPACITY: u64 = 256;

/// Frame-wide uniforms. Scalars ride in the w lane of the vec3 before them.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SceneGlobals {
    pub view_proj: [[f32; 4]; 4],
    pub lamp_view_proj: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub light_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
}

impl SceneGlobals {
    pub fn from_frame(frame: &Frame) -> Self {
        let lighting = &frame.lighting;
        let light = &lighting.light;
        let lamp = &frame.lamp;
        Self {
            view_proj: (lighting.projection * lighting.view).to_cols_array_2d(),
            lamp_view_proj: (lamp.projection * lamp.view).to_cols_array_2d(),
            view_pos: lighting.view_pos.extend(lighting.shininess).to_array(),
            light_position: light.position.extend(light.constant).to_array(),
            light_ambient: light.ambient.extend(light.linear).to_array(),
            light_diffuse: light.diffuse.extend(light.quadratic).to_array(),
            light_specular: light.specular.extend(lamp.intensity).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl DrawUniform {
    pub fn new(model: Mat4) -> Self {
        // Flat scales like the sky panels are singular; leave those normals alone.
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            model
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
        }
    }
}

pub fn align_to(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

fn create_rgba_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> GpuTexture {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture { _texture: texture, view }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages, has_dynamic_offset: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // thin panels are seen from both sides
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// Replays a recorded [`Frame`] with wgpu: one cube vertex buffer, a dynamic
/// uniform slot per draw and a bind group per texture pair.
pub struct Renderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    cube: MeshBuffer,

    globals_buffer: wgpu::Buffer,
    draw_buffer: wgpu::Buffer,
    draw_stride: u64,
    draw_capacity: u64,
    frame_layout: wgpu::BindGroupLayout,
    frame_bind_group: wgpu::BindGroup,

    material_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    textures: HashMap<TextureHandle, GpuTexture>,
    materials: HashMap<(TextureHandle, TextureHandle), wgpu::BindGroup>,
    next_handle: u32,

    lighting_pipeline: wgpu::RenderPipeline,
    lamp_pipeline: wgpu::RenderPipeline,

    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl Renderer {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let cube = create_cube_mesh().upload(&device);

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<SceneGlobals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let draw_stride = align_to(std::mem::size_of::<DrawUniform>() as u64, alignment);
        let draw_capacity = INITIAL_DRAW_CAPACITY;
        let draw_buffer = Self::create_draw_buffer(&device, draw_stride, draw_capacity);

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT, false),
                uniform_entry(1, wgpu::ShaderStages::VERTEX, true),
            ],
        });
        let frame_bind_group = Self::create_frame_bind_group(&device, &frame_layout, &globals_buffer, &draw_buffer);

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("material_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let white = create_rgba_texture(&device, &queue, "white_texture", 1, 1, &[255, 255, 255, 255]);

        let lighting_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lighting_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let lamp_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lamp_pipeline_layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let lighting_pipeline =
            create_pipeline(&device, "lighting_pipeline", include_str!("shaders/scene.wgsl"), &lighting_layout, format);
        let lamp_pipeline =
            create_pipeline(&device, "lamp_pipeline", include_str!("shaders/lamp.wgsl"), &lamp_layout, format);

        let (depth_texture, depth_view) = create_depth_texture(&device, width, height);

        Self {
            device,
            queue,
            cube,
            globals_buffer,
            draw_buffer,
            draw_stride,
            draw_capacity,
            frame_layout,
            frame_bind_group,
            material_layout,
            sampler,
            white,
            textures: HashMap::new(),
            materials: HashMap::new(),
            next_handle: 1,
            lighting_pipeline,
            lamp_pipeline,
            _depth_texture: depth_texture,
            depth_view,
        }
    }

    fn create_draw_buffer(device: &wgpu::Device, stride: u64, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniform_buffer"),
            size: stride * capacity,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_frame_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        globals: &wgpu::Buffer,
        draws: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: globals.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: draws,
                        offset: 0,
                        size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                    }),
                },
            ],
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let (depth_texture, depth_view) = create_depth_texture(&self.device, width, height);
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
        debug!(width, height, "depth buffer resized");
    }

    fn ensure_draw_capacity(&mut self, draws: u64) {
        if draws <= self.draw_capacity {
            return;
        }
        let mut capacity = self.draw_capacity.max(1);
        while capacity < draws {
            capacity *= 2;
        }
        self.draw_buffer = Self::create_draw_buffer(&self.device, self.draw_stride, capacity);
        self.frame_bind_group =
            Self::create_frame_bind_group(&self.device, &self.frame_layout, &self.globals_buffer, &self.draw_buffer);
        self.draw_capacity = capacity;
        debug!(capacity, "draw uniform buffer grown");
    }

    fn texture_view(&self, handle: TextureHandle) -> &wgpu::TextureView {
        self.textures.get(&handle).map(|t| &t.view).unwrap_or(&self.white.view)
    }

    fn ensure_material(&mut self, textures: [TextureHandle; 2]) {
        let key = (textures[0], textures[1]);
        if self.materials.contains_key(&key) {
            return;
        }
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(self.texture_view(textures[0])),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(self.texture_view(textures[1])),
                },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&self.sampler) },
            ],
        });
        self.materials.insert(key, bind_group);
    }

    fn pipeline(&self, shader: Shader) -> &wgpu::RenderPipeline {
        match shader {
            Shader::Lighting => &self.lighting_pipeline,
            Shader::Lamp => &self.lamp_pipeline,
        }
    }

    /// Clear `target` and draw every recorded cube into it.
    pub fn render(&mut self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView, frame: &Frame) {
        let globals = SceneGlobals::from_frame(frame);
        self.queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        self.ensure_draw_capacity(frame.draws.len() as u64);
        let stride = self.draw_stride as usize;
        let mut staging = vec![0u8; stride * frame.draws.len()];
        for (slot, draw) in staging.chunks_exact_mut(stride).zip(&frame.draws) {
            let uniform = DrawUniform::new(draw.model);
            let bytes = bytemuck::bytes_of(&uniform);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            self.queue.write_buffer(&self.draw_buffer, 0, &staging);
        }

        for draw in frame.draws_with(Shader::Lighting) {
            self.ensure_material(draw.textures);
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_vertex_buffer(0, self.cube.vertex_buffer.slice(..));
        let mut current: Option<Shader> = None;
        for (index, draw) in frame.draws.iter().enumerate() {
            let RecordedDraw { shader, textures, vertex_count, .. } = *draw;
            if current != Some(shader) {
                pass.set_pipeline(self.pipeline(shader));
                current = Some(shader);
            }
            let offset = (index * stride) as u32;
            pass.set_bind_group(0, &self.frame_bind_group, &[offset]);
            if shader == Shader::Lighting {
                if let Some(material) = self.materials.get(&(textures[0], textures[1])) {
                    pass.set_bind_group(1, material, &[]);
                }
            }
            pass.draw(0..vertex_count.min(self.cube.vertex_count), 0..1);
        }
        trace!(draws = frame.draws.len(), "scene pass recorded");
    }
}

impl TextureSink for Renderer {
    fn upload(&mut self, texture: &DecodedTexture) -> TextureHandle {
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        let label = texture.path.display().to_string();
        let gpu = create_rgba_texture(&self.device, &self.queue, &label, texture.width, texture.height, &texture.rgba);
        self.textures.insert(handle, gpu);
        handle
    }
}
