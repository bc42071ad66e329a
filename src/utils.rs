use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Vertices in one unit cube: 6 faces, 2 triangles each.
pub const CUBE_VERTEX_COUNT: u32 = 36;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        MeshBuffer {
            vertex_buffer,
            vertex_count: self.vertices.len() as u32,
        }
    }
}

fn v(pos: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex { pos, normal, uv }
}

/// Unit cube centred on the origin. Every object in the scene is one of these,
/// scaled and placed by its model matrix.
pub fn create_cube_mesh() -> Mesh {
    let n = [0.0, 0.0, -1.0];
    let s = [0.0, 0.0, 1.0];
    let e = [-1.0, 0.0, 0.0];
    let w = [1.0, 0.0, 0.0];
    let b = [0.0, -1.0, 0.0];
    let t = [0.0, 1.0, 0.0];

    let vertices = vec![
        // north
        v([-0.5, -0.5, -0.5], n, [1.0, 1.0]),
        v([0.5, -0.5, -0.5], n, [0.0, 1.0]),
        v([0.5, 0.5, -0.5], n, [0.0, 0.0]),
        v([0.5, 0.5, -0.5], n, [0.0, 0.0]),
        v([-0.5, 0.5, -0.5], n, [1.0, 0.0]),
        v([-0.5, -0.5, -0.5], n, [1.0, 1.0]),
        // south
        v([-0.5, -0.5, 0.5], s, [1.0, 1.0]),
        v([0.5, -0.5, 0.5], s, [0.0, 1.0]),
        v([0.5, 0.5, 0.5], s, [0.0, 0.0]),
        v([0.5, 0.5, 0.5], s, [0.0, 0.0]),
        v([-0.5, 0.5, 0.5], s, [1.0, 0.0]),
        v([-0.5, -0.5, 0.5], s, [1.0, 1.0]),
        // east (-x)
        v([-0.5, 0.5, 0.5], e, [0.0, 0.0]),
        v([-0.5, 0.5, -0.5], e, [1.0, 0.0]),
        v([-0.5, -0.5, -0.5], e, [1.0, 1.0]),
        v([-0.5, -0.5, -0.5], e, [1.0, 1.0]),
        v([-0.5, -0.5, 0.5], e, [0.0, 1.0]),
        v([-0.5, 0.5, 0.5], e, [0.0, 0.0]),
        // west (+x)
        v([0.5, 0.5, 0.5], w, [0.0, 0.0]),
        v([0.5, 0.5, -0.5], w, [1.0, 0.0]),
        v([0.5, -0.5, -0.5], w, [1.0, 1.0]),
        v([0.5, -0.5, -0.5], w, [1.0, 1.0]),
        v([0.5, -0.5, 0.5], w, [0.0, 1.0]),
        v([0.5, 0.5, 0.5], w, [0.0, 0.0]),
        // bottom
        v([-0.5, -0.5, -0.5], b, [0.0, 1.0]),
        v([0.5, -0.5, -0.5], b, [1.0, 1.0]),
        v([0.5, -0.5, 0.5], b, [1.0, 0.0]),
        v([0.5, -0.5, 0.5], b, [1.0, 0.0]),
        v([-0.5, -0.5, 0.5], b, [0.0, 0.0]),
        v([-0.5, -0.5, -0.5], b, [0.0, 1.0]),
        // top
        v([-0.5, 0.5, -0.5], t, [0.0, 1.0]),
        v([0.5, 0.5, -0.5], t, [1.0, 1.0]),
        v([0.5, 0.5, 0.5], t, [1.0, 0.0]),
        v([0.5, 0.5, 0.5], t, [1.0, 0.0]),
        v([-0.5, 0.5, 0.5], t, [0.0, 0.0]),
        v([-0.5, 0.5, -0.5], t, [0.0, 1.0]),
    ];

    Mesh { vertices }
}
