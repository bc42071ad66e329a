// VIEW: scene composition and rendering
pub mod backend;
pub mod gpu_init;
pub mod render;
pub mod scene;
pub mod texture;

pub use backend::{DrawRecorder, Frame, RenderBackend, Shader};
pub use gpu_init::GpuContext;
pub use render::Renderer;
pub use scene::draw_scene;
pub use texture::{SceneTextures, TextureHandle, TextureSink};
