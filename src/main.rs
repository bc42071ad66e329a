use std::sync::Arc;

use anyhow::Context as _;
use tracing::{debug, error, info, warn};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use watersheep::{
    config::GameConfig,
    controller::{FrameLoop, FrameStatus, InputEvent},
    logging, ui,
    view::{draw_scene, DrawRecorder, GpuContext, Renderer, SceneTextures},
};

/// Key name as the input layer sees it: letters lower-case, space as `" "`.
fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Space => " ".to_string(),
        other => {
            let name = format!("{other:?}");
            match name.strip_prefix("Key") {
                Some(letter) => letter.to_lowercase(),
                None => name,
            }
        }
    }
}

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: Renderer,
    textures: SceneTextures,

    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    frame_loop: FrameLoop,
    pointer_locked: bool,

    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>, config: &GameConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone()).context("failed to create surface")?;
        let gpu = GpuContext::new(&instance, surface, size.width, size.height).await?;

        let mut renderer = Renderer::new(
            gpu.device.clone(),
            gpu.queue.clone(),
            gpu.format,
            gpu.config.width,
            gpu.config.height,
        );
        let textures = SceneTextures::load(&config.asset_dir, &mut renderer);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.format,
            egui_wgpu::RendererOptions::default(),
        );

        Ok(Self {
            window,
            gpu,
            renderer,
            textures,
            egui_renderer,
            egui_state,
            egui_ctx,
            frame_loop: FrameLoop::new(),
            pointer_locked: false,
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        })
    }

    fn set_pointer_lock(&mut self, locked: bool) {
        if locked {
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                warn!(%err, "cursor grab unavailable");
                return;
            }
        } else {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        }
        self.window.set_cursor_visible(!locked);
        self.pointer_locked = locked;
        self.frame_loop.input.process_event(&InputEvent::PointerLockChanged { locked });
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        let egui_captured = self.egui_state.on_window_event(self.window.as_ref(), event).consumed;
        if egui_captured && !self.pointer_locked {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, .. }, .. } => {
                if let PhysicalKey::Code(code) = physical_key {
                    let key = key_name(*code);
                    let event = match state {
                        ElementState::Pressed => InputEvent::KeyDown(key),
                        ElementState::Released => InputEvent::KeyUp(key),
                    };
                    self.frame_loop.input.process_event(&event);
                }
                true
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                if !self.pointer_locked {
                    self.set_pointer_lock(true);
                }
                true
            }
            WindowEvent::Focused(false) => {
                self.frame_loop.input.process_event(&InputEvent::FocusLost);
                self.set_pointer_lock(false);
                true
            }
            _ => false,
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.frame_loop
            .input
            .process_event(&InputEvent::MouseMove { dx: dx as f32, dy: dy as f32 });
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gpu.resize(new_size.width, new_size.height);
            self.renderer.resize(new_size.width, new_size.height);
        }
    }

    fn update(&mut self, dt: f32) -> FrameStatus {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
            debug!(fps = self.fps, "frame rate");
        }

        self.frame_loop.update(dt)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut recorder = DrawRecorder::new();
        draw_scene(
            &mut recorder,
            &self.frame_loop.camera,
            &self.frame_loop.state,
            &self.textures,
            self.gpu.aspect(),
            self.frame_loop.time(),
        );

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_output = self.egui_ctx.run(raw_input, |ctx| ui::build_ui(ctx, &self.frame_loop, self.fps));
        self.egui_state.handle_platform_output(&self.window, egui_output.platform_output);
        let pixels_per_point = self.window.scale_factor() as f32;
        let primitives = self.egui_ctx.tessellate(egui_output.shapes, pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point,
        };

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        self.renderer.render(&mut encoder, &view, recorder.frame());

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }
        self.egui_renderer
            .update_buffers(&self.gpu.device, &self.gpu.queue, &mut encoder, &primitives, &screen_descriptor);

        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = GameConfig::from_env();
    info!(?config, "starting");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window_attributes = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height));
    let window = event_loop.create_window(window_attributes).context("failed to create window")?;
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window.clone(), &config))?;

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32();
                            app.last_frame_time = now;

                            if app.update(dt) == FrameStatus::Exit {
                                elwt.exit();
                                return;
                            }

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    app.resize(app.window.inner_size())
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    error!("surface out of memory");
                                    elwt.exit();
                                }
                                Err(e) => warn!(?e, "surface error"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                app.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    })?;

    info!("bye");
    Ok(())
}
