//! Oceanscape - a rippling procedural ocean around a loaded model
//!
//! The surface animates from a single elapsed-time parameter advanced once
//! per frame; the model arrives whenever its background load finishes.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Mat4;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use oceanscape::assets::ModelLoader;
use oceanscape::camera::OrbitCamera;
use oceanscape::cli::Args;
use oceanscape::clock::FrameClock;
use oceanscape::params::RenderConfig;
use oceanscape::rendering::{RenderSystem, Shading, Uniforms};
use oceanscape::scene::Scene;
use oceanscape::surface::Vertex;

/// Pixels of trackpad scroll per zoom line
const PIXELS_PER_LINE: f32 = 50.0;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    scene: Scene,
    camera: OrbitCamera,
    loader: Option<ModelLoader>,
    clock: FrameClock,

    /// Reused every frame for the per-vertex pass
    vertices: Vec<Vertex>,
    workers: usize,

    // Configuration
    render_config: RenderConfig,

    // Mouse drag state
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let preset = args.scene_preset();
        let render_config = args.render_config();
        let camera = OrbitCamera::new(preset.camera.clone(), &render_config);
        let scene = Scene::new(preset).context("Invalid scene configuration")?;
        let loader = args.model.clone().map(ModelLoader::spawn);
        let vertices = vec![Vertex::default(); scene.surface().vertex_count()];

        if loader.is_none() {
            log::info!("No model given (--model PATH); showing the surface only");
        }

        Ok(Self {
            window: None,
            render_system: None,
            scene,
            camera,
            loader,
            clock: FrameClock::new(),
            vertices,
            workers: args.worker_count(),
            render_config,
            dragging: false,
            last_cursor: None,
        })
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title(format!("Oceanscape - {}", self.scene.name()))
            .with_inner_size(PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.scene.surface(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.camera.resize(size.width, size.height);

        log::info!(
            "Oceanscape is running ({} surface vertices, {} workers)",
            self.scene.surface().vertex_count(),
            self.workers
        );
        log::info!("Drag to orbit, scroll to zoom, ESC to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.camera.resize(size.width, size.height);
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some((x, y))) = (self.dragging, self.last_cursor) {
                    self.camera
                        .rotate((position.x - x) as f32, (position.y - y) as f32);
                }
                self.last_cursor = Some((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Advance the scene one tick and draw it
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        // Time advances exactly once, before the per-vertex pass
        let delta = self.clock.tick();
        self.scene.tick(delta);

        if let Some(result) = self.loader.as_mut().and_then(|loader| loader.poll()) {
            self.loader = None;
            if self.scene.handle_model_load(result) {
                if let Some(model) = self.scene.model() {
                    render_system.set_model(model);
                }
            }
        }

        self.scene
            .surface()
            .write_vertices_parallel(&mut self.vertices, self.workers);
        render_system.update_surface_vertices(&self.vertices);

        let view_proj = self.camera.view_proj();
        let eye = self.camera.eye();
        let surface_uniforms =
            Uniforms::new(view_proj, Mat4::IDENTITY, eye, &self.scene, Shading::SURFACE);
        let model_uniforms = Uniforms::new(
            view_proj,
            self.scene.model_transform(),
            eye,
            &self.scene,
            Shading::MODEL,
        );
        render_system.update_uniforms(&surface_uniforms, &model_uniforms);

        match render_system.render(self.scene.background()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if self.clock.frame_count() % 600 == 0 {
            log::debug!(
                "Frame {} at t = {:.1}s ({:.1} fps)",
                self.clock.frame_count(),
                self.scene.elapsed_time(),
                1.0 / delta.max(1e-6)
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Oceanscape - animated procedural ocean");

    let mut app = App::new(&args)?;
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated with an error")?;
    Ok(())
}
