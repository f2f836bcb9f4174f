//! Platform layer: windowing & event loop.
//!
//! - The mesh is loaded before any window exists; a bad file never opens one.
//! - Redraws are requested only while the mesh is rotating (or FPS is shown).
//! - Resize/scale/close and surface loss are handled here, drawing is in `renderer`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use asset::{LoadOptions, MaterialSource, Mesh};
use corelib::{
    camera::Camera,
    rotation::{DualAxisRotation, RotateKey},
    viewport::Viewport,
    vec3,
};
use renderer::GpuState;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const WINDOW_TITLE: &str = "Blue Prism Outline";

/// Everything the viewer needs to start; built by the binary from CLI flags.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub obj_path: PathBuf,
    pub material: Option<MaterialSource>,
    pub load_options: LoadOptions,
    pub backends: wgpu::Backends,
    pub size: Viewport,
    pub rotate: bool,
    pub show_fps: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            obj_path: PathBuf::from("assets/prism.obj"),
            material: None,
            load_options: LoadOptions::default(),
            backends: wgpu::Backends::all(),
            size: Viewport::DEFAULT,
            rotate: false,
            show_fps: false,
        }
    }
}

/// Map a physical key onto a rotation input (arrow keys and WASD).
pub fn rotate_key_for(code: KeyCode) -> Option<RotateKey> {
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(RotateKey::PitchUp),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(RotateKey::PitchDown),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(RotateKey::YawLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(RotateKey::YawRight),
        _ => None,
    }
}

/// Load the configured mesh, open a window and render until it is closed.
pub fn run_with_renderer(config: ViewerConfig) -> Result<()> {
    let loaded = asset::load_mesh(&config.obj_path, config.material.as_ref(), config.load_options)
        .with_context(|| format!("Failed to load mesh {}", config.obj_path.display()))?;
    if loaded.mesh.is_empty() {
        log::warn!("Mesh has no triangles; only the background will be drawn");
    }

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ViewerApp::new(config, loaded.mesh);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    // Errors raised inside callbacks are parked until the loop exits.
    app.fatal.map_or(Ok(()), Err)
}

struct FpsCounter {
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            since: Instant::now(),
        }
    }

    /// Count a frame; returns the rate once per second.
    fn tick(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.since.elapsed().as_secs_f32();
        if elapsed < 1.0 {
            return None;
        }
        let fps = self.frames as f32 / elapsed;
        self.frames = 0;
        self.since = Instant::now();
        Some(fps)
    }
}

struct ViewerApp {
    config: ViewerConfig,
    mesh: Mesh,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    camera: Camera,
    rotation: DualAxisRotation,
    last_frame: Instant,
    fps: FpsCounter,
    fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(config: ViewerConfig, mesh: Mesh) -> Self {
        let camera = Camera::looking_at_origin(vec3(3.0, 2.0, 3.0), config.size.aspect());
        Self {
            config,
            mesh,
            window: None,
            gpu: None,
            camera,
            rotation: DualAxisRotation::default(),
            last_frame: Instant::now(),
            fps: FpsCounter::new(),
            fatal: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(
                self.config.size.width,
                self.config.size.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("Failed to create window")?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            self.config.backends,
            &self.mesh,
        ))?;
        self.camera = self.camera.with_aspect(gpu.aspect());
        window.request_redraw();

        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        if code == KeyCode::Escape && pressed {
            log::info!("Escape pressed. Exiting event loop.");
            event_loop.exit();
            return;
        }
        if !self.config.rotate {
            return;
        }
        if code == KeyCode::KeyR && pressed {
            self.rotation.reset();
        } else if let Some(key) = rotate_key_for(code) {
            self.rotation.set_key(key, pressed);
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.rotation.update(dt);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let mvp = self.camera.proj_view() * self.rotation.matrix();
        match gpu.render(mvp) {
            Ok(()) => {}
            Err(e) if GpuState::is_surface_lost(&e) => {
                log::warn!("Surface lost/outdated: {e:?}. Reconfiguring.");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout; skipping frame"),
            Err(e) => {
                self.fail(event_loop, anyhow::anyhow!("Render error: {e:?}"));
                return;
            }
        }

        if self.config.show_fps {
            if let (Some(fps), Some(window)) = (self.fps.tick(), &self.window) {
                window.set_title(&format!("{WINDOW_TITLE} - {fps:.0} FPS"));
            }
        }
    }

    fn wants_continuous_redraw(&self) -> bool {
        self.config.show_fps || (self.config.rotate && self.rotation.is_active())
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::debug!("Resized: {}x{}", new_size.width, new_size.height);
                let size = Viewport::clamped(new_size.width, new_size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size.width, size.height);
                }
                self.camera = self.camera.with_aspect(size.aspect());
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed: {:.3}", scale_factor);
            }
            WindowEvent::Focused(false) => self.rotation.release_all(),
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, &event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.wants_continuous_redraw() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        } else {
            // Keep dt small for the next key press.
            self.last_frame = Instant::now();
        }
    }
}
