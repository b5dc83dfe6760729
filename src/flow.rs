//! Application event loop.
//!
//! The loop follows this pattern:
//! 1. `resumed` creates the window, the GPU context and the scene
//! 2. every `RedrawRequested` advances the quad's rotation, writes the new
//!    world-view-projection matrix and runs one synchronized frame
//! 3. `CloseRequested` stops the loop before the next frame starts recording
//! 4. `exiting` waits for the last submitted frame before anything is dropped
//!
//! Any error is fatal: it is logged, the loop exits and [`run`] returns it.

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::DemoConfig,
    context::Context,
    data_structures::{
        camera::{Camera, Projection},
        transform::Transform,
    },
    error::FrameError,
    render::{NullOverlay, Overlay, RenderTargets, Scene, record_scene_commands},
    sync::{FrameContext, FrameReport},
};

/// Everything that exists once the window is up.
pub struct AppState {
    pub ctx: Context,
    pub scene: Scene,
    pub frames: FrameContext,
    pub object: Transform,
    pub camera: Camera,
    overlay: Box<dyn Overlay>,
}

impl AppState {
    async fn new(
        window: Arc<Window>,
        config: &DemoConfig,
        overlay: Box<dyn Overlay>,
    ) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        let scene = Scene::new(
            &ctx.device,
            &ctx.queue,
            config,
            ctx.config.format,
            overlay.as_ref(),
        )
        .await?;
        let (width, height) = ctx.size();
        let camera = Camera::new(
            Transform::at(config.camera_translate),
            Projection::new(width, height, config.fov_y, config.near, config.far),
        );
        Ok(Self {
            ctx,
            scene,
            frames: FrameContext::new(),
            object: Transform::default(),
            camera,
            overlay,
        })
    }

    /// Returns `false` if the size was not drawable and nothing changed.
    fn resize(&mut self, width: u32, height: u32) -> anyhow::Result<bool> {
        let resized = self.ctx.resize(width, height)?;
        if resized {
            self.camera.projection.resize(width, height);
        }
        Ok(resized)
    }

    /// Advances the animation and renders one frame.
    fn redraw(&mut self, config: &DemoConfig) -> Result<Option<FrameReport>, FrameError> {
        if self.frames.quit_requested() {
            return Ok(None);
        }
        self.object.rotate.y += config.rotate_speed;
        let wvp = self.camera.world_view_projection(&self.object).compose();
        // the previous frame has completed, nothing on the GPU reads this buffer
        self.scene
            .write_transformation(&self.ctx.queue, wvp)
            .map_err(|e| FrameError::Recording(e.to_string()))?;

        let depth = self.ctx.depth.clone();
        let (width, height) = self.ctx.size();
        let scene = &self.scene;
        let overlay = self.overlay.as_mut();
        let clear_color = config.clear_color;
        self.frames.run_frame(&mut self.ctx, |encoder, frame| {
            let targets = RenderTargets {
                color: &frame.image.view,
                depth: &depth,
                width,
                height,
            };
            record_scene_commands(encoder, &targets, scene, overlay, clear_color)
        })
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: DemoConfig,
    overlay: Option<Box<dyn Overlay>>,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
    last_stats: Instant,
    frames_at_last_stats: u64,
}

impl App {
    fn new(
        async_runtime: tokio::runtime::Runtime,
        config: DemoConfig,
        overlay: Box<dyn Overlay>,
    ) -> Self {
        Self {
            async_runtime,
            config,
            overlay: Some(overlay),
            state: None,
            error: None,
            last_stats: Instant::now(),
            frames_at_last_stats: 0,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if let Some(state) = &mut self.state {
            state.frames.request_quit();
        }
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn log_stats(&mut self, report: &FrameReport) {
        let interval = self.config.stats_interval;
        if interval == 0 || report.frame % interval != 0 {
            return;
        }
        let elapsed = self.last_stats.elapsed().as_secs_f64();
        let frames = report.frame - self.frames_at_last_stats;
        if elapsed > 0.0 {
            log::debug!(
                "frame {}: {:.1} fps, fence {}",
                report.frame,
                frames as f64 / elapsed,
                report.fence_value
            );
        }
        self.last_stats = Instant::now();
        self.frames_at_last_stats = report.frame;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let init = AppState::new(window, &self.config, overlay);
        match self.async_runtime.block_on(init) {
            Ok(state) => {
                state.ctx.window.request_redraw();
                self.last_stats = Instant::now();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e.context("App initialization failed")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                state.frames.request_quit();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => match state.resize(size.width, size.height) {
                // restarts the loop after a minimize
                Ok(true) => state.ctx.window.request_redraw(),
                Ok(false) => {}
                Err(e) => self.fail(event_loop, e),
            },
            WindowEvent::RedrawRequested => match state.redraw(&self.config) {
                Ok(Some(report)) => {
                    state.ctx.window.request_redraw();
                    self.log_stats(&report);
                }
                Ok(None) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(FrameError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    let size = state.ctx.window.inner_size();
                    match state.resize(size.width, size.height) {
                        Ok(true) => state.ctx.window.request_redraw(),
                        // minimized, the next Resized restarts the loop
                        Ok(false) => log::debug!("Surface lost while minimized, pausing"),
                        Err(e) => self.fail(event_loop, e),
                    }
                }
                Err(FrameError::Surface(wgpu::SurfaceError::Timeout)) => {
                    log::warn!("Surface timed out, retrying");
                    state.ctx.window.request_redraw();
                }
                Err(e) => self.fail(event_loop, e.into()),
            },
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(mut state) = self.state.take() else {
            return;
        };
        if let Err(e) = state.frames.flush(&mut state.ctx) {
            log::error!("Failed to flush the GPU before exit: {e}");
            self.error.get_or_insert(e.into());
        }
        log::info!(
            "Presented {} frames, final fence value {}",
            state.frames.frames_presented(),
            state.frames.fence().value()
        );
    }
}

/// Opens the demo window and runs until it is closed.
pub fn run(config: DemoConfig) -> anyhow::Result<()> {
    let overlay = NullOverlay::new(config.overlay_slot);
    run_with_overlay(config, Box::new(overlay))
}

/// Like [`run`], with a UI layer drawn on top of the quad.
pub fn run_with_overlay(config: DemoConfig, overlay: Box<dyn Overlay>) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let async_runtime = tokio::runtime::Runtime::new()?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(async_runtime, config, overlay);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
