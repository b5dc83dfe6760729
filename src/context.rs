//! Device, queue and presentation targets.
//!
//! [`Context`] renders into a window surface; [`HeadlessContext`] renders into
//! an offscreen texture with the same frame protocol. Both implement
//! [`FrameBackend`], so the frame loop does not know which one it drives.

use std::{iter, sync::Arc};

use winit::window::Window;

use crate::{
    config::DemoConfig,
    data_structures::texture::{DepthStencilResource, create_depth_stencil_texture_resource},
    error::{FrameError, ProvisionError},
    resources::BackBuffer,
    sync::{Fence, FrameBackend},
};

fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        // validation and debug labels in debug builds
        flags: wgpu::InstanceFlags::from_build_config(),
        ..Default::default()
    })
}

/// Picks a high-performance adapter, preferring hardware over software ones.
async fn request_adapter(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'_>>,
) -> anyhow::Result<wgpu::Adapter> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await?;
    let info = adapter.get_info();
    if info.device_type == wgpu::DeviceType::Cpu {
        log::warn!("Use Adapter:{} (software)", info.name);
    } else {
        log::info!("Use Adapter:{} ({:?})", info.name, info.backend);
    }
    Ok(adapter)
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("quad-ngin device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        })
        .await?;
    log::info!("Complete create device");
    Ok((device, queue))
}

/// Blocks until `fence` reached `value`.
///
/// The completion callback fires from inside `poll`, so the first wait is on
/// the last submission and a second one drains the queue if the callback was
/// registered after it.
fn wait_on_device(
    device: &wgpu::Device,
    submission: Option<wgpu::SubmissionIndex>,
    fence: &Fence,
    value: u64,
) -> Result<(), FrameError> {
    if fence.is_complete(value) {
        return Ok(());
    }
    device
        .poll(wgpu::PollType::Wait {
            submission_index: submission,
            timeout: None,
        })
        .map_err(|e| FrameError::Poll(e.to_string()))?;
    if !fence.is_complete(value) {
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| FrameError::Poll(e.to_string()))?;
    }
    Ok(())
}

fn signal_on_queue(queue: &wgpu::Queue, fence: &Fence, value: u64) {
    let completion = fence.completion();
    queue.on_submitted_work_done(move || completion.signal(value));
}

/// Whether a surface of this size can be configured and drawn to.
/// Minimized windows report a zero size.
pub fn is_drawable(width: u32, height: u32) -> bool {
    width > 0 && height > 0
}

/// The back buffer of the current frame.
#[derive(Debug)]
pub struct SurfaceFrame {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

/// GPU context bound to a window.
#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub depth: DepthStencilResource,
    last_submission: Option<wgpu::SubmissionIndex>,
}

impl Context {
    pub async fn new(window: Arc<Window>, demo: &DemoConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        log::info!("WGPU setup");
        let instance = create_instance();
        let surface = instance.create_surface(window.clone())?;
        let adapter = request_adapter(&instance, Some(&surface)).await?;
        let (device, queue) = request_device(&adapter).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The pixel shader writes linear colors, so the back buffer must be sRGB.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;
        let present_mode = if surface_caps.present_modes.contains(&demo.present_mode) {
            demo.present_mode
        } else {
            log::warn!(
                "{:?} not supported by the surface, falling back to Fifo",
                demo.present_mode
            );
            wgpu::PresentMode::Fifo
        };
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth = create_depth_stencil_texture_resource(&device, config.width, config.height)?;
        log::info!(
            "Surface {}x{} {:?}, {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            window,
            surface,
            adapter,
            device,
            queue,
            config,
            depth,
            last_submission: None,
        })
    }

    /// Reconfigures the swap chain and the depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, ProvisionError> {
        if !is_drawable(width, height) {
            return Ok(false);
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth = create_depth_stencil_texture_resource(&self.device, width, height)?;
        log::debug!("Resized surface to {width}x{height}");
        Ok(true)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

impl FrameBackend for Context {
    type Target = BackBuffer<SurfaceFrame>;
    type Recording = wgpu::CommandEncoder;

    fn acquire_back_buffer(&mut self) -> Result<BackBuffer<SurfaceFrame>, FrameError> {
        let texture = self.surface.get_current_texture()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(BackBuffer::acquire("back buffer", SurfaceFrame { texture, view })?)
    }

    fn begin_recording(
        &mut self,
        _target: &BackBuffer<SurfaceFrame>,
    ) -> Result<wgpu::CommandEncoder, FrameError> {
        Ok(self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            }))
    }

    fn close_and_execute(&mut self, recording: wgpu::CommandEncoder) -> Result<(), FrameError> {
        self.last_submission = Some(self.queue.submit(iter::once(recording.finish())));
        Ok(())
    }

    fn present(&mut self, target: BackBuffer<SurfaceFrame>) -> Result<(), FrameError> {
        let frame = target.release()?;
        self.window.pre_present_notify();
        frame.texture.present();
        Ok(())
    }

    fn signal(&mut self, fence: &Fence, value: u64) -> Result<(), FrameError> {
        signal_on_queue(&self.queue, fence, value);
        Ok(())
    }

    fn wait_for_fence(&mut self, fence: &Fence, value: u64) -> Result<(), FrameError> {
        wait_on_device(&self.device, self.last_submission.clone(), fence, value)
    }
}

/// GPU context rendering into an offscreen color texture.
#[derive(Debug)]
pub struct HeadlessContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth: DepthStencilResource,
    presented: u64,
    last_submission: Option<wgpu::SubmissionIndex>,
}

impl HeadlessContext {
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub async fn new(width: u32, height: u32) -> anyhow::Result<Self> {
        let instance = create_instance();
        let adapter = request_adapter(&instance, None).await?;
        let (device, queue) = request_device(&adapter).await?;

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen color"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = create_depth_stencil_texture_resource(&device, width, height)?;

        Ok(Self {
            adapter,
            device,
            queue,
            color,
            color_view,
            depth,
            presented: 0,
            last_submission: None,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.color.width(), self.color.height())
    }

    /// Number of frames handed to `present`.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FrameBackend for HeadlessContext {
    type Target = BackBuffer<wgpu::TextureView>;
    type Recording = wgpu::CommandEncoder;

    fn acquire_back_buffer(&mut self) -> Result<BackBuffer<wgpu::TextureView>, FrameError> {
        Ok(BackBuffer::acquire("offscreen color", self.color_view.clone())?)
    }

    fn begin_recording(
        &mut self,
        _target: &BackBuffer<wgpu::TextureView>,
    ) -> Result<wgpu::CommandEncoder, FrameError> {
        Ok(self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Encoder"),
            }))
    }

    fn close_and_execute(&mut self, recording: wgpu::CommandEncoder) -> Result<(), FrameError> {
        self.last_submission = Some(self.queue.submit(iter::once(recording.finish())));
        Ok(())
    }

    fn present(&mut self, target: BackBuffer<wgpu::TextureView>) -> Result<(), FrameError> {
        target.release()?;
        self.presented += 1;
        Ok(())
    }

    fn signal(&mut self, fence: &Fence, value: u64) -> Result<(), FrameError> {
        signal_on_queue(&self.queue, fence, value);
        Ok(())
    }

    fn wait_for_fence(&mut self, fence: &Fence, value: u64) -> Result<(), FrameError> {
        wait_on_device(&self.device, self.last_submission.clone(), fence, value)
    }
}
