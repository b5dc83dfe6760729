//! The fixed per-frame command sequence and the resources it draws with.
//!
//! # Key types
//!
//! - [`Scene`] owns every GPU resource the quad needs
//! - [`Overlay`] is the hook a UI layer uses to draw on top of the quad
//! - [`record_scene_commands`] records one frame into an open encoder

use crate::{
    config::DemoConfig,
    data_structures::{
        texture::{DepthStencilResource, TextureResource, create_texture_resource, upload_texture_data},
        vertex::{Material, QUAD_VERTICES, TransformationMatrix},
    },
    descriptor::{DescriptorHeap, HeapKind},
    error::{DescriptorError, FrameError, ProvisionError},
    math::Matrix4x4,
    pipelines::{
        CONSTANTS_GROUP, PipelineStateConfig, RootSignatureConfig, TABLES_GROUP,
        object3d::Object3dPipeline,
    },
    resources::{
        buffer::{BufferResource, BufferRole, create_buffer_resource},
        shader::{ShaderProfile, compile_shader},
        texture::load_texture,
    },
};

/// A UI layer drawn inside the main pass after the scene.
///
/// The overlay owns one shader-resource slot; the scene never writes to it.
pub trait Overlay {
    fn descriptor_slot(&self) -> u32;

    fn begin_frame(&mut self) {}

    fn render(&mut self, _pass: &mut wgpu::RenderPass<'_>) {}

    fn end_frame(&mut self) {}
}

/// Overlay that draws nothing but still holds its slot.
#[derive(Debug, Default)]
pub struct NullOverlay {
    slot: u32,
}

impl NullOverlay {
    pub fn new(slot: u32) -> Self {
        Self { slot }
    }
}

impl Overlay for NullOverlay {
    fn descriptor_slot(&self) -> u32 {
        self.slot
    }
}

/// Creates the shader-resource heap with `overlay_slot` reserved and returns
/// the slot the scene texture goes into: the first free one after the
/// overlay's.
pub fn shader_resource_heap<T>(
    capacity: u32,
    overlay_slot: u32,
) -> Result<(DescriptorHeap<T>, u32), DescriptorError> {
    let mut heap = DescriptorHeap::new(HeapKind::ShaderResource, capacity);
    heap.reserve(overlay_slot, "overlay")?;
    let texture_slot = heap.next_free_after(overlay_slot)?;
    Ok((heap, texture_slot))
}

/// GPU resources of the textured quad.
#[derive(Debug)]
pub struct Scene {
    pub pipeline: Object3dPipeline,
    pub vertices: BufferResource,
    pub material: BufferResource,
    pub transformation: BufferResource,
    pub texture: TextureResource,
    pub sampler: wgpu::Sampler,
    pub constants: wgpu::BindGroup,
    /// Texture tables by shader-resource slot.
    pub srv_heap: DescriptorHeap<wgpu::BindGroup>,
    pub texture_slot: u32,
    pub vertex_count: u32,
}

impl Scene {
    /// Compiles the shaders, builds the pipeline and uploads the quad, its
    /// constants and its texture.
    pub async fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &DemoConfig,
        color_format: wgpu::TextureFormat,
        overlay: &dyn Overlay,
    ) -> anyhow::Result<Self> {
        let root = RootSignatureConfig::object3d();
        let (vertex, pixel) = futures::future::try_join(
            compile_shader(device, &config.vertex_shader, ShaderProfile::Vertex),
            compile_shader(device, &config.pixel_shader, ShaderProfile::Pixel),
        )
        .await?;
        let pipeline = Object3dPipeline::new(
            device,
            &root,
            PipelineStateConfig::object3d(),
            &vertex,
            &pixel,
            color_format,
        )?;

        let vertices = create_buffer_resource(
            device,
            "vertex_resource",
            std::mem::size_of_val(&QUAD_VERTICES) as u64,
            BufferRole::Vertex,
        )?;
        vertices.write_slice(queue, &QUAD_VERTICES)?;

        let material = create_buffer_resource(
            device,
            "material_resource",
            std::mem::size_of::<Material>() as u64,
            BufferRole::Constant,
        )?;
        material.write(queue, &Material::default())?;

        let transformation = create_buffer_resource(
            device,
            "wvp_resource",
            std::mem::size_of::<TransformationMatrix>() as u64,
            BufferRole::Constant,
        )?;
        transformation.write(queue, &TransformationMatrix::default())?;

        let image = load_texture(&config.texture).await?;
        let mut texture = create_texture_resource(device, &config.texture, &image.metadata)?;
        upload_texture_data(queue, &mut texture, &image)?;

        let sampler = root
            .create_static_sampler(device, 0)
            .ok_or_else(|| anyhow::anyhow!("Root signature declares no static sampler"))?;
        let constants = pipeline.constants_bind_group(device, &material, &transformation);

        let (mut srv_heap, texture_slot) =
            shader_resource_heap(config.srv_heap_capacity, overlay.descriptor_slot())?;
        srv_heap.place(
            texture_slot,
            pipeline.texture_bind_group(device, &texture.view, &sampler),
        )?;
        log::info!(
            "Scene ready: {} vertices, texture in SRV slot {texture_slot}",
            QUAD_VERTICES.len()
        );

        Ok(Self {
            pipeline,
            vertices,
            material,
            transformation,
            texture,
            sampler,
            constants,
            srv_heap,
            texture_slot,
            vertex_count: QUAD_VERTICES.len() as u32,
        })
    }

    /// Writes this frame's world-view-projection matrix.
    pub fn write_transformation(&self, queue: &wgpu::Queue, wvp: Matrix4x4) -> Result<(), ProvisionError> {
        self.transformation.write(queue, &TransformationMatrix::from(wvp))
    }
}

/// Where a frame is drawn to.
pub struct RenderTargets<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a DepthStencilResource,
    pub width: u32,
    pub height: u32,
}

/// Records the frame: clear, full-target viewport and scissor, the quad's
/// pipeline and bindings, one draw, then the overlay.
///
/// wgpu inserts the back-buffer transitions around the pass; the recording is
/// closed by the caller when the encoder is finished.
pub fn record_scene_commands(
    encoder: &mut wgpu::CommandEncoder,
    targets: &RenderTargets<'_>,
    scene: &Scene,
    overlay: &mut dyn Overlay,
    clear_color: wgpu::Color,
) -> Result<(), FrameError> {
    let handle = scene
        .srv_heap
        .handle_at(scene.texture_slot)
        .map_err(|e| FrameError::Recording(e.to_string()))?;
    let texture_table = scene
        .srv_heap
        .resolve(&handle)
        .map_err(|e| FrameError::Recording(e.to_string()))?;

    overlay.begin_frame();
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: targets.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &targets.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(targets.depth.clear_depth),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_viewport(0.0, 0.0, targets.width as f32, targets.height as f32, 0.0, 1.0);
        render_pass.set_scissor_rect(0, 0, targets.width, targets.height);
        render_pass.set_pipeline(&scene.pipeline.pipeline);
        render_pass.set_vertex_buffer(0, scene.vertices.slice());
        render_pass.set_bind_group(CONSTANTS_GROUP, &scene.constants, &[]);
        render_pass.set_bind_group(TABLES_GROUP, texture_table, &[]);
        render_pass.draw(0..scene.vertex_count, 0..1);

        overlay.render(&mut render_pass);
    }
    overlay.end_frame();
    Ok(())
}
