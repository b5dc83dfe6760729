use crate::{
    data_structures::{texture::DepthStencilResource, vertex::VertexData},
    error::PipelineConfigError,
    pipelines::{PipelineStateConfig, RootLayouts, RootSignatureConfig},
    resources::{
        buffer::BufferResource,
        shader::{CompiledShader, ShaderProfile},
    },
};

/// The pipeline that draws the textured quad, plus the layouts its bind
/// groups are created against.
#[derive(Debug)]
pub struct Object3dPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub layouts: RootLayouts,
    pub state: PipelineStateConfig,
}

impl Object3dPipeline {
    /// Builds the pipeline once at startup; it is reused unchanged every frame.
    pub fn new(
        device: &wgpu::Device,
        root: &RootSignatureConfig,
        state: PipelineStateConfig,
        vertex: &CompiledShader,
        pixel: &CompiledShader,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self, PipelineConfigError> {
        expect_profile(vertex, ShaderProfile::Vertex)?;
        expect_profile(pixel, ShaderProfile::Pixel)?;

        let layouts = root.create_layouts(device)?;
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Object3d Pipeline Layout"),
            bind_group_layouts: &[&layouts.constants, &layouts.tables],
            push_constant_ranges: &[],
        });

        let pipeline = mk_render_pipeline(
            device,
            &layout,
            color_format,
            Some(DepthStencilResource::FORMAT),
            &[VertexData::desc()],
            &state,
            vertex,
            pixel,
        );
        log::info!("Created Object3d pipeline for {color_format:?}");

        Ok(Self {
            pipeline,
            layouts,
            state,
        })
    }

    /// Group 0: material (binding 0) and transformation matrix (binding 1).
    pub fn constants_bind_group(
        &self,
        device: &wgpu::Device,
        material: &BufferResource,
        transformation: &BufferResource,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("constants_bind_group"),
            layout: &self.layouts.constants,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: material.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: transformation.as_entire_binding(),
                },
            ],
        })
    }

    /// Group 1: texture view (binding 0) and static sampler (binding 1).
    pub fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &self.layouts.tables,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}

fn expect_profile(shader: &CompiledShader, expected: ShaderProfile) -> Result<(), PipelineConfigError> {
    if shader.profile != expected {
        return Err(PipelineConfigError::StageMismatch {
            expected: expected.as_str(),
            actual: shader.profile.as_str(),
        });
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    state: &PipelineStateConfig,
    vertex: &CompiledShader,
    pixel: &CompiledShader,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Object3d Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &vertex.module,
            entry_point: Some(vertex.entry_point()),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &pixel.module,
            entry_point: Some(pixel.entry_point()),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: state.blend,
                write_mask: state.write_mask,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: state.topology,
            strip_index_format: None,
            front_face: state.front_face,
            cull_mode: state.cull_mode,
            polygon_mode: state.polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: state.depth_write_enabled,
            depth_compare: state.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
