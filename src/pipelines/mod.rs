//! Root signature and pipeline state configuration.
//!
//! A [`RootSignatureConfig`] is a static list of what the shaders read and
//! at which register. It is validated once and then lowered to two bind
//! group layouts:
//!
//! - group 0 holds the constant buffers, in declaration order
//! - group 1 holds the descriptor-table views followed by the static samplers
//!
//! `object3d` turns the lowered layout plus a [`PipelineStateConfig`] into the
//! render pipeline used for the quad.

use std::collections::HashSet;

use crate::error::PipelineConfigError;

pub mod object3d;

/// Bind group index of the constant buffers.
pub const CONSTANTS_GROUP: u32 = 0;
/// Bind group index of the descriptor tables and static samplers.
pub const TABLES_GROUP: u32 = 1;

/// Which shader stage can see a parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderVisibility {
    Vertex,
    Pixel,
    All,
}

impl ShaderVisibility {
    pub fn stages(&self) -> wgpu::ShaderStages {
        match self {
            ShaderVisibility::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderVisibility::Pixel => wgpu::ShaderStages::FRAGMENT,
            ShaderVisibility::All => wgpu::ShaderStages::VERTEX_FRAGMENT,
        }
    }

    fn stage_names(&self) -> &'static [&'static str] {
        match self {
            ShaderVisibility::Vertex => &["vertex"],
            ShaderVisibility::Pixel => &["pixel"],
            ShaderVisibility::All => &["vertex", "pixel"],
        }
    }
}

/// A run of shader-resource registers `t{base}..t{base + count}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DescriptorRange {
    pub base_register: u32,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RootParameter {
    /// A constant buffer at register `b{register}`.
    ConstantBuffer {
        visibility: ShaderVisibility,
        register: u32,
    },
    /// A table of shader-resource views.
    DescriptorTable {
        visibility: ShaderVisibility,
        ranges: Vec<DescriptorRange>,
    },
}

/// A sampler baked into the layout at register `s{register}`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StaticSampler {
    pub visibility: ShaderVisibility,
    pub register: u32,
    pub filter: wgpu::FilterMode,
    pub address_mode: wgpu::AddressMode,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RootSignatureConfig {
    pub parameters: Vec<RootParameter>,
    pub static_samplers: Vec<StaticSampler>,
}

impl RootSignatureConfig {
    /// Bindings of the textured object shaders:
    ///
    /// | parameter | stage  | register |
    /// |-----------|--------|----------|
    /// | material  | pixel  | b0       |
    /// | wvp       | vertex | b0       |
    /// | texture   | pixel  | t0       |
    /// | sampler   | pixel  | s0       |
    pub fn object3d() -> Self {
        Self {
            parameters: vec![
                RootParameter::ConstantBuffer {
                    visibility: ShaderVisibility::Pixel,
                    register: 0,
                },
                RootParameter::ConstantBuffer {
                    visibility: ShaderVisibility::Vertex,
                    register: 0,
                },
                RootParameter::DescriptorTable {
                    visibility: ShaderVisibility::Pixel,
                    ranges: vec![DescriptorRange {
                        base_register: 0,
                        count: 1,
                    }],
                },
            ],
            static_samplers: vec![StaticSampler {
                visibility: ShaderVisibility::Pixel,
                register: 0,
                filter: wgpu::FilterMode::Linear,
                address_mode: wgpu::AddressMode::Repeat,
            }],
        }
    }

    /// Rejects empty signatures, empty tables, ranges running past the last
    /// register and registers bound twice for the same stage.
    pub fn validate(&self) -> Result<(), PipelineConfigError> {
        if self.parameters.is_empty() && self.static_samplers.is_empty() {
            return Err(PipelineConfigError::Empty);
        }
        let mut seen: HashSet<(&'static str, String)> = HashSet::new();
        let mut claim = |visibility: ShaderVisibility, register: String| {
            for &stage in visibility.stage_names() {
                if !seen.insert((stage, register.clone())) {
                    return Err(PipelineConfigError::DuplicateRegister {
                        stage,
                        register: register.clone(),
                    });
                }
            }
            Ok(())
        };

        for (index, parameter) in self.parameters.iter().enumerate() {
            match parameter {
                RootParameter::ConstantBuffer {
                    visibility,
                    register,
                } => claim(*visibility, format!("b{register}"))?,
                RootParameter::DescriptorTable { visibility, ranges } => {
                    if ranges.is_empty() || ranges.iter().all(|r| r.count == 0) {
                        return Err(PipelineConfigError::EmptyTable { parameter: index });
                    }
                    for range in ranges {
                        let end = range.base_register.checked_add(range.count).ok_or(
                            PipelineConfigError::RegisterOverflow {
                                parameter: index,
                                base_register: range.base_register,
                                count: range.count,
                            },
                        )?;
                        for register in range.base_register..end {
                            claim(*visibility, format!("t{register}"))?;
                        }
                    }
                }
            }
        }
        for sampler in &self.static_samplers {
            claim(sampler.visibility, format!("s{}", sampler.register))?;
        }
        Ok(())
    }

    /// Layout entries of the constant-buffer group, one binding per
    /// constant buffer in declaration order.
    pub fn constant_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        self.parameters
            .iter()
            .filter_map(|parameter| match parameter {
                RootParameter::ConstantBuffer { visibility, .. } => Some(*visibility),
                RootParameter::DescriptorTable { .. } => None,
            })
            .enumerate()
            .map(|(binding, visibility)| wgpu::BindGroupLayoutEntry {
                binding: binding as u32,
                visibility: visibility.stages(),
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect()
    }

    /// Layout entries of the table group: every register of every table,
    /// then the static samplers.
    pub fn table_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        let views = self.parameters.iter().flat_map(|parameter| match parameter {
            RootParameter::DescriptorTable { visibility, ranges } => ranges
                .iter()
                .flat_map(|range| (0..range.count).map(|_| *visibility))
                .collect::<Vec<_>>(),
            RootParameter::ConstantBuffer { .. } => Vec::new(),
        });
        let textures = views.map(|visibility| (visibility, None));
        let samplers = self
            .static_samplers
            .iter()
            .map(|sampler| (sampler.visibility, Some(sampler)));

        textures
            .chain(samplers)
            .enumerate()
            .map(|(binding, (visibility, sampler))| wgpu::BindGroupLayoutEntry {
                binding: binding as u32,
                visibility: visibility.stages(),
                ty: match sampler {
                    Some(sampler) => wgpu::BindingType::Sampler(
                        if sampler.filter == wgpu::FilterMode::Linear {
                            wgpu::SamplerBindingType::Filtering
                        } else {
                            wgpu::SamplerBindingType::NonFiltering
                        },
                    ),
                    None => wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                },
                count: None,
            })
            .collect()
    }

    /// Creates the two bind group layouts after validating the signature.
    pub fn create_layouts(
        &self,
        device: &wgpu::Device,
    ) -> Result<RootLayouts, PipelineConfigError> {
        self.validate()?;
        let constants = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("root constants layout"),
            entries: &self.constant_entries(),
        });
        let tables = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("root tables layout"),
            entries: &self.table_entries(),
        });
        Ok(RootLayouts { constants, tables })
    }

    /// Builds the sampler for static sampler `index`.
    pub fn create_static_sampler(&self, device: &wgpu::Device, index: usize) -> Option<wgpu::Sampler> {
        let sampler = self.static_samplers.get(index)?;
        Some(device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("static sampler"),
            address_mode_u: sampler.address_mode,
            address_mode_v: sampler.address_mode,
            address_mode_w: sampler.address_mode,
            mag_filter: sampler.filter,
            min_filter: sampler.filter,
            mipmap_filter: sampler.filter,
            lod_min_clamp: 0.0,
            lod_max_clamp: f32::MAX,
            ..Default::default()
        }))
    }
}

/// Bind group layouts produced from a [`RootSignatureConfig`].
#[derive(Debug)]
pub struct RootLayouts {
    pub constants: wgpu::BindGroupLayout,
    pub tables: wgpu::BindGroupLayout,
}

/// Fixed-function state of a pipeline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PipelineStateConfig {
    pub topology: wgpu::PrimitiveTopology,
    pub front_face: wgpu::FrontFace,
    pub cull_mode: Option<wgpu::Face>,
    pub polygon_mode: wgpu::PolygonMode,
    pub blend: Option<wgpu::BlendState>,
    pub write_mask: wgpu::ColorWrites,
    pub depth_compare: wgpu::CompareFunction,
    pub depth_write_enabled: bool,
}

impl PipelineStateConfig {
    /// Opaque, back-face culled triangles with a `LessEqual` depth test.
    pub fn object3d() -> Self {
        Self {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
            depth_compare: wgpu::CompareFunction::LessEqual,
            depth_write_enabled: true,
        }
    }
}

impl Default for PipelineStateConfig {
    fn default() -> Self {
        Self::object3d()
    }
}
