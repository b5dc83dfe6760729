use quad_ngin::{
    error::PipelineConfigError,
    pipelines::{
        DescriptorRange, PipelineStateConfig, RootParameter, RootSignatureConfig,
        ShaderVisibility, StaticSampler,
    },
};

fn linear_sampler(visibility: ShaderVisibility, register: u32) -> StaticSampler {
    StaticSampler {
        visibility,
        register,
        filter: wgpu::FilterMode::Linear,
        address_mode: wgpu::AddressMode::Repeat,
    }
}

#[test]
fn object3d_signature_is_valid() {
    let root = RootSignatureConfig::object3d();
    assert_eq!(root.parameters.len(), 3);
    assert_eq!(root.static_samplers.len(), 1);
    assert_eq!(root.validate(), Ok(()));
}

#[test]
fn same_register_in_different_stages_is_allowed() {
    // material and wvp both sit at b0, one per stage
    let root = RootSignatureConfig::object3d();
    let registers: Vec<_> = root
        .parameters
        .iter()
        .filter_map(|p| match p {
            RootParameter::ConstantBuffer {
                visibility,
                register,
            } => Some((*visibility, *register)),
            RootParameter::DescriptorTable { .. } => None,
        })
        .collect();
    assert_eq!(
        registers,
        vec![(ShaderVisibility::Pixel, 0), (ShaderVisibility::Vertex, 0)]
    );
}

#[test]
fn duplicate_register_in_one_stage_is_rejected() {
    let mut root = RootSignatureConfig::object3d();
    root.parameters.push(RootParameter::ConstantBuffer {
        visibility: ShaderVisibility::All,
        register: 0,
    });
    assert_eq!(
        root.validate(),
        Err(PipelineConfigError::DuplicateRegister {
            stage: "vertex",
            register: "b0".to_string()
        })
    );
}

#[test]
fn overlapping_table_ranges_are_rejected() {
    let root = RootSignatureConfig {
        parameters: vec![RootParameter::DescriptorTable {
            visibility: ShaderVisibility::Pixel,
            ranges: vec![
                DescriptorRange {
                    base_register: 0,
                    count: 2,
                },
                DescriptorRange {
                    base_register: 1,
                    count: 1,
                },
            ],
        }],
        static_samplers: vec![],
    };
    assert_eq!(
        root.validate(),
        Err(PipelineConfigError::DuplicateRegister {
            stage: "pixel",
            register: "t1".to_string()
        })
    );
}

#[test]
fn duplicate_sampler_is_rejected() {
    let mut root = RootSignatureConfig::object3d();
    root.static_samplers
        .push(linear_sampler(ShaderVisibility::Pixel, 0));
    assert!(matches!(
        root.validate(),
        Err(PipelineConfigError::DuplicateRegister { register, .. }) if register == "s0"
    ));
}

#[test]
fn empty_table_is_rejected() {
    let mut root = RootSignatureConfig::object3d();
    root.parameters.push(RootParameter::DescriptorTable {
        visibility: ShaderVisibility::Pixel,
        ranges: vec![],
    });
    assert_eq!(
        root.validate(),
        Err(PipelineConfigError::EmptyTable { parameter: 3 })
    );

    root.parameters[3] = RootParameter::DescriptorTable {
        visibility: ShaderVisibility::Pixel,
        ranges: vec![DescriptorRange {
            base_register: 4,
            count: 0,
        }],
    };
    assert_eq!(
        root.validate(),
        Err(PipelineConfigError::EmptyTable { parameter: 3 })
    );
}

#[test]
fn empty_signature_is_rejected() {
    assert_eq!(
        RootSignatureConfig::default().validate(),
        Err(PipelineConfigError::Empty)
    );
}

#[test]
fn constant_group_follows_declaration_order() {
    let entries = RootSignatureConfig::object3d().constant_entries();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].binding, 0);
    assert_eq!(entries[0].visibility, wgpu::ShaderStages::FRAGMENT);
    assert_eq!(entries[1].binding, 1);
    assert_eq!(entries[1].visibility, wgpu::ShaderStages::VERTEX);
    for entry in &entries {
        assert!(matches!(
            entry.ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                ..
            }
        ));
    }
}

#[test]
fn table_group_lists_views_then_samplers() {
    let entries = RootSignatureConfig::object3d().table_entries();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].binding, 0);
    assert_eq!(entries[0].visibility, wgpu::ShaderStages::FRAGMENT);
    assert!(matches!(
        entries[0].ty,
        wgpu::BindingType::Texture {
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
            ..
        }
    ));
    assert_eq!(entries[1].binding, 1);
    assert!(matches!(
        entries[1].ty,
        wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
    ));
}

#[test]
fn nearest_sampler_is_non_filtering() {
    let root = RootSignatureConfig {
        parameters: vec![],
        static_samplers: vec![StaticSampler {
            filter: wgpu::FilterMode::Nearest,
            ..linear_sampler(ShaderVisibility::All, 0)
        }],
    };
    let entries = root.table_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].visibility, wgpu::ShaderStages::VERTEX_FRAGMENT);
    assert!(matches!(
        entries[0].ty,
        wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering)
    ));
}

#[test]
fn object3d_pipeline_state() {
    let state = PipelineStateConfig::object3d();
    assert_eq!(state, PipelineStateConfig::default());
    assert_eq!(state.topology, wgpu::PrimitiveTopology::TriangleList);
    assert_eq!(state.front_face, wgpu::FrontFace::Cw);
    assert_eq!(state.cull_mode, Some(wgpu::Face::Back));
    assert_eq!(state.polygon_mode, wgpu::PolygonMode::Fill);
    assert_eq!(state.blend, None);
    assert_eq!(state.write_mask, wgpu::ColorWrites::ALL);
    assert_eq!(state.depth_compare, wgpu::CompareFunction::LessEqual);
    assert!(state.depth_write_enabled);
}

#[test]
fn range_past_the_last_register_is_rejected() {
    let root = RootSignatureConfig {
        parameters: vec![RootParameter::DescriptorTable {
            visibility: ShaderVisibility::Pixel,
            ranges: vec![DescriptorRange {
                base_register: u32::MAX,
                count: 2,
            }],
        }],
        static_samplers: vec![],
    };
    assert_eq!(
        root.validate(),
        Err(PipelineConfigError::RegisterOverflow {
            parameter: 0,
            base_register: u32::MAX,
            count: 2
        })
    );

    // the very last register is still addressable
    let last = RootSignatureConfig {
        parameters: vec![RootParameter::DescriptorTable {
            visibility: ShaderVisibility::Pixel,
            ranges: vec![DescriptorRange {
                base_register: u32::MAX - 1,
                count: 1,
            }],
        }],
        static_samplers: vec![],
    };
    assert_eq!(last.validate(), Ok(()));
}
