//! GPU textures: sampled 2D textures and the depth-stencil surface.
//!
//! [`create_texture_resource`] allocates a device-local texture ready to be
//! copied into, [`upload_texture_data`] fills every mip level, and
//! [`create_depth_stencil_texture_resource`] builds the depth buffer used by
//! the main pass.

use crate::{
    error::ProvisionError,
    resources::{ResourceState, texture::ScratchImage, transition},
};

/// Shape and format of a texture, as reported by the image loader.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextureMetadata {
    pub width: u32,
    pub height: u32,
    /// Number of array layers. Only 1 passes [`TextureMetadata::validate`].
    pub array_size: u32,
    pub mip_levels: u32,
    pub format: wgpu::TextureFormat,
}

impl TextureMetadata {
    /// Number of levels from `width x height` down to 1x1.
    pub fn full_mip_chain(width: u32, height: u32) -> u32 {
        32 - width.max(height).max(1).leading_zeros()
    }

    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: self.array_size,
        }
    }

    /// Size of mip level `level` in texels.
    pub fn mip_extent(&self, level: u32) -> (u32, u32) {
        ((self.width >> level).max(1), (self.height >> level).max(1))
    }

    /// Checks the metadata against itself and the device limits.
    pub fn validate(&self, limits: &wgpu::Limits) -> Result<(), ProvisionError> {
        if self.width == 0 || self.height == 0 || self.array_size == 0 {
            return Err(ProvisionError::ZeroSize);
        }
        let max_dim = limits.max_texture_dimension_2d;
        let largest = self.width.max(self.height);
        if largest > max_dim {
            return Err(ProvisionError::ExceedsLimit {
                what: "texture dimension",
                requested: u64::from(largest),
                limit: u64::from(max_dim),
            });
        }
        if self.array_size != 1 {
            return Err(ProvisionError::InvalidMetadata(format!(
                "{} array layers requested, only single 2D textures are supported",
                self.array_size
            )));
        }
        let chain = Self::full_mip_chain(self.width, self.height);
        if self.mip_levels == 0 || self.mip_levels > chain {
            return Err(ProvisionError::InvalidMetadata(format!(
                "{} mip levels requested, a {}x{} texture has {chain}",
                self.mip_levels, self.width, self.height
            )));
        }
        if self.format.block_copy_size(None).is_none() {
            return Err(ProvisionError::InvalidMetadata(format!(
                "{:?} cannot be uploaded from the CPU",
                self.format
            )));
        }
        Ok(())
    }
}

/// A sampled texture with its default view.
#[derive(Debug)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub metadata: TextureMetadata,
    label: String,
    state: ResourceState,
}

impl TextureResource {
    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Allocates a device-local texture matching `metadata`.
///
/// The texture starts as a copy destination so the upload can follow
/// immediately.
pub fn create_texture_resource(
    device: &wgpu::Device,
    label: &str,
    metadata: &TextureMetadata,
) -> Result<TextureResource, ProvisionError> {
    metadata.validate(&device.limits())?;
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: metadata.extent(),
        mip_level_count: metadata.mip_levels,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: metadata.format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some(label),
        dimension: Some(wgpu::TextureViewDimension::D2),
        ..Default::default()
    });
    log::debug!(
        "Created texture '{label}' {}x{}x{} ({} mips, {:?})",
        metadata.width,
        metadata.height,
        metadata.array_size,
        metadata.mip_levels,
        metadata.format
    );
    Ok(TextureResource {
        texture,
        view,
        metadata: *metadata,
        label: label.to_string(),
        state: ResourceState::CopyDest,
    })
}

/// Writes every mip level of `image` into `target` and makes it readable by
/// the pixel shader.
pub fn upload_texture_data(
    queue: &wgpu::Queue,
    target: &mut TextureResource,
    image: &ScratchImage,
) -> Result<(), ProvisionError> {
    if target.state != ResourceState::CopyDest {
        return Err(ProvisionError::InvalidTransition {
            label: target.label.clone(),
            current: target.state,
            expected: ResourceState::CopyDest,
        });
    }
    let metadata = target.metadata;
    if image.mips.len() != metadata.mip_levels as usize {
        return Err(ProvisionError::InvalidMetadata(format!(
            "texture has {} mips, image provides {}",
            metadata.mip_levels,
            image.mips.len()
        )));
    }
    let bytes_per_texel = metadata.format.block_copy_size(None).unwrap_or(4);

    for (level, mip) in image.mips.iter().enumerate() {
        let level = level as u32;
        let (width, height) = metadata.mip_extent(level);
        let expected = (width * height * bytes_per_texel) as usize;
        let data = mip.as_raw();
        if data.len() != expected {
            return Err(ProvisionError::DataMismatch {
                expected,
                actual: data.len(),
            });
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target.texture,
                mip_level: level,
                origin: wgpu::Origin3d::ZERO,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_texel * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    transition(
        &target.label,
        &mut target.state,
        ResourceState::CopyDest,
        ResourceState::PixelShaderResource,
    )
}

/// Depth buffer cleared to `clear_depth` at the start of every pass.
///
/// Cloning shares the underlying texture.
#[derive(Clone, Debug)]
pub struct DepthStencilResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub clear_depth: f32,
    pub clear_stencil: u32,
    state: ResourceState,
}

impl DepthStencilResource {
    /// 24-bit depth, 8-bit stencil.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

/// Allocates the depth-stencil surface, already writable as a depth target.
///
/// Zero-sized requests (minimized windows) are clamped to 1x1.
pub fn create_depth_stencil_texture_resource(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> Result<DepthStencilResource, ProvisionError> {
    let size = wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    };
    let max_dim = device.limits().max_texture_dimension_2d;
    if size.width.max(size.height) > max_dim {
        return Err(ProvisionError::ExceedsLimit {
            what: "depth-stencil dimension",
            requested: u64::from(size.width.max(size.height)),
            limit: u64::from(max_dim),
        });
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_stencil"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DepthStencilResource::FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    Ok(DepthStencilResource {
        texture,
        view,
        clear_depth: 1.0,
        clear_stencil: 0,
        state: ResourceState::DepthWrite,
    })
}
