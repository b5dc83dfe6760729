use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::data_structures::texture::TextureMetadata;

/// Decoded pixels of every mip level plus the metadata needed to allocate the
/// matching GPU texture.
#[derive(Debug, Clone)]
pub struct ScratchImage {
    pub metadata: TextureMetadata,
    pub mips: Vec<RgbaImage>,
}

impl ScratchImage {
    /// Converts `img` to sRGB RGBA8 and builds the full mip chain down to 1x1.
    pub fn from_image(img: &DynamicImage) -> Self {
        let base = img.to_rgba8();
        let (width, height) = base.dimensions();
        let mip_levels = TextureMetadata::full_mip_chain(width, height);

        let mut mips = Vec::with_capacity(mip_levels as usize);
        mips.push(base);
        for _ in 1..mip_levels {
            // `mips` is never empty here
            let Some(prev) = mips.last() else { break };
            let w = (prev.width() / 2).max(1);
            let h = (prev.height() / 2).max(1);
            let next = image::imageops::resize(prev, w, h, FilterType::Triangle);
            mips.push(next);
        }

        Self {
            metadata: TextureMetadata {
                width,
                height,
                array_size: 1,
                mip_levels,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
            },
            mips,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&img))
    }
}

/// Resolves `file_name` under `./assets`, falling back to the copy the build
/// script placed next to the build output.
pub fn asset_path(file_name: &str) -> std::path::PathBuf {
    let local = std::path::Path::new("./").join("assets").join(file_name);
    if local.exists() {
        return local;
    }
    std::path::Path::new(env!("QUAD_NGIN_ASSETS")).join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(file_name);
    let txt = tokio::fs::read_to_string(&path).await?;
    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    let data = tokio::fs::read(&path).await?;
    Ok(data)
}

/// Loads an image from `assets/` and generates its mip chain.
pub async fn load_texture(file_name: &str) -> anyhow::Result<ScratchImage> {
    let data = load_binary(file_name).await?;
    let scratch = ScratchImage::from_bytes(&data)?;
    log::info!(
        "Loaded texture {file_name}: {}x{}, {} mips",
        scratch.metadata.width,
        scratch.metadata.height,
        scratch.metadata.mip_levels
    );
    Ok(scratch)
}
