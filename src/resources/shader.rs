//! Shader compilation.
//!
//! Shaders are WGSL files under `assets/shaders/`, one stage per file, each
//! exposing a single `main` entry point.

use crate::{error::ShaderError, resources::texture::load_string};

/// Fixed entry point of every stage.
pub const ENTRY_POINT: &str = "main";

/// Target stage of a shader file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderProfile {
    Vertex,
    Pixel,
}

impl ShaderProfile {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShaderProfile::Vertex => "vs_6_0",
            ShaderProfile::Pixel => "ps_6_0",
        }
    }

    pub const fn stage(&self) -> wgpu::ShaderStages {
        match self {
            ShaderProfile::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderProfile::Pixel => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

/// A compiled stage ready to be referenced by a pipeline.
#[derive(Debug)]
pub struct CompiledShader {
    pub module: wgpu::ShaderModule,
    pub profile: ShaderProfile,
    pub path: String,
}

impl CompiledShader {
    pub fn entry_point(&self) -> &'static str {
        ENTRY_POINT
    }
}

/// Compiles `file_name` for `profile`.
///
/// Warnings are logged and do not fail the compilation. Any error is returned
/// as [`ShaderError::Compilation`] with every diagnostic joined into one string.
pub async fn compile_shader(
    device: &wgpu::Device,
    file_name: &str,
    profile: ShaderProfile,
) -> Result<CompiledShader, ShaderError> {
    log::info!(
        "Begin CompileShader, path:{file_name}, profile:{}",
        profile.as_str()
    );
    let source = load_string(file_name)
        .await
        .map_err(|e| ShaderError::Load {
            path: file_name.to_string(),
            source_error: e.to_string(),
        })?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(file_name),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let scope_error = device.pop_error_scope().await;

    let info = module.get_compilation_info().await;
    let mut errors = Vec::new();
    for message in &info.messages {
        let location = message
            .location
            .map(|l| format!("{}:{}", l.line_number, l.line_position))
            .unwrap_or_default();
        match message.message_type {
            wgpu::CompilationMessageType::Error => {
                log::error!("{file_name}:{location}: {}", message.message);
                errors.push(format!("{location}: {}", message.message));
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("{file_name}:{location}: {}", message.message);
            }
            wgpu::CompilationMessageType::Info => {
                log::info!("{file_name}:{location}: {}", message.message);
            }
        }
    }
    if let Some(err) = scope_error {
        errors.push(err.to_string());
    }
    if !errors.is_empty() {
        return Err(ShaderError::Compilation {
            path: file_name.to_string(),
            profile: profile.as_str(),
            diagnostics: errors.join("\n"),
        });
    }

    log::info!(
        "Compile Succeeded, path:{file_name}, profile:{}",
        profile.as_str()
    );
    Ok(CompiledShader {
        module,
        profile,
        path: file_name.to_string(),
    })
}
