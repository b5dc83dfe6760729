//! GPU resource provisioning and asset loading.
//!
//! - `buffer` allocates CPU-writable vertex/constant buffers
//! - `texture` loads images from `assets/` and builds their mip chains
//! - `shader` compiles WGSL files into shader modules
//!
//! Texture and depth-stencil allocation live next to their GPU wrappers in
//! [`crate::data_structures::texture`].

use crate::error::ProvisionError;

pub mod buffer;
pub mod shader;
pub mod texture;

/// Usage state a resource is in from the point of view of the command stream.
///
/// wgpu tracks the real barriers itself; this state mirrors them so that
/// provisioning code can refuse out-of-order use (e.g. uploading twice).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResourceState {
    GenericRead,
    CopyDest,
    PixelShaderResource,
    DepthWrite,
    RenderTarget,
    Present,
}

/// Moves `state` from `expected` to `next`, failing if it is anywhere else.
pub fn transition(
    label: &str,
    state: &mut ResourceState,
    expected: ResourceState,
    next: ResourceState,
) -> Result<(), ProvisionError> {
    if *state != expected {
        return Err(ProvisionError::InvalidTransition {
            label: label.to_string(),
            current: *state,
            expected,
        });
    }
    log::trace!("{label}: {expected:?} -> {next:?}");
    *state = next;
    Ok(())
}

/// A presentable image between acquisition and presentation.
///
/// Acquiring moves it from `Present` to `RenderTarget`; [`BackBuffer::release`]
/// moves it back before it is handed to the presentation engine.
#[derive(Debug)]
pub struct BackBuffer<T> {
    pub image: T,
    label: String,
    state: ResourceState,
}

impl<T> BackBuffer<T> {
    pub fn acquire(label: &str, image: T) -> Result<Self, ProvisionError> {
        let mut state = ResourceState::Present;
        transition(
            label,
            &mut state,
            ResourceState::Present,
            ResourceState::RenderTarget,
        )?;
        Ok(Self {
            image,
            label: label.to_string(),
            state,
        })
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Returns the image ready to be presented.
    pub fn release(mut self) -> Result<T, ProvisionError> {
        transition(
            &self.label,
            &mut self.state,
            ResourceState::RenderTarget,
            ResourceState::Present,
        )?;
        Ok(self.image)
    }
}
