//! CPU-writable buffers for vertex and constant data.

use wgpu::util::align_to;

use crate::{
    error::ProvisionError,
    resources::ResourceState,
};

/// What a buffer is bound as. Every role is also a copy destination so the
/// CPU can write into it through the queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BufferRole {
    Vertex,
    Constant,
}

impl BufferRole {
    pub fn usage(&self) -> wgpu::BufferUsages {
        let role = match self {
            BufferRole::Vertex => wgpu::BufferUsages::VERTEX,
            BufferRole::Constant => wgpu::BufferUsages::UNIFORM,
        };
        role | wgpu::BufferUsages::COPY_DST
    }
}

/// A linear buffer of exactly `size` bytes, readable by the GPU as soon as it
/// is created.
#[derive(Debug)]
pub struct BufferResource {
    pub buffer: wgpu::Buffer,
    label: String,
    size: u64,
    role: BufferRole,
    state: ResourceState,
}

impl BufferResource {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn role(&self) -> BufferRole {
        self.role
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Copies `value` to the start of the buffer.
    pub fn write<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, value: &T) -> Result<(), ProvisionError> {
        self.write_slice(queue, std::slice::from_ref(value))
    }

    /// Copies `values` to the start of the buffer.
    pub fn write_slice<T: bytemuck::Pod>(
        &self,
        queue: &wgpu::Queue,
        values: &[T],
    ) -> Result<(), ProvisionError> {
        let bytes: &[u8] = bytemuck::cast_slice(values);
        let len = bytes.len() as u64;
        if len > self.size {
            return Err(ProvisionError::ExceedsLimit {
                what: "buffer write",
                requested: len,
                limit: self.size,
            });
        }
        validate_buffer_size(len, u64::MAX)?;
        queue.write_buffer(&self.buffer, 0, bytes);
        Ok(())
    }

    pub fn as_entire_binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// Checks a requested size against the copy alignment and the device limit.
pub fn validate_buffer_size(size_in_bytes: u64, max_buffer_size: u64) -> Result<(), ProvisionError> {
    if size_in_bytes == 0 {
        return Err(ProvisionError::ZeroSize);
    }
    if align_to(size_in_bytes, wgpu::COPY_BUFFER_ALIGNMENT) != size_in_bytes {
        return Err(ProvisionError::Misaligned {
            size: size_in_bytes,
            alignment: wgpu::COPY_BUFFER_ALIGNMENT,
        });
    }
    if size_in_bytes > max_buffer_size {
        return Err(ProvisionError::ExceedsLimit {
            what: "buffer size",
            requested: size_in_bytes,
            limit: max_buffer_size,
        });
    }
    Ok(())
}

/// Allocates a buffer of exactly `size_in_bytes` bytes for `role`.
///
/// The request is validated against the device before anything is allocated;
/// there is no fallback heap or retry.
pub fn create_buffer_resource(
    device: &wgpu::Device,
    label: &str,
    size_in_bytes: u64,
    role: BufferRole,
) -> Result<BufferResource, ProvisionError> {
    validate_buffer_size(size_in_bytes, device.limits().max_buffer_size)?;
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size_in_bytes,
        usage: role.usage(),
        mapped_at_creation: false,
    });
    log::debug!("Created {role:?} buffer '{label}' ({size_in_bytes} bytes)");
    Ok(BufferResource {
        buffer,
        label: label.to_string(),
        size: size_in_bytes,
        role,
        state: ResourceState::GenericRead,
    })
}
