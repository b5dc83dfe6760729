//! Error types for provisioning, shader compilation, descriptor tables,
//! pipeline configuration and the frame loop.
//!
//! Each operation returns its own error kind so the caller decides whether
//! to log and continue or to abort. The demo's application layer treats all
//! of them as fatal.

use std::fmt;

use crate::{descriptor::HeapKind, resources::ResourceState, sync::FrameState};

/// Failure to allocate or prepare a GPU buffer or texture.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionError {
    /// A zero-sized allocation was requested.
    ZeroSize,
    /// The size is not a multiple of the copy alignment required by the device.
    Misaligned { size: u64, alignment: u64 },
    /// The request is larger than the device allows.
    ExceedsLimit {
        what: &'static str,
        requested: u64,
        limit: u64,
    },
    /// The texture metadata is inconsistent (e.g. more mips than the chain has).
    InvalidMetadata(String),
    /// Pixel data does not match the texture it is uploaded to.
    DataMismatch { expected: usize, actual: usize },
    /// A state transition was requested from a state the resource is not in.
    InvalidTransition {
        label: String,
        current: ResourceState,
        expected: ResourceState,
    },
}

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionError::ZeroSize => write!(f, "Cannot allocate a zero-sized resource"),
            ProvisionError::Misaligned { size, alignment } => {
                write!(f, "Size {size} is not a multiple of {alignment}")
            }
            ProvisionError::ExceedsLimit {
                what,
                requested,
                limit,
            } => write!(f, "Requested {what} of {requested} exceeds device limit {limit}"),
            ProvisionError::InvalidMetadata(msg) => write!(f, "Invalid texture metadata: {msg}"),
            ProvisionError::DataMismatch { expected, actual } => {
                write!(f, "Expected {expected} bytes of pixel data, got {actual}")
            }
            ProvisionError::InvalidTransition {
                label,
                current,
                expected,
            } => write!(
                f,
                "Resource '{label}' is in state {current:?}, expected {expected:?}"
            ),
        }
    }
}

impl std::error::Error for ProvisionError {}

/// Shader loading or compilation failure.
#[derive(Debug)]
pub enum ShaderError {
    /// The source file could not be read.
    Load { path: String, source_error: String },
    /// The compiler reported at least one error.
    Compilation {
        path: String,
        profile: &'static str,
        diagnostics: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Load { path, source_error } => {
                write!(f, "Failed to load shader source from '{path}': {source_error}")
            }
            ShaderError::Compilation {
                path,
                profile,
                diagnostics,
            } => write!(
                f,
                "Shader compilation failed for '{path}' ({profile}): {diagnostics}"
            ),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Misuse of a descriptor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    OutOfRange {
        kind: HeapKind,
        index: u32,
        capacity: u32,
    },
    Reserved {
        kind: HeapKind,
        index: u32,
        owner: String,
    },
    Empty {
        kind: HeapKind,
        index: u32,
    },
    /// Every slot is occupied or reserved.
    Full { kind: HeapKind, capacity: u32 },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::OutOfRange {
                kind,
                index,
                capacity,
            } => write!(
                f,
                "Descriptor index {index} is out of range for {kind:?} heap of {capacity}"
            ),
            DescriptorError::Reserved { kind, index, owner } => {
                write!(f, "{kind:?} descriptor {index} is reserved for {owner}")
            }
            DescriptorError::Empty { kind, index } => {
                write!(f, "{kind:?} descriptor {index} is empty")
            }
            DescriptorError::Full { kind, capacity } => {
                write!(f, "{kind:?} heap has no free slot left of {capacity}")
            }
        }
    }
}

impl std::error::Error for DescriptorError {}

/// A root signature description that cannot be turned into a pipeline layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineConfigError {
    /// Two parameters claim the same register for the same shader stage.
    DuplicateRegister {
        stage: &'static str,
        register: String,
    },
    /// A descriptor table with no ranges.
    EmptyTable { parameter: usize },
    /// A descriptor range that ends past the last register number.
    RegisterOverflow {
        parameter: usize,
        base_register: u32,
        count: u32,
    },
    /// No parameter or sampler is declared at all.
    Empty,
    /// A shader compiled for one stage was handed to another.
    StageMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

impl fmt::Display for PipelineConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineConfigError::DuplicateRegister { stage, register } => {
                write!(f, "Register {register} is bound twice for the {stage} stage")
            }
            PipelineConfigError::EmptyTable { parameter } => {
                write!(f, "Root parameter {parameter} is a descriptor table without ranges")
            }
            PipelineConfigError::RegisterOverflow {
                parameter,
                base_register,
                count,
            } => write!(
                f,
                "Root parameter {parameter} declares {count} registers from t{base_register}, past the last register"
            ),
            PipelineConfigError::Empty => write!(f, "Root signature declares no bindings"),
            PipelineConfigError::StageMismatch { expected, actual } => {
                write!(f, "Expected a {expected} shader, got {actual}")
            }
        }
    }
}

impl std::error::Error for PipelineConfigError {}

/// Failure while recording, submitting, presenting or waiting for a frame.
#[derive(Debug)]
pub enum FrameError {
    /// The swap chain could not hand out a back buffer.
    Surface(wgpu::SurfaceError),
    /// The frame state machine was driven out of order.
    InvalidTransition { from: FrameState, to: FrameState },
    /// Recording was attempted while the previous frame is still on the GPU.
    FrameInFlight { completed: u64, expected: u64 },
    /// The wait returned but the fence did not reach the awaited value.
    FenceIncomplete { completed: u64, expected: u64 },
    /// Polling the device for completion failed.
    Poll(String),
    /// Command recording failed.
    Recording(String),
    /// A frame resource was used out of order.
    Resource(ProvisionError),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Surface(err) => write!(f, "Failed to acquire back buffer: {err}"),
            FrameError::InvalidTransition { from, to } => {
                write!(f, "Invalid frame transition from {from:?} to {to:?}")
            }
            FrameError::FrameInFlight {
                completed,
                expected,
            } => write!(
                f,
                "Previous frame still in flight (fence completed {completed}, expected {expected})"
            ),
            FrameError::FenceIncomplete {
                completed,
                expected,
            } => write!(
                f,
                "Fence wait returned at {completed} before reaching {expected}"
            ),
            FrameError::Poll(msg) => write!(f, "Device poll failed: {msg}"),
            FrameError::Recording(msg) => write!(f, "Command recording failed: {msg}"),
            FrameError::Resource(err) => write!(f, "Frame resource misuse: {err}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Surface(err) => Some(err),
            FrameError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<wgpu::SurfaceError> for FrameError {
    fn from(err: wgpu::SurfaceError) -> Self {
        FrameError::Surface(err)
    }
}

impl From<ProvisionError> for FrameError {
    fn from(err: ProvisionError) -> Self {
        FrameError::Resource(err)
    }
}
