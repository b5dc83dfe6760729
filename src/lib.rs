//! quad-ngin
//!
//! A textured quad rendered with explicit CPU/GPU frame synchronization. A
//! 4x4 matrix library feeds one world-view-projection matrix per frame into a
//! single pipeline, and a fence-driven loop keeps the CPU at most one frame
//! ahead of the GPU.
//!
//! High-level modules
//! - `math`: vectors, row-major matrices and the named transform chains
//! - `data_structures`: poses, camera, vertex/constant layouts and textures
//! - `resources`: buffer provisioning, image loading and shader compilation
//! - `descriptor`: index-addressed descriptor tables
//! - `pipelines`: root signature and pipeline state configuration
//! - `sync`: the fence and the per-frame state machine
//! - `context`: device, queue and presentation targets
//! - `render`: the fixed command sequence and the overlay hook
//! - `flow`: the winit event loop tying it all together
//!

pub mod config;
pub mod context;
pub mod data_structures;
pub mod descriptor;
pub mod error;
pub mod flow;
pub mod math;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod sync;

#[cfg(feature = "integration-tests")]
pub mod capture;

// Re-exports commonly used types for convenience in downstream code.
pub use config::DemoConfig;
pub use math::{Matrix4x4, Vector2, Vector3, Vector4};
pub use wgpu;
