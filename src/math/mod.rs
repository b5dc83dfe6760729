//! Vector and matrix math.
//!
//! - `vector` holds the 2/3/4 component value types
//! - `matrix` holds [`Matrix4x4`] and its arithmetic, transpose and inverse
//! - `transform` builds scale/rotate/translate/affine/perspective matrices
//! - `compose` names the multiplication orders used by the renderer

pub mod compose;
pub mod matrix;
pub mod transform;
pub mod vector;

pub use compose::{AffineComposition, AffineStage, WorldViewProjection};
pub use matrix::Matrix4x4;
pub use transform::*;
pub use vector::{Vector2, Vector3, Vector4};
