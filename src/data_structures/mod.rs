//! Scene data: poses, camera, vertex/constant layouts and GPU textures.
//!
//! - `transform` is the scale/rotate/translate pose of an object or camera
//! - `camera` pairs a camera pose with its perspective projection
//! - `vertex` holds the vertex layout, the quad and the constant-buffer structs
//! - `texture` wraps sampled textures and the depth-stencil surface

pub mod camera;
pub mod texture;
pub mod transform;
pub mod vertex;
