//! Object and camera poses.

use crate::math::{Matrix4x4, Vector3, make_affine_matrix};

/// Scale, Euler rotation (radians) and translation of an object or camera.
///
/// Any finite values are accepted. A zero scale component makes the world
/// matrix singular, so poses that get inverted (cameras) must keep all three
/// scale components non-zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3,
    pub rotate: Vector3,
    pub translate: Vector3,
}

impl Transform {
    pub fn new(scale: Vector3, rotate: Vector3, translate: Vector3) -> Self {
        Self {
            scale,
            rotate,
            translate,
        }
    }

    /// Unit scale and no rotation at `translate`.
    pub fn at(translate: Vector3) -> Self {
        Self {
            translate,
            ..Self::default()
        }
    }

    pub fn world_matrix(&self) -> Matrix4x4 {
        make_affine_matrix(self.scale, self.rotate, self.translate)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vector3::ONE,
            rotate: Vector3::ZERO,
            translate: Vector3::ZERO,
        }
    }
}
