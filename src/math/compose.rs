//! Named multiplication chains.
//!
//! Every order-sensitive product the renderer relies on is spelled out here
//! once, so the order can be read and tested without chasing inline chains.

use crate::math::{
    matrix::Matrix4x4,
    transform::{make_rotate_matrix, make_scale_matrix, make_translate_matrix},
    vector::Vector3,
};

/// One step of an object transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AffineStage {
    Scale(Vector3),
    Rotate(Vector3),
    Translate(Vector3),
}

impl AffineStage {
    pub fn matrix(&self) -> Matrix4x4 {
        match self {
            AffineStage::Scale(v) => make_scale_matrix(*v),
            AffineStage::Rotate(v) => make_rotate_matrix(*v),
            AffineStage::Translate(v) => make_translate_matrix(*v),
        }
    }
}

/// Ordered list of affine stages, applied first to last.
#[derive(Clone, Debug, PartialEq)]
pub struct AffineComposition {
    stages: Vec<AffineStage>,
}

impl AffineComposition {
    /// The object-space order used for every pose: scale, rotate, translate.
    pub fn scale_rotate_translate(scale: Vector3, rotate: Vector3, translate: Vector3) -> Self {
        Self {
            stages: vec![
                AffineStage::Scale(scale),
                AffineStage::Rotate(rotate),
                AffineStage::Translate(translate),
            ],
        }
    }

    pub fn stages(&self) -> &[AffineStage] {
        &self.stages
    }

    /// Folds the stages left to right. With row vectors the leftmost factor
    /// is applied first.
    pub fn matrix(&self) -> Matrix4x4 {
        self.stages
            .iter()
            .fold(Matrix4x4::IDENTITY, |acc, stage| acc.multiply(&stage.matrix()))
    }
}

/// The three matrices that make up the per-frame vertex transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldViewProjection {
    pub world: Matrix4x4,
    pub view: Matrix4x4,
    pub projection: Matrix4x4,
}

impl WorldViewProjection {
    /// `view` is the inverse of the camera's world matrix.
    pub fn from_camera_world(world: Matrix4x4, camera_world: Matrix4x4, projection: Matrix4x4) -> Self {
        Self {
            world,
            view: camera_world.inverse(),
            projection,
        }
    }

    /// `world * (view * projection)`.
    pub fn compose(&self) -> Matrix4x4 {
        self.world.multiply(&self.view.multiply(&self.projection))
    }
}
