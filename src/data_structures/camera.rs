//! Camera pose and perspective projection.

use cgmath::Rad;

use crate::{
    data_structures::transform::Transform,
    math::{Matrix4x4, WorldViewProjection, make_perspective_fov_matrix},
};

/// Perspective projection recomputed from the viewport aspect.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fov_y: Rad<f32>,
    near: f32,
    far: f32,
}

impl Projection {
    /// `fov_y` must lie strictly between 0 and pi.
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fov_y: F, near: f32, far: f32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            fov_y: fov_y.into(),
            near,
            far,
        }
    }

    /// Zero-sized viewports (minimized windows) keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = aspect_ratio(width, height);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y(&self) -> Rad<f32> {
        self.fov_y
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn matrix(&self) -> Matrix4x4 {
        make_perspective_fov_matrix(self.fov_y.0, self.aspect, self.near, self.far)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    pub projection: Projection,
}

impl Camera {
    pub fn new(transform: Transform, projection: Projection) -> Self {
        Self {
            transform,
            projection,
        }
    }

    /// Inverse of the camera's world matrix.
    pub fn view_matrix(&self) -> Matrix4x4 {
        self.transform.world_matrix().inverse()
    }

    /// Builds the per-frame transform for an object posed by `object`.
    pub fn world_view_projection(&self, object: &Transform) -> WorldViewProjection {
        WorldViewProjection::from_camera_world(
            object.world_matrix(),
            self.transform.world_matrix(),
            self.projection.matrix(),
        )
    }
}
