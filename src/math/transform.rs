//! Constructors for the elementary transforms.
//!
//! Angles are radians. Every constructor produces a row-vector matrix (see
//! [`Matrix4x4`]), so translations sit in row 3 and scale matrices are diagonal.

use crate::math::{compose::AffineComposition, matrix::Matrix4x4, vector::Vector3};

pub fn make_identity_4x4() -> Matrix4x4 {
    Matrix4x4::IDENTITY
}

pub fn make_scale_matrix(scale: Vector3) -> Matrix4x4 {
    Matrix4x4::new([
        [scale.x, 0.0, 0.0, 0.0],
        [0.0, scale.y, 0.0, 0.0],
        [0.0, 0.0, scale.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn make_translate_matrix(translate: Vector3) -> Matrix4x4 {
    Matrix4x4::new([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [translate.x, translate.y, translate.z, 1.0],
    ])
}

pub fn make_rotate_x_matrix(radian: f32) -> Matrix4x4 {
    let (s, c) = radian.sin_cos();
    Matrix4x4::new([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, s, 0.0],
        [0.0, -s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn make_rotate_y_matrix(radian: f32) -> Matrix4x4 {
    let (s, c) = radian.sin_cos();
    Matrix4x4::new([
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn make_rotate_z_matrix(radian: f32) -> Matrix4x4 {
    let (s, c) = radian.sin_cos();
    Matrix4x4::new([
        [c, s, 0.0, 0.0],
        [-s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Euler rotation applied about X, then Y, then Z.
///
/// The order is part of the contract: changing it changes how combined
/// rotations look on screen.
pub fn make_rotate_matrix(rotate: Vector3) -> Matrix4x4 {
    make_rotate_x_matrix(rotate.x)
        .multiply(&make_rotate_y_matrix(rotate.y))
        .multiply(&make_rotate_z_matrix(rotate.z))
}

/// Scale, then rotate, then translate.
pub fn make_affine_matrix(scale: Vector3, rotate: Vector3, translate: Vector3) -> Matrix4x4 {
    AffineComposition::scale_rotate_translate(scale, rotate, translate).matrix()
}

/// Perspective projection mapping view-space depth `[near, far]` to `[0, 1]`.
///
/// `fov_y` must lie strictly between 0 and pi, otherwise `cot(fov_y / 2)`
/// diverges. `aspect` is width over height.
pub fn make_perspective_fov_matrix(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4x4 {
    let cot = 1.0 / (fov_y / 2.0).tan();
    let depth = far / (far - near);
    Matrix4x4::new([
        [cot / aspect, 0.0, 0.0, 0.0],
        [0.0, cot, 0.0, 0.0],
        [0.0, 0.0, depth, 1.0],
        [0.0, 0.0, -near * depth, 0.0],
    ])
}
