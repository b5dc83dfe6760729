//! Row-major 4x4 matrix.
//!
//! All matrices in this crate follow the row-vector convention: a point `p`
//! is transformed as `p * M`, so the translation lives in the last row and a
//! chain `A * B` applies `A` first. The memory image of such a matrix is the
//! same as a column-major, column-vector matrix (cgmath, WGSL `mat4x4<f32>`),
//! which is why the buffers can be handed to the shader without transposing.

use std::ops::{Add, Mul, Sub};

use crate::math::vector::Vector4;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Matrix4x4 {
    pub m: [[f32; 4]; 4],
}

impl Matrix4x4 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn new(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    /// 1s on the diagonal, 0 elsewhere.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Element-wise difference `self - rhs`.
    pub fn subtract(&self, rhs: &Self) -> Self {
        let mut result = *self;
        for (row, rhs_row) in result.m.iter_mut().zip(rhs.m.iter()) {
            for (value, rhs_value) in row.iter_mut().zip(rhs_row.iter()) {
                *value -= rhs_value;
            }
        }
        result
    }

    /// Matrix product `self * rhs`, i.e. `result[i][j] = sum_k self[i][k] * rhs[k][j]`.
    ///
    /// Not commutative. With row vectors `self` is applied before `rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut result = Self::new([[0.0; 4]; 4]);
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        result
    }

    pub fn transpose(&self) -> Self {
        let mut result = *self;
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = self.m[j][i];
            }
        }
        result
    }

    /// Determinant by cofactor expansion along the first row (24 signed products).
    pub fn determinant(&self) -> f32 {
        (0..4).map(|col| self.m[0][col] * self.cofactor(0, col)).sum()
    }

    /// Closed-form inverse: the adjugate (transposed cofactor matrix) scaled
    /// by `1 / det`.
    ///
    /// The determinant is not checked. A singular matrix yields infinite or
    /// NaN entries; callers only invert affine matrices with non-zero scale.
    pub fn inverse(&self) -> Self {
        let inv_det = 1.0 / self.determinant();
        let mut result = Self::new([[0.0; 4]; 4]);
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = self.cofactor(j, i) * inv_det;
            }
        }
        result
    }

    /// Transforms a row vector: `v * self`.
    pub fn transform_point(&self, v: Vector4) -> Vector4 {
        let v = v.to_array();
        let column = |j: usize| (0..4).map(|i| v[i] * self.m[i][j]).sum::<f32>();
        Vector4::new(column(0), column(1), column(2), column(3))
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    fn cofactor(&self, row: usize, col: usize) -> f32 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col)
    }

    /// Determinant of the 3x3 matrix left after removing `row` and `col`.
    fn minor(&self, row: usize, col: usize) -> f32 {
        let mut sub = [[0.0f32; 3]; 3];
        for (si, r) in (0..4).filter(|&r| r != row).enumerate() {
            for (sj, c) in (0..4).filter(|&c| c != col).enumerate() {
                sub[si][sj] = self.m[r][c];
            }
        }
        sub[0][0] * (sub[1][1] * sub[2][2] - sub[1][2] * sub[2][1])
            - sub[0][1] * (sub[1][0] * sub[2][2] - sub[1][2] * sub[2][0])
            + sub[0][2] * (sub[1][0] * sub[2][1] - sub[1][1] * sub[2][0])
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add for Matrix4x4 {
    type Output = Self;

    /// Element-wise sum.
    fn add(self, rhs: Self) -> Self {
        let mut result = self;
        for (row, rhs_row) in result.m.iter_mut().zip(rhs.m.iter()) {
            for (value, rhs_value) in row.iter_mut().zip(rhs_row.iter()) {
                *value += rhs_value;
            }
        }
        result
    }
}

impl Sub for Matrix4x4 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.subtract(&rhs)
    }
}

impl Mul for Matrix4x4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl<'a, 'b> Mul<&'b Matrix4x4> for &'a Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, rhs: &'b Matrix4x4) -> Matrix4x4 {
        self.multiply(rhs)
    }
}

impl From<[[f32; 4]; 4]> for Matrix4x4 {
    fn from(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }
}

impl From<Matrix4x4> for [[f32; 4]; 4] {
    fn from(m: Matrix4x4) -> Self {
        m.m
    }
}

/// Reinterprets the row-major, row-vector matrix as cgmath's column-major,
/// column-vector matrix. Both describe the same transform.
impl From<Matrix4x4> for cgmath::Matrix4<f32> {
    fn from(m: Matrix4x4) -> Self {
        cgmath::Matrix4::from(m.m)
    }
}

impl From<cgmath::Matrix4<f32>> for Matrix4x4 {
    fn from(m: cgmath::Matrix4<f32>) -> Self {
        Self { m: m.into() }
    }
}
