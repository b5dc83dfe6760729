//! Fixed-size float vectors.
//!
//! These are plain value types laid out exactly like the shader-side `vec2`,
//! `vec3` and `vec4` so they can be copied into GPU buffers with `bytemuck`.

use std::ops::{Add, Mul, Neg, Sub};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Homogeneous 4-component vector.
///
/// Points are `w = 1`, directions are `w = 0`. Colors reuse the same type as
/// `(r, g, b, a)`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Extends to a homogeneous point (`w = 1`).
    pub const fn to_point(self) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, 1.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Vector4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }, $n:literal) => {
        impl Add for $ty {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;

            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;

            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl From<[f32; $n]> for $ty {
            fn from(v: [f32; $n]) -> Self {
                let [$($field),+] = v;
                Self { $($field),+ }
            }
        }

        impl From<$ty> for [f32; $n] {
            fn from(v: $ty) -> Self {
                [$(v.$field),+]
            }
        }
    };
}

impl_vector_ops!(Vector2 { x, y }, 2);
impl_vector_ops!(Vector3 { x, y, z }, 3);
impl_vector_ops!(Vector4 { x, y, z, w }, 4);

impl From<(f32, f32, f32)> for Vector3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

impl From<cgmath::Vector2<f32>> for Vector2 {
    fn from(v: cgmath::Vector2<f32>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<cgmath::Vector3<f32>> for Vector3 {
    fn from(v: cgmath::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for cgmath::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        cgmath::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<cgmath::Vector4<f32>> for Vector4 {
    fn from(v: cgmath::Vector4<f32>) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4> for cgmath::Vector4<f32> {
    fn from(v: Vector4) -> Self {
        cgmath::Vector4::new(v.x, v.y, v.z, v.w)
    }
}
