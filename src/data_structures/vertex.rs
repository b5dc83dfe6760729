//! GPU-side layouts of the per-vertex and constant-buffer data.

use crate::math::{Matrix4x4, Vector2, Vector4};

/// One vertex of the quad: homogeneous position plus texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexData {
    pub position: Vector4,
    pub texcoord: Vector2,
}

impl VertexData {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x2];

    pub const fn new(position: [f32; 4], texcoord: [f32; 2]) -> Self {
        Self {
            position: Vector4::new(position[0], position[1], position[2], position[3]),
            texcoord: Vector2::new(texcoord[0], texcoord[1]),
        }
    }

    /// `POSITION` (float4) at location 0, `TEXCOORD` (float2) at location 1.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Two clockwise triangles spanning `[-0.5, 0.5]` in x and y.
pub const QUAD_VERTICES: [VertexData; 6] = [
    VertexData::new([-0.5, -0.5, 0.0, 1.0], [0.0, 1.0]),
    VertexData::new([-0.5, 0.5, 0.0, 1.0], [0.0, 0.0]),
    VertexData::new([0.5, -0.5, 0.0, 1.0], [1.0, 1.0]),
    VertexData::new([-0.5, 0.5, 0.0, 1.0], [0.0, 0.0]),
    VertexData::new([0.5, 0.5, 0.0, 1.0], [1.0, 0.0]),
    VertexData::new([0.5, -0.5, 0.0, 1.0], [1.0, 1.0]),
];

/// Pixel-stage constant buffer: color the texture is modulated with.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Material {
    pub color: Vector4,
}

impl Material {
    pub const WHITE: Self = Self {
        color: Vector4::new(1.0, 1.0, 1.0, 1.0),
    };
}

impl Default for Material {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Vertex-stage constant buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformationMatrix {
    pub wvp: Matrix4x4,
}

impl From<Matrix4x4> for TransformationMatrix {
    fn from(wvp: Matrix4x4) -> Self {
        Self { wvp }
    }
}
