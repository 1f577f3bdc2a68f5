//! # Vertex Data Structures
//!
//! GPU-compatible interleaved vertex format for built primitives.

use std::mem;

/// A 3D vertex with position, normal, texture coordinate and color.
///
/// # Memory Layout
///
/// The `#[repr(C)]` attribute ensures the struct has a C-compatible memory
/// layout with no padding, so a slice of vertices can be uploaded as-is.
///
/// # Examples
///
/// ```
/// use objscene::geometry::Vertex3D;
///
/// let vertex = Vertex3D::at([0.0, 1.0, 0.0]);
/// assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
/// assert_eq!(Vertex3D::STRIDE, 44);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
    /// Texture coordinates [u, v]
    pub uv: [f32; 2],
    /// Linear RGB color
    pub color: [f32; 3],
}

impl Vertex3D {
    pub const STRIDE: usize = mem::size_of::<Vertex3D>();

    /// Vertex at `position` with an up normal, zero uv and white color.
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
            color: [1.0, 1.0, 1.0],
        }
    }

    /// Byte offsets of position, normal, uv and color, in shader location order.
    pub fn attribute_offsets() -> [usize; 4] {
        [
            mem::offset_of!(Vertex3D, position),
            mem::offset_of!(Vertex3D, normal),
            mem::offset_of!(Vertex3D, uv),
            mem::offset_of!(Vertex3D, color),
        ]
    }
}
