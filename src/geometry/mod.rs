//! # Built Geometry
//!
//! The output of a parse: an ordered list of named [`Primitive`]s, each with
//! non-indexed attribute buffers and, when several materials are involved, the
//! draw groups that address them.
//!
//! ## Usage
//!
//! ```rust
//! use objscene::geometry::PrimitiveKind;
//!
//! let tree = objscene::parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\no Tri\nf 1 2 3\n").unwrap();
//!
//! let triangle = tree.get("Tri").unwrap();
//! assert_eq!(triangle.kind, PrimitiveKind::Mesh);
//! assert_eq!(triangle.vertex_count(), 3);
//! assert_eq!(triangle.triangle_count(), 1);
//! ```

pub mod builder;
pub mod vertex;

use std::ops::Range;

use cgmath::{Vector3, Zero};

use crate::error::ParseWarning;
use crate::material::MaterialDescriptor;

pub use vertex::Vertex3D;

/// How a primitive's vertices are meant to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Triangle list, three vertices per triangle.
    Mesh,
    /// Vertices of `l` directives in declaration order.
    LineStrip,
    /// Point cloud.
    Points,
}

/// Non-indexed vertex buffers. Every present buffer has one entry per position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexAttributes {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
}

/// A vertex sub-range drawn with `primitive.materials[material_index]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawGroup {
    pub start: usize,
    pub count: usize,
    pub material_index: usize,
}

impl DrawGroup {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.count
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::from(*vertex);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// One drawable built from an OBJ object.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub name: String,
    pub kind: PrimitiveKind,
    pub attributes: VertexAttributes,
    /// Empty when the whole buffer uses `materials[0]`.
    pub groups: Vec<DrawGroup>,
    /// Indices into [`GeometryTree::materials`], in material-run order.
    pub materials: Vec<usize>,
}

impl Primitive {
    pub fn vertex_count(&self) -> usize {
        self.attributes.positions.len()
    }

    /// Number of triangles; zero unless this is a mesh.
    pub fn triangle_count(&self) -> usize {
        match self.kind {
            PrimitiveKind::Mesh => self.vertex_count() / 3,
            _ => 0,
        }
    }

    pub fn is_multi_material(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Draw groups, with a single whole-buffer group for single-material
    /// primitives.
    pub fn draw_groups(&self) -> Vec<DrawGroup> {
        if self.groups.is_empty() {
            vec![DrawGroup {
                start: 0,
                count: self.vertex_count(),
                material_index: 0,
            }]
        } else {
            self.groups.clone()
        }
    }

    pub fn group_range(&self, group: usize) -> Option<Range<usize>> {
        self.groups.get(group).map(DrawGroup::range)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_vertices(&self.attributes.positions)
    }

    /// Interleaves all attributes into GPU-ready vertices.
    ///
    /// Missing attributes are filled with [`Vertex3D`]'s defaults.
    pub fn interleaved(&self) -> Vec<Vertex3D> {
        let attributes = &self.attributes;
        (0..self.vertex_count())
            .map(|i| {
                let mut vertex = Vertex3D::at(attributes.positions[i]);
                if let Some(normals) = &attributes.normals {
                    vertex.normal = normals[i];
                }
                if let Some(uvs) = &attributes.uvs {
                    vertex.uv = uvs[i];
                }
                if let Some(colors) = &attributes.colors {
                    vertex.color = colors[i];
                }
                vertex
            })
            .collect()
    }

    /// Interleaved vertices as raw bytes for buffer upload.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }
}

/// Everything one parse produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryTree {
    pub primitives: Vec<Primitive>,
    /// Deduplicated materials referenced by [`Primitive::materials`].
    pub materials: Vec<MaterialDescriptor>,
    /// `mtllib` names in declaration order, left for the caller to resolve.
    pub material_libraries: Vec<String>,
    pub warnings: Vec<ParseWarning>,
}

impl GeometryTree {
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// First primitive called `name`.
    pub fn get(&self, name: &str) -> Option<&Primitive> {
        self.primitives.iter().find(|primitive| primitive.name == name)
    }

    /// All primitives called `name`; objects split by primitive kind share it.
    pub fn iter_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Primitive> + 'a {
        self.primitives
            .iter()
            .filter(move |primitive| primitive.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .map(|primitive| primitive.name.as_str())
            .collect()
    }

    /// Material drawn by `group` of `primitive`.
    pub fn material(&self, primitive: &Primitive, group: &DrawGroup) -> Option<&MaterialDescriptor> {
        primitive
            .materials
            .get(group.material_index)
            .and_then(|&index| self.materials.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitive(positions: Vec<[f32; 3]>) -> Primitive {
        Primitive {
            name: "p".to_string(),
            kind: PrimitiveKind::Mesh,
            attributes: VertexAttributes {
                positions,
                ..Default::default()
            },
            groups: Vec::new(),
            materials: vec![0],
        }
    }

    #[test]
    fn test_aabb_creation() {
        let aabb = Aabb::from_vertices(&[[0.0, 0.0, 0.0], [1.0, 2.0, 1.0], [-1.0, -1.0, -3.0]]);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -3.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 2.0, 1.0));
        assert_eq!(aabb.center(), Vector3::new(0.0, 0.5, -1.0));
        assert_eq!(aabb.size(), Vector3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_empty_aabb() {
        let aabb = Aabb::from_vertices(&[]);
        assert_eq!(aabb.min, Vector3::zero());
        assert_eq!(aabb.max, Vector3::zero());
    }

    #[test]
    fn test_single_material_draw_group() {
        let mesh = primitive(vec![[0.0; 3]; 6]);
        assert!(!mesh.is_multi_material());
        assert_eq!(
            mesh.draw_groups(),
            vec![DrawGroup {
                start: 0,
                count: 6,
                material_index: 0
            }]
        );
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.group_range(0), None);
    }

    #[test]
    fn test_interleaved_defaults() {
        let mut mesh = primitive(vec![[1.0, 2.0, 3.0]]);
        mesh.attributes.uvs = Some(vec![[0.5, 0.25]]);

        let vertices = mesh.interleaved();
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[0].uv, [0.5, 0.25]);
        assert_eq!(vertices[0].color, [1.0, 1.0, 1.0]);
        assert_eq!(mesh.vertex_bytes().len(), std::mem::size_of::<Vertex3D>());
    }

    #[test]
    fn test_lookup_by_name() {
        let mut first = primitive(vec![[0.0; 3]]);
        first.name = "Wire".to_string();
        let mut second = first.clone();
        second.kind = PrimitiveKind::LineStrip;

        let tree = GeometryTree {
            primitives: vec![first, second],
            ..Default::default()
        };

        assert_eq!(tree.get("Wire").map(|p| p.kind), Some(PrimitiveKind::Mesh));
        assert_eq!(tree.iter_named("Wire").count(), 2);
        assert!(tree.get("Missing").is_none());
        assert_eq!(tree.names(), vec!["Wire", "Wire"]);
    }
}
