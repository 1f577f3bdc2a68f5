//! # objscene Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use objscene::prelude::*;
//!
//! fn count_triangles(text: &str) -> ObjResult<usize> {
//!     let tree = parse_obj(text)?;
//!     Ok(tree.primitives.iter().map(Primitive::triangle_count).sum())
//! }
//!
//! assert_eq!(count_triangles("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap(), 1);
//! ```

// Re-export loading entry points
pub use crate::loader::{LoadOptions, MixedPrimitives, NumericPolicy, ObjLoader};
pub use crate::parse_obj;

// Re-export output types
pub use crate::geometry::{Aabb, DrawGroup, GeometryTree, Primitive, PrimitiveKind, Vertex3D, VertexAttributes};
pub use crate::material::{Material, MaterialCatalog, MaterialDescriptor, MaterialKind, MaterialLibrary};

// Re-export error types
pub use crate::error::{ObjError, ObjResult, ParseWarning, WarningKind};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};
