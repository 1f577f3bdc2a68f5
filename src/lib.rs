// src/lib.rs
//! objscene
//!
//! A Wavefront OBJ front end. It takes a complete OBJ text buffer and produces
//! a [`GeometryTree`]: named primitives with expanded (non-indexed) attribute
//! buffers, material draw groups, and the `mtllib` names for the caller to
//! resolve. It does no I/O and renders nothing.
//!
//! ```rust
//! let tree = objscene::parse_obj(
//!     "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\no Quad\nusemtl Paint\nf 1 2 3 4\n",
//! )
//! .unwrap();
//!
//! let quad = tree.get("Quad").unwrap();
//! assert_eq!(quad.vertex_count(), 6);
//! assert_eq!(tree.materials[quad.materials[0]].name, "Paint");
//! ```

pub mod error;
pub mod geometry;
pub mod loader;
pub mod material;
pub mod prelude;

// Re-export main types for convenience
pub use error::{ObjError, ObjResult, ParseWarning, WarningKind};
pub use geometry::{DrawGroup, GeometryTree, Primitive, PrimitiveKind, VertexAttributes};
pub use loader::{LoadOptions, MixedPrimitives, NumericPolicy, ObjLoader};
pub use material::{Material, MaterialCatalog, MaterialDescriptor, MaterialLibrary};

/// Parses OBJ text with the default [`LoadOptions`] and no material catalog.
pub fn parse_obj(text: &str) -> ObjResult<GeometryTree> {
    ObjLoader::new().parse(text)
}
