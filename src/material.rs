//! Material descriptors for built primitives
//!
//! OBJ text only names materials. Each material run of a primitive becomes a
//! [`MaterialDescriptor`] carrying that name, the library it came from and the
//! shading hints the loader can infer. Callers that already resolved their MTL
//! files can hand the loader a [`MaterialCatalog`] so descriptors also carry
//! concrete [`Material`] parameters.

use std::collections::HashMap;

use crate::loader::state::MaterialRun;

/// Material ID for referencing materials
pub type MaterialId = String;

/// Surface parameters supplied by a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
        }
    }
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Name the OBJ `usemtl` directive refers to
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            emissive: [0.0, 0.0, 0.0],
        }
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set emissive color
    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emissive = [r, g, b];
        self
    }
}

/// Resolves material names to parameters, e.g. from already parsed MTL files.
pub trait MaterialCatalog {
    fn lookup(&self, name: &str) -> Option<Material>;
}

impl MaterialCatalog for HashMap<MaterialId, Material> {
    fn lookup(&self, name: &str) -> Option<Material> {
        self.get(name).cloned()
    }
}

/// Name-keyed material storage usable as a catalog.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: HashMap<MaterialId, Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material, replacing any material of the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl MaterialCatalog for MaterialLibrary {
    fn lookup(&self, name: &str) -> Option<Material> {
        self.get_material(name).cloned()
    }
}

/// How a material is meant to be applied, following the primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Surface,
    Line,
    Points,
}

/// A material as referenced by one or more draw groups.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescriptor {
    pub name: String,
    pub library: String,
    pub kind: MaterialKind,
    /// Faces were declared outside a smoothing group.
    pub flat_shading: bool,
    /// The primitive carries a per-vertex color buffer.
    pub vertex_colors: bool,
    /// Parameters from the catalog, if it knew the name.
    pub material: Option<Material>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DescriptorKey {
    name: String,
    library: String,
    smooth: bool,
    vertex_colors: bool,
    kind: MaterialKind,
}

/// Deduplicates descriptors across every primitive of one parse.
pub(crate) struct MaterialCache<'c> {
    catalog: Option<&'c dyn MaterialCatalog>,
    descriptors: Vec<MaterialDescriptor>,
    index: HashMap<DescriptorKey, usize>,
}

impl<'c> MaterialCache<'c> {
    pub fn new(catalog: Option<&'c dyn MaterialCatalog>) -> Self {
        Self {
            catalog,
            descriptors: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the index of the descriptor for `run`, creating it on first use.
    pub fn descriptor_for(&mut self, run: &MaterialRun, kind: MaterialKind, vertex_colors: bool) -> usize {
        let key = DescriptorKey {
            name: run.name.clone(),
            library: run.library.clone(),
            smooth: run.smooth,
            vertex_colors,
            kind,
        };

        if let Some(&index) = self.index.get(&key) {
            return index;
        }

        let material = self.catalog.and_then(|catalog| catalog.lookup(&run.name));
        if material.is_none() && !run.name.is_empty() && self.catalog.is_some() {
            log::debug!("material {:?} not found in catalog", run.name);
        }

        let index = self.descriptors.len();
        self.descriptors.push(MaterialDescriptor {
            name: run.name.clone(),
            library: run.library.clone(),
            kind,
            flat_shading: !run.smooth,
            vertex_colors,
            material,
        });
        self.index.insert(key, index);
        index
    }

    pub fn into_descriptors(self) -> Vec<MaterialDescriptor> {
        self.descriptors
    }
}
