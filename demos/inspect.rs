//! # Inspect
//!
//! Parses an OBJ file and prints a summary of every primitive it produces.
//! Material libraries next to the file are read with `tobj` and fed back as a
//! catalog, so draw groups show resolved colors.
//!
//! ```text
//! RUST_LOG=objscene=debug cargo run --example inspect -- model.obj
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use objscene::prelude::*;

/// Reads every `mtllib` next to `obj_path` into one library. Missing files
/// are logged and skipped.
fn load_materials(obj_path: &Path, libraries: &[String]) -> MaterialLibrary {
    let directory = obj_path.parent().unwrap_or_else(|| Path::new("."));
    let mut library = MaterialLibrary::new();

    for name in libraries {
        let (materials, _) = match tobj::load_mtl(directory.join(name)) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("material library {:?} not loaded: {}", name, err);
                continue;
            }
        };

        for (i, mtl) in materials.iter().enumerate() {
            let material_name = if mtl.name.is_empty() {
                format!("material_{}", i)
            } else {
                mtl.name.clone()
            };

            let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
            library.add_material(Material::new(
                &material_name,
                [diffuse[0], diffuse[1], diffuse[2], mtl.dissolve.unwrap_or(1.0)],
                0.0,
                1.0 - (mtl.shininess.unwrap_or(32.0) / 128.0).clamp(0.0, 1.0),
            ));
        }
    }

    library
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: inspect <file.obj>");
    };
    let path = Path::new(&path);
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    // First pass only to learn the library names.
    let libraries = objscene::loader::parse_text(&text, &LoadOptions::default())
        .with_context(|| format!("parsing {}", path.display()))?
        .material_libraries;

    let tree = ObjLoader::new()
        .with_catalog(load_materials(path, &libraries))
        .parse(&text)?;

    println!("{}: {} primitive(s)", path.display(), tree.len());
    for primitive in &tree.primitives {
        let bounds = primitive.bounds();
        let center: [f32; 3] = bounds.center().into();
        let size: [f32; 3] = bounds.size().into();
        println!(
            "  {:?} {:?}: {} vertices, center {:?}, size {:?}",
            primitive.name,
            primitive.kind,
            primitive.vertex_count(),
            center,
            size,
        );

        for group in primitive.draw_groups() {
            let Some(material) = tree.material(primitive, &group) else {
                continue;
            };
            let color = material
                .material
                .as_ref()
                .map(|m| format!("{:?}", m.base_color))
                .unwrap_or_else(|| "unresolved".to_string());
            println!(
                "    {:?}: material {:?} ({})",
                group.range(),
                material.name,
                color
            );
        }
    }

    for warning in &tree.warnings {
        println!("  warning: {}", warning);
    }

    Ok(())
}
