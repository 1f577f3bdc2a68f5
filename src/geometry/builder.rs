//! Turns finalized objects into [`Primitive`]s.

use crate::error::{ObjError, ObjResult};
use crate::loader::state::{GeometryKind, MaterialRun, ObjectRecord};
use crate::loader::{pools::AttributePools, ParsedObj};
use crate::material::{MaterialCache, MaterialCatalog, MaterialKind};

use super::{DrawGroup, GeometryTree, Primitive, PrimitiveKind, VertexAttributes};

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

fn primitive_kind(kind: GeometryKind) -> (PrimitiveKind, MaterialKind) {
    match kind {
        GeometryKind::Mesh => (PrimitiveKind::Mesh, MaterialKind::Surface),
        GeometryKind::Line => (PrimitiveKind::LineStrip, MaterialKind::Line),
        GeometryKind::Points => (PrimitiveKind::Points, MaterialKind::Points),
    }
}

/// Checks that closed runs tile `[0, vertex_count)` in order.
fn check_partition(object: &str, runs: &[MaterialRun], vertex_count: usize) -> ObjResult<()> {
    let invalid = |reason: String| ObjError::InvalidMaterialRanges {
        object: object.to_string(),
        reason,
    };

    let mut expected = 0;
    for run in runs {
        let Some(end) = run.range_end else {
            return Err(invalid(format!("run {:?} is still open", run.name)));
        };
        if run.range_start != expected || end < run.range_start {
            return Err(invalid(format!(
                "run {:?} covers {}..{}, expected it to start at {}",
                run.name, run.range_start, end, expected
            )));
        }
        expected = end;
    }

    if expected != vertex_count {
        return Err(invalid(format!(
            "runs end at {} but the object has {} vertices",
            expected, vertex_count
        )));
    }

    Ok(())
}

fn fill_colors(colors: &[Option<[f32; 3]>]) -> Option<Vec<[f32; 3]>> {
    colors
        .iter()
        .any(Option::is_some)
        .then(|| colors.iter().map(|color| color.unwrap_or(WHITE)).collect())
}

fn build_primitive(object: ObjectRecord, cache: &mut MaterialCache<'_>) -> ObjResult<Primitive> {
    let ObjectRecord {
        name,
        geometry,
        runs,
        ..
    } = object;

    let (kind, material_kind) = primitive_kind(geometry.kind);
    let vertex_count = geometry.vertex_count();

    let colors = fill_colors(&geometry.colors);
    let vertex_colors = colors.is_some();

    let attributes = VertexAttributes {
        positions: geometry.positions,
        normals: (!geometry.normals.is_empty()).then_some(geometry.normals),
        colors,
        uvs: geometry.has_explicit_uv.then_some(geometry.uvs),
    };

    let groups: Vec<DrawGroup> = if runs.len() > 1 {
        check_partition(&name, &runs, vertex_count)?;
        runs.iter()
            .map(|run| DrawGroup {
                start: run.range_start,
                count: run.range_count(),
                material_index: run.ordinal,
            })
            .collect()
    } else {
        Vec::new()
    };

    let materials: Vec<usize> = runs
        .iter()
        .map(|run| cache.descriptor_for(run, material_kind, vertex_colors))
        .collect();

    log::debug!(
        "built {:?} primitive {:?}: {} vertices, {} material(s)",
        kind,
        name,
        vertex_count,
        runs.len()
    );

    Ok(Primitive {
        name,
        kind,
        attributes,
        groups,
        materials,
    })
}

/// Point cloud straight from the pools, for files that only declare vertices.
fn build_point_cloud(object: &ObjectRecord, pools: AttributePools, cache: &mut MaterialCache<'_>) -> Primitive {
    let colors = pools
        .colors
        .first()
        .copied()
        .flatten()
        .and_then(|_| fill_colors(&pools.colors));

    let materials: Vec<usize> = object
        .runs
        .first()
        .map(|run| cache.descriptor_for(run, MaterialKind::Points, colors.is_some()))
        .into_iter()
        .collect();

    log::debug!(
        "no primitives declared, emitting {} pooled vertices as points",
        pools.positions.len()
    );

    Primitive {
        name: object.name.clone(),
        kind: PrimitiveKind::Points,
        attributes: VertexAttributes {
            positions: pools.positions,
            normals: None,
            colors,
            uvs: None,
        },
        groups: Vec::new(),
        materials,
    }
}

/// Builds every non-empty object, in declaration order.
pub fn build(parsed: ParsedObj, catalog: Option<&dyn MaterialCatalog>) -> ObjResult<GeometryTree> {
    let ParsedObj {
        objects,
        pools,
        material_libraries,
        warnings,
    } = parsed;

    let mut cache = MaterialCache::new(catalog);
    let mut primitives = Vec::new();

    let only_empty = objects.len() == 1 && objects[0].geometry.is_empty();
    if only_empty {
        if !pools.is_empty() {
            primitives.push(build_point_cloud(&objects[0], pools, &mut cache));
        }
    } else {
        for object in objects {
            if object.geometry.is_empty() {
                continue;
            }
            primitives.push(build_primitive(object, &mut cache)?);
        }
    }

    Ok(GeometryTree {
        primitives,
        materials: cache.into_descriptors(),
        material_libraries,
        warnings,
    })
}
