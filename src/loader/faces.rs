//! Expands `f`, `l` and `p` directives into per-object vertex buffers.
//!
//! Indices are resolved against the pools as they are when the line is read,
//! and all of a line's indices are resolved before any vertex is appended.

use cgmath::{InnerSpace, Vector3};

use crate::error::{Diagnostics, ObjResult, PoolAttribute, WarningKind};

use super::pools::AttributePools;
use super::state::LocalGeometry;

const PLACEHOLDER_UV: [f32; 2] = [0.0, 0.0];
const ZERO_NORMAL: [f32; 3] = [0.0, 0.0, 0.0];

/// One `p/uv/n` group with every present index resolved to a pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceVertex {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Splits a vertex group, treating empty sub-fields as absent.
fn split_group(group: &str) -> (&str, Option<&str>, Option<&str>) {
    let mut parts = group.split('/');
    let position = parts.next().unwrap_or_default();
    let uv = parts.next().filter(|part| !part.is_empty());
    let normal = parts.next().filter(|part| !part.is_empty());
    (position, uv, normal)
}

fn resolve_group(pools: &AttributePools, group: &str, line: usize) -> ObjResult<FaceVertex> {
    let (position, uv, normal) = split_group(group);

    Ok(FaceVertex {
        position: pools.resolve(PoolAttribute::Position, position, line)?,
        uv: uv
            .map(|token| pools.resolve(PoolAttribute::TexCoord, token, line))
            .transpose()?,
        normal: normal
            .map(|token| pools.resolve(PoolAttribute::Normal, token, line))
            .transpose()?,
    })
}

/// Flat normal of triangle `(a, b, c)`: `(c - b) x (a - b)`, normalized.
/// Degenerate triangles get a zero vector.
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let (a, b, c) = (Vector3::from(a), Vector3::from(b), Vector3::from(c));
    let normal = (c - b).cross(a - b);

    if normal.magnitude2() > 0.0 {
        normal.normalize().into()
    } else {
        ZERO_NORMAL
    }
}

fn push_vertex(pools: &AttributePools, geometry: &mut LocalGeometry, position: usize, uv: Option<usize>) {
    geometry.positions.push(pools.positions[position]);
    geometry.colors.push(pools.colors[position]);
    match uv {
        Some(uv) => {
            geometry.uvs.push(pools.uvs[uv]);
            geometry.has_explicit_uv = true;
        }
        None => geometry.uvs.push(PLACEHOLDER_UV),
    }
}

fn push_triangle(
    pools: &AttributePools,
    geometry: &mut LocalGeometry,
    corners: [FaceVertex; 3],
    compute_normals: bool,
) {
    let base = geometry.positions.len();

    let uvs = corners.map(|corner| corner.uv);
    let all_uvs = uvs.iter().all(Option::is_some);
    for (corner, uv) in corners.iter().zip(uvs) {
        push_vertex(pools, geometry, corner.position, if all_uvs { uv } else { None });
    }

    let normals = corners.map(|corner| corner.normal);
    if normals.iter().all(Option::is_some) {
        geometry.normals.resize(base, ZERO_NORMAL);
        geometry
            .normals
            .extend(normals.iter().flatten().map(|&index| pools.normals[index]));
    } else if compute_normals {
        let [a, b, c] = corners.map(|corner| pools.positions[corner.position]);
        geometry.normals.resize(base, ZERO_NORMAL);
        geometry.normals.extend([face_normal(a, b, c); 3]);
    } else if !geometry.normals.is_empty() {
        geometry.normals.resize(base + 3, ZERO_NORMAL);
    }
}

/// Appends a fan-triangulated face: `(v0, vi, vi+1)` for each `i`.
pub fn add_face(
    pools: &AttributePools,
    geometry: &mut LocalGeometry,
    args: &str,
    line: usize,
    compute_normals: bool,
    diagnostics: &mut Diagnostics,
) -> ObjResult<()> {
    let vertices = args
        .split_whitespace()
        .map(|group| resolve_group(pools, group, line))
        .collect::<ObjResult<Vec<_>>>()?;

    if vertices.len() < 3 {
        diagnostics.warn(
            line,
            WarningKind::DegenerateFace,
            format!("face needs at least 3 vertices, got {}", vertices.len()),
        );
        return Ok(());
    }

    for pair in vertices[1..].windows(2) {
        push_triangle(
            pools,
            geometry,
            [vertices[0], pair[0], pair[1]],
            compute_normals,
        );
    }

    Ok(())
}

/// Appends the vertices of an `l` directive. Groups are `p` or `p/uv`.
pub fn add_polyline(
    pools: &AttributePools,
    geometry: &mut LocalGeometry,
    args: &str,
    line: usize,
) -> ObjResult<()> {
    let vertices = args
        .split_whitespace()
        .map(|group| resolve_group(pools, group, line))
        .collect::<ObjResult<Vec<_>>>()?;

    for vertex in vertices {
        push_vertex(pools, geometry, vertex.position, vertex.uv);
    }

    Ok(())
}

/// Appends the vertices of a `p` directive.
pub fn add_points(
    pools: &AttributePools,
    geometry: &mut LocalGeometry,
    args: &str,
    line: usize,
) -> ObjResult<()> {
    let positions = args
        .split_whitespace()
        .map(|group| pools.resolve(PoolAttribute::Position, split_group(group).0, line))
        .collect::<ObjResult<Vec<_>>>()?;

    for position in positions {
        push_vertex(pools, geometry, position, None);
    }

    Ok(())
}
