//! Append-only attribute pools shared by every object of one parse.

use crate::error::{ObjError, ObjResult, PoolAttribute};

/// Raw `v`/`vn`/`vt` data in declaration order.
///
/// `colors` always has one entry per position; vertices declared without a
/// color hold `None`.
#[derive(Debug, Clone, Default)]
pub struct AttributePools {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<Option<[f32; 3]>>,
}

impl AttributePools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_position(&mut self, position: [f32; 3], color: Option<[f32; 3]>) {
        self.positions.push(position);
        self.colors.push(color);
    }

    pub fn push_normal(&mut self, normal: [f32; 3]) {
        self.normals.push(normal);
    }

    pub fn push_uv(&mut self, uv: [f32; 2]) {
        self.uvs.push(uv);
    }

    pub fn len(&self, attribute: PoolAttribute) -> usize {
        match attribute {
            PoolAttribute::Position => self.positions.len(),
            PoolAttribute::Normal => self.normals.len(),
            PoolAttribute::TexCoord => self.uvs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Resolves an index token against the pool's current length.
    ///
    /// Positive indices are 1-based. Zero and negative indices count back from
    /// the end, so `-1` is the most recently declared entry.
    pub fn resolve(&self, attribute: PoolAttribute, token: &str, line: usize) -> ObjResult<usize> {
        let index: i64 = token.parse().map_err(|_| ObjError::MalformedIndex {
            line,
            token: token.to_string(),
        })?;

        let len = self.len(attribute);
        let resolved = if index > 0 { index - 1 } else { len as i64 + index };

        if resolved < 0 || resolved >= len as i64 {
            return Err(ObjError::UnresolvedIndex {
                line,
                attribute,
                index,
                len,
            });
        }

        Ok(resolved as usize)
    }
}
