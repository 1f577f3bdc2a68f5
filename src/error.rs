//! Error and warning types for the OBJ front end.
//!
//! Fallible operations return [`ObjResult<T>`]. Conditions the loader can
//! recover from are not errors; they are reported as [`ParseWarning`]s on the
//! finished [`GeometryTree`](crate::geometry::GeometryTree) and logged.

use std::fmt;

use thiserror::Error;

/// Which attribute pool an index was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolAttribute {
    Position,
    Normal,
    TexCoord,
}

impl fmt::Display for PoolAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolAttribute::Position => "position",
            PoolAttribute::Normal => "normal",
            PoolAttribute::TexCoord => "texture coordinate",
        };
        f.write_str(name)
    }
}

/// Unified error type for OBJ parsing and geometry building.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObjError {
    /// A float field could not be parsed and the numeric policy rejects it.
    #[error("line {line}: malformed numeric token {token:?}")]
    MalformedNumericToken { line: usize, token: String },

    /// An index field is not an integer.
    #[error("line {line}: malformed index {token:?}")]
    MalformedIndex { line: usize, token: String },

    /// A resolved index falls outside the pool as it was when the line was read.
    #[error("line {line}: {attribute} index {index} is out of range for {len} entries")]
    UnresolvedIndex {
        line: usize,
        attribute: PoolAttribute,
        index: i64,
        len: usize,
    },

    /// An object received directives of two primitive kinds.
    #[error("line {line}: object {object:?} already holds {existing} geometry, cannot add {incoming}")]
    MixedPrimitiveKind {
        line: usize,
        object: String,
        existing: &'static str,
        incoming: &'static str,
    },

    /// Material runs of a finished object do not tile its vertex buffer.
    #[error("object {object:?} has invalid material ranges: {reason}")]
    InvalidMaterialRanges { object: String, reason: String },
}

/// Convenience alias for `Result<T, ObjError>`.
pub type ObjResult<T> = Result<T, ObjError>;

/// Category of a non-fatal condition met while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Directive is recognized but not implemented (`usemap`).
    UnsupportedDirective,
    /// Directive is not part of the grammar.
    UnknownDirective,
    /// Face with fewer than three vertex groups.
    DegenerateFace,
    /// Malformed float replaced by the configured sentinel.
    SubstitutedNumber,
    /// Object was split because its primitive kind changed.
    SplitMixedPrimitive,
}

/// A recoverable problem, tagged with the 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub line: usize,
    pub kind: WarningKind,
    pub text: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.text)
    }
}

/// Collects warnings for one parse and forwards each to the `log` facade.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<ParseWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, line: usize, kind: WarningKind, text: impl Into<String>) {
        let warning = ParseWarning {
            line,
            kind,
            text: text.into(),
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }
}
