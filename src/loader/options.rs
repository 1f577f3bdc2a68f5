//! Loader configuration.

/// What to do with a float field that is missing or fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NumericPolicy {
    /// Fail the whole parse with `MalformedNumericToken`.
    #[default]
    Reject,
    /// Replace the field with the given value and record a warning.
    Substitute(f32),
}

/// What to do when an object receives faces and line/point directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixedPrimitives {
    /// Continue in a new object with the same name.
    #[default]
    Split,
    /// Fail the parse with `MixedPrimitiveKind`.
    Reject,
}

/// Options controlling how OBJ text is interpreted.
///
/// ```
/// use objscene::{LoadOptions, NumericPolicy};
///
/// let options = LoadOptions {
///     numeric_policy: NumericPolicy::Substitute(0.0),
///     ..Default::default()
/// };
/// assert!(options.compute_face_normals);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub numeric_policy: NumericPolicy,
    pub mixed_primitives: MixedPrimitives,
    /// Generate a flat normal for faces that reference no normals.
    pub compute_face_normals: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            numeric_policy: NumericPolicy::Reject,
            mixed_primitives: MixedPrimitives::Split,
            compute_face_normals: true,
        }
    }
}
