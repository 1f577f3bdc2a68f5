//! # OBJ Loader
//!
//! A single synchronous pass over the text. Each logical line is classified
//! into a [`Directive`] and applied to a [`ParserState`], which owns the
//! attribute pools, the object tracker and the collected warnings for that one
//! parse. Nothing is shared between parses, so independent inputs can be
//! loaded in parallel.
//!
//! ## Usage
//!
//! ```rust
//! use objscene::{LoadOptions, ObjLoader};
//!
//! let loader = ObjLoader::new().with_options(LoadOptions {
//!     compute_face_normals: false,
//!     ..Default::default()
//! });
//!
//! let tree = loader.parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
//! assert!(tree.primitives[0].attributes.normals.is_none());
//! ```

pub mod faces;
pub mod lines;
pub mod options;
pub mod pools;
pub mod state;

use std::fmt;
use std::sync::Arc;

use crate::error::{Diagnostics, ObjError, ObjResult, ParseWarning, WarningKind};
use crate::geometry::{builder, GeometryTree};
use crate::material::MaterialCatalog;

use lines::{Directive, LogicalLines};
pub use options::{LoadOptions, MixedPrimitives, NumericPolicy};
use pools::AttributePools;
use state::{GeometryKind, ObjectRecord, ObjectTracker};

/// Result of the parsing pass, before primitives are built.
#[derive(Debug, Clone)]
pub struct ParsedObj {
    pub objects: Vec<ObjectRecord>,
    pub pools: AttributePools,
    pub material_libraries: Vec<String>,
    pub warnings: Vec<ParseWarning>,
}

/// `nan` and `inf` parse as `f32` but never make a usable coordinate.
fn parse_finite(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|value| value.is_finite())
}

/// Reads float fields of one line, applying the numeric policy.
struct Floats<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    line: usize,
    policy: NumericPolicy,
}

impl<'a> Floats<'a> {
    fn new(args: &'a str, line: usize, policy: NumericPolicy) -> Self {
        Self {
            tokens: args.split_whitespace(),
            line,
            policy,
        }
    }

    /// Next field; a missing field is treated like a malformed one.
    fn required(&mut self, diagnostics: &mut Diagnostics) -> ObjResult<f32> {
        let token = self.tokens.next();
        match token.and_then(parse_finite) {
            Some(value) => Ok(value),
            None => self.substitute(token.unwrap_or_default(), diagnostics),
        }
    }

    /// Next field, or `default` when the line has no more fields.
    fn or(&mut self, default: f32, diagnostics: &mut Diagnostics) -> ObjResult<f32> {
        match self.tokens.next() {
            None => Ok(default),
            Some(token) => match parse_finite(token) {
                Some(value) => Ok(value),
                None => self.substitute(token, diagnostics),
            },
        }
    }

    fn triple(&mut self, diagnostics: &mut Diagnostics) -> ObjResult<[f32; 3]> {
        Ok([
            self.required(diagnostics)?,
            self.required(diagnostics)?,
            self.required(diagnostics)?,
        ])
    }

    fn substitute(&self, token: &str, diagnostics: &mut Diagnostics) -> ObjResult<f32> {
        match self.policy {
            NumericPolicy::Reject => Err(ObjError::MalformedNumericToken {
                line: self.line,
                token: token.to_string(),
            }),
            NumericPolicy::Substitute(value) => {
                diagnostics.warn(
                    self.line,
                    WarningKind::SubstitutedNumber,
                    format!("malformed number {:?} replaced with {}", token, value),
                );
                Ok(value)
            }
        }
    }
}

/// Mutable state of one parse, threaded through every line.
#[derive(Debug, Default)]
pub struct ParserState {
    pools: AttributePools,
    tracker: ObjectTracker,
    material_libraries: Vec<String>,
    diagnostics: Diagnostics,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pools(&self) -> &AttributePools {
        &self.pools
    }

    pub fn current_object(&self) -> &ObjectRecord {
        self.tracker.current()
    }

    /// Applies one classified line.
    pub fn apply(&mut self, line: usize, directive: Directive<'_>, options: &LoadOptions) -> ObjResult<()> {
        log::trace!("line {}: {:?}", line, directive);

        match directive {
            Directive::Vertex(args) => {
                let color = args.split_whitespace().count() >= 6;
                let mut floats = Floats::new(args, line, options.numeric_policy);
                let position = floats.triple(&mut self.diagnostics)?;
                let color = if color {
                    Some(floats.triple(&mut self.diagnostics)?)
                } else {
                    None
                };
                self.pools.push_position(position, color);
            }
            Directive::Normal(args) => {
                let mut floats = Floats::new(args, line, options.numeric_policy);
                let normal = floats.triple(&mut self.diagnostics)?;
                self.pools.push_normal(normal);
            }
            Directive::TexCoord(args) => {
                let mut floats = Floats::new(args, line, options.numeric_policy);
                let u = floats.required(&mut self.diagnostics)?;
                let v = floats.or(0.0, &mut self.diagnostics)?;
                self.pools.push_uv([u, v]);
            }
            Directive::Face(args) => {
                self.tracker.prepare_kind(
                    GeometryKind::Mesh,
                    line,
                    options.mixed_primitives,
                    &mut self.diagnostics,
                )?;
                faces::add_face(
                    &self.pools,
                    &mut self.tracker.current_mut().geometry,
                    args,
                    line,
                    options.compute_face_normals,
                    &mut self.diagnostics,
                )?;
            }
            Directive::Polyline(args) => {
                self.tracker.prepare_kind(
                    GeometryKind::Line,
                    line,
                    options.mixed_primitives,
                    &mut self.diagnostics,
                )?;
                faces::add_polyline(&self.pools, &mut self.tracker.current_mut().geometry, args, line)?;
            }
            Directive::PointSet(args) => {
                self.tracker.prepare_kind(
                    GeometryKind::Points,
                    line,
                    options.mixed_primitives,
                    &mut self.diagnostics,
                )?;
                faces::add_points(&self.pools, &mut self.tracker.current_mut().geometry, args, line)?;
            }
            Directive::Object(name) => self.tracker.start_object(name, true),
            Directive::UseMaterial(name) => self.tracker.start_material(name, &self.material_libraries),
            Directive::MaterialLibrary(names) => self
                .material_libraries
                .extend(names.split_whitespace().map(str::to_string)),
            Directive::UseMap(_) => self.diagnostics.warn(
                line,
                WarningKind::UnsupportedDirective,
                "usemap is not supported, textures must be defined in MTL files",
            ),
            Directive::Smoothing(value) => {
                let smooth = value.map_or(true, |value| {
                    let value = value.to_ascii_lowercase();
                    value != "0" && value != "off"
                });
                self.tracker.set_smoothing(smooth);
            }
            Directive::Unknown => {}
        }

        Ok(())
    }

    fn unknown(&mut self, line: usize, content: &str) {
        self.diagnostics.warn(
            line,
            WarningKind::UnknownDirective,
            format!("unexpected line {:?}", content),
        );
    }

    /// Finalizes the last object and hands over everything collected.
    pub fn finish(self) -> ParsedObj {
        ParsedObj {
            objects: self.tracker.finish(),
            pools: self.pools,
            material_libraries: self.material_libraries,
            warnings: self.diagnostics.into_warnings(),
        }
    }
}

/// Runs the parsing pass over `text`.
pub fn parse_text(text: &str, options: &LoadOptions) -> ObjResult<ParsedObj> {
    let mut state = ParserState::new();

    for line in LogicalLines::new(text) {
        if line.is_skippable() {
            continue;
        }

        let content = line.content();
        match lines::classify(content) {
            Directive::Unknown => state.unknown(line.number, content),
            directive => state.apply(line.number, directive, options)?,
        }
    }

    Ok(state.finish())
}

/// Parses OBJ text into a [`GeometryTree`].
#[derive(Clone, Default)]
pub struct ObjLoader {
    options: LoadOptions,
    catalog: Option<Arc<dyn MaterialCatalog + Send + Sync>>,
}

impl fmt::Debug for ObjLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjLoader")
            .field("options", &self.options)
            .field("catalog", &self.catalog.is_some())
            .finish()
    }
}

impl ObjLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves material names through `catalog` when building primitives.
    pub fn with_catalog(mut self, catalog: impl MaterialCatalog + Send + Sync + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn parse(&self, text: &str) -> ObjResult<GeometryTree> {
        let parsed = parse_text(text, &self.options)?;
        let catalog = self
            .catalog
            .as_deref()
            .map(|catalog| catalog as &dyn MaterialCatalog);
        builder::build(parsed, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedObj {
        parse_text(text, &LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_vertex_colors_follow_field_count() {
        let parsed = parse("v 0 0 0\nv 1 1 1 0.5 0.25 1\nv 2 2 2 1\n");
        assert_eq!(parsed.pools.positions.len(), 3);
        assert_eq!(
            parsed.pools.colors,
            vec![None, Some([0.5, 0.25, 1.0]), None]
        );
    }

    #[test]
    fn test_texcoord_defaults_v() {
        let parsed = parse("vt 0.5\nvt 0.1 0.2\n");
        assert_eq!(parsed.pools.uvs, vec![[0.5, 0.0], [0.1, 0.2]]);
    }

    #[test]
    fn test_malformed_number_rejected() {
        let err = parse_text("v 1 oops 3\n", &LoadOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ObjError::MalformedNumericToken {
                line: 1,
                token: "oops".to_string()
            }
        );
    }

    #[test]
    fn test_missing_number_rejected() {
        let err = parse_text("\nvn 1 0\n", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ObjError::MalformedNumericToken { line: 2, .. }));
    }

    #[test]
    fn test_malformed_number_substituted() {
        let options = LoadOptions {
            numeric_policy: NumericPolicy::Substitute(0.0),
            ..Default::default()
        };
        let parsed = parse_text("v 1 oops\n", &options).unwrap();
        assert_eq!(parsed.pools.positions, vec![[1.0, 0.0, 0.0]]);
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed
            .warnings
            .iter()
            .all(|warning| warning.kind == WarningKind::SubstitutedNumber));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for text in ["v nan 0 0\n", "v 0 inf 0\n", "vt 0.5 -infinity\n"] {
            let err = parse_text(text, &LoadOptions::default()).unwrap_err();
            assert!(matches!(err, ObjError::MalformedNumericToken { line: 1, .. }));
        }
    }

    #[test]
    fn test_non_finite_numbers_substituted() {
        let options = LoadOptions {
            numeric_policy: NumericPolicy::Substitute(0.0),
            ..Default::default()
        };
        let parsed = parse_text("v nan inf 2\nvt NaN\n", &options).unwrap();
        assert_eq!(parsed.pools.positions, vec![[0.0, 0.0, 2.0]]);
        assert_eq!(parsed.pools.uvs, vec![[0.0, 0.0]]);
        assert_eq!(parsed.warnings.len(), 3);
    }

    #[test]
    fn test_material_libraries_collected() {
        let parsed = parse("mtllib a.mtl b.mtl\nmtllib c.mtl\nusemtl Red\n");
        assert_eq!(parsed.material_libraries, vec!["a.mtl", "b.mtl", "c.mtl"]);
    }

    #[test]
    fn test_smoothing_values() {
        let mut state = ParserState::new();
        let options = LoadOptions::default();

        state.apply(1, Directive::Smoothing(Some("1")), &options).unwrap();
        assert!(state.current_object().smooth);
        state.apply(2, Directive::Smoothing(Some("OFF")), &options).unwrap();
        assert!(!state.current_object().smooth);
        state.apply(3, Directive::Smoothing(None), &options).unwrap();
        assert!(state.current_object().smooth);
        state.apply(4, Directive::Smoothing(Some("0")), &options).unwrap();
        assert!(!state.current_object().smooth);
    }

    #[test]
    fn test_warnings_do_not_stop_parse() {
        let parsed = parse("usemap wood\nfoo bar\nv 0 0 0\n");
        assert_eq!(parsed.pools.positions.len(), 1);
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.warnings[0].kind, WarningKind::UnsupportedDirective);
        assert_eq!(parsed.warnings[1].kind, WarningKind::UnknownDirective);
        assert_eq!(parsed.warnings[1].line, 2);
    }

    #[test]
    fn test_relative_index_uses_length_at_line() {
        let parsed = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 5 5 5\n");
        let geometry = &parsed.objects[0].geometry;
        assert_eq!(geometry.positions[2], [0.0, 1.0, 0.0]);
        assert_eq!(parsed.pools.positions.len(), 4);
    }

    #[test]
    fn test_unresolved_index_fails() {
        let err = parse_text("v 0 0 0\nf 1 2 3\n", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ObjError::UnresolvedIndex { line: 2, .. }));
    }
}
