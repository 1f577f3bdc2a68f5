//! Object boundaries and material runs.
//!
//! Exactly one [`ObjectRecord`] is current while parsing. Finished records are
//! finalized once, when a new object supersedes them or when the input ends.

use crate::error::{Diagnostics, ObjError, ObjResult, WarningKind};

use super::options::MixedPrimitives;

/// Primitive kind collected by an object. The last directive type seen wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryKind {
    #[default]
    Mesh,
    Line,
    Points,
}

impl GeometryKind {
    pub fn label(&self) -> &'static str {
        match self {
            GeometryKind::Mesh => "mesh",
            GeometryKind::Line => "line",
            GeometryKind::Points => "point",
        }
    }
}

/// Expanded, non-indexed vertex data of one object.
///
/// `positions`, `colors` and `uvs` always have the same length. `normals` is
/// either empty or aligned with them.
#[derive(Debug, Clone, Default)]
pub struct LocalGeometry {
    pub kind: GeometryKind,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<Option<[f32; 3]>>,
    pub uvs: Vec<[f32; 2]>,
    pub has_explicit_uv: bool,
}

impl LocalGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A contiguous vertex range drawn with one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRun {
    pub ordinal: usize,
    pub name: String,
    /// Last material library declared when the run opened.
    pub library: String,
    pub smooth: bool,
    pub range_start: usize,
    /// `None` while the run is open.
    pub range_end: Option<usize>,
    pub inherited: bool,
}

impl MaterialRun {
    fn unnamed(smooth: bool, vertex_count: usize) -> Self {
        Self {
            ordinal: 0,
            name: String::new(),
            library: String::new(),
            smooth,
            range_start: 0,
            range_end: Some(vertex_count),
            inherited: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.range_end.is_none()
    }

    /// Number of vertices covered. Open runs count as empty.
    pub fn range_count(&self) -> usize {
        self.range_end
            .map_or(0, |end| end.saturating_sub(self.range_start))
    }

    fn close(&mut self, vertex_count: usize) {
        self.range_end = Some(vertex_count);
    }

    /// Copy carried into the next object: first run, open from vertex 0.
    fn inherit(&self) -> Self {
        Self {
            ordinal: 0,
            range_start: 0,
            range_end: None,
            inherited: true,
            ..self.clone()
        }
    }
}

/// An `o`/`g` declaration (or the implicit object before one) and its data.
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    pub name: String,
    /// Set once an explicit `o`/`g` directive named the object.
    pub explicit: bool,
    pub geometry: LocalGeometry,
    pub runs: Vec<MaterialRun>,
    /// Ambient smoothing flag from the last `s` directive.
    pub smooth: bool,
}

impl ObjectRecord {
    pub fn new(name: &str, explicit: bool) -> Self {
        Self {
            name: name.to_string(),
            explicit,
            geometry: LocalGeometry::default(),
            runs: Vec::new(),
            smooth: false,
        }
    }

    pub fn current_run(&self) -> Option<&MaterialRun> {
        self.runs.last()
    }

    /// Closes the open run, if any, at the current vertex count.
    fn close_open_run(&mut self) {
        let vertex_count = self.geometry.vertex_count();
        if let Some(run) = self.runs.last_mut() {
            if run.is_open() {
                run.close(vertex_count);
            }
        }
    }

    /// Opens a new run named `name`.
    ///
    /// The previous run is closed first and dropped if it covers no vertices.
    /// The new run starts where the previous one ended, or at vertex 0 when
    /// there was none, so runs always tile the geometry.
    pub fn start_material(&mut self, name: &str, libraries: &[String]) -> &MaterialRun {
        self.close_open_run();

        let vertex_count = self.geometry.vertex_count();
        let previous = self.runs.last().cloned();

        if previous.as_ref().is_some_and(|run| run.range_count() == 0) {
            self.runs.pop();
        }

        let run = MaterialRun {
            ordinal: self.runs.len(),
            name: name.to_string(),
            library: libraries.last().cloned().unwrap_or_default(),
            smooth: previous.as_ref().map_or(self.smooth, |run| run.smooth),
            range_start: if previous.is_some() { vertex_count } else { 0 },
            range_end: None,
            inherited: false,
        };

        log::debug!(
            "object {:?}: material {:?} opens at vertex {}",
            self.name,
            run.name,
            run.range_start
        );

        self.runs.push(run);
        &self.runs[self.runs.len() - 1]
    }

    pub fn set_smoothing(&mut self, smooth: bool) {
        self.smooth = smooth;
        if let Some(run) = self.runs.last_mut() {
            if run.is_open() {
                run.smooth = smooth;
            }
        }
    }

    /// Closes the last run, prunes empty runs and guarantees at least one.
    ///
    /// At an object boundary a lone empty run survives. At the end of input
    /// every empty run is dropped, leaving an unnamed run if none remain.
    pub fn finalize(&mut self, end_of_input: bool) {
        self.close_open_run();

        if end_of_input || self.runs.len() > 1 {
            self.runs.retain(|run| run.range_count() > 0);
        }

        if self.runs.is_empty() {
            self.runs
                .push(MaterialRun::unnamed(self.smooth, self.geometry.vertex_count()));
        }

        for (ordinal, run) in self.runs.iter_mut().enumerate() {
            run.ordinal = ordinal;
        }
    }
}

/// Owns the current object and every object finished before it.
#[derive(Debug, Clone)]
pub struct ObjectTracker {
    finished: Vec<ObjectRecord>,
    current: ObjectRecord,
}

impl Default for ObjectTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectTracker {
    /// Starts with an implicit, unnamed object.
    pub fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: ObjectRecord::new("", false),
        }
    }

    pub fn current(&self) -> &ObjectRecord {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut ObjectRecord {
        &mut self.current
    }

    /// Handles an `o`/`g` directive.
    ///
    /// An object that was never explicitly named is renamed in place, so
    /// faces declared before the first `o`/`g` land in that object. Parts
    /// split off it by a primitive kind change are renamed with it.
    pub fn start_object(&mut self, name: &str, explicit: bool) {
        if !self.current.explicit {
            log::debug!("naming implicit object {:?}", name);
            // Implicit records only precede the first `o`/`g`.
            for record in self
                .finished
                .iter_mut()
                .chain(std::iter::once(&mut self.current))
                .filter(|record| !record.explicit)
            {
                record.name = name.to_string();
                record.explicit = explicit;
            }
            return;
        }

        self.begin_object(name, explicit);
    }

    /// Finalizes the current object and starts a fresh one, carrying an open
    /// named material over as an inherited run.
    fn begin_object(&mut self, name: &str, explicit: bool) {
        let carried = self
            .current
            .current_run()
            .filter(|run| !run.name.is_empty())
            .map(MaterialRun::inherit);

        let mut next = ObjectRecord::new(name, explicit);
        if let Some(run) = carried {
            log::debug!("object {:?} inherits material {:?}", name, run.name);
            next.runs.push(run);
        }

        let mut previous = std::mem::replace(&mut self.current, next);
        previous.finalize(false);
        self.finished.push(previous);
    }

    pub fn start_material(&mut self, name: &str, libraries: &[String]) {
        self.current.start_material(name, libraries);
    }

    pub fn set_smoothing(&mut self, smooth: bool) {
        self.current.set_smoothing(smooth);
    }

    /// Makes the current object ready to receive `kind` geometry.
    ///
    /// Objects that already hold geometry of another kind are split or
    /// rejected according to `policy`.
    pub fn prepare_kind(
        &mut self,
        kind: GeometryKind,
        line: usize,
        policy: MixedPrimitives,
        diagnostics: &mut Diagnostics,
    ) -> ObjResult<()> {
        let geometry = &self.current.geometry;

        if geometry.kind != kind && !geometry.is_empty() {
            let existing = geometry.kind;
            match policy {
                MixedPrimitives::Reject => {
                    return Err(ObjError::MixedPrimitiveKind {
                        line,
                        object: self.current.name.clone(),
                        existing: existing.label(),
                        incoming: kind.label(),
                    });
                }
                MixedPrimitives::Split => {
                    diagnostics.warn(
                        line,
                        WarningKind::SplitMixedPrimitive,
                        format!(
                            "object {:?} switches from {} to {} geometry, continuing in a new object",
                            self.current.name,
                            existing.label(),
                            kind.label()
                        ),
                    );
                    let name = self.current.name.clone();
                    let explicit = self.current.explicit;
                    self.begin_object(&name, explicit);
                }
            }
        }

        self.current.geometry.kind = kind;
        Ok(())
    }

    /// Finalizes the last object and returns every object in order.
    pub fn finish(mut self) -> Vec<ObjectRecord> {
        self.current.finalize(true);
        self.finished.push(self.current);
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_vertices(tracker: &mut ObjectTracker, count: usize) {
        let geometry = &mut tracker.current_mut().geometry;
        for _ in 0..count {
            geometry.positions.push([0.0; 3]);
            geometry.colors.push(None);
            geometry.uvs.push([0.0; 2]);
        }
    }

    #[test]
    fn test_implicit_object_is_renamed() {
        let mut tracker = ObjectTracker::new();
        add_vertices(&mut tracker, 3);
        tracker.start_object("Cube", true);

        let objects = tracker.finish();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].name, "Cube");
        assert!(objects[0].explicit);
        assert_eq!(objects[0].geometry.vertex_count(), 3);
    }

    #[test]
    fn test_runs_partition_vertices() {
        let mut tracker = ObjectTracker::new();
        tracker.start_object("Box", true);
        tracker.start_material("A", &[]);
        add_vertices(&mut tracker, 6);
        tracker.start_material("B", &[]);
        add_vertices(&mut tracker, 3);

        let objects = tracker.finish();
        let runs = &objects[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].name.as_str(), runs[0].range_start, runs[0].range_end), ("A", 0, Some(6)));
        assert_eq!((runs[1].name.as_str(), runs[1].range_start, runs[1].range_end), ("B", 6, Some(9)));
        assert_eq!(runs[1].ordinal, 1);
    }

    #[test]
    fn test_empty_run_is_replaced() {
        let mut tracker = ObjectTracker::new();
        tracker.start_material("Unused", &[]);
        tracker.start_material("Used", &[]);
        add_vertices(&mut tracker, 3);

        let objects = tracker.finish();
        let runs = &objects[0].runs;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].name, "Used");
        assert_eq!(runs[0].ordinal, 0);
        assert_eq!(runs[0].range_start, 0);
    }

    #[test]
    fn test_first_run_covers_earlier_faces() {
        let mut tracker = ObjectTracker::new();
        add_vertices(&mut tracker, 3);
        tracker.start_material("Late", &[]);
        add_vertices(&mut tracker, 3);

        let objects = tracker.finish();
        assert_eq!(objects[0].runs[0].range_start, 0);
        assert_eq!(objects[0].runs[0].range_count(), 6);
    }

    #[test]
    fn test_library_is_last_declared() {
        let mut tracker = ObjectTracker::new();
        let libraries = vec!["a.mtl".to_string(), "b.mtl".to_string()];
        tracker.start_material("Red", &libraries);
        assert_eq!(tracker.current().runs[0].library, "b.mtl");
    }

    #[test]
    fn test_material_inherited_across_objects() {
        let mut tracker = ObjectTracker::new();
        tracker.start_object("First", true);
        add_vertices(&mut tracker, 3);
        tracker.start_material("X", &[]);
        tracker.start_object("Second", true);
        add_vertices(&mut tracker, 3);

        let objects = tracker.finish();
        assert_eq!(objects.len(), 2);

        let run = &objects[1].runs[0];
        assert_eq!(run.name, "X");
        assert!(run.inherited);
        assert_eq!((run.range_start, run.range_end), (0, Some(3)));
    }

    #[test]
    fn test_inherited_run_dropped_when_superseded() {
        let mut tracker = ObjectTracker::new();
        tracker.start_object("First", true);
        tracker.start_material("X", &[]);
        add_vertices(&mut tracker, 3);
        tracker.start_object("Second", true);
        tracker.start_material("Y", &[]);
        add_vertices(&mut tracker, 3);

        let objects = tracker.finish();
        let runs = &objects[1].runs;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].name, "Y");
        assert!(!runs[0].inherited);
        assert_eq!(runs[0].range_start, 0);
    }

    #[test]
    fn test_unnamed_run_is_not_inherited() {
        let mut tracker = ObjectTracker::new();
        tracker.start_object("First", true);
        add_vertices(&mut tracker, 3);
        tracker.start_object("Second", true);
        assert!(tracker.current().runs.is_empty());
    }

    #[test]
    fn test_end_of_input_drops_dangling_run() {
        let mut tracker = ObjectTracker::new();
        tracker.start_object("Only", true);
        tracker.start_material("Dangling", &[]);

        let objects = tracker.finish();
        assert_eq!(objects[0].runs.len(), 1);
        assert_eq!(objects[0].runs[0].name, "");
    }

    #[test]
    fn test_boundary_keeps_lone_empty_run() {
        let mut tracker = ObjectTracker::new();
        tracker.start_object("First", true);
        tracker.start_material("Lonely", &[]);
        tracker.start_object("Second", true);

        let objects = tracker.finish();
        assert_eq!(objects[0].runs.len(), 1);
        assert_eq!(objects[0].runs[0].name, "Lonely");
    }

    #[test]
    fn test_smoothing_stamps_open_run() {
        let mut tracker = ObjectTracker::new();
        tracker.set_smoothing(true);
        tracker.start_material("A", &[]);
        assert!(tracker.current().runs[0].smooth);

        tracker.set_smoothing(false);
        assert!(!tracker.current().runs[0].smooth);
        assert!(!tracker.current().smooth);
    }

    #[test]
    fn test_mixed_kind_splits_object() {
        let mut tracker = ObjectTracker::new();
        let mut diagnostics = Diagnostics::new();
        tracker.start_object("Wire", true);
        tracker.start_material("Ink", &[]);
        add_vertices(&mut tracker, 3);

        tracker
            .prepare_kind(GeometryKind::Line, 9, MixedPrimitives::Split, &mut diagnostics)
            .unwrap();
        assert_eq!(tracker.current().name, "Wire");
        assert_eq!(tracker.current().geometry.kind, GeometryKind::Line);
        assert_eq!(tracker.current().runs[0].name, "Ink");
        assert_eq!(diagnostics.warnings()[0].kind, WarningKind::SplitMixedPrimitive);
        assert_eq!(tracker.finish().len(), 2);
    }

    #[test]
    fn test_split_implicit_object_is_renamed() {
        let mut tracker = ObjectTracker::new();
        let mut diagnostics = Diagnostics::new();
        add_vertices(&mut tracker, 3);
        tracker
            .prepare_kind(GeometryKind::Line, 5, MixedPrimitives::Split, &mut diagnostics)
            .unwrap();
        add_vertices(&mut tracker, 2);
        tracker.start_object("Named", true);
        tracker.start_object("Next", true);

        let objects = tracker.finish();
        let names: Vec<&str> = objects.iter().map(|object| object.name.as_str()).collect();
        assert_eq!(names, vec!["Named", "Named", "Next"]);
        assert!(objects[0].explicit && objects[1].explicit);
    }

    #[test]
    fn test_mixed_kind_rejected() {
        let mut tracker = ObjectTracker::new();
        let mut diagnostics = Diagnostics::new();
        add_vertices(&mut tracker, 3);

        let err = tracker
            .prepare_kind(GeometryKind::Points, 4, MixedPrimitives::Reject, &mut diagnostics)
            .unwrap_err();
        assert!(matches!(err, ObjError::MixedPrimitiveKind { line: 4, .. }));
    }

    #[test]
    fn test_kind_change_on_empty_object() {
        let mut tracker = ObjectTracker::new();
        let mut diagnostics = Diagnostics::new();
        tracker
            .prepare_kind(GeometryKind::Points, 1, MixedPrimitives::Reject, &mut diagnostics)
            .unwrap();
        assert_eq!(tracker.current().geometry.kind, GeometryKind::Points);
        assert!(diagnostics.warnings().is_empty());
    }
}
