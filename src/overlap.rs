//! Overlap detection between two tessellated shapes, built on pair traversal
//! plus a triangle/triangle narrow phase.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::ControlFlow;

use log::debug;

use crate::aabb::Aabb;
use crate::bvh::{Bvh, PairVisitor};
use crate::error::OverlapError;
use crate::primitive_set::{PrimitiveRange, PrimitiveSet};
use crate::triangle_set::TriangleSet;
use crate::Real;

/// Per-set overlap result: sub-shape id mapped to the element ids of that
/// set which overlap the other set.
pub type OverlapMap = BTreeMap<u32, BTreeSet<u32>>;

/// A predicate that can reject an element pair before any geometric test,
/// e.g. to skip coincident self-pairs during a self-intersection check.
/// Element ids are in each set's original numbering.
pub trait ElementFilter {
    /// Returns true when the pair must be skipped.
    fn reject_pair(&self, element1: u32, element2: u32) -> bool;
}

/// The default filter; keeps every pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ElementFilter for AcceptAll {
    fn reject_pair(&self, _element1: u32, _element2: u32) -> bool {
        false
    }
}

impl<F: Fn(u32, u32) -> bool> ElementFilter for F {
    fn reject_pair(&self, element1: u32, element2: u32) -> bool {
        self(element1, element2)
    }
}

/// Detector lifecycle; results are only served in the `Done` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Loaded,
    Done,
    Dirty,
}

/// The two loaded set/tree pairs.
struct Input<'a> {
    set1: &'a TriangleSet,
    tree1: &'a Bvh,
    set2: &'a TriangleSet,
    tree2: &'a Bvh,
}

/// Detects all overlapping triangle pairs between two already-built sets.
///
/// Lifecycle: [`load`] attaches two set/tree pairs, [`perform`] runs the
/// detection, after which the detector is `Done` and serves cached results
/// until [`mark_dirty`] invalidates them. Loading different sets resets the
/// detector entirely.
///
/// Degenerate (zero-area) triangles never abort a run: the affected pairs
/// are counted in [`skipped`] and left out of the result maps.
///
/// [`load`]: OverlapDetector::load
/// [`perform`]: OverlapDetector::perform
/// [`mark_dirty`]: OverlapDetector::mark_dirty
/// [`skipped`]: OverlapDetector::skipped
pub struct OverlapDetector<'a> {
    input: Option<Input<'a>>,
    filter: Box<dyn ElementFilter + 'a>,
    state: State,
    subshapes1: OverlapMap,
    subshapes2: OverlapMap,
    skipped: usize,
}

impl<'a> OverlapDetector<'a> {
    /// Creates an empty detector.
    pub fn new() -> OverlapDetector<'a> {
        OverlapDetector {
            input: None,
            filter: Box::new(AcceptAll),
            state: State::Uninitialized,
            subshapes1: OverlapMap::new(),
            subshapes2: OverlapMap::new(),
            skipped: 0,
        }
    }

    /// Attaches two primitive sets and their already-built trees, discarding
    /// any previous result.
    pub fn load(
        &mut self,
        set1: &'a TriangleSet,
        tree1: &'a Bvh,
        set2: &'a TriangleSet,
        tree2: &'a Bvh,
    ) {
        self.input = Some(Input {
            set1,
            tree1,
            set2,
            tree2,
        });
        self.state = State::Loaded;
        self.subshapes1.clear();
        self.subshapes2.clear();
        self.skipped = 0;
    }

    /// Installs an element filter consulted before every geometric test.
    /// Invalidates a previously computed result.
    pub fn set_element_filter(&mut self, filter: Box<dyn ElementFilter + 'a>) {
        self.filter = filter;
        self.mark_dirty();
    }

    /// Runs the detection with the given tolerance.
    ///
    /// A positive `tolerance` widens the broad phase by that margin and uses
    /// the tolerant narrow phase, under which touching triangles (sharing an
    /// edge or vertex) count as overlapping. A `tolerance` of zero uses the
    /// strict narrow phase, which only reports proper interpenetration.
    ///
    /// Calling `perform` again while the detector is `Done` returns the
    /// cached result without re-running any narrow-phase test.
    pub fn perform(&mut self, tolerance: Real) -> Result<(), OverlapError> {
        let input = self.input.as_ref().ok_or(OverlapError::NotLoaded)?;
        if self.state == State::Done {
            return Ok(());
        }

        self.subshapes1.clear();
        self.subshapes2.clear();
        self.skipped = 0;

        let mut visitor = OverlapVisitor {
            set1: input.set1,
            set2: input.set2,
            tolerance,
            filter: self.filter.as_ref(),
            subshapes1: &mut self.subshapes1,
            subshapes2: &mut self.subshapes2,
            skipped: &mut self.skipped,
        };
        let _ = input.tree1.traverse_pair(input.tree2, &mut visitor);

        self.state = State::Done;
        Ok(())
    }

    /// Returns true once a result has been computed and is still valid.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Invalidates a prior result without discarding the loaded sets; the
    /// next [`perform`] recomputes from scratch.
    ///
    /// [`perform`]: OverlapDetector::perform
    pub fn mark_dirty(&mut self) {
        if self.state == State::Done {
            self.state = State::Dirty;
        }
    }

    /// Overlap map of the first set: sub-shape id to overlapping element ids.
    pub fn overlap_subshapes1(&self) -> &OverlapMap {
        &self.subshapes1
    }

    /// Overlap map of the second set: sub-shape id to overlapping element ids.
    pub fn overlap_subshapes2(&self) -> &OverlapMap {
        &self.subshapes2
    }

    /// Number of pairs skipped because a triangle was degenerate.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Default for OverlapDetector<'_> {
    fn default() -> Self {
        OverlapDetector::new()
    }
}

/// The pair-traversal visitor performing the narrow phase and recording
/// results. This is the single point that mutates the overlap maps.
struct OverlapVisitor<'v> {
    set1: &'v TriangleSet,
    set2: &'v TriangleSet,
    tolerance: Real,
    filter: &'v (dyn ElementFilter + 'v),
    subshapes1: &'v mut OverlapMap,
    subshapes2: &'v mut OverlapMap,
    skipped: &'v mut usize,
}

impl PairVisitor for OverlapVisitor<'_> {
    fn reject(&mut self, left: &Aabb, right: &Aabb) -> bool {
        !left.intersects_with_tolerance(right, self.tolerance)
    }

    fn accept(&mut self, left: PrimitiveRange, right: PrimitiveRange) -> ControlFlow<()> {
        for i in left.indices() {
            for j in right.indices() {
                let element1 = self.set1.element(i);
                let element2 = self.set2.element(j);
                if self.filter.reject_pair(element1, element2) {
                    continue;
                }

                // Per-primitive broad phase before the exact test.
                if !self
                    .set1
                    .aabb(i)
                    .intersects_with_tolerance(&self.set2.aabb(j), self.tolerance)
                {
                    continue;
                }

                let t1 = self.set1.triangle(i);
                let t2 = self.set2.triangle(j);
                if t1.is_degenerate() || t2.is_degenerate() {
                    *self.skipped += 1;
                    debug!(
                        "skipping degenerate triangle pair ({}, {})",
                        element1, element2
                    );
                    continue;
                }

                let overlapping = if self.tolerance > 0.0 {
                    t1.intersects_with_tolerance(t2, self.tolerance)
                } else {
                    t1.interiors_intersect(t2)
                };
                if overlapping {
                    self.subshapes1
                        .entry(self.set1.subshape(i))
                        .or_default()
                        .insert(element1);
                    self.subshapes2
                        .entry(self.set2.subshape(j))
                        .or_default()
                        .insert(element2);
                }
            }
        }
        ControlFlow::Continue(())
    }
}
