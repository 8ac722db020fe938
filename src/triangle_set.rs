//! A [`PrimitiveSet`] realization over tessellated geometry: a flattened
//! triangle buffer with a parallel array mapping each triangle to its owning
//! sub-shape.

use crate::aabb::{Aabb, Bounded};
use crate::axis::Axis;
use crate::primitive_set::PrimitiveSet;
use crate::shapes::Triangle;
use crate::Real;

/// A flattened triangle buffer, indexable by a BVH builder.
///
/// The sub-shape mapping is supplied by the caller (typically the face a
/// triangle was tessellated from) and is carried through the builder's
/// permutation, as is a stable element id per triangle so that query results
/// can be reported in the caller's original numbering. Per-triangle bounding
/// boxes are cached once at construction.
#[derive(Debug, Clone, Default)]
pub struct TriangleSet {
    triangles: Vec<Triangle>,
    boxes: Vec<Aabb>,
    subshapes: Vec<u32>,
    elements: Vec<u32>,
}

impl TriangleSet {
    /// Creates a new set. `subshapes[i]` is the id of the sub-shape owning
    /// `triangles[i]`; element ids are assigned from the initial order.
    ///
    /// Panics if the two buffers disagree in length.
    pub fn new(triangles: Vec<Triangle>, subshapes: Vec<u32>) -> TriangleSet {
        assert_eq!(
            triangles.len(),
            subshapes.len(),
            "every triangle needs an owning sub-shape id"
        );
        let boxes = triangles.iter().map(Bounded::aabb).collect();
        let elements = (0..triangles.len() as u32).collect();
        TriangleSet {
            triangles,
            boxes,
            subshapes,
            elements,
        }
    }

    /// Returns the triangle at `index` (in the current permutation).
    pub fn triangle(&self, index: usize) -> &Triangle {
        &self.triangles[index]
    }

    /// Returns the owning sub-shape id of the triangle at `index`.
    pub fn subshape(&self, index: usize) -> u32 {
        self.subshapes[index]
    }

    /// Returns the stable element id of the triangle at `index`, i.e. its
    /// position in the buffer the set was constructed from.
    pub fn element(&self, index: usize) -> u32 {
        self.elements[index]
    }

    /// Returns the joint bounds of the whole set.
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for aabb in &self.boxes {
            bounds.join_mut(aabb);
        }
        bounds
    }
}

impl PrimitiveSet for TriangleSet {
    fn len(&self) -> usize {
        self.triangles.len()
    }

    fn aabb(&self, index: usize) -> Aabb {
        self.boxes[index]
    }

    fn center(&self, index: usize, axis: Axis) -> Real {
        self.boxes[index].center()[axis]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.triangles.swap(a, b);
        self.boxes.swap(a, b);
        self.subshapes.swap(a, b);
        self.elements.swap(a, b);
    }
}
