//! Common utilities shared by unit tests.
#![cfg(test)]

use proptest::prelude::*;

use crate::aabb::Aabb;
use crate::axis::Axis;
use crate::primitive_set::PrimitiveSet;
use crate::shapes::Triangle;
use crate::triangle_set::TriangleSet;
use crate::{Point3, Real, Vector3};

/// A vector represented as a tuple
pub type TupleVec = (Real, Real, Real);

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] in a range
/// small enough to keep box arithmetic exact.
pub fn tuplevec_strategy() -> impl Strategy<Value = TupleVec> {
    (-10e10..10e10, -10e10..10e10, -10e10..10e10)
}

/// Convert a `TupleVec` to a [`Point3`].
pub fn tuple_to_point(tpl: &TupleVec) -> Point3 {
    Point3::new(tpl.0, tpl.1, tpl.2)
}

/// A minimal [`PrimitiveSet`] over plain boxes, for builder and traversal
/// tests that do not need triangle geometry.
pub struct BoxSet {
    boxes: Vec<Aabb>,
    elements: Vec<u32>,
}

impl BoxSet {
    pub fn new(boxes: Vec<Aabb>) -> BoxSet {
        let elements = (0..boxes.len() as u32).collect();
        BoxSet { boxes, elements }
    }

    /// The stable id of the box at `index`.
    #[allow(dead_code)]
    pub fn element(&self, index: usize) -> u32 {
        self.elements[index]
    }
}

impl PrimitiveSet for BoxSet {
    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn aabb(&self, index: usize) -> Aabb {
        self.boxes[index]
    }

    fn center(&self, index: usize, axis: Axis) -> Real {
        self.boxes[index].center()[axis]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.boxes.swap(a, b);
        self.elements.swap(a, b);
    }
}

/// Creates a [`BoxSet`] of unit boxes centered on `(x, 0, 0)` for the given
/// x coordinates.
pub fn unit_box_set(xs: &[Real]) -> BoxSet {
    let boxes = xs
        .iter()
        .map(|&x| {
            Aabb::with_bounds(
                Point3::new(x - 0.5, -0.5, -0.5),
                Point3::new(x + 0.5, 0.5, 0.5),
            )
        })
        .collect();
    BoxSet::new(boxes)
}

/// Implementation of splitmix64.
/// For reference see: http://xoroshiro.di.unimi.it/splitmix64.c
fn splitmix64(x: &mut u64) -> u64 {
    *x = x.wrapping_add(0x9E3779B97F4A7C15u64);
    let mut z = *x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9u64);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EBu64);
    z ^ (z >> 31)
}

/// Generates a new `Point3`, which will lie inside the given `bounds`.
/// Mutates the seed.
pub fn next_point3(seed: &mut u64, bounds: &Aabb) -> Point3 {
    let u = splitmix64(seed);
    let a = (u >> 42) as Real / (1u64 << 22) as Real;
    let b = ((u >> 21) & 0x1F_FFFF) as Real / (1u64 << 21) as Real;
    let c = (u & 0x1F_FFFF) as Real / (1u64 << 21) as Real;

    let size = bounds.size();
    bounds.min + Vector3::new(a * size.x, b * size.y, c * size.z)
}

/// Returns an `Aabb` which defines the default testing space bounds.
pub fn default_bounds() -> Aabb {
    Aabb::with_bounds(
        Point3::new(-1_000.0, -1_000.0, -1_000.0),
        Point3::new(1_000.0, 1_000.0, 1_000.0),
    )
}

/// Creates a unit size cube centered at `pos` and pushes the triangles to
/// `shapes`.
pub fn push_cube(pos: Point3, shapes: &mut Vec<Triangle>) {
    let top_front_right = pos + Vector3::new(0.5, 0.5, -0.5);
    let top_back_right = pos + Vector3::new(0.5, 0.5, 0.5);
    let top_back_left = pos + Vector3::new(-0.5, 0.5, 0.5);
    let top_front_left = pos + Vector3::new(-0.5, 0.5, -0.5);
    let bottom_front_right = pos + Vector3::new(0.5, -0.5, -0.5);
    let bottom_back_right = pos + Vector3::new(0.5, -0.5, 0.5);
    let bottom_back_left = pos + Vector3::new(-0.5, -0.5, 0.5);
    let bottom_front_left = pos + Vector3::new(-0.5, -0.5, -0.5);

    shapes.push(Triangle::new(
        top_back_right,
        top_front_right,
        top_front_left,
    ));
    shapes.push(Triangle::new(top_front_left, top_back_left, top_back_right));
    shapes.push(Triangle::new(
        bottom_front_left,
        bottom_front_right,
        bottom_back_right,
    ));
    shapes.push(Triangle::new(
        bottom_back_right,
        bottom_back_left,
        bottom_front_left,
    ));
    shapes.push(Triangle::new(
        top_back_left,
        top_front_left,
        bottom_front_left,
    ));
    shapes.push(Triangle::new(
        bottom_front_left,
        bottom_back_left,
        top_back_left,
    ));
    shapes.push(Triangle::new(
        bottom_front_right,
        top_front_right,
        top_back_right,
    ));
    shapes.push(Triangle::new(
        top_back_right,
        bottom_back_right,
        bottom_front_right,
    ));
    shapes.push(Triangle::new(
        top_front_left,
        top_front_right,
        bottom_front_right,
    ));
    shapes.push(Triangle::new(
        bottom_front_right,
        bottom_front_left,
        top_front_left,
    ));
    shapes.push(Triangle::new(
        bottom_back_right,
        top_back_right,
        top_back_left,
    ));
    shapes.push(Triangle::new(
        top_back_left,
        bottom_back_left,
        bottom_back_right,
    ));
}

/// Creates `n` deterministic random cubes. Returns the `Vec` of surface
/// `Triangle`s.
pub fn create_n_cubes(n: usize, bounds: &Aabb) -> Vec<Triangle> {
    let mut vec = Vec::new();
    let mut seed = 0;
    for _ in 0..n {
        push_cube(next_point3(&mut seed, bounds), &mut vec);
    }
    vec
}

/// Creates a [`TriangleSet`] of `n` deterministic random cubes inside the
/// default bounds; each cube's 12 triangles share one sub-shape id.
pub fn set_of_n_cubes(n: usize) -> TriangleSet {
    let bounds = default_bounds();
    let triangles = create_n_cubes(n, &bounds);
    let subshapes = (0..triangles.len()).map(|i| (i / 12) as u32).collect();
    TriangleSet::new(triangles, subshapes)
}

/// A single unit right triangle in the z = 0 plane, shifted along x.
pub fn shifted_unit_triangle_set(offset: Real) -> TriangleSet {
    let triangle = Triangle::new(
        Point3::new(offset, 0.0, 0.0),
        Point3::new(offset + 1.0, 0.0, 0.0),
        Point3::new(offset, 1.0, 0.0),
    );
    TriangleSet::new(vec![triangle], vec![0])
}

/// The tessellated surface of a unit cube centered at `pos`, with all
/// triangles owned by the sub-shape `subshape`.
pub fn unit_cube_shape(pos: Point3, subshape: u32) -> TriangleSet {
    let mut triangles = Vec::new();
    push_cube(pos, &mut triangles);
    let subshapes = vec![subshape; triangles.len()];
    TriangleSet::new(triangles, subshapes)
}
