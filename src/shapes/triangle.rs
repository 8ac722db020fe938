//! This module defines a Triangle and its overlap predicates.

use crate::aabb::{Aabb, Bounded};
use crate::{Point3, Real, Vector3, EPSILON};

/// A triangle given by three corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    /// First point on the triangle
    pub a: Point3,
    /// Second point on the triangle
    pub b: Point3,
    /// Third point on the triangle
    pub c: Point3,
}

impl Triangle {
    /// Creates a new triangle given a counter clockwise set of points
    pub fn new(a: Point3, b: Point3, c: Point3) -> Triangle {
        Triangle { a, b, c }
    }

    /// Returns the centroid of the triangle.
    pub fn center(&self) -> Point3 {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// Returns the (unnormalized) face normal.
    pub fn normal(&self) -> Vector3 {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// Returns true if the triangle has (numerically) zero area.
    ///
    /// The test is relative to the edge lengths, so large thin slivers and
    /// tiny healthy triangles are classified alike.
    pub fn is_degenerate(&self) -> bool {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        let cross = ab.cross(&ac);
        cross.norm_squared() <= EPSILON * ab.norm_squared() * ac.norm_squared()
    }

    /// Returns whether this triangle and `other` come within `tolerance` of
    /// each other. Touching configurations (a shared edge or vertex) count
    /// as overlapping.
    ///
    /// Separating-axis test over the two face normals, the nine edge-edge
    /// cross products and the six in-plane edge normals; the latter make the
    /// coplanar case sound. Either triangle being degenerate is a caller
    /// error; use [`is_degenerate`] to screen inputs first.
    ///
    /// [`is_degenerate`]: Triangle::is_degenerate
    pub fn intersects_with_tolerance(&self, other: &Triangle, tolerance: Real) -> bool {
        separation_gap(self, other) <= tolerance
    }

    /// Strict variant: returns whether the triangles properly interpenetrate.
    /// Boundary contact (a shared edge or vertex, or mere coplanar touching)
    /// does NOT count as an intersection.
    pub fn interiors_intersect(&self, other: &Triangle) -> bool {
        separation_gap(self, other) < 0.0
    }

    fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }

    fn edges(&self) -> [Vector3; 3] {
        [self.b - self.a, self.c - self.b, self.a - self.c]
    }
}

impl Bounded for Triangle {
    fn aabb(&self) -> Aabb {
        Aabb::empty().grow(&self.a).grow(&self.b).grow(&self.c)
    }
}

/// Projects the three vertices onto a unit `axis` and returns the interval.
fn project(vertices: &[Point3; 3], axis: &Vector3) -> (Real, Real) {
    let mut min = Real::INFINITY;
    let mut max = Real::NEG_INFINITY;
    for vertex in vertices {
        let p = axis.dot(&vertex.coords);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

/// Returns the largest signed separation between the two triangles over all
/// candidate separating axes, in length units.
///
/// A positive result is the width of a separating slab; zero means the
/// triangles touch; a negative result means every axis sees overlapping
/// projections, i.e. the triangles interpenetrate.
fn separation_gap(t1: &Triangle, t2: &Triangle) -> Real {
    let v1 = t1.vertices();
    let v2 = t2.vertices();
    let e1 = t1.edges();
    let e2 = t2.edges();
    let n1 = t1.normal();
    let n2 = t2.normal();

    let mut axes: Vec<Vector3> = Vec::with_capacity(17);
    axes.push(n1);
    axes.push(n2);
    for a in &e1 {
        for b in &e2 {
            axes.push(a.cross(b));
        }
    }
    // In-plane edge normals; these separate coplanar triangles, where all
    // edge-edge cross products are parallel to the face normals.
    for a in &e1 {
        axes.push(n1.cross(a));
    }
    for b in &e2 {
        axes.push(n2.cross(b));
    }

    let mut gap = Real::NEG_INFINITY;
    for axis in &axes {
        let length = axis.norm();
        if length <= EPSILON {
            // Parallel edges or a degenerate cross product carry no
            // separating information.
            continue;
        }
        let axis = *axis / length;
        let (min1, max1) = project(&v1, &axis);
        let (min2, max2) = project(&v2, &axis);
        gap = gap.max((min2 - max1).max(min1 - max2));
    }
    gap
}
