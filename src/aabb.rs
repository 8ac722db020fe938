//! Axis Aligned Bounding Boxes.

use std::fmt;

use crate::axis::Axis;
use crate::{Point3, Real, Vector3};

/// AABB struct.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum coordinates
    pub min: Point3,

    /// Maximum coordinates
    pub max: Point3,
}

/// A trait implemented by things which can be bounded by an [`Aabb`].
pub trait Bounded {
    /// Returns the [`Aabb`] of the implementor.
    fn aabb(&self) -> Aabb;
}

/// A trait implemented by things that may or may not intersect an [`Aabb`] and,
/// by extension, things that can be used to prune a BVH traversal.
pub trait IntersectsAabb {
    /// Returns whether this object intersects an [`Aabb`].
    fn intersects_aabb(&self, aabb: &Aabb) -> bool;
}

impl Aabb {
    /// Creates a new [`Aabb`] with the given bounds.
    pub fn with_bounds(min: Point3, max: Point3) -> Aabb {
        Aabb { min, max }
    }

    /// Creates a new empty [`Aabb`]. An empty box contains no point, unions as
    /// the identity, and intersects nothing.
    pub fn empty() -> Aabb {
        Aabb {
            min: Point3::new(Real::INFINITY, Real::INFINITY, Real::INFINITY),
            max: Point3::new(Real::NEG_INFINITY, Real::NEG_INFINITY, Real::NEG_INFINITY),
        }
    }

    /// Returns true if this [`Aabb`] is empty.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns true if the [`Point3`] is inside the [`Aabb`].
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns true if the [`Point3`] is approximately inside the [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn approx_contains_eps(&self, p: &Point3, epsilon: Real) -> bool {
        (p.x - self.min.x) > -epsilon
            && (p.x - self.max.x) < epsilon
            && (p.y - self.min.y) > -epsilon
            && (p.y - self.max.y) < epsilon
            && (p.z - self.min.z) > -epsilon
            && (p.z - self.max.z) < epsilon
    }

    /// Returns true if `other` is approximately contained in this [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn approx_contains_aabb_eps(&self, other: &Aabb, epsilon: Real) -> bool {
        self.approx_contains_eps(&other.min, epsilon) && self.approx_contains_eps(&other.max, epsilon)
    }

    /// Returns true if this and `other` are approximately equal with respect
    /// to some `epsilon`.
    pub fn relative_eq(&self, other: &Aabb, epsilon: Real) -> bool {
        (self.min.x - other.min.x).abs() < epsilon
            && (self.min.y - other.min.y).abs() < epsilon
            && (self.min.z - other.min.z).abs() < epsilon
            && (self.max.x - other.max.x).abs() < epsilon
            && (self.max.y - other.max.y).abs() < epsilon
            && (self.max.z - other.max.z).abs() < epsilon
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and `other`.
    pub fn join(&self, other: &Aabb) -> Aabb {
        Aabb::with_bounds(
            Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    /// Joins `other` into this [`Aabb`] in place.
    pub fn join_mut(&mut self, other: &Aabb) {
        *self = self.join(other);
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and the
    /// [`Point3`] `other`.
    pub fn grow(&self, other: &Point3) -> Aabb {
        Aabb::with_bounds(
            Point3::new(
                self.min.x.min(other.x),
                self.min.y.min(other.y),
                self.min.z.min(other.z),
            ),
            Point3::new(
                self.max.x.max(other.x),
                self.max.y.max(other.y),
                self.max.z.max(other.z),
            ),
        )
    }

    /// Grows this [`Aabb`] by the [`Point3`] `other` in place.
    pub fn grow_mut(&mut self, other: &Point3) {
        *self = self.grow(other);
    }

    /// Returns the size of this [`Aabb`] in all three dimensions.
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Returns the center point of the [`Aabb`].
    pub fn center(&self) -> Point3 {
        self.min + (self.size() / 2.0)
    }

    /// Returns the total surface area of this [`Aabb`].
    pub fn surface_area(&self) -> Real {
        let size = self.size();
        2.0 * (size.x * size.y + size.x * size.z + size.y * size.z)
    }

    /// Returns the axis along which the [`Aabb`] is stretched the most.
    pub fn largest_axis(&self) -> Axis {
        let size = self.size();
        if size.x > size.y && size.x > size.z {
            Axis::X
        } else if size.y > size.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns whether this [`Aabb`] and `other` intersect when both are
    /// virtually expanded by `tolerance` in every direction.
    ///
    /// This is the broad-phase building block for pair traversal: it must
    /// never reject a pair whose contents could lie within `tolerance` of
    /// each other. Empty boxes intersect nothing.
    pub fn intersects_with_tolerance(&self, other: &Aabb, tolerance: Real) -> bool {
        self.min.x - tolerance <= other.max.x
            && other.min.x - tolerance <= self.max.x
            && self.min.y - tolerance <= other.max.y
            && other.min.y - tolerance <= self.max.y
            && self.min.z - tolerance <= other.max.z
            && other.min.z - tolerance <= self.max.z
    }
}

impl Default for Aabb {
    fn default() -> Aabb {
        Aabb::empty()
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Min bound: {}; Max bound: {}", self.min, self.max)
    }
}

impl IntersectsAabb for Aabb {
    fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.intersects_with_tolerance(aabb, 0.0)
    }
}

impl IntersectsAabb for Point3 {
    fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        aabb.contains(self)
    }
}

/// Implementation of [`Bounded`] for single points.
impl Bounded for Point3 {
    fn aabb(&self) -> Aabb {
        Aabb::with_bounds(*self, *self)
    }
}

impl Bounded for Aabb {
    fn aabb(&self) -> Aabb {
        *self
    }
}
