//! Utilities module.

use crate::aabb::Aabb;
use crate::axis::Axis;
use crate::primitive_set::{PrimitiveRange, PrimitiveSet};
use crate::Point3;

/// Defines a Bucket utility object. Used to store the properties of
/// primitive partitions in the SAH build procedure.
#[derive(Clone, Copy)]
pub struct Bucket {
    /// The number of primitives in this `Bucket`.
    pub size: usize,

    /// The joint [`Aabb`] of the primitives in this `Bucket`.
    pub aabb: Aabb,
}

impl Bucket {
    /// Returns an empty bucket.
    pub fn empty() -> Bucket {
        Bucket {
            size: 0,
            aabb: Aabb::empty(),
        }
    }

    /// Extend this `Bucket` by a primitive with the given [`Aabb`].
    pub fn add_aabb(&mut self, aabb: &Aabb) {
        self.size += 1;
        self.aabb = self.aabb.join(aabb);
    }

    /// Join the contents of two `Bucket`s.
    pub fn join_bucket(a: Bucket, b: &Bucket) -> Bucket {
        Bucket {
            size: a.size + b.size,
            aabb: a.aabb.join(&b.aabb),
        }
    }
}

/// Returns the centroid of the primitive at `index` as a point.
pub fn centroid_of<S: PrimitiveSet + ?Sized>(set: &S, index: usize) -> Point3 {
    Point3::new(
        set.center(index, Axis::X),
        set.center(index, Axis::Y),
        set.center(index, Axis::Z),
    )
}

/// Computes the joint [`Aabb`] of the primitives in `range`.
pub fn joint_aabb_of_range<S: PrimitiveSet + ?Sized>(set: &S, range: PrimitiveRange) -> Aabb {
    let mut aabb = Aabb::empty();
    for index in range.indices() {
        aabb.join_mut(&set.aabb(index));
    }
    aabb
}

/// Computes the joint [`Aabb`] of the primitives in `range` together with the
/// bounds of their centroids.
pub fn joint_bounds_of_range<S: PrimitiveSet + ?Sized>(
    set: &S,
    range: PrimitiveRange,
) -> (Aabb, Aabb) {
    let mut aabb = Aabb::empty();
    let mut centroids = Aabb::empty();
    for index in range.indices() {
        aabb.join_mut(&set.aabb(index));
        centroids.grow_mut(&centroid_of(set, index));
    }
    (aabb, centroids)
}
