//! Split strategies: the policy deciding how a node's primitive range is
//! partitioned into two children.

use crate::aabb::Aabb;
use crate::primitive_set::{ChildNode, ChildNodes, PrimitiveRange, PrimitiveSet};
use crate::utils::{joint_aabb_of_range, joint_bounds_of_range, Bucket};
use crate::{Real, EPSILON};

const NUM_BUCKETS: usize = 6;

/// The split decision hook of a builder.
///
/// `build_node` receives a range of at least two primitives and must
/// physically partition it via [`PrimitiveSet::swap`] so that the left
/// child's primitives occupy a contiguous prefix and the right child's a
/// contiguous suffix of the parent's range. Both returned ranges must be
/// non-empty; strategies fall back to an even positional split when their
/// heuristic cannot make progress.
///
/// Implementations must only touch indices inside the given range. This is
/// what allows the parallel builder to run several split decisions at once
/// without locking the set.
pub trait SplitStrategy: Send + Sync {
    /// Partitions `range` in place and describes the two resulting children.
    fn build_node<S: PrimitiveSet>(&self, set: &mut S, range: PrimitiveRange) -> ChildNodes;
}

/// Splits a range at its positional middle, without reordering primitives.
///
/// This is also the fallback every other strategy degrades to when all
/// centroids coincide along the chosen axis: the midpoint split always makes
/// progress, so tree depth is guaranteed to decrease.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianSplit;

impl SplitStrategy for MedianSplit {
    fn build_node<S: PrimitiveSet>(&self, set: &mut S, range: PrimitiveRange) -> ChildNodes {
        even_split(set, range)
    }
}

/// Binned surface-area-heuristic splitting.
///
/// Primitive centroids are binned along the widest axis of their joint
/// centroid bounds; the split plane minimizing the SAH cost over all bucket
/// boundaries wins, and the range is partitioned in place around it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinnedSah;

impl SplitStrategy for BinnedSah {
    fn build_node<S: PrimitiveSet>(&self, set: &mut S, range: PrimitiveRange) -> ChildNodes {
        debug_assert!(range.len() >= 2, "nothing to split in {}", range);

        let (aabb_bounds, centroid_bounds) = joint_bounds_of_range(set, range);

        // Find the axis along which the primitives are spread the most.
        let split_axis = centroid_bounds.largest_axis();
        let split_axis_size = centroid_bounds.max[split_axis] - centroid_bounds.min[split_axis];

        // The primitives lie too close together to split them in a sensible
        // way; fall back to the positional split.
        if split_axis_size < EPSILON {
            return even_split(set, range);
        }

        let min = centroid_bounds.min[split_axis];

        // Assign the primitives to buckets.
        let mut buckets = [Bucket::empty(); NUM_BUCKETS];
        for index in range.indices() {
            let bucket = bucket_of(set.center(index, split_axis), min, split_axis_size);
            buckets[bucket].add_aabb(&set.aabb(index));
        }

        // Compute the cost for each configuration and select the one with
        // the minimal cost; configurations leaving one side empty cannot
        // make progress and are skipped.
        let mut min_bucket = None;
        let mut min_cost = Real::INFINITY;
        let mut child_l_aabb = Aabb::empty();
        let mut child_r_aabb = Aabb::empty();
        for i in 0..(NUM_BUCKETS - 1) {
            let (l_buckets, r_buckets) = buckets.split_at(i + 1);
            let child_l = l_buckets.iter().fold(Bucket::empty(), Bucket::join_bucket);
            let child_r = r_buckets.iter().fold(Bucket::empty(), Bucket::join_bucket);
            if child_l.size == 0 || child_r.size == 0 {
                continue;
            }

            let cost = (child_l.size as Real * child_l.aabb.surface_area()
                + child_r.size as Real * child_r.aabb.surface_area())
                / aabb_bounds.surface_area();
            if cost < min_cost {
                min_bucket = Some(i);
                min_cost = cost;
                child_l_aabb = child_l.aabb;
                child_r_aabb = child_r.aabb;
            }
        }
        let min_bucket = match min_bucket {
            Some(bucket) => bucket,
            None => return even_split(set, range),
        };

        // Partition the range in place around the chosen bucket boundary.
        let mut i = range.start;
        let mut j = range.end;
        while i < j {
            if bucket_of(set.center(i, split_axis), min, split_axis_size) <= min_bucket {
                i += 1;
            } else {
                j -= 1;
                set.swap(i, j);
            }
        }

        if i == range.start || i == range.end {
            return even_split(set, range);
        }

        let (left, right) = range.split_at(i);
        ChildNodes {
            left: ChildNode {
                aabb: child_l_aabb,
                range: left,
            },
            right: ChildNode {
                aabb: child_r_aabb,
                range: right,
            },
        }
    }
}

/// Maps a centroid coordinate to its bucket number.
fn bucket_of(center: Real, min: Real, axis_size: Real) -> usize {
    // Get the relative position of the centroid `[0.0..1.0]` and convert it
    // to the actual bucket number.
    let relative = (center - min) / axis_size;
    ((relative * (NUM_BUCKETS as Real - 0.01)) as usize).min(NUM_BUCKETS - 1)
}

/// Splits `range` evenly at its positional middle and measures both halves.
fn even_split<S: PrimitiveSet>(set: &S, range: PrimitiveRange) -> ChildNodes {
    debug_assert!(range.len() >= 2, "nothing to split in {}", range);

    let mid = range.start + range.len() / 2;
    let (left, right) = range.split_at(mid);
    ChildNodes {
        left: ChildNode {
            aabb: joint_aabb_of_range(set, left),
            range: left,
        },
        right: ChildNode {
            aabb: joint_aabb_of_range(set, right),
            range: right,
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::bvh::{BinnedSah, MedianSplit, SplitStrategy};
    use crate::primitive_set::{PrimitiveRange, PrimitiveSet};
    use crate::testbase::{set_of_n_cubes, unit_box_set};
    use crate::utils::joint_aabb_of_range;
    use crate::EPSILON;

    fn check_split<S: PrimitiveSet>(set: &mut S, strategy: &impl SplitStrategy) {
        let range = PrimitiveRange::new(0, set.len());
        let children = strategy.build_node(set, range);

        // Prefix/suffix partition of the parent range.
        assert_eq!(children.left.range.start, range.start);
        assert_eq!(children.left.range.end, children.right.range.start);
        assert_eq!(children.right.range.end, range.end);
        assert!(!children.left.range.is_empty());
        assert!(!children.right.range.is_empty());

        // The reported boxes match the primitives that ended up on each side.
        let left = joint_aabb_of_range(set, children.left.range);
        let right = joint_aabb_of_range(set, children.right.range);
        assert!(children.left.aabb.relative_eq(&left, EPSILON));
        assert!(children.right.aabb.relative_eq(&right, EPSILON));
    }

    #[test]
    fn test_sah_split_partitions_in_place() {
        let mut set = set_of_n_cubes(100);
        check_split(&mut set, &BinnedSah);
    }

    #[test]
    fn test_median_split_partitions_in_place() {
        let mut set = set_of_n_cubes(100);
        check_split(&mut set, &MedianSplit);
    }

    #[test]
    /// All centroids coincide; the SAH must degrade to the even split
    /// instead of producing an empty child.
    fn test_sah_degenerate_centroids() {
        let mut set = unit_box_set(&[0.0; 9]);
        check_split(&mut set, &BinnedSah);
        let children = BinnedSah.build_node(&mut set, PrimitiveRange::new(0, 9));
        assert_eq!(children.left.range.len(), 4);
        assert_eq!(children.right.range.len(), 5);
    }

    #[test]
    fn test_two_primitives_split() {
        let mut set = unit_box_set(&[0.0, 10.0]);
        let children = BinnedSah.build_node(&mut set, PrimitiveRange::new(0, 2));
        assert_eq!(children.left.range.len(), 1);
        assert_eq!(children.right.range.len(), 1);
    }
}
