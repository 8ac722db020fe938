//! Single-tree traversal: a generic depth-first walk pruned by bounding-box
//! rejection, plus a best-first variant for nearest-neighbor style queries.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::ControlFlow;

use crate::aabb::{Aabb, IntersectsAabb};
use crate::bvh::{Bvh, BvhNode};
use crate::Real;

/// A heap entry of the best-first walk: a node and the lower bound of its
/// subtree, ordered so that the smallest bound is popped first.
#[derive(Debug, Clone, Copy)]
struct NearestEntry {
    /// Lower bound of everything beneath the node.
    bound: Real,

    /// Arena index of the node to expand next.
    node: usize,
}

impl Ord for NearestEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bound
            .partial_cmp(&other.bound)
            .unwrap_or(Ordering::Equal)
            .reverse()
    }
}

impl PartialOrd for NearestEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NearestEntry {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for NearestEntry {}

impl Bvh {
    /// Traverses the tree depth-first, pruning every subtree whose box does
    /// not intersect `query`, and invokes `visit` for each primitive index of
    /// every surviving leaf.
    ///
    /// `visit` may return [`ControlFlow::Break`] to abort the remaining walk;
    /// the same value is returned to the caller.
    pub fn traverse<Query, Visit>(&self, query: &Query, mut visit: Visit) -> ControlFlow<()>
    where
        Query: IntersectsAabb,
        Visit: FnMut(usize) -> ControlFlow<()>,
    {
        if self.nodes.is_empty() {
            return ControlFlow::Continue(());
        }

        let mut stack = Vec::with_capacity(32);
        stack.push(0usize);
        while let Some(index) = stack.pop() {
            match self.nodes[index] {
                BvhNode::Node {
                    ref aabb,
                    child_l,
                    child_r,
                } => {
                    if query.intersects_aabb(aabb) {
                        stack.push(child_r);
                        stack.push(child_l);
                    }
                }
                BvhNode::Leaf { ref aabb, range } => {
                    if query.intersects_aabb(aabb) {
                        for primitive in range.indices() {
                            if let ControlFlow::Break(()) = visit(primitive) {
                                return ControlFlow::Break(());
                            }
                        }
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Collects the primitive indices of all leaves whose boxes intersect
    /// `query`.
    pub fn traverse_collect<Query: IntersectsAabb>(&self, query: &Query) -> Vec<usize> {
        let mut indices = Vec::new();
        let _ = self.traverse(query, |primitive| {
            indices.push(primitive);
            ControlFlow::Continue(())
        });
        indices
    }

    /// Walks the tree with the nearest nodes first.
    ///
    /// `lower_bound` returns a conservative lower bound of the query metric
    /// for everything inside a box, or `None` to prune the subtree outright.
    /// Leaves are expanded in increasing bound order and `visit` receives
    /// each primitive index together with its leaf's bound, so a caller
    /// looking for the nearest primitive can stop as soon as its current
    /// best distance is below the reported bound.
    pub fn traverse_nearest<Bound, Visit>(
        &self,
        lower_bound: Bound,
        mut visit: Visit,
    ) -> ControlFlow<()>
    where
        Bound: Fn(&Aabb) -> Option<Real>,
        Visit: FnMut(usize, Real) -> ControlFlow<()>,
    {
        if self.nodes.is_empty() {
            return ControlFlow::Continue(());
        }

        let mut heap = BinaryHeap::new();
        if let Some(bound) = lower_bound(&self.nodes[0].aabb()) {
            heap.push(NearestEntry { bound, node: 0 });
        }

        while let Some(entry) = heap.pop() {
            match self.nodes[entry.node] {
                BvhNode::Leaf { range, .. } => {
                    for primitive in range.indices() {
                        if let ControlFlow::Break(()) = visit(primitive, entry.bound) {
                            return ControlFlow::Break(());
                        }
                    }
                }
                BvhNode::Node {
                    child_l, child_r, ..
                } => {
                    for child in [child_l, child_r] {
                        if let Some(bound) = lower_bound(&self.nodes[child].aabb()) {
                            heap.push(NearestEntry { bound, node: child });
                        }
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use crate::aabb::Aabb;
    use crate::bvh::{BuildConfig, Bvh};
    use crate::primitive_set::PrimitiveSet;
    use crate::testbase::unit_box_set;
    use crate::{Point3, Real};

    /// Builds a set of 21 unit boxes along the x axis and its tree.
    fn aligned_scene() -> (crate::testbase::BoxSet, Bvh) {
        let xs: Vec<Real> = (-10..11).map(|x| x as Real).collect();
        let mut set = unit_box_set(&xs);
        let tree = Bvh::build(&mut set, &BuildConfig::default());
        (set, tree)
    }

    #[test]
    fn test_traverse_prunes_by_box() {
        let (set, tree) = aligned_scene();

        // A query box around the origin must hit exactly the three
        // overlapping unit boxes.
        let query = Aabb::with_bounds(Point3::new(-1.2, -0.2, -0.2), Point3::new(1.2, 0.2, 0.2));
        let mut hits: Vec<Real> = tree
            .traverse_collect(&query)
            .into_iter()
            .map(|i| set.aabb(i).center().x)
            .collect();
        hits.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(hits, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_traverse_point_query() {
        let (set, tree) = aligned_scene();

        let hits = tree.traverse_collect(&Point3::new(5.0, 0.0, 0.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(set.aabb(hits[0]).center().x, 5.0);
    }

    #[test]
    fn test_traverse_early_termination() {
        let (_, tree) = aligned_scene();

        // Stop after the first visited primitive; the traversal must report
        // the break and visit nothing further.
        let query = Aabb::with_bounds(
            Point3::new(-100.0, -1.0, -1.0),
            Point3::new(100.0, 1.0, 1.0),
        );
        let mut visited = 0;
        let flow = tree.traverse(&query, |_| {
            visited += 1;
            ControlFlow::Break(())
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_traverse_empty_tree() {
        let tree = Bvh::new();
        assert!(tree
            .traverse_collect(&Point3::new(0.0, 0.0, 0.0))
            .is_empty());
    }

    #[test]
    /// The best-first walk reports leaves in increasing bound order, so the
    /// first visited primitive is the nearest one.
    fn test_traverse_nearest_visits_nearest_first() {
        // Single-primitive leaves, so the first visit is exactly the
        // nearest box rather than an arbitrary member of the nearest leaf.
        let xs: Vec<Real> = (-10..11).map(|x| x as Real).collect();
        let mut set = unit_box_set(&xs);
        let tree = Bvh::build(&mut set, &BuildConfig::new(1, 32, 1).unwrap());
        let target = Point3::new(6.3, 0.0, 0.0);

        let mut first = None;
        let _ = tree.traverse_nearest(
            |aabb| {
                // Squared distance from the target to the box.
                let mut dist = 0.0;
                for axis in 0..3 {
                    let d = (aabb.min[axis] - target[axis]).max(target[axis] - aabb.max[axis]);
                    if d > 0.0 {
                        dist += d * d;
                    }
                }
                Some(dist)
            },
            |primitive, _| {
                first = Some(primitive);
                ControlFlow::Break(())
            },
        );

        let first = first.unwrap();
        assert_eq!(set.aabb(first).center().x, 6.0);
    }
}
