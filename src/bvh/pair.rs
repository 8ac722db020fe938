//! Pair traversal: simultaneous descent of two trees, pruned by a
//! caller-supplied broad-phase test on node box pairs.

use std::ops::ControlFlow;

use crate::aabb::Aabb;
use crate::bvh::{Bvh, BvhNode};
use crate::primitive_set::PrimitiveRange;

/// The visitor driving a pair traversal.
///
/// Correctness depends entirely on [`reject`] being a conservative
/// over-approximation: it must never reject a node pair that could contain a
/// leaf pair satisfying [`accept`]. It may under-reject, which only costs
/// traversal time.
///
/// [`reject`]: PairVisitor::reject
/// [`accept`]: PairVisitor::accept
pub trait PairVisitor {
    /// Broad-phase test: returns true when the pair of subtrees bounded by
    /// `left` and `right` can be pruned entirely.
    fn reject(&mut self, left: &Aabb, right: &Aabb) -> bool;

    /// Narrow-phase hook, invoked for every surviving pair of leaves.
    /// Returning [`ControlFlow::Break`] aborts the remaining traversal.
    fn accept(&mut self, left: PrimitiveRange, right: PrimitiveRange) -> ControlFlow<()>;
}

impl Bvh {
    /// Walks `self` and `other` simultaneously, seeding the descent with the
    /// pair of roots and expanding the non-leaf side(s) of every surviving
    /// pair (up to four sub-pairs when both nodes are inner).
    ///
    /// Returns [`ControlFlow::Break`] if the visitor aborted the walk.
    pub fn traverse_pair(
        &self,
        other: &Bvh,
        visitor: &mut impl PairVisitor,
    ) -> ControlFlow<()> {
        if self.nodes.is_empty() || other.nodes.is_empty() {
            return ControlFlow::Continue(());
        }

        let mut stack: Vec<(usize, usize)> = Vec::with_capacity(32);
        stack.push((0, 0));
        while let Some((i, j)) = stack.pop() {
            let left = &self.nodes[i];
            let right = &other.nodes[j];
            if visitor.reject(&left.aabb(), &right.aabb()) {
                continue;
            }

            match (left, right) {
                (
                    BvhNode::Leaf { range: l, .. },
                    BvhNode::Leaf { range: r, .. },
                ) => {
                    if l.is_empty() || r.is_empty() {
                        continue;
                    }
                    if let ControlFlow::Break(()) = visitor.accept(*l, *r) {
                        return ControlFlow::Break(());
                    }
                }
                (
                    BvhNode::Leaf { .. },
                    BvhNode::Node {
                        child_l, child_r, ..
                    },
                ) => {
                    stack.push((i, *child_l));
                    stack.push((i, *child_r));
                }
                (
                    BvhNode::Node {
                        child_l, child_r, ..
                    },
                    BvhNode::Leaf { .. },
                ) => {
                    stack.push((*child_l, j));
                    stack.push((*child_r, j));
                }
                (
                    BvhNode::Node {
                        child_l: l1,
                        child_r: r1,
                        ..
                    },
                    BvhNode::Node {
                        child_l: l2,
                        child_r: r2,
                        ..
                    },
                ) => {
                    stack.push((*l1, *l2));
                    stack.push((*l1, *r2));
                    stack.push((*r1, *l2));
                    stack.push((*r1, *r2));
                }
            }
        }
        ControlFlow::Continue(())
    }
}
