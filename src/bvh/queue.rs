//! The queue-driven builder: node splitting scheduled over a shared work
//! queue and drained by a fixed pool of workers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;

use log::trace;

use crate::bvh::{BuildConfig, Builder, Bvh, SplitStrategy};
use crate::primitive_set::{ChildNode, PrimitiveRange, PrimitiveSet};
use crate::utils::joint_aabb_of_range;

/// One unit of build work: an inner node already inserted into the tree
/// whose primitive range has not been split yet.
///
/// A task is consumed exactly once by exactly one worker and owns its range
/// exclusively for its entire lifetime; tasks alive at the same time always
/// reference disjoint ranges because a parent fully partitions its range
/// before its children are enqueued.
#[derive(Debug)]
struct BuildTask {
    /// Arena index of the node to split.
    node: usize,

    /// The primitive range the node owns.
    range: PrimitiveRange,

    /// Depth of the node; the root has depth `0`.
    depth: usize,
}

/// Queue plus in-flight counter, guarded together.
struct QueueState {
    queue: VecDeque<BuildTask>,
    in_flight: usize,
}

/// The shared work queue.
///
/// Termination requires `queue.is_empty() && in_flight == 0`: an empty queue
/// alone is not sufficient, because a worker may be mid-split and about to
/// enqueue two more tasks. The counter is incremented when a task is handed
/// out and decremented only after its children have been registered.
struct WorkQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl WorkQueue {
    fn new(first: BuildTask) -> WorkQueue {
        let mut queue = VecDeque::new();
        queue.push_back(first);
        WorkQueue {
            state: Mutex::new(QueueState {
                queue,
                in_flight: 0,
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<QueueState> {
        self.state.lock().expect("a build worker panicked")
    }

    /// Pops the next task, blocking while the queue is momentarily empty but
    /// another worker still processes a task that may enqueue more work.
    /// Returns `None` once the queue is empty and no task is in flight.
    fn pop(&self) -> Option<BuildTask> {
        let mut state = self.lock();
        loop {
            if let Some(task) = state.queue.pop_front() {
                state.in_flight += 1;
                return Some(task);
            }
            if state.in_flight == 0 {
                return None;
            }
            state = self
                .available
                .wait(state)
                .expect("a build worker panicked");
        }
    }

    /// Marks the task handed out to this worker as finished and enqueues its
    /// follow-up tasks, waking waiting workers as needed.
    fn complete(&self, children: [Option<BuildTask>; 2]) {
        let mut state = self.lock();
        state.in_flight -= 1;
        let mut pushed = false;
        for task in children {
            if let Some(task) = task {
                state.queue.push_back(task);
                pushed = true;
            }
        }
        // Wake workers either to pick up new tasks or, when the build has
        // drained completely, to observe the termination condition.
        if pushed || (state.in_flight == 0 && state.queue.is_empty()) {
            self.available.notify_all();
        }
    }
}

/// Shared handle to the primitive set during a build.
///
/// Workers only ever read or swap primitives inside the disjoint range owned
/// by their current task, so handing each worker mutable access is sound for
/// the same reason the single-threaded build is: no two live tasks overlap,
/// and a parent partitions its whole range before its children exist.
struct SetHandle<S>(*mut S);

unsafe impl<S: PrimitiveSet> Send for SetHandle<S> {}
unsafe impl<S: PrimitiveSet> Sync for SetHandle<S> {}

impl<S> SetHandle<S> {
    /// Callers must confine all accesses to the range owned by their task.
    #[allow(clippy::mut_from_ref)]
    unsafe fn get(&self) -> &mut S {
        &mut *self.0
    }
}

/// A [`Builder`] that parallelizes node splitting via a work queue and a
/// fixed worker pool.
///
/// The resulting leaf partition (and, since every range is partitioned
/// sequentially by the single task owning it, the primitive permutation
/// itself) is deterministic for a fixed strategy, independent of worker
/// count and scheduling order. Node indices in the arena do depend on
/// scheduling and may differ between runs.
pub struct QueueBuilder<H> {
    config: BuildConfig,
    strategy: H,
}

impl<H: SplitStrategy> QueueBuilder<H> {
    /// Creates a builder from a validated configuration and a split strategy.
    pub fn new(config: BuildConfig, strategy: H) -> QueueBuilder<H> {
        QueueBuilder { config, strategy }
    }

    /// The configuration this builder runs with.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds a tree over the whole set, blocking the calling thread until
    /// all workers have drained the queue and no task is in flight.
    pub fn build<S: PrimitiveSet>(&self, set: &mut S) -> Bvh {
        let count = set.len();
        let range = PrimitiveRange::new(0, count);
        let root_aabb = joint_aabb_of_range(set, range);

        // Degenerate inputs produce a single (possibly empty) leaf root.
        if count <= self.config.leaf_size {
            let mut tree = Bvh::with_capacity(1);
            tree.add_leaf(root_aabb, range);
            return tree;
        }

        let mut tree = Bvh::with_capacity(2 * count - 1);
        let root = tree.add_inner(root_aabb);
        let queue = WorkQueue::new(BuildTask {
            node: root,
            range,
            depth: 0,
        });

        let shared_tree = Mutex::new(&mut tree);
        let handle = SetHandle(set as *mut S);

        if self.config.num_threads == 1 {
            self.run_worker(&queue, &handle, &shared_tree);
        } else {
            thread::scope(|scope| {
                for _ in 0..self.config.num_threads {
                    scope.spawn(|| self.run_worker(&queue, &handle, &shared_tree));
                }
            });
        }
        drop(shared_tree);

        trace!(
            "built BVH over {} primitives: {} nodes, {} leaves",
            count,
            tree.len(),
            tree.leaf_count()
        );
        tree
    }

    /// The worker routine: pull tasks until none remain.
    fn run_worker<S: PrimitiveSet>(
        &self,
        queue: &WorkQueue,
        handle: &SetHandle<S>,
        tree: &Mutex<&mut Bvh>,
    ) {
        while let Some(task) = queue.pop() {
            // Safety: this task owns `task.range` exclusively; see `SetHandle`.
            let set = unsafe { handle.get() };
            let children = self.strategy.build_node(set, task.range);

            let child_depth = task.depth + 1;
            let mut follow_ups = [None, None];
            {
                let mut tree = tree.lock().expect("a build worker panicked");
                let left = self.register(&mut tree, children.left, child_depth, &mut follow_ups[0]);
                let right =
                    self.register(&mut tree, children.right, child_depth, &mut follow_ups[1]);
                tree.set_children(task.node, left, right);
            }
            queue.complete(follow_ups);
        }
    }

    /// Registers one split half: small or depth-capped ranges become leaves,
    /// everything else becomes an inner node with a follow-up task.
    fn register(
        &self,
        tree: &mut Bvh,
        child: ChildNode,
        depth: usize,
        follow_up: &mut Option<BuildTask>,
    ) -> usize {
        if child.range.len() <= self.config.leaf_size || depth >= self.config.max_depth {
            tree.add_leaf(child.aabb, child.range)
        } else {
            let node = tree.add_inner(child.aabb);
            *follow_up = Some(BuildTask {
                node,
                range: child.range,
                depth,
            });
            node
        }
    }
}

impl<S: PrimitiveSet, H: SplitStrategy> Builder<S> for QueueBuilder<H> {
    fn build(&self, set: &mut S) -> Bvh {
        QueueBuilder::build(self, set)
    }
}
