//! The builder contract and its validated configuration.

use crate::bvh::{BinnedSah, Bvh, QueueBuilder};
use crate::error::ConfigError;
use crate::primitive_set::PrimitiveSet;

/// Validated build parameters.
///
/// Construction rejects zero values outright instead of clamping them; a
/// caller passing `0` workers has made a configuration error, not expressed
/// a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Maximum number of primitives a leaf may hold.
    pub leaf_size: usize,

    /// Maximum depth of the tree; nodes at this depth become leaves
    /// regardless of their size.
    pub max_depth: usize,

    /// Number of worker threads cooperating on a build. `1` runs the whole
    /// build on the calling thread.
    pub num_threads: usize,
}

impl BuildConfig {
    /// Creates a validated configuration.
    pub fn new(
        leaf_size: usize,
        max_depth: usize,
        num_threads: usize,
    ) -> Result<BuildConfig, ConfigError> {
        if leaf_size == 0 {
            return Err(ConfigError::InvalidLeafSize);
        }
        if max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        if num_threads == 0 {
            return Err(ConfigError::InvalidThreadCount);
        }
        Ok(BuildConfig {
            leaf_size,
            max_depth,
            num_threads,
        })
    }
}

impl Default for BuildConfig {
    fn default() -> BuildConfig {
        BuildConfig {
            leaf_size: 4,
            max_depth: 32,
            num_threads: 1,
        }
    }
}

/// The builder contract: turn a [`PrimitiveSet`] into a [`Bvh`].
///
/// Implementations must produce a tree whose leaf ranges partition
/// `[0, set.len())` exactly and whose inner boxes equal the union of their
/// children's boxes. The builder borrows the set only for the duration of
/// the call and keeps no state across calls.
pub trait Builder<S: PrimitiveSet> {
    /// Builds a tree over the whole set.
    fn build(&self, set: &mut S) -> Bvh;
}

impl Bvh {
    /// Creates a new [`Bvh`] over `set` with the default SAH split strategy.
    pub fn build<S: PrimitiveSet>(set: &mut S, config: &BuildConfig) -> Bvh {
        QueueBuilder::new(*config, BinnedSah::default()).build(set)
    }
}
