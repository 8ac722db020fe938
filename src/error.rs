//! Error types surfaced at the crate's fallible seams.
//!
//! Programming-contract violations (out-of-range indices, asking a leaf for
//! its children) are not represented here; those panic.

use thiserror::Error;

/// Rejected build configuration. Invalid values are never silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The maximum number of primitives per leaf must be at least one.
    #[error("leaf size must be at least 1")]
    InvalidLeafSize,

    /// The maximum tree depth must be at least one.
    #[error("maximum depth must be at least 1")]
    InvalidMaxDepth,

    /// The worker count must be at least one.
    #[error("worker count must be at least 1")]
    InvalidThreadCount,
}

/// Errors reported by the overlap detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OverlapError {
    /// `perform` was called before any primitive sets were loaded.
    #[error("no primitive sets have been loaded")]
    NotLoaded,
}
