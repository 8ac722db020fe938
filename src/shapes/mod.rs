//! Geometric primitives understood by the narrow phase.

mod triangle;

pub use self::triangle::*;
