//! This module defines the [`Bvh`] arena, its builders and its traversals.

mod builder;
mod pair;
mod queue;
mod strategy;
mod traverse;
mod tree;

pub use self::builder::*;
pub use self::pair::*;
pub use self::queue::*;
pub use self::strategy::*;
pub use self::traverse::*;
pub use self::tree::*;
