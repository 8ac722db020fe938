//! A crate which exports axis-aligned bounding boxes, binary bounding volume
//! hierarchies with a queue-driven parallel builder, and pairwise overlap
//! detection between two hierarchies.
//!
//! ## About
//!
//! This crate can be used for applications which answer proximity and overlap
//! queries over large sets of geometric primitives, such as tessellated CAD
//! shapes. A BVH (Bounding Volume Hierarchy) reduces the cost of such queries
//! from O(n) to O(log2(n)) at the cost of building the hierarchy once in
//! advance. Construction partitions the primitives in place and can be spread
//! over several worker threads; two finished hierarchies can be walked
//! simultaneously to find all overlapping primitive pairs.
//!
//! ## Example
//!
//! ```
//! use bvh_overlap::bvh::{BuildConfig, Bvh};
//! use bvh_overlap::overlap::OverlapDetector;
//! use bvh_overlap::shapes::Triangle;
//! use bvh_overlap::triangle_set::TriangleSet;
//! use bvh_overlap::Point3;
//!
//! // Two single-triangle "shapes", far apart.
//! let mut set1 = TriangleSet::new(
//!     vec![Triangle::new(
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     )],
//!     vec![0],
//! );
//! let mut set2 = TriangleSet::new(
//!     vec![Triangle::new(
//!         Point3::new(10.0, 0.0, 0.0),
//!         Point3::new(11.0, 0.0, 0.0),
//!         Point3::new(10.0, 1.0, 0.0),
//!     )],
//!     vec![0],
//! );
//!
//! let config = BuildConfig::default();
//! let tree1 = Bvh::build(&mut set1, &config);
//! let tree2 = Bvh::build(&mut set2, &config);
//!
//! let mut detector = OverlapDetector::new();
//! detector.load(&set1, &tree1, &set2, &tree2);
//! detector.perform(0.0).unwrap();
//!
//! assert!(detector.is_done());
//! assert!(detector.overlap_subshapes1().is_empty());
//! assert!(detector.overlap_subshapes2().is_empty());
//! ```
//!
//! ## Features
//!
//! - `serde` (default **disabled**) - adds `Serialize` and `Deserialize`
//!   implementations for the tree and box types

/// Float type used by this crate.
pub type Real = f64;

/// Point math type used by this crate. Type alias for [`nalgebra::Point3`].
pub type Point3 = nalgebra::Point3<Real>;

/// Vector math type used by this crate. Type alias for [`nalgebra::Vector3`].
pub type Vector3 = nalgebra::Vector3<Real>;

/// A minimal floating value used as a lower bound for split-axis extents and
/// relative box comparisons.
pub const EPSILON: Real = 1e-9;

pub mod aabb;
pub mod axis;
pub mod bvh;
pub mod error;
pub mod overlap;
pub mod primitive_set;
pub mod shapes;
pub mod triangle_set;
mod utils;

#[cfg(test)]
mod testbase;
