//! Travel distance lookup.
//!
//! Provides a dense symmetric distance matrix over the site universe.

mod matrix;

pub use matrix::DistanceMatrix;
