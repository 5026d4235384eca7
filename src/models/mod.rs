//! Domain model types for warehouse siting.
//!
//! Provides the core abstractions: the immutable site model with its
//! distance, cost, demand, and supply tables, the binary city→warehouse
//! assignment matrix, and solve outcome types.

mod assignment;
mod site;
mod solution;

pub use assignment::Assignment;
pub use site::{Model, ModelBuilder};
pub use solution::{Placement, SolveOutcome};
