//! Solving strategies.
//!
//! - [`exact`] — MILP adapter with a feasibility certificate
//! - [`ga`] — genetic search returning a best-found result with an
//!   explicit constraint-violation vector

pub mod exact;
pub mod ga;
