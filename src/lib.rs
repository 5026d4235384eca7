//! # warehouse-siting
//!
//! Capacitated warehouse placement library providing exact and
//! metaheuristic solvers for five siting variants, from plain minimax
//! placement to budget-limited siting with sized capacities.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Model, Assignment, Placement, SolveOutcome)
//! - [`distance`] — Symmetric site-to-site distance matrix
//! - [`formulation`] — Siting variants and their lowering to solver requirements
//! - [`evaluation`] — Objective and constraint evaluation of assignments
//! - [`solver`] — Exact MILP adapter and genetic-search adapter
//! - [`tables`] — CSV table loading (distances, demand, supply, costs)
//! - [`report`] — Status line, placement summary, objective-trace CSV
//! - [`fixtures`] — Seeded random model generation
//! - [`error`] — Error taxonomy

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod formulation;
pub mod models;
pub mod report;
pub mod solver;
pub mod tables;
