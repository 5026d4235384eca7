//! Solve outcome types.

use std::fmt;

use super::Assignment;

/// A concrete siting decision: the assignment matrix, its objective value,
/// and (for the variable-capacity variant) the built capacity per site.
///
/// Immutable once the solve that produced it terminates.
#[derive(Debug, Clone)]
pub struct Placement {
    objective: f64,
    assignment: Assignment,
    capacities: Option<Vec<f64>>,
}

impl Placement {
    /// Creates a placement without capacity sizing.
    pub fn new(objective: f64, assignment: Assignment) -> Self {
        Self {
            objective,
            assignment,
            capacities: None,
        }
    }

    /// Creates a placement with per-site built capacities.
    pub fn with_capacities(objective: f64, assignment: Assignment, capacities: Vec<f64>) -> Self {
        Self {
            objective,
            assignment,
            capacities: Some(capacities),
        }
    }

    /// The objective value this placement achieves.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// The city→warehouse assignment matrix.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Built capacity per site, if the variant sizes warehouses.
    pub fn capacities(&self) -> Option<&[f64]> {
        self.capacities.as_deref()
    }
}

/// Outcome of an exact solve.
///
/// `Optimal` carries the provably minimal objective; `Infeasible` means the
/// integer program has no feasible point. The genetic solver never returns
/// this type directly — it has no feasibility certificate and reports a
/// best-found [`SearchResult`](crate::solver::ga::SearchResult) instead.
///
/// The `Display` form is the textual status contract: the literal
/// `Infeasible`, or the numeric objective value.
///
/// # Examples
///
/// ```
/// use warehouse_siting::models::SolveOutcome;
///
/// assert_eq!(SolveOutcome::Infeasible.to_string(), "Infeasible");
/// ```
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    /// A provably optimal placement.
    Optimal(Placement),
    /// No feasible assignment exists.
    Infeasible,
}

impl SolveOutcome {
    /// The placement, if the solve succeeded.
    pub fn placement(&self) -> Option<&Placement> {
        match self {
            SolveOutcome::Optimal(p) => Some(p),
            SolveOutcome::Infeasible => None,
        }
    }

    /// Returns `true` if the instance was proven infeasible.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveOutcome::Infeasible)
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Optimal(p) => write!(f, "{}", p.objective()),
            SolveOutcome::Infeasible => write!(f, "Infeasible"),
        }
    }
}
