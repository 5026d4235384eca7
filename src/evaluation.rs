//! Independent re-evaluation of an assignment against the model.
//!
//! Solvers report an objective; this module recomputes it (and loads and
//! costs) straight from the assignment matrix, so tests and reports can
//! cross-check solver output instead of trusting it.

use crate::models::{Assignment, Model};

/// Recomputes objectives, loads, and costs from an assignment matrix.
///
/// # Examples
///
/// ```
/// use warehouse_siting::distance::DistanceMatrix;
/// use warehouse_siting::evaluation::AssignmentEvaluator;
/// use warehouse_siting::models::{Assignment, Model};
///
/// let mut dm = DistanceMatrix::new(2);
/// dm.set_symmetric(0, 1, 7.0);
/// let model = Model::builder(vec!["A".into(), "B".into()], dm)
///     .demand(vec![5.0, 5.0])
///     .supply(vec![4.0, 10.0])
///     .build()
///     .unwrap();
///
/// let assignment = Assignment::nearest_active(model.distances(), &[1]);
/// let eval = AssignmentEvaluator::new(&model);
/// assert_eq!(eval.max_delivery_distance(&assignment), 7.0);
/// assert_eq!(eval.warehouse_loads(&assignment).unwrap(), vec![0.0, 10.0]);
/// ```
pub struct AssignmentEvaluator<'a> {
    model: &'a Model,
}

impl<'a> AssignmentEvaluator<'a> {
    /// Creates an evaluator over the given model.
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Worst delivery distance over all assigned city→warehouse pairs.
    pub fn max_delivery_distance(&self, assignment: &Assignment) -> f64 {
        let mut worst = 0.0f64;
        for i in 0..self.model.len() {
            if let Some(j) = assignment.assigned_to(i) {
                worst = worst.max(self.model.distance(i, j));
            }
        }
        worst
    }

    /// Demand routed into each site. `None` without a demand table.
    pub fn warehouse_loads(&self, assignment: &Assignment) -> Option<Vec<f64>> {
        let demand = self.model.demand()?;
        let mut loads = vec![0.0; self.model.len()];
        for i in 0..self.model.len() {
            if let Some(j) = assignment.assigned_to(i) {
                loads[j] += demand[i];
            }
        }
        Some(loads)
    }

    /// Total fixed construction cost of the active warehouses. `None`
    /// without a cost table.
    pub fn fixed_cost(&self, assignment: &Assignment) -> Option<f64> {
        let fixed = self.model.fixed_cost()?;
        Some(assignment.warehouses().iter().map(|&j| fixed[j]).sum())
    }

    /// Demand-weighted delivery cost, `Σ distance(i, j) · demand(i)` over
    /// assigned pairs. `None` without a demand table.
    pub fn operating_cost(&self, assignment: &Assignment) -> Option<f64> {
        let demand = self.model.demand()?;
        let mut cost = 0.0;
        for i in 0..self.model.len() {
            if let Some(j) = assignment.assigned_to(i) {
                cost += self.model.distance(i, j) * demand[i];
            }
        }
        Some(cost)
    }

    /// Fixed + scaling·capacity + operating cost for a sized placement.
    /// `None` without demand and cost tables.
    pub fn total_cost(&self, assignment: &Assignment, capacities: &[f64]) -> Option<f64> {
        let scaling = self.model.scaling_cost()?;
        let sized: f64 = assignment
            .warehouses()
            .iter()
            .map(|&j| scaling[j] * capacities[j])
            .sum();
        Some(self.fixed_cost(assignment)? + sized + self.operating_cost(assignment)?)
    }

    /// Per-site capacity excess, `load(j) − limit(j)` for active sites and
    /// zero elsewhere; positive entries are violations. The limit is the
    /// supply table, or `capacities` when given (variable-capacity
    /// placements). `None` without demand, or without a limit source.
    pub fn capacity_excess(
        &self,
        assignment: &Assignment,
        capacities: Option<&[f64]>,
    ) -> Option<Vec<f64>> {
        let loads = self.warehouse_loads(assignment)?;
        let mut excess = vec![0.0; self.model.len()];
        for j in assignment.warehouses() {
            let limit = match capacities {
                Some(c) => c[j],
                None => self.model.supply()?[j],
            };
            excess[j] = loads[j] - limit;
        }
        Some(excess)
    }
}
