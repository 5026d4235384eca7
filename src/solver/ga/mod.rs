//! Genetic algorithm solver adapter.
//!
//! Population-based search over siting genomes. Unlike the exact solver
//! this adapter never proves infeasibility: it returns the best candidate
//! found together with its constraint-violation vector, and callers judge
//! solution quality from that vector.

mod encoding;
mod runner;

pub use encoding::{ActivationProblem, FixedCountProblem};
pub use runner::{Evaluation, GaConfig, GaProblem, GaRun, TerminationPolicy};

use tracing::info;

use crate::evaluation::AssignmentEvaluator;
use crate::formulation::{CapacityRule, Instance};
use crate::models::{Assignment, Placement};

/// Best-found result of a genetic search.
///
/// Carries the violation vector explicitly: a best-found placement that
/// violates constraints is reported as such, never passed off as valid.
#[derive(Debug, Clone)]
pub struct SearchResult {
    placement: Placement,
    violations: Vec<f64>,
    trace: Vec<f64>,
    generations: usize,
}

impl SearchResult {
    /// The best placement found.
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Final constraint-excess vector; positive entries are violations.
    pub fn violations(&self) -> &[f64] {
        &self.violations
    }

    /// Largest constraint excess, clamped at zero.
    pub fn max_violation(&self) -> f64 {
        self.violations.iter().copied().fold(0.0, f64::max)
    }

    /// Returns `true` if no constraint is violated beyond `tol`.
    pub fn is_feasible(&self, tol: f64) -> bool {
        self.max_violation() <= tol
    }

    /// Best objective after initial sampling and after each generation.
    pub fn trace(&self) -> &[f64] {
        &self.trace
    }

    /// Number of generations the search ran.
    pub fn generations(&self) -> usize {
        self.generations
    }
}

/// Runs the genetic search on an instance.
///
/// The encoding follows the variant: fixed-count variants search an array
/// of K warehouse indices, free-count variants a binary activation vector.
/// Fully reproducible: the same seed yields byte-identical results.
///
/// # Examples
///
/// ```
/// use warehouse_siting::distance::DistanceMatrix;
/// use warehouse_siting::formulation::{Instance, Variant};
/// use warehouse_siting::models::Model;
/// use warehouse_siting::solver::ga::{self, GaConfig, TerminationPolicy};
///
/// let mut dm = DistanceMatrix::new(3);
/// dm.set_symmetric(0, 1, 1.0);
/// dm.set_symmetric(1, 2, 2.0);
/// dm.set_symmetric(0, 2, 3.0);
/// let model = Model::builder(vec!["A".into(), "B".into(), "C".into()], dm)
///     .build()
///     .unwrap();
///
/// let instance = Instance::formulate(&model, Variant::Minimax { warehouses: 1 }).unwrap();
/// let config = GaConfig::default().with_population_size(20);
/// let termination = TerminationPolicy::default().with_max_generations(50);
///
/// let result = ga::solve(&instance, &config, &termination, 42);
/// assert_eq!(result.placement().objective(), 2.0);
/// assert!(result.is_feasible(1e-6));
/// ```
pub fn solve(
    instance: &Instance,
    config: &GaConfig,
    termination: &TerminationPolicy,
    seed: u64,
) -> SearchResult {
    match instance.requirements().warehouse_count {
        Some(count) => {
            let problem = FixedCountProblem::new(instance, count);
            let run = runner::run(&problem, config, termination, seed);
            let active = problem.active_sites(&run.best);
            project(instance, active, run)
        }
        None => {
            let problem = ActivationProblem::new(instance);
            let run = runner::run(&problem, config, termination, seed);
            let active = problem.active_sites(&run.best);
            project(instance, active, run)
        }
    }
}

fn project<G>(instance: &Instance, active: Vec<usize>, run: GaRun<G>) -> SearchResult {
    let model = instance.model();
    let assignment = Assignment::nearest_active(model.distances(), &active);

    let placement = match instance.requirements().capacity {
        CapacityRule::Sized => {
            let capacities = AssignmentEvaluator::new(model)
                .warehouse_loads(&assignment)
                .unwrap_or_else(|| vec![0.0; model.len()]);
            Placement::with_capacities(run.evaluation.objective, assignment, capacities)
        }
        _ => Placement::new(run.evaluation.objective, assignment),
    };

    info!(
        objective = run.evaluation.objective,
        violation = run.evaluation.total_violation(),
        generations = run.generations,
        "genetic search finished"
    );

    SearchResult {
        placement,
        violations: run.evaluation.violations,
        trace: run.trace,
        generations: run.generations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::formulation::Variant;
    use crate::models::Model;

    fn triangle_model() -> Model {
        let mut dm = DistanceMatrix::new(3);
        dm.set_symmetric(0, 1, 1.0);
        dm.set_symmetric(1, 2, 2.0);
        dm.set_symmetric(0, 2, 3.0);
        Model::builder(vec!["A".into(), "B".into(), "C".into()], dm)
            .demand(vec![4.0, 2.0, 6.0])
            .supply(vec![10.0, 12.0, 5.0])
            .costs(vec![3.0, 5.0, 2.0], vec![0.5, 1.0, 0.25])
            .build()
            .unwrap()
    }

    fn two_site_model(supply: [f64; 2]) -> Model {
        let mut dm = DistanceMatrix::new(2);
        dm.set_symmetric(0, 1, 7.0);
        Model::builder(vec!["X".into(), "Y".into()], dm)
            .demand(vec![5.0, 5.0])
            .supply(supply.to_vec())
            .costs(vec![2.0, 3.0], vec![0.1, 0.1])
            .build()
            .unwrap()
    }

    fn quick() -> (GaConfig, TerminationPolicy) {
        (
            GaConfig::default().with_population_size(20),
            TerminationPolicy::default().with_max_generations(60),
        )
    }

    #[test]
    fn test_finds_triangle_hub() {
        let model = triangle_model();
        let instance = Instance::formulate(&model, Variant::Minimax { warehouses: 1 }).unwrap();
        let (config, termination) = quick();
        let result = solve(&instance, &config, &termination, 42);
        assert_eq!(result.placement().objective(), 2.0);
        assert_eq!(result.placement().assignment().warehouses(), vec![1]);
        assert!(result.is_feasible(1e-6));
    }

    #[test]
    fn test_same_seed_is_byte_identical() {
        let model = triangle_model();
        let instance =
            Instance::formulate(&model, Variant::Capacitated { warehouses: 2 }).unwrap();
        let (config, termination) = quick();
        let a = solve(&instance, &config, &termination, 9);
        let b = solve(&instance, &config, &termination, 9);
        assert_eq!(a.placement().objective(), b.placement().objective());
        assert_eq!(a.placement().assignment(), b.placement().assignment());
        assert_eq!(a.trace(), b.trace());
        assert_eq!(a.violations(), b.violations());
        assert_eq!(a.generations(), b.generations());
    }

    #[test]
    fn test_capacitated_picks_sufficient_supply() {
        let model = two_site_model([4.0, 10.0]);
        let instance =
            Instance::formulate(&model, Variant::Capacitated { warehouses: 1 }).unwrap();
        let (config, termination) = quick();
        let result = solve(&instance, &config, &termination, 1);
        assert_eq!(result.placement().assignment().warehouses(), vec![1]);
        assert_eq!(result.placement().objective(), 7.0);
        assert!(result.is_feasible(1e-6));
    }

    #[test]
    fn test_soft_infeasibility_is_reported() {
        // No single site can absorb the total demand; the best found must
        // carry a positive violation rather than pretending feasibility.
        let model = two_site_model([4.0, 4.0]);
        let instance =
            Instance::formulate(&model, Variant::Capacitated { warehouses: 1 }).unwrap();
        let (config, termination) = quick();
        let result = solve(&instance, &config, &termination, 5);
        assert!(result.max_violation() > 0.0);
        assert!(!result.is_feasible(1e-6));
    }

    #[test]
    fn test_budgeted_respects_budget() {
        let model = two_site_model([10.0, 10.0]);
        let instance = Instance::formulate(&model, Variant::Budgeted { budget: 2.5 }).unwrap();
        let (config, termination) = quick();
        let result = solve(&instance, &config, &termination, 11);
        // Only X (fixed cost 2) is affordable.
        assert_eq!(result.placement().assignment().warehouses(), vec![0]);
        assert_eq!(result.placement().objective(), 7.0);
        assert!(result.is_feasible(1e-6));
    }

    #[test]
    fn test_objective_matches_projected_assignment() {
        let model = triangle_model();
        let instance = Instance::formulate(&model, Variant::Budgeted { budget: 20.0 }).unwrap();
        let (config, termination) = quick();
        let result = solve(&instance, &config, &termination, 23);
        let recomputed = AssignmentEvaluator::new(&model)
            .max_delivery_distance(result.placement().assignment());
        assert_eq!(result.placement().objective(), recomputed);
    }

    #[test]
    fn test_variable_capacity_sizes_to_load() {
        let model = two_site_model([10.0, 10.0]);
        let instance =
            Instance::formulate(&model, Variant::VariableCapacity { budget: 100.0 }).unwrap();
        let (config, termination) = quick();
        let result = solve(&instance, &config, &termination, 3);
        // Both sites self-serve: fixed 2+3 plus 0.1·10 of sized capacity.
        assert_eq!(result.placement().objective(), 6.0);
        assert_eq!(result.placement().capacities(), Some(&[5.0, 5.0][..]));
        assert!(result.is_feasible(1e-6));
    }

    #[test]
    fn test_stall_window_stops_early() {
        let model = triangle_model();
        let instance = Instance::formulate(&model, Variant::Minimax { warehouses: 1 }).unwrap();
        let config = GaConfig::default().with_population_size(20);
        let termination = TerminationPolicy::default()
            .with_max_generations(500)
            .with_period(10);
        let result = solve(&instance, &config, &termination, 42);
        assert!(result.generations() < 500);
        assert_eq!(result.trace().len(), result.generations() + 1);
    }
}
