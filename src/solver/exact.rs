//! Exact MILP solver adapter.
//!
//! Encodes an [`Instance`] as a mixed-integer linear program over the full
//! binary supplier matrix and hands it to the branch-and-bound backend.
//! Returns [`SolveOutcome::Infeasible`] when the integer program has no
//! feasible point, and the provably minimal objective otherwise.
//!
//! Variable count is quadratic in the site count, so solve time grows
//! non-linearly for dense site sets.

use good_lp::{constraint, microlp, variable, Expression, ProblemVariables, ResolutionError,
              Solution, SolverModel, Variable};
use tracing::debug;

use crate::error::{ConfigurationError, SolveError};
use crate::evaluation::AssignmentEvaluator;
use crate::formulation::{CapacityRule, Instance, Objective};
use crate::models::{Assignment, Placement, SolveOutcome};

/// Solves the instance to proven optimality.
///
/// The nearest-active siting variant has no linear encoding of its derived
/// assignment rule; it is solved here with the free-assignment budget
/// algebra instead.
///
/// The returned objective is recomputed from the extracted assignment (and
/// capacities), not read off the backend, so it always equals an
/// independent re-evaluation of the returned placement.
///
/// # Examples
///
/// ```
/// use warehouse_siting::distance::DistanceMatrix;
/// use warehouse_siting::formulation::{Instance, Variant};
/// use warehouse_siting::models::Model;
/// use warehouse_siting::solver::exact;
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
/// let outcome = exact::solve(&instance).unwrap();
/// assert_eq!(outcome.placement().unwrap().objective(), 2.0);
/// ```
pub fn solve(instance: &Instance) -> Result<SolveOutcome, SolveError> {
    let model = instance.model();
    let req = instance.requirements();
    let n = model.len();

    let mut vars = ProblemVariables::new();
    let supplier: Vec<Variable> = (0..n * n).map(|_| vars.add(variable().binary())).collect();
    let sup = |i: usize, j: usize| supplier[i * n + j];

    let max_distance = match req.objective {
        Objective::MaxDeliveryDistance => Some(vars.add(variable().min(0.0))),
        Objective::TotalCost => None,
    };
    let capacities: Option<Vec<Variable>> = match req.capacity {
        CapacityRule::Sized => Some((0..n).map(|_| vars.add(variable().min(0.0))).collect()),
        _ => None,
    };

    let objective = build_objective(instance, &sup, max_distance, capacities.as_deref())?;

    let mut problem = vars.minimise(objective.clone()).using(microlp);

    // Coverage: every city is served by exactly one warehouse.
    for i in 0..n {
        let served = sum((0..n).map(|j| Expression::from(sup(i, j))));
        problem = problem.with(constraint!(served == 1.0));
    }

    // Self-consistency: a city only supplies others if it hosts a warehouse.
    for i in 0..n {
        for j in 0..n {
            if i != j {
                problem = problem.with(constraint!(sup(i, j) <= sup(j, j)));
            }
        }
    }

    if let Some(w) = max_distance {
        // The objective variable dominates every assigned delivery distance.
        for i in 0..n {
            for j in 0..n {
                problem = problem.with(constraint!(w >= model.distance(i, j) * sup(i, j)));
            }
        }
    }

    if let Some(count) = req.warehouse_count {
        let active = sum((0..n).map(|j| Expression::from(sup(j, j))));
        problem = problem.with(constraint!(active == count as f64));
    }

    match req.capacity {
        CapacityRule::Unlimited => {}
        CapacityRule::FixedSupply => {
            let demand = table(model.demand(), "demand")?;
            let supply = table(model.supply(), "supply")?;
            // Served demand collapses to zero wherever no warehouse is built.
            for j in 0..n {
                let load = sum((0..n).map(|i| demand[i] * sup(i, j)));
                problem = problem.with(constraint!(load <= supply[j] * sup(j, j)));
            }
        }
        CapacityRule::Sized => {
            let demand = table(model.demand(), "demand")?;
            let caps = capacities.as_deref().unwrap_or_default();
            for j in 0..n {
                let load = sum((0..n).map(|i| demand[i] * sup(i, j)));
                problem = problem.with(constraint!(load <= caps[j]));
            }
        }
    }

    if let Some(budget) = req.budget {
        let fixed = table(model.fixed_cost(), "cost")?;
        let mut spend = sum((0..n).map(|j| fixed[j] * sup(j, j)));
        if budget.include_scaling {
            let scaling = table(model.scaling_cost(), "cost")?;
            let caps = capacities.as_deref().unwrap_or_default();
            for j in 0..n {
                spend += scaling[j] * caps[j];
            }
        }
        problem = problem.with(constraint!(spend <= budget.limit));
    }

    debug!(sites = n, variant = ?instance.variant(), "submitting MILP");

    let solved = match problem.solve() {
        Ok(solved) => solved,
        Err(ResolutionError::Infeasible) => return Ok(SolveOutcome::Infeasible),
        Err(other) => return Err(SolveError::Backend(other.to_string())),
    };

    let mut assignment = Assignment::new(n);
    for i in 0..n {
        // Relaxation values are integral at optimality; argmax guards
        // against backend round-off.
        let mut best = (0, f64::MIN);
        for j in 0..n {
            let v = solved.value(sup(i, j));
            if v > best.1 {
                best = (j, v);
            }
        }
        assignment.assign(i, best.0);
    }

    // The backend's expression value carries floating round-off; the
    // reported objective is recomputed from the extracted assignment so it
    // matches an independent recomputation bit for bit. The backend value
    // stays as a cross-check in the log.
    let backend_objective = solved.eval(&objective);
    let evaluator = AssignmentEvaluator::new(model);
    let placement = match capacities {
        Some(caps) => {
            let built: Vec<f64> = caps.iter().map(|&c| solved.value(c)).collect();
            let objective_value = evaluator
                .total_cost(&assignment, &built)
                .ok_or(SolveError::Configuration(ConfigurationError::MissingTable(
                    "cost",
                )))?;
            Placement::with_capacities(objective_value, assignment, built)
        }
        None => {
            let objective_value = evaluator.max_delivery_distance(&assignment);
            Placement::new(objective_value, assignment)
        }
    };
    debug!(
        backend = backend_objective,
        reported = placement.objective(),
        "objective recomputed from assignment"
    );
    Ok(SolveOutcome::Optimal(placement))
}

fn build_objective(
    instance: &Instance,
    sup: &impl Fn(usize, usize) -> Variable,
    max_distance: Option<Variable>,
    capacities: Option<&[Variable]>,
) -> Result<Expression, SolveError> {
    let model = instance.model();
    let n = model.len();
    match instance.requirements().objective {
        Objective::MaxDeliveryDistance => {
            // Presence is guaranteed by the caller.
            Ok(max_distance.map(Expression::from).unwrap_or_default())
        }
        Objective::TotalCost => {
            let fixed = table(model.fixed_cost(), "cost")?;
            let scaling = table(model.scaling_cost(), "cost")?;
            let demand = table(model.demand(), "demand")?;
            let caps = capacities.unwrap_or_default();
            let mut cost = Expression::default();
            for j in 0..n {
                cost += fixed[j] * sup(j, j);
                if let Some(&c) = caps.get(j) {
                    cost += scaling[j] * c;
                }
            }
            for i in 0..n {
                for j in 0..n {
                    cost += model.distance(i, j) * demand[i] * sup(i, j);
                }
            }
            Ok(cost)
        }
    }
}

fn sum(terms: impl Iterator<Item = Expression>) -> Expression {
    terms.fold(Expression::default(), |acc, t| acc + t)
}

fn table<'a>(values: Option<&'a [f64]>, name: &'static str) -> Result<&'a [f64], SolveError> {
    values.ok_or(SolveError::Configuration(ConfigurationError::MissingTable(
        name,
    )))
}
