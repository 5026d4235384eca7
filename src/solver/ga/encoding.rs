//! Siting encodings for the genetic solver.
//!
//! Two genomes cover the five variants:
//!
//! - [`FixedCountProblem`] — an array of K warehouse-site indices, for the
//!   fixed-count variants
//! - [`ActivationProblem`] — a binary site-activation vector, for the
//!   budget and variable-capacity variants
//!
//! Both derive the assignment with [`Assignment::nearest_active`], the
//! same rule the result projection uses, so the fitness a candidate was
//! ranked by and the assignment finally reported can never disagree.

use rand::Rng;

use crate::evaluation::AssignmentEvaluator;
use crate::formulation::{CapacityRule, Instance};
use crate::models::Assignment;

use super::runner::{Evaluation, GaProblem};

/// K-index genome: `genome[k]` is the site hosting the k-th warehouse.
///
/// Duplicate indices collapse to fewer distinct warehouses, matching the
/// search behavior of the index encoding this mirrors.
pub struct FixedCountProblem<'a> {
    instance: &'a Instance,
    count: usize,
}

impl<'a> FixedCountProblem<'a> {
    /// Creates the encoding for an instance with a fixed warehouse count.
    pub fn new(instance: &'a Instance, count: usize) -> Self {
        Self { instance, count }
    }

    /// Distinct active sites of a genome, ascending.
    pub fn active_sites(&self, genome: &[usize]) -> Vec<usize> {
        let mut active = genome.to_vec();
        active.sort_unstable();
        active.dedup();
        active
    }
}

impl GaProblem for FixedCountProblem<'_> {
    type Genome = Vec<usize>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let n = self.instance.model().len();
        (0..self.count).map(|_| rng.random_range(0..n)).collect()
    }

    fn evaluate(&self, genome: &Vec<usize>) -> Evaluation {
        let model = self.instance.model();
        let active = self.active_sites(genome);
        let assignment = Assignment::nearest_active(model.distances(), &active);
        let eval = AssignmentEvaluator::new(model);

        let violations = match self.instance.requirements().capacity {
            CapacityRule::Unlimited => Vec::new(),
            _ => match eval.capacity_excess(&assignment, None) {
                Some(excess) => active.iter().map(|&j| excess[j]).collect(),
                None => Vec::new(),
            },
        };

        Evaluation {
            objective: eval.max_delivery_distance(&assignment),
            violations,
        }
    }

    fn crossover<R: Rng>(
        &self,
        a: &Vec<usize>,
        b: &Vec<usize>,
        rng: &mut R,
    ) -> (Vec<usize>, Vec<usize>) {
        if self.count < 2 {
            return (a.clone(), b.clone());
        }
        let cut = rng.random_range(1..self.count);
        let c1 = a[..cut].iter().chain(&b[cut..]).copied().collect();
        let c2 = b[..cut].iter().chain(&a[cut..]).copied().collect();
        (c1, c2)
    }

    fn mutate<R: Rng>(&self, genome: &mut Vec<usize>, rng: &mut R) {
        let n = self.instance.model().len();
        let rate = 1.0 / self.count as f64;
        for gene in genome.iter_mut() {
            if rng.random::<f64>() < rate {
                *gene = rng.random_range(0..n);
            }
        }
    }

    fn genome_distance(&self, a: &Vec<usize>, b: &Vec<usize>) -> f64 {
        let sa = self.active_sites(a);
        let sb = self.active_sites(b);
        let common = sa.iter().filter(|s| sb.contains(s)).count();
        let union = sa.len() + sb.len() - common;
        if union == 0 {
            0.0
        } else {
            1.0 - common as f64 / union as f64
        }
    }
}

/// Binary genome: `genome[j]` says whether site `j` hosts a warehouse.
pub struct ActivationProblem<'a> {
    instance: &'a Instance,
}

impl<'a> ActivationProblem<'a> {
    /// Creates the encoding for a free-count instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Active sites of a genome, ascending.
    pub fn active_sites(&self, genome: &[bool]) -> Vec<usize> {
        genome
            .iter()
            .enumerate()
            .filter_map(|(j, &on)| on.then_some(j))
            .collect()
    }
}

impl GaProblem for ActivationProblem<'_> {
    type Genome = Vec<bool>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
        let n = self.instance.model().len();
        (0..n).map(|_| rng.random_bool(0.5)).collect()
    }

    fn evaluate(&self, genome: &Vec<bool>) -> Evaluation {
        let model = self.instance.model();
        let req = self.instance.requirements();
        let active = self.active_sites(genome);

        if active.is_empty() {
            // Nothing can be served; every unit of demand is a violation.
            let unserved: f64 = model.demand().map(|d| d.iter().sum()).unwrap_or(1.0);
            return Evaluation {
                objective: f64::INFINITY,
                violations: vec![unserved],
            };
        }

        let assignment = Assignment::nearest_active(model.distances(), &active);
        let eval = AssignmentEvaluator::new(model);
        let mut violations = Vec::new();

        let spend = match req.capacity {
            CapacityRule::Sized => {
                // Capacity is sized to the served load; pay for what is built.
                let loads = eval
                    .warehouse_loads(&assignment)
                    .expect("demand table validated at formulation time");
                let scaling = model
                    .scaling_cost()
                    .expect("cost table validated at formulation time");
                let sized: f64 = active.iter().map(|&j| scaling[j] * loads[j]).sum();
                eval.fixed_cost(&assignment).unwrap_or(0.0) + sized
            }
            _ => {
                if let Some(excess) = eval.capacity_excess(&assignment, None) {
                    violations.extend(excess);
                }
                eval.fixed_cost(&assignment).unwrap_or(0.0)
            }
        };
        if let Some(budget) = req.budget {
            violations.push(spend - budget.limit);
        }

        let objective = match req.capacity {
            CapacityRule::Sized => spend + eval.operating_cost(&assignment).unwrap_or(0.0),
            _ => eval.max_delivery_distance(&assignment),
        };

        Evaluation {
            objective,
            violations,
        }
    }

    fn crossover<R: Rng>(
        &self,
        a: &Vec<bool>,
        b: &Vec<bool>,
        rng: &mut R,
    ) -> (Vec<bool>, Vec<bool>) {
        let n = a.len();
        if n < 2 {
            return (a.clone(), b.clone());
        }
        // Two-point crossover: swap the middle segment.
        let mut lo = rng.random_range(0..n);
        let mut hi = rng.random_range(0..n);
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        let mut c1 = a.clone();
        let mut c2 = b.clone();
        for k in lo..=hi {
            c1[k] = b[k];
            c2[k] = a[k];
        }
        (c1, c2)
    }

    fn mutate<R: Rng>(&self, genome: &mut Vec<bool>, rng: &mut R) {
        let rate = 1.0 / genome.len().max(1) as f64;
        for gene in genome.iter_mut() {
            if rng.random::<f64>() < rate {
                *gene = !*gene;
            }
        }
    }

    fn genome_distance(&self, a: &Vec<bool>, b: &Vec<bool>) -> f64 {
        if a.is_empty() {
            return 0.0;
        }
        let differing = a.iter().zip(b).filter(|(x, y)| x != y).count();
        differing as f64 / a.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::formulation::Variant;
    use crate::models::Model;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn capacitated_model() -> Model {
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

    #[test]
    fn test_fixed_count_sample_in_bounds() {
        let model = capacitated_model();
        let instance = Instance::formulate(&model, Variant::Minimax { warehouses: 2 }).unwrap();
        let problem = FixedCountProblem::new(&instance, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let genome = problem.sample(&mut rng);
            assert_eq!(genome.len(), 2);
            assert!(genome.iter().all(|&g| g < 3));
        }
    }

    #[test]
    fn test_fixed_count_evaluate_hub() {
        let model = capacitated_model();
        let instance = Instance::formulate(&model, Variant::Minimax { warehouses: 1 }).unwrap();
        let problem = FixedCountProblem::new(&instance, 1);
        let eval = problem.evaluate(&vec![1]);
        assert_eq!(eval.objective, 2.0);
        assert_eq!(eval.total_violation(), 0.0);
    }

    #[test]
    fn test_fixed_count_capacity_violation() {
        let model = capacitated_model();
        let instance =
            Instance::formulate(&model, Variant::Capacitated { warehouses: 1 }).unwrap();
        let problem = FixedCountProblem::new(&instance, 1);
        // Site C supplies 5 against total demand 12.
        let eval = problem.evaluate(&vec![2]);
        assert_eq!(eval.violations, vec![7.0]);
        assert_eq!(eval.total_violation(), 7.0);
    }

    #[test]
    fn test_fixed_count_genome_distance() {
        let model = capacitated_model();
        let instance = Instance::formulate(&model, Variant::Minimax { warehouses: 2 }).unwrap();
        let problem = FixedCountProblem::new(&instance, 2);
        assert_eq!(problem.genome_distance(&vec![0, 1], &vec![1, 0]), 0.0);
        assert_eq!(problem.genome_distance(&vec![0, 1], &vec![0, 1]), 0.0);
        assert!(problem.genome_distance(&vec![0, 1], &vec![0, 2]) > 0.0);
    }

    #[test]
    fn test_activation_empty_genome_is_violating() {
        let model = capacitated_model();
        let instance = Instance::formulate(&model, Variant::Budgeted { budget: 20.0 }).unwrap();
        let problem = ActivationProblem::new(&instance);
        let eval = problem.evaluate(&vec![false, false, false]);
        assert!(eval.objective.is_infinite());
        assert!(eval.total_violation() > 0.0);
    }

    #[test]
    fn test_activation_budget_violation() {
        let model = capacitated_model();
        let instance = Instance::formulate(&model, Variant::Budgeted { budget: 4.0 }).unwrap();
        let problem = ActivationProblem::new(&instance);
        // A and B cost 3 + 5 = 8 against a budget of 4.
        let eval = problem.evaluate(&vec![true, true, false]);
        assert_eq!(*eval.violations.last().unwrap(), 4.0);
    }

    #[test]
    fn test_activation_feasible_candidate() {
        let model = capacitated_model();
        let instance = Instance::formulate(&model, Variant::Budgeted { budget: 10.0 }).unwrap();
        let problem = ActivationProblem::new(&instance);
        // B alone: capacity 12 covers demand 12, cost 5 within 10.
        let eval = problem.evaluate(&vec![false, true, false]);
        assert_eq!(eval.objective, 2.0);
        assert_eq!(eval.total_violation(), 0.0);
    }

    #[test]
    fn test_activation_sized_objective_is_total_cost() {
        let model = capacitated_model();
        let instance =
            Instance::formulate(&model, Variant::VariableCapacity { budget: 100.0 }).unwrap();
        let problem = ActivationProblem::new(&instance);
        // B alone: fixed 5 + scaling 1·12 + operating (1·4 + 2·6) = 33.
        let eval = problem.evaluate(&vec![false, true, false]);
        assert_eq!(eval.objective, 33.0);
        assert_eq!(eval.total_violation(), 0.0);
    }

    #[test]
    fn test_crossover_preserves_length() {
        let model = capacitated_model();
        let instance = Instance::formulate(&model, Variant::Budgeted { budget: 10.0 }).unwrap();
        let problem = ActivationProblem::new(&instance);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let a = vec![true, false, true];
        let b = vec![false, true, false];
        let (c1, c2) = problem.crossover(&a, &b, &mut rng);
        assert_eq!(c1.len(), 3);
        assert_eq!(c2.len(), 3);
        // Positions outside the swapped segment keep their parent's gene.
        for k in 0..3 {
            assert!(c1[k] == a[k] || c1[k] == b[k]);
            assert!(c2[k] == a[k] || c2[k] == b[k]);
        }
    }
}
