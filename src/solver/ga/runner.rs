//! Generic elitist genetic algorithm runner.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

/// Fitness of one candidate: the raw objective plus a vector of constraint
/// excesses (positive entries are violations).
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Objective value (lower is better).
    pub objective: f64,
    /// Constraint excess per constraint; only positive entries violate.
    pub violations: Vec<f64>,
}

impl Evaluation {
    /// Sum of the positive constraint excesses; zero for a feasible
    /// candidate.
    pub fn total_violation(&self) -> f64 {
        self.violations.iter().map(|&g| g.max(0.0)).sum()
    }
}

/// A problem the genetic runner can search.
///
/// All randomness flows through the injected RNG, so a fixed seed
/// regenerates the same initial population and the same sequence of
/// parent and mutation choices.
pub trait GaProblem: Sync {
    /// Candidate encoding.
    type Genome: Clone + Send + Sync;

    /// Samples a random candidate.
    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Genome;

    /// Evaluates objective and constraint excesses.
    fn evaluate(&self, genome: &Self::Genome) -> Evaluation;

    /// Recombines two parents into two children.
    fn crossover<R: Rng>(
        &self,
        a: &Self::Genome,
        b: &Self::Genome,
        rng: &mut R,
    ) -> (Self::Genome, Self::Genome);

    /// Perturbs a candidate in place.
    fn mutate<R: Rng>(&self, genome: &mut Self::Genome, rng: &mut R);

    /// Normalized decision-variable distance between two candidates, in
    /// `[0, 1]`. Used by the stall-window termination test.
    fn genome_distance(&self, a: &Self::Genome, b: &Self::Genome) -> f64;
}

/// Population parameters.
#[derive(Debug, Clone, Copy)]
pub struct GaConfig {
    population_size: usize,
    crossover_rate: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.9,
        }
    }
}

impl GaConfig {
    /// Sets the population size (minimum 2).
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(2);
        self
    }

    /// Sets the probability of recombining a selected parent pair.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// The population size.
    pub fn population_size(&self) -> usize {
        self.population_size
    }
}

/// When to stop: a generation cap plus a trailing stall window over
/// objective, constraint violation, and decision-variable change.
#[derive(Debug, Clone, Copy)]
pub struct TerminationPolicy {
    max_generations: usize,
    period: usize,
    ftol: f64,
    cvtol: f64,
    xtol: f64,
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self {
            max_generations: 1000,
            period: 100,
            ftol: 1e-6,
            cvtol: 1e-6,
            xtol: 1e-8,
        }
    }
}

impl TerminationPolicy {
    /// Caps the number of generations.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the stall-window length in generations.
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period.max(1);
        self
    }

    /// Sets the objective-improvement tolerance.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    /// Sets the violation-improvement tolerance.
    pub fn with_cvtol(mut self, cvtol: f64) -> Self {
        self.cvtol = cvtol;
        self
    }

    /// Sets the decision-variable-change tolerance.
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    /// The generation cap.
    pub fn max_generations(&self) -> usize {
        self.max_generations
    }
}

/// Best candidate found by a run, with its evaluation and the per-
/// generation best-objective trace.
#[derive(Debug, Clone)]
pub struct GaRun<G> {
    /// Best genome found.
    pub best: G,
    /// Evaluation of the best genome.
    pub evaluation: Evaluation,
    /// Best objective after the initial sampling and after each generation.
    pub trace: Vec<f64>,
    /// Number of generations actually run.
    pub generations: usize,
}

/// Runs the elitist genetic algorithm.
///
/// Each generation: binary-tournament parent selection biased toward lower
/// violation then lower objective, crossover and mutation producing one
/// offspring per population slot, then (μ+λ) truncation of parents and
/// offspring together. Population evaluation runs in parallel but the
/// result is identical to sequential evaluation for a given seed.
pub fn run<P: GaProblem>(
    problem: &P,
    config: &GaConfig,
    termination: &TerminationPolicy,
    seed: u64,
) -> GaRun<P::Genome> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pop_size = config.population_size;

    let genomes: Vec<P::Genome> = (0..pop_size).map(|_| problem.sample(&mut rng)).collect();
    let mut population = evaluate_all(problem, genomes);
    sort_population(&mut population);

    let mut trace = vec![population[0].1.objective];
    let mut snapshots: Vec<(f64, f64, P::Genome)> = vec![best_snapshot(&population)];
    let mut generations = 0;

    for generation in 1..=termination.max_generations {
        let mut offspring = Vec::with_capacity(pop_size + 1);
        while offspring.len() < pop_size {
            let a = tournament(&population, &mut rng);
            let b = tournament(&population, &mut rng);
            let (mut c1, mut c2) = if rng.random::<f64>() < config.crossover_rate {
                problem.crossover(&population[a].0, &population[b].0, &mut rng)
            } else {
                (population[a].0.clone(), population[b].0.clone())
            };
            problem.mutate(&mut c1, &mut rng);
            problem.mutate(&mut c2, &mut rng);
            offspring.push(c1);
            offspring.push(c2);
        }
        offspring.truncate(pop_size);

        population.extend(evaluate_all(problem, offspring));
        sort_population(&mut population);
        population.truncate(pop_size);
        generations = generation;

        let best = &population[0];
        trace.push(best.1.objective);
        debug!(
            generation,
            objective = best.1.objective,
            violation = best.1.total_violation(),
            "generation complete"
        );

        snapshots.push(best_snapshot(&population));
        if stalled(problem, &snapshots, termination) {
            info!(generation, "search stalled, stopping early");
            break;
        }
    }

    let (best, evaluation) = population.swap_remove(0);
    GaRun {
        best,
        evaluation,
        trace,
        generations,
    }
}

fn evaluate_all<P: GaProblem>(
    problem: &P,
    genomes: Vec<P::Genome>,
) -> Vec<(P::Genome, Evaluation)> {
    let evaluations: Vec<Evaluation> = genomes.par_iter().map(|g| problem.evaluate(g)).collect();
    genomes.into_iter().zip(evaluations).collect()
}

/// Feasibility-first ordering: lower total violation wins, then lower
/// objective. Stable, so equally ranked candidates keep insertion order.
fn sort_population<G>(population: &mut [(G, Evaluation)]) {
    population.sort_by(|(_, a), (_, b)| {
        a.total_violation()
            .total_cmp(&b.total_violation())
            .then(a.objective.total_cmp(&b.objective))
    });
}

fn tournament<G, R: Rng>(population: &[(G, Evaluation)], rng: &mut R) -> usize {
    let a = rng.random_range(0..population.len());
    let b = rng.random_range(0..population.len());
    // The population is sorted, so the smaller index is the better one.
    a.min(b)
}

fn best_snapshot<G: Clone>(population: &[(G, Evaluation)]) -> (f64, f64, G) {
    let (genome, evaluation) = &population[0];
    (
        evaluation.objective,
        evaluation.total_violation(),
        genome.clone(),
    )
}

fn stalled<P: GaProblem>(
    problem: &P,
    snapshots: &[(f64, f64, P::Genome)],
    termination: &TerminationPolicy,
) -> bool {
    if snapshots.len() <= termination.period {
        return false;
    }
    let prev = &snapshots[snapshots.len() - 1 - termination.period];
    let cur = &snapshots[snapshots.len() - 1];
    if !prev.0.is_finite() || !cur.0.is_finite() {
        return false;
    }
    let f_delta = prev.0 - cur.0;
    let cv_delta = prev.1 - cur.1;
    let x_delta = problem.genome_distance(&prev.2, &cur.2);
    f_delta.abs() <= termination.ftol
        && cv_delta.abs() <= termination.cvtol
        && x_delta <= termination.xtol
}
