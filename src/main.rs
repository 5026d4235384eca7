//! Command-line entry point.
//!
//! Loads the CSV tables, formulates the chosen variant, runs a solver, and
//! prints exactly one line to stdout: the objective value, or the literal
//! `Infeasible`. Everything else (logs, summaries) goes to stderr so the
//! stdout contract stays machine-readable.
//!
//! Exit codes keep proven and soft infeasibility apart: a proven-infeasible
//! exact solve exits 0 (the solve itself succeeded), while a genetic solve
//! whose best found placement still violates constraints exits 2.

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use warehouse_siting::formulation::{Instance, Variant};
use warehouse_siting::report;
use warehouse_siting::solver::exact;
use warehouse_siting::solver::ga::{self, GaConfig, TerminationPolicy};
use warehouse_siting::tables;

const FEASIBILITY_TOL: f64 = 1e-6;

/// Exit code when the genetic solver's best found placement violates
/// constraints. Distinct from success (0) so tooling can tell a soft
/// `Infeasible` from a proven one.
const SOFT_INFEASIBLE_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "warehouse-siting", version, about = "Capacitated warehouse placement solver")]
struct Cli {
    /// Directory holding distances.csv and the optional site tables.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Solver backend.
    #[arg(long, value_enum, default_value_t = SolverKind::Exact)]
    solver: SolverKind,

    /// RNG seed for the genetic solver.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Population size for the genetic solver.
    #[arg(long, default_value_t = 100)]
    population: usize,

    /// Generation limit for the genetic solver.
    #[arg(long, default_value_t = 1000)]
    max_generations: usize,

    /// Write the genetic solver's best-objective trace to this CSV file.
    #[arg(long)]
    trace_out: Option<PathBuf>,

    /// Print a placement summary to stderr.
    #[arg(long)]
    summary: bool,

    #[command(subcommand)]
    variant: VariantArg,
}

#[derive(Copy, Clone, ValueEnum)]
enum SolverKind {
    /// Mixed-integer programming; proves optimality or infeasibility.
    Exact,
    /// Genetic search; reports the best placement found.
    Genetic,
}

#[derive(Subcommand)]
enum VariantArg {
    /// Place N warehouses minimizing the worst delivery distance.
    Minimax {
        #[arg(short = 'n', long)]
        warehouses: usize,
    },
    /// Like minimax, but each warehouse's supply limits its deliveries.
    Capacitated {
        #[arg(short = 'n', long)]
        warehouses: usize,
    },
    /// Free warehouse count under a fixed-cost budget.
    Budgeted {
        #[arg(short = 'b', long)]
        budget: f64,
    },
    /// Budgeted placement with nearest-warehouse assignment.
    Siting {
        #[arg(short = 'b', long)]
        budget: f64,
    },
    /// Budget also buys per-unit capacity; minimizes total cost.
    VariableCapacity {
        #[arg(short = 'b', long)]
        budget: f64,
    },
}

impl VariantArg {
    fn variant(&self) -> Variant {
        match *self {
            VariantArg::Minimax { warehouses } => Variant::Minimax { warehouses },
            VariantArg::Capacitated { warehouses } => Variant::Capacitated { warehouses },
            VariantArg::Budgeted { budget } => Variant::Budgeted { budget },
            VariantArg::Siting { budget } => Variant::BudgetedSiting { budget },
            VariantArg::VariableCapacity { budget } => Variant::VariableCapacity { budget },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<u8, Box<dyn Error>> {
    let model = tables::load_model(&cli.data_dir)?;
    let instance = Instance::formulate(&model, cli.variant.variant())?;

    let code = match cli.solver {
        SolverKind::Exact => {
            let outcome = exact::solve(&instance)?;
            println!("{outcome}");
            if cli.summary {
                if let Some(placement) = outcome.placement() {
                    eprint!("{}", report::summary(&model, placement));
                }
            }
            0
        }
        SolverKind::Genetic => {
            let config = GaConfig::default().with_population_size(cli.population);
            let termination =
                TerminationPolicy::default().with_max_generations(cli.max_generations);
            let result = ga::solve(&instance, &config, &termination, cli.seed);

            if let Some(path) = &cli.trace_out {
                report::write_trace(File::create(path)?, result.trace())?;
            }

            let (status, code) = genetic_status(
                result.placement().objective(),
                result.is_feasible(FEASIBILITY_TOL),
            );
            if code != 0 {
                warn!(
                    violation = result.max_violation(),
                    "best found placement violates constraints"
                );
                eprintln!(
                    "best found violates constraints by {}; not proven infeasible",
                    result.max_violation()
                );
            }
            println!("{status}");
            if cli.summary {
                eprint!("{}", report::summary(&model, result.placement()));
            }
            code
        }
    };
    Ok(code)
}

/// Stdout line and exit code for a genetic solve: the objective when the
/// best found is feasible, otherwise `Infeasible` with the soft exit code.
fn genetic_status(objective: f64, feasible: bool) -> (String, u8) {
    if feasible {
        (objective.to_string(), 0)
    } else {
        ("Infeasible".to_string(), SOFT_INFEASIBLE_EXIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genetic_status_feasible() {
        assert_eq!(genetic_status(7.0, true), ("7".to_string(), 0));
    }

    #[test]
    fn test_genetic_status_soft_infeasible() {
        let (status, code) = genetic_status(7.0, false);
        assert_eq!(status, "Infeasible");
        assert_eq!(code, SOFT_INFEASIBLE_EXIT);
    }
}
