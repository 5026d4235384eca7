//! Error taxonomy.
//!
//! Malformed input is a [`ConfigurationError`] and is detected at model or
//! formulation build time, before any solver runs. A proven-infeasible
//! instance is *not* an error: the exact solver reports it as
//! [`SolveOutcome::Infeasible`](crate::models::SolveOutcome). Backend
//! breakdowns are a [`SolveError`].

use thiserror::Error;

/// Malformed or inconsistent input tables or variant parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A cost, demand, or supply table references a site the distance
    /// table does not know.
    #[error("site `{site}` in the {table} table is missing from the distance table")]
    UnknownSite {
        /// Table the stray site came from.
        table: &'static str,
        /// Site name.
        site: String,
    },

    /// A site from the distance table is absent from another table.
    #[error("the {table} table has no entry for site `{site}`")]
    MissingSite {
        /// Table with the gap.
        table: &'static str,
        /// Site name.
        site: String,
    },

    /// The chosen variant needs a table that was never loaded.
    #[error("the {0} table is required by this variant but was not provided")]
    MissingTable(&'static str),

    /// A distance entry is negative, non-finite, or the diagonal is nonzero.
    #[error("invalid distance table: entries must be finite, nonnegative, symmetric, and zero on the diagonal")]
    InvalidDistances,

    /// A per-site table value is negative or non-finite.
    #[error("{table} value {value} for site `{site}` must be finite and nonnegative")]
    InvalidTableValue {
        /// Offending table.
        table: &'static str,
        /// Site name.
        site: String,
        /// Offending value.
        value: f64,
    },

    /// The requested warehouse count is zero.
    #[error("at least one warehouse is required")]
    NoWarehouses,

    /// The budget parameter is NaN or infinite.
    #[error("budget {0} must be a finite number")]
    InvalidBudget(f64),

    /// The model has no sites at all.
    #[error("the model has no sites")]
    EmptyModel,
}

/// A failure raised while solving an instance.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The instance was malformed in a way only visible at solve time.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The MILP backend failed (unbounded relaxation, numerical breakdown).
    #[error("solver backend failure: {0}")]
    Backend(String),
}

/// A failure while loading CSV tables.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be parsed.
    #[error("malformed table row: {0}")]
    Csv(#[from] csv::Error),

    /// The parsed tables were inconsistent.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
