//! Problem variants and their lowering into one parameterized formulation.
//!
//! The five variants differ only in which constraints and which objective
//! are active, so they share a single capability set ([`Requirements`])
//! instead of five near-duplicate formulations. Solver adapters read the
//! requirements, never the variant, except where an encoding choice
//! depends on it.

use crate::error::ConfigurationError;
use crate::models::Model;

/// A warehouse siting problem variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    /// Minimize the worst delivery distance, placing a fixed number of
    /// warehouses.
    Minimax {
        /// Number of warehouses to place.
        warehouses: usize,
    },
    /// [`Variant::Minimax`] plus per-warehouse supply limits against the
    /// demand of the cities each warehouse serves.
    Capacitated {
        /// Number of warehouses to place.
        warehouses: usize,
    },
    /// Supply-limited siting under a fixed-cost budget; the warehouse
    /// count is free.
    Budgeted {
        /// Upper bound on total fixed construction cost.
        budget: f64,
    },
    /// [`Variant::Budgeted`] with the assignment derived as
    /// nearest-active-warehouse instead of decided freely (the
    /// site-activation encoding used by the genetic solver).
    BudgetedSiting {
        /// Upper bound on total fixed construction cost.
        budget: f64,
    },
    /// Minimize total network cost with warehouse capacity as a continuous
    /// sizing decision, under a budget on construction cost.
    VariableCapacity {
        /// Upper bound on fixed plus capacity-scaling construction cost.
        budget: f64,
    },
}

/// What the objective measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Worst city→warehouse delivery distance.
    MaxDeliveryDistance,
    /// Construction cost plus demand-weighted operating cost.
    TotalCost,
}

/// How warehouse capacity is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityRule {
    /// No capacity constraint.
    Unlimited,
    /// Served demand is capped by the hosting site's supply.
    FixedSupply,
    /// Served demand is capped by a sized, paid-for capacity variable.
    Sized,
}

/// Budget cap over construction cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    /// The spending limit.
    pub limit: f64,
    /// Whether the capacity-scaling cost term counts against the limit.
    pub include_scaling: bool,
}

/// The capability set a variant lowers to: which objective, and which
/// constraint families are active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Requirements {
    /// Objective selector.
    pub objective: Objective,
    /// Exact number of warehouses, if the variant fixes it.
    pub warehouse_count: Option<usize>,
    /// Capacity constraint family.
    pub capacity: CapacityRule,
    /// Budget constraint, if any.
    pub budget: Option<Budget>,
    /// `true` when the assignment is derived nearest-active rather than
    /// being a free decision matrix.
    pub derived_assignment: bool,
}

impl Variant {
    /// Lowers the variant to its capability set.
    pub fn requirements(&self) -> Requirements {
        match *self {
            Variant::Minimax { warehouses } => Requirements {
                objective: Objective::MaxDeliveryDistance,
                warehouse_count: Some(warehouses),
                capacity: CapacityRule::Unlimited,
                budget: None,
                derived_assignment: false,
            },
            Variant::Capacitated { warehouses } => Requirements {
                objective: Objective::MaxDeliveryDistance,
                warehouse_count: Some(warehouses),
                capacity: CapacityRule::FixedSupply,
                budget: None,
                derived_assignment: false,
            },
            Variant::Budgeted { budget } => Requirements {
                objective: Objective::MaxDeliveryDistance,
                warehouse_count: None,
                capacity: CapacityRule::FixedSupply,
                budget: Some(Budget {
                    limit: budget,
                    include_scaling: false,
                }),
                derived_assignment: false,
            },
            Variant::BudgetedSiting { budget } => Requirements {
                objective: Objective::MaxDeliveryDistance,
                warehouse_count: None,
                capacity: CapacityRule::FixedSupply,
                budget: Some(Budget {
                    limit: budget,
                    include_scaling: false,
                }),
                derived_assignment: true,
            },
            Variant::VariableCapacity { budget } => Requirements {
                objective: Objective::TotalCost,
                warehouse_count: None,
                capacity: CapacityRule::Sized,
                budget: Some(Budget {
                    limit: budget,
                    include_scaling: true,
                }),
                derived_assignment: false,
            },
        }
    }
}

/// A solvable optimization instance: one variant applied to one model.
///
/// The instance owns its copy of the model; nothing shared or mutable
/// crosses solver invocations.
///
/// # Examples
///
/// ```
/// use warehouse_siting::distance::DistanceMatrix;
/// use warehouse_siting::formulation::{Instance, Variant};
/// use warehouse_siting::models::Model;
///
/// let mut dm = DistanceMatrix::new(2);
/// dm.set_symmetric(0, 1, 4.0);
/// let model = Model::builder(vec!["A".into(), "B".into()], dm)
///     .build()
///     .unwrap();
///
/// let instance = Instance::formulate(&model, Variant::Minimax { warehouses: 1 }).unwrap();
/// assert_eq!(instance.requirements().warehouse_count, Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    model: Model,
    variant: Variant,
    requirements: Requirements,
}

impl Instance {
    /// Builds an instance, validating variant parameters and table
    /// availability.
    ///
    /// Infeasible but well-formed parameters (a warehouse count above the
    /// site count, a budget below the cheapest site) are *not* rejected
    /// here: infeasibility detection belongs to the solver. Only a zero
    /// warehouse count, a non-finite budget, or a missing table fail fast.
    pub fn formulate(model: &Model, variant: Variant) -> Result<Self, ConfigurationError> {
        let requirements = variant.requirements();

        if requirements.warehouse_count == Some(0) {
            return Err(ConfigurationError::NoWarehouses);
        }
        if let Some(budget) = requirements.budget {
            if !budget.limit.is_finite() {
                return Err(ConfigurationError::InvalidBudget(budget.limit));
            }
        }

        match requirements.capacity {
            CapacityRule::Unlimited => {}
            CapacityRule::FixedSupply => {
                if model.demand().is_none() {
                    return Err(ConfigurationError::MissingTable("demand"));
                }
                if model.supply().is_none() {
                    return Err(ConfigurationError::MissingTable("supply"));
                }
            }
            CapacityRule::Sized => {
                if model.demand().is_none() {
                    return Err(ConfigurationError::MissingTable("demand"));
                }
            }
        }
        if requirements.budget.is_some() && model.fixed_cost().is_none() {
            return Err(ConfigurationError::MissingTable("cost"));
        }
        if requirements.objective == Objective::TotalCost && model.demand().is_none() {
            return Err(ConfigurationError::MissingTable("demand"));
        }

        Ok(Self {
            model: model.clone(),
            variant,
            requirements,
        })
    }

    /// The model this instance was formulated over.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The variant selector.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The lowered capability set.
    pub fn requirements(&self) -> Requirements {
        self.requirements
    }
}
