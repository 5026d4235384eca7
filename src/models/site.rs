//! The immutable site model: names, distances, costs, demand, and supply.

use std::collections::HashMap;

use crate::distance::DistanceMatrix;
use crate::error::ConfigurationError;

/// The validated, immutable data model every formulation is built from.
///
/// Site names are mapped to dense indices once, at build time; all tables
/// are then flat vectors indexed by site. The distance table is mandatory
/// and defines the site universe. Demand, supply, and cost tables are
/// optional at build time — a variant that needs a missing table fails at
/// formulation time with a [`ConfigurationError`].
///
/// # Examples
///
/// ```
/// use warehouse_siting::distance::DistanceMatrix;
/// use warehouse_siting::models::Model;
///
/// let mut dm = DistanceMatrix::new(2);
/// dm.set_symmetric(0, 1, 7.0);
/// let model = Model::builder(vec!["Jaipur".into(), "Kota".into()], dm)
///     .demand(vec![5.0, 5.0])
///     .supply(vec![4.0, 10.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(model.len(), 2);
/// assert_eq!(model.index_of("Kota"), Some(1));
/// assert_eq!(model.distance(0, 1), 7.0);
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    names: Vec<String>,
    index: HashMap<String, usize>,
    distances: DistanceMatrix,
    demand: Option<Vec<f64>>,
    supply: Option<Vec<f64>>,
    fixed_cost: Option<Vec<f64>>,
    scaling_cost: Option<Vec<f64>>,
}

impl Model {
    /// Starts building a model from the site universe and its distances.
    pub fn builder(names: Vec<String>, distances: DistanceMatrix) -> ModelBuilder {
        ModelBuilder {
            names,
            distances,
            demand: None,
            supply: None,
            fixed_cost: None,
            scaling_cost: None,
        }
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the model has no sites.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Site names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the site at `index`.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Dense index of a site name, if the site exists.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Distance between two sites.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Per-site demand, if a demand table was provided.
    pub fn demand(&self) -> Option<&[f64]> {
        self.demand.as_deref()
    }

    /// Per-site supply capacity, if a supply table was provided.
    pub fn supply(&self) -> Option<&[f64]> {
        self.supply.as_deref()
    }

    /// Per-site fixed construction cost, if a cost table was provided.
    pub fn fixed_cost(&self) -> Option<&[f64]> {
        self.fixed_cost.as_deref()
    }

    /// Per-site cost per unit of built capacity, if a cost table was provided.
    pub fn scaling_cost(&self) -> Option<&[f64]> {
        self.scaling_cost.as_deref()
    }
}

/// Builder for [`Model`] that validates all tables against the site universe.
#[derive(Debug)]
pub struct ModelBuilder {
    names: Vec<String>,
    distances: DistanceMatrix,
    demand: Option<Vec<f64>>,
    supply: Option<Vec<f64>>,
    fixed_cost: Option<Vec<f64>>,
    scaling_cost: Option<Vec<f64>>,
}

impl ModelBuilder {
    /// Attaches per-site demand, in site index order.
    pub fn demand(mut self, demand: Vec<f64>) -> Self {
        self.demand = Some(demand);
        self
    }

    /// Attaches per-site supply capacity, in site index order.
    pub fn supply(mut self, supply: Vec<f64>) -> Self {
        self.supply = Some(supply);
        self
    }

    /// Attaches per-site fixed and scaling construction costs.
    pub fn costs(mut self, fixed: Vec<f64>, scaling: Vec<f64>) -> Self {
        self.fixed_cost = Some(fixed);
        self.scaling_cost = Some(scaling);
        self
    }

    /// Validates all tables and produces the immutable model.
    ///
    /// Fails if the model is empty, the distance matrix doesn't match the
    /// name list or is invalid, or any attached table has the wrong length
    /// or a negative/non-finite value.
    pub fn build(self) -> Result<Model, ConfigurationError> {
        let n = self.names.len();
        if n == 0 {
            return Err(ConfigurationError::EmptyModel);
        }
        if self.distances.size() != n || !self.distances.is_valid() {
            return Err(ConfigurationError::InvalidDistances);
        }
        if !self.distances.is_symmetric(1e-9) {
            return Err(ConfigurationError::InvalidDistances);
        }

        let check = |table: &'static str,
                     values: &Option<Vec<f64>>|
         -> Result<(), ConfigurationError> {
            if let Some(values) = values {
                if values.len() != n {
                    // The length mismatch means some site lacks an entry.
                    let site = self.names.get(values.len().min(n - 1)).cloned();
                    return Err(ConfigurationError::MissingSite {
                        table,
                        site: site.unwrap_or_default(),
                    });
                }
                for (i, &v) in values.iter().enumerate() {
                    if !v.is_finite() || v < 0.0 {
                        return Err(ConfigurationError::InvalidTableValue {
                            table,
                            site: self.names[i].clone(),
                            value: v,
                        });
                    }
                }
            }
            Ok(())
        };
        check("demand", &self.demand)?;
        check("supply", &self.supply)?;
        check("fixed cost", &self.fixed_cost)?;
        check("scaling cost", &self.scaling_cost)?;

        let mut index = HashMap::with_capacity(n);
        for (i, name) in self.names.iter().enumerate() {
            index.insert(name.clone(), i);
        }

        Ok(Model {
            names: self.names,
            index,
            distances: self.distances,
            demand: self.demand,
            supply: self.supply,
            fixed_cost: self.fixed_cost,
            scaling_cost: self.scaling_cost,
        })
    }
}
