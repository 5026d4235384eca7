//! CSV table loading.
//!
//! A model is described by up to four CSV tables in one directory:
//!
//! - `distances.csv` — `start_city,end_city,distance_km`, one row per
//!   undirected pair. Required.
//! - `supply.csv` — `city,supply`. Optional.
//! - `demand.csv` — `city,mean_demand`. Optional.
//! - `cost.csv` — `city,fixed_cost,scaling_cost`. Optional.
//!
//! Site indices follow first appearance in the distance table, so the same
//! input always produces the same ordering. Per-site tables are keyed by
//! city name and must cover every site the distance table mentions.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::distance::DistanceMatrix;
use crate::error::{ConfigurationError, LoadError};
use crate::models::Model;

#[derive(Debug, Deserialize)]
struct DistanceRecord {
    start_city: String,
    end_city: String,
    distance_km: f64,
}

#[derive(Debug, Deserialize)]
struct SupplyRecord {
    city: String,
    supply: f64,
}

#[derive(Debug, Deserialize)]
struct DemandRecord {
    city: String,
    mean_demand: f64,
}

#[derive(Debug, Deserialize)]
struct CostRecord {
    city: String,
    fixed_cost: f64,
    scaling_cost: f64,
}

/// Reads the pairwise distance table.
///
/// Returns the site names in first-appearance order and the symmetric
/// distance matrix. Each row fills both directions; the diagonal is zero.
pub fn read_distances<R: io::Read>(reader: R) -> Result<(Vec<String>, DistanceMatrix), LoadError> {
    let mut records = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut rdr = csv::Reader::from_reader(reader);
    for row in rdr.deserialize() {
        let record: DistanceRecord = row?;
        for city in [&record.start_city, &record.end_city] {
            if !index.contains_key(city) {
                index.insert(city.clone(), names.len());
                names.push(city.clone());
            }
        }
        records.push(record);
    }

    let mut distances = DistanceMatrix::new(names.len());
    for record in &records {
        let i = index[&record.start_city];
        let j = index[&record.end_city];
        distances.set_symmetric(i, j, record.distance_km);
    }

    Ok((names, distances))
}

/// Reads the per-site supply table into a name-keyed map.
pub fn read_supply<R: io::Read>(reader: R) -> Result<HashMap<String, f64>, LoadError> {
    let mut values = HashMap::new();
    let mut rdr = csv::Reader::from_reader(reader);
    for row in rdr.deserialize() {
        let record: SupplyRecord = row?;
        values.insert(record.city, record.supply);
    }
    Ok(values)
}

/// Reads the per-site mean-demand table into a name-keyed map.
pub fn read_demand<R: io::Read>(reader: R) -> Result<HashMap<String, f64>, LoadError> {
    let mut values = HashMap::new();
    let mut rdr = csv::Reader::from_reader(reader);
    for row in rdr.deserialize() {
        let record: DemandRecord = row?;
        values.insert(record.city, record.mean_demand);
    }
    Ok(values)
}

/// Reads the per-site cost table into fixed-cost and scaling-cost maps.
pub fn read_costs<R: io::Read>(
    reader: R,
) -> Result<(HashMap<String, f64>, HashMap<String, f64>), LoadError> {
    let mut fixed = HashMap::new();
    let mut scaling = HashMap::new();
    let mut rdr = csv::Reader::from_reader(reader);
    for row in rdr.deserialize() {
        let record: CostRecord = row?;
        fixed.insert(record.city.clone(), record.fixed_cost);
        scaling.insert(record.city, record.scaling_cost);
    }
    Ok((fixed, scaling))
}

/// Aligns a name-keyed table to the distance table's site ordering.
///
/// Every site must have an entry, and every entry must name a known site.
pub fn align(
    values: &HashMap<String, f64>,
    names: &[String],
    table: &'static str,
) -> Result<Vec<f64>, ConfigurationError> {
    for city in values.keys() {
        if !names.iter().any(|n| n == city) {
            return Err(ConfigurationError::UnknownSite {
                table,
                site: city.clone(),
            });
        }
    }
    names
        .iter()
        .map(|name| {
            values
                .get(name)
                .copied()
                .ok_or_else(|| ConfigurationError::MissingSite {
                    table,
                    site: name.clone(),
                })
        })
        .collect()
}

/// Loads a model from a directory of CSV tables.
///
/// `distances.csv` is required; `supply.csv`, `demand.csv`, and `cost.csv`
/// are attached when present. Which ones a variant actually needs is
/// checked at formulation time.
pub fn load_model(dir: impl AsRef<Path>) -> Result<Model, LoadError> {
    let dir = dir.as_ref();

    let (names, distances) = read_distances(File::open(dir.join("distances.csv"))?)?;
    let mut builder = Model::builder(names.clone(), distances);

    let supply_path = dir.join("supply.csv");
    if supply_path.exists() {
        let values = read_supply(File::open(supply_path)?)?;
        builder = builder.supply(align(&values, &names, "supply")?);
    }

    let demand_path = dir.join("demand.csv");
    if demand_path.exists() {
        let values = read_demand(File::open(demand_path)?)?;
        builder = builder.demand(align(&values, &names, "demand")?);
    }

    let cost_path = dir.join("cost.csv");
    if cost_path.exists() {
        let (fixed, scaling) = read_costs(File::open(cost_path)?)?;
        builder = builder.costs(
            align(&fixed, &names, "cost")?,
            align(&scaling, &names, "cost")?,
        );
    }

    let model = builder.build()?;
    info!(
        sites = model.len(),
        demand = model.demand().is_some(),
        supply = model.supply().is_some(),
        costs = model.fixed_cost().is_some(),
        "loaded model from {}",
        dir.display()
    );
    Ok(model)
}
