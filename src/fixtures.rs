//! Randomized model generation.
//!
//! Builds valid models with random distances and site tables for tests and
//! benchmarks. The RNG is injected, so a seeded generator reproduces the
//! same model every time.

use rand::Rng;

use crate::distance::DistanceMatrix;
use crate::models::Model;

/// Generates a random fully-populated model with `size` sites.
///
/// Distances are symmetric in `10..500` km, demand in `1..20`, supply in
/// `5..60`, fixed costs in `1..10`, and scaling costs in `0.1..2.0`. All
/// four tables are attached, so the model suits every variant.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use warehouse_siting::fixtures::random_model;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let model = random_model(&mut rng, 10);
/// assert_eq!(model.len(), 10);
/// assert!(model.distances().is_symmetric(1e-9));
/// ```
pub fn random_model<R: Rng>(rng: &mut R, size: usize) -> Model {
    let names = (0..size).map(|i| format!("city-{i}")).collect();

    let mut distances = DistanceMatrix::new(size);
    for i in 0..size {
        for j in (i + 1)..size {
            distances.set_symmetric(i, j, rng.random_range(10.0..500.0));
        }
    }

    let demand = (0..size).map(|_| rng.random_range(1.0..20.0)).collect();
    let supply = (0..size).map(|_| rng.random_range(5.0..60.0)).collect();
    let fixed = (0..size).map(|_| rng.random_range(1.0..10.0)).collect();
    let scaling = (0..size).map(|_| rng.random_range(0.1..2.0)).collect();

    Model::builder(names, distances)
        .demand(demand)
        .supply(supply)
        .costs(fixed, scaling)
        .build()
        .expect("generated tables are valid by construction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_model_is_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let model = random_model(&mut rng, 8);
        assert_eq!(model.len(), 8);
        assert!(model.distances().is_valid());
        assert!(model.distances().is_symmetric(1e-9));
        assert!(model.demand().is_some());
        assert!(model.supply().is_some());
        assert!(model.fixed_cost().is_some());
        assert!(model.scaling_cost().is_some());
    }

    #[test]
    fn test_same_seed_same_model() {
        let a = random_model(&mut ChaCha8Rng::seed_from_u64(42), 6);
        let b = random_model(&mut ChaCha8Rng::seed_from_u64(42), 6);
        assert_eq!(a.names(), b.names());
        assert_eq!(a.demand(), b.demand());
        assert_eq!(a.distance(0, 5), b.distance(0, 5));
    }
}
