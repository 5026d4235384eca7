//! The city→warehouse assignment matrix.

use crate::distance::DistanceMatrix;

/// A dense binary supplier matrix: `supplier(i, j)` means site `i` is
/// served by a warehouse located at site `j`.
///
/// A well-formed assignment covers every site exactly once and only routes
/// to sites that host a warehouse (`supplier(i, j)` implies
/// `supplier(j, j)`). Those invariants are checkable, not assumed, because
/// metaheuristic output may violate them.
///
/// # Examples
///
/// ```
/// use warehouse_siting::models::Assignment;
///
/// let mut a = Assignment::new(3);
/// a.assign(0, 1);
/// a.assign(1, 1);
/// a.assign(2, 1);
/// assert!(a.is_covering());
/// assert!(a.is_self_consistent());
/// assert_eq!(a.warehouses(), vec![1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    data: Vec<bool>,
    size: usize,
}

impl Assignment {
    /// Creates an empty assignment over `size` sites.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![false; size * size],
            size,
        }
    }

    /// Derives the canonical assignment for a set of active warehouse
    /// sites: every site is routed to its nearest active warehouse, with
    /// distance ties broken toward the lowest site index.
    ///
    /// This is the single derivation rule shared by the genetic solver's
    /// fitness evaluation and the final result projection, so the reported
    /// objective and the reported assignment always agree.
    ///
    /// `active` must be sorted ascending; an empty set yields an empty
    /// (non-covering) assignment.
    pub fn nearest_active(distances: &DistanceMatrix, active: &[usize]) -> Self {
        let mut assignment = Self::new(distances.size());
        for i in 0..distances.size() {
            if let Some(j) = distances.nearest(i, active) {
                assignment.assign(i, j);
            }
        }
        assignment
    }

    /// Number of sites.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Routes site `site` to the warehouse at `warehouse`, replacing any
    /// previous assignment of that site.
    pub fn assign(&mut self, site: usize, warehouse: usize) {
        for j in 0..self.size {
            self.data[site * self.size + j] = j == warehouse;
        }
    }

    /// Returns `true` if site `i` is served by a warehouse at site `j`.
    pub fn supplier(&self, i: usize, j: usize) -> bool {
        self.data[i * self.size + j]
    }

    /// The warehouse serving site `i`, or `None` if `i` is unassigned.
    pub fn assigned_to(&self, i: usize) -> Option<usize> {
        (0..self.size).find(|&j| self.supplier(i, j))
    }

    /// Returns `true` if a warehouse is placed at site `j`.
    pub fn is_warehouse(&self, j: usize) -> bool {
        self.supplier(j, j)
    }

    /// Indices of all warehouse sites, ascending.
    pub fn warehouses(&self) -> Vec<usize> {
        (0..self.size).filter(|&j| self.is_warehouse(j)).collect()
    }

    /// Returns `true` if every site is assigned to exactly one warehouse.
    pub fn is_covering(&self) -> bool {
        (0..self.size).all(|i| {
            let row = &self.data[i * self.size..(i + 1) * self.size];
            row.iter().filter(|&&v| v).count() == 1
        })
    }

    /// Returns `true` if sites are only routed to active warehouses.
    pub fn is_self_consistent(&self) -> bool {
        (0..self.size).all(|i| {
            (0..self.size).all(|j| !self.supplier(i, j) || self.is_warehouse(j))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(3);
        dm.set_symmetric(0, 1, 1.0);
        dm.set_symmetric(1, 2, 2.0);
        dm.set_symmetric(0, 2, 3.0);
        dm
    }

    #[test]
    fn test_assign_replaces_previous() {
        let mut a = Assignment::new(3);
        a.assign(0, 1);
        a.assign(0, 2);
        assert!(!a.supplier(0, 1));
        assert!(a.supplier(0, 2));
        assert_eq!(a.assigned_to(0), Some(2));
    }

    #[test]
    fn test_empty_is_not_covering() {
        let a = Assignment::new(2);
        assert!(!a.is_covering());
        assert_eq!(a.assigned_to(0), None);
    }

    #[test]
    fn test_self_consistency_detects_inactive_warehouse() {
        let mut a = Assignment::new(2);
        a.assign(0, 1);
        a.assign(1, 0);
        // 0 → 1 and 1 → 0, but neither site hosts a warehouse.
        assert!(!a.is_self_consistent());
    }

    #[test]
    fn test_nearest_active_routes_to_hub() {
        let a = Assignment::nearest_active(&triangle(), &[1]);
        assert!(a.is_covering());
        assert!(a.is_self_consistent());
        assert_eq!(a.assigned_to(0), Some(1));
        assert_eq!(a.assigned_to(2), Some(1));
        assert_eq!(a.warehouses(), vec![1]);
    }

    #[test]
    fn test_nearest_active_prefers_own_site() {
        let a = Assignment::nearest_active(&triangle(), &[0, 2]);
        // Active sites serve themselves at distance zero.
        assert_eq!(a.assigned_to(0), Some(0));
        assert_eq!(a.assigned_to(2), Some(2));
        // Site 1 is at distance 1 from site 0 and 2 from site 2.
        assert_eq!(a.assigned_to(1), Some(0));
    }

    #[test]
    fn test_nearest_active_tie_breaks_low_index() {
        let mut dm = DistanceMatrix::new(3);
        dm.set_symmetric(0, 1, 4.0);
        dm.set_symmetric(0, 2, 4.0);
        dm.set_symmetric(1, 2, 8.0);
        let a = Assignment::nearest_active(&dm, &[1, 2]);
        assert_eq!(a.assigned_to(0), Some(1));
    }

    #[test]
    fn test_nearest_active_empty_set() {
        let a = Assignment::nearest_active(&triangle(), &[]);
        assert!(!a.is_covering());
    }

    proptest! {
        // Any nonempty active set yields a covering, self-consistent
        // assignment routing only to active sites.
        #[test]
        fn prop_nearest_active_invariants(
            entries in proptest::collection::vec(0.1f64..100.0, 10),
            mask in proptest::collection::vec(any::<bool>(), 5),
        ) {
            let n = 5;
            let mut dm = DistanceMatrix::new(n);
            let mut k = 0;
            for i in 0..n {
                for j in (i + 1)..n {
                    dm.set_symmetric(i, j, entries[k]);
                    k += 1;
                }
            }
            let active: Vec<usize> =
                (0..n).filter(|&i| mask[i]).collect();
            prop_assume!(!active.is_empty());

            let a = Assignment::nearest_active(&dm, &active);
            prop_assert!(a.is_covering());
            prop_assert!(a.is_self_consistent());
            for i in 0..n {
                let j = a.assigned_to(i).unwrap();
                prop_assert!(active.contains(&j));
            }
            for &j in &active {
                prop_assert_eq!(a.assigned_to(j), Some(j));
            }
        }
    }
}
