//! Group × Group placement cost.
//!
//! Summed over floors: groups sharing an area are cheap neighbours, groups
//! present in different areas are expensive, and a group missing from a
//! floor costs a fixed penalty in between.

use crate::config::CostWeights;
use crate::occupancy::OccupancyMatrix;

/// Dense symmetric cost matrix with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    n: usize,
    costs: Vec<u64>,
}

impl CostMatrix {
    pub fn from_occupancy(matrix: &OccupancyMatrix, weights: &CostWeights) -> Self {
        let n = matrix.groups();
        let mut costs = vec![0; n * n];
        for g1 in 0..n {
            for g2 in (g1 + 1)..n {
                let cost: u64 = (0..matrix.floors())
                    .map(|floor| {
                        match (matrix.area_at(g1, floor), matrix.area_at(g2, floor)) {
                            (Some(a), Some(b)) if a == b => weights.shared_area,
                            (Some(_), Some(_)) => weights.conflicting_area,
                            _ => weights.absent,
                        }
                    })
                    .sum();
                costs[g1 * n + g2] = cost;
                costs[g2 * n + g1] = cost;
            }
        }
        Self { n, costs }
    }

    /// Build directly from a square table. Used for tests and for callers
    /// with their own cost model.
    pub fn from_fn(n: usize, mut cost: impl FnMut(usize, usize) -> u64) -> Self {
        let mut costs = vec![0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let c = cost(i, j);
                costs[i * n + j] = c;
                costs[j * n + i] = c;
            }
        }
        Self { n, costs }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.costs[i * self.n + j]
    }

    /// Sum of edge costs along a walk (pass a closed tour to include the
    /// closing edge).
    pub fn walk_cost(&self, walk: &[usize]) -> u64 {
        walk.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }

    /// Cost of visiting `order` and returning to its first element.
    pub fn cycle_cost(&self, order: &[usize]) -> u64 {
        match (order.first(), order.last()) {
            (Some(&first), Some(&last)) => self.walk_cost(order) + self.get(last, first),
            _ => 0,
        }
    }
}
