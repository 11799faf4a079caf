//! Group reordering: place related groups next to each other.
//!
//! Groups are vertices, the occupancy-derived [`CostMatrix`] gives edge
//! weights, and a Christofides tour visits every group once. The closed tour
//! is then opened at its most expensive edge, so the worst transition lands
//! on the wrap-around seam instead of inside the ordering.
//!
//! ```
//! use floorgrid_logic::occupancy::OccupancyMatrix;
//! use floorgrid_logic::ordering::solve;
//!
//! let matrix = OccupancyMatrix::from_rows(vec![vec![1, 0], vec![1, 0], vec![0, 1]]).unwrap();
//! let order = solve(&matrix).unwrap();
//! let gap = order.position_of(0).unwrap().abs_diff(order.position_of(1).unwrap());
//! assert_eq!(gap, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::christofides::christofides_tour;
use crate::config::CostWeights;
use crate::cost::CostMatrix;
use crate::error::SolveError;
use crate::fga::Fga;
use crate::occupancy::OccupancyMatrix;

/// A permutation of group indices: `as_slice()[position] == group`.
/// Serialized as a plain list and checked on the way back in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct GroupOrder {
    order: Vec<usize>,
}

impl GroupOrder {
    /// Wrap a permutation. Returns `None` if it is not one.
    pub fn from_permutation(order: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; order.len()];
        for &g in &order {
            if g >= order.len() || std::mem::replace(&mut seen[g], true) {
                return None;
            }
        }
        Some(Self { order })
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// New position of `group`.
    pub fn position_of(&self, group: usize) -> Option<usize> {
        self.order.iter().position(|&g| g == group)
    }

    /// Renumber a triple's group to its position in the order. Unplaced
    /// triples and groups outside the order pass through unchanged.
    pub fn remap(&self, fga: Fga) -> Fga {
        if !fga.is_placed() {
            return fga;
        }
        match self.position_of(fga.group as usize) {
            Some(p) => fga.with_group(p as i32),
            None => fga,
        }
    }

    pub fn remap_all<I>(&self, triples: I) -> Vec<Fga>
    where
        I: IntoIterator<Item = Fga>,
    {
        // old group → new group, built once instead of searching per triple
        let mut new_index = vec![0usize; self.order.len()];
        for (position, &group) in self.order.iter().enumerate() {
            new_index[group] = position;
        }
        triples
            .into_iter()
            .map(|t| {
                if t.is_placed() && (t.group as usize) < new_index.len() {
                    t.with_group(new_index[t.group as usize] as i32)
                } else {
                    t
                }
            })
            .collect()
    }
}

impl TryFrom<Vec<usize>> for GroupOrder {
    type Error = SolveError;

    fn try_from(order: Vec<usize>) -> Result<Self, Self::Error> {
        GroupOrder::from_permutation(order.clone())
            .ok_or(SolveError::NotAPermutation { order })
    }
}

impl From<GroupOrder> for Vec<usize> {
    fn from(order: GroupOrder) -> Self {
        order.order
    }
}

/// Everything a solve produced, for callers that want diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub order: GroupOrder,
    /// Closed Christofides tour before rotation.
    pub tour: Vec<usize>,
    /// Cost of the closed tour (rotation does not change it).
    pub tour_cost: u64,
    /// Cost of the edge placed on the seam.
    pub seam_cost: u64,
}

/// Order groups with the default cost weights.
pub fn solve(matrix: &OccupancyMatrix) -> Result<GroupOrder, SolveError> {
    solve_with(matrix, &CostWeights::default()).map(|report| report.order)
}

/// Order groups with custom cost weights and return the full report.
pub fn solve_with(
    matrix: &OccupancyMatrix,
    weights: &CostWeights,
) -> Result<SolveReport, SolveError> {
    let costs = CostMatrix::from_occupancy(matrix, weights);
    let tour = christofides_tour(&costs)?;
    let (order, seam_cost) = rotate_after_costliest_edge(&tour, &costs);
    let tour_cost = costs.walk_cost(&tour);

    log::info!(
        "Ordered {} groups over {} floors: tour cost {}, seam cost {}",
        matrix.groups(),
        matrix.floors(),
        tour_cost,
        seam_cost
    );

    Ok(SolveReport {
        order: GroupOrder { order },
        tour,
        tour_cost,
        seam_cost,
    })
}

/// Open a closed tour right after its most expensive edge.
///
/// Returns the `n` groups starting at the head of that edge, plus its cost.
/// The first costliest edge in tour order wins a tie.
pub fn rotate_after_costliest_edge(tour: &[usize], costs: &CostMatrix) -> (Vec<usize>, u64) {
    let cycle = match tour.split_last() {
        Some((_, cycle)) if !cycle.is_empty() => cycle,
        _ => return (Vec::new(), 0),
    };
    let n = cycle.len();

    let mut worst = 0;
    let mut worst_cost = costs.get(cycle[0], cycle[1 % n]);
    for k in 1..n {
        let c = costs.get(cycle[k], cycle[(k + 1) % n]);
        if c > worst_cost {
            worst = k;
            worst_cost = c;
        }
    }

    let rotated = (0..n).map(|j| cycle[(worst + 1 + j) % n]).collect();
    (rotated, worst_cost)
}
