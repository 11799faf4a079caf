//! Dense Group × Floor occupancy table fed to the ordering solver.
//!
//! Each cell stores `area + 1`, with 0 meaning the group has no area on that
//! floor. Area ids start at 0, hence the shift.
//!
//! On the wire the matrix is a list of rows, one per group, and goes through
//! the same shape check as [`OccupancyMatrix::from_rows`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SolveError;
use crate::fga::Fga;

/// Largest group id (exclusive) accepted by [`OccupancyMatrix::from_triples`].
/// Group ids are matrix indices and the cost matrix is quadratic in them.
pub const MAX_GROUPS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct OccupancyMatrix {
    groups: usize,
    floors: usize,
    /// Row-major by group: `cells[group * floors + floor]`.
    cells: Vec<u32>,
}

impl OccupancyMatrix {
    /// An all-empty matrix.
    pub fn new(groups: usize, floors: usize) -> Self {
        Self {
            groups,
            floors,
            cells: vec![0; groups * floors],
        }
    }

    /// Build from shifted rows, one per group.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, SolveError> {
        let groups = rows.len();
        let floors = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(groups * floors);
        for (group, row) in rows.into_iter().enumerate() {
            if row.len() != floors {
                return Err(SolveError::RaggedMatrix {
                    group,
                    expected: floors,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            groups,
            floors,
            cells,
        })
    }

    /// Build from FGA triples. Group values are used as row indices, so the
    /// resulting order can be fed back with [`crate::ordering::GroupOrder::remap`];
    /// floors only matter as columns and are compacted in ascending order.
    ///
    /// Unplaced triples are skipped; a later triple for the same
    /// (group, floor) overwrites an earlier one. Groups at or above
    /// [`MAX_GROUPS`] are rejected.
    pub fn from_triples<I>(triples: I) -> Result<Self, SolveError>
    where
        I: IntoIterator<Item = Fga>,
    {
        let placed: Vec<Fga> = triples.into_iter().filter(Fga::is_placed).collect();
        if let Some(t) = placed.iter().find(|t| t.group as usize >= MAX_GROUPS) {
            return Err(SolveError::GroupOutOfRange {
                group: t.group,
                limit: MAX_GROUPS,
            });
        }

        let mut floor_index: BTreeMap<i32, usize> =
            placed.iter().map(|t| (t.floor, 0)).collect();
        for (column, index) in floor_index.values_mut().enumerate() {
            *index = column;
        }

        let groups = placed.iter().map(|t| t.group as usize + 1).max().unwrap_or(0);
        let mut matrix = Self::new(groups, floor_index.len());
        for t in placed {
            matrix.set_area(t.group as usize, floor_index[&t.floor], Some(t.area));
        }
        Ok(matrix)
    }

    pub fn groups(&self) -> usize {
        self.groups
    }

    pub fn floors(&self) -> usize {
        self.floors
    }

    /// Raw shifted value (0 = empty).
    pub fn raw(&self, group: usize, floor: usize) -> u32 {
        self.cells[group * self.floors + floor]
    }

    /// Area occupied by `group` on `floor`, if any.
    pub fn area_at(&self, group: usize, floor: usize) -> Option<u32> {
        self.raw(group, floor).checked_sub(1)
    }

    /// Set or clear the area of `group` on `floor`. A negative area clears
    /// the cell, matching the unplaced convention of [`Fga`].
    pub fn set_area(&mut self, group: usize, floor: usize, area: Option<i32>) {
        self.cells[group * self.floors + floor] = match area {
            Some(a) if a >= 0 => a as u32 + 1,
            _ => 0,
        };
    }

    /// Shifted rows, one per group.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        if self.floors == 0 {
            return vec![Vec::new(); self.groups];
        }
        self.cells.chunks(self.floors).map(<[u32]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<u32>>> for OccupancyMatrix {
    type Error = SolveError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<OccupancyMatrix> for Vec<Vec<u32>> {
    fn from(matrix: OccupancyMatrix) -> Self {
        matrix.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let m = OccupancyMatrix::from_rows(vec![vec![1, 0], vec![1, 0], vec![0, 1]]).unwrap();
        assert_eq!(m.groups(), 3);
        assert_eq!(m.floors(), 2);
        assert_eq!(m.area_at(0, 0), Some(0));
        assert_eq!(m.area_at(0, 1), None);
        assert_eq!(m.area_at(2, 1), Some(0));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = OccupancyMatrix::from_rows(vec![vec![1, 0], vec![1]]).unwrap_err();
        assert_eq!(
            err,
            SolveError::RaggedMatrix {
                group: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_from_triples_shifts_area() {
        let m = OccupancyMatrix::from_triples(vec![
            Fga::new(0, 0, 0),
            Fga::new(1, 2, 4),
            Fga::new(-1, 5, 0),
        ])
        .unwrap();
        assert_eq!(m.groups(), 3);
        assert_eq!(m.floors(), 2);
        assert_eq!(m.raw(0, 0), 1);
        assert_eq!(m.raw(2, 1), 5);
        assert_eq!(m.raw(1, 0), 0);
    }

    #[test]
    fn test_from_triples_compacts_sparse_floors() {
        let m = OccupancyMatrix::from_triples(vec![
            Fga::new(1_000_000_000, 0, 3),
            Fga::new(7, 1, 3),
        ])
        .unwrap();
        assert_eq!(m.groups(), 2);
        assert_eq!(m.floors(), 2);
        // floor 7 sorts before floor 1_000_000_000
        assert_eq!(m.area_at(1, 0), Some(3));
        assert_eq!(m.area_at(0, 1), Some(3));
        assert_eq!(m.area_at(0, 0), None);
    }

    #[test]
    fn test_from_triples_rejects_huge_group() {
        let err = OccupancyMatrix::from_triples(vec![Fga::new(0, 1_000_000_000, 0)]).unwrap_err();
        assert_eq!(
            err,
            SolveError::GroupOutOfRange {
                group: 1_000_000_000,
                limit: MAX_GROUPS
            }
        );
        let last = MAX_GROUPS as i32 - 1;
        let m = OccupancyMatrix::from_triples(vec![Fga::new(0, last, 0)]).unwrap();
        assert_eq!(m.groups(), MAX_GROUPS);
    }

    #[test]
    fn test_set_area_extremes() {
        let mut m = OccupancyMatrix::new(1, 1);
        m.set_area(0, 0, Some(i32::MAX));
        assert_eq!(m.area_at(0, 0), Some(i32::MAX as u32));
        m.set_area(0, 0, Some(-1));
        assert_eq!(m.area_at(0, 0), None);
        m.set_area(0, 0, Some(0));
        assert_eq!(m.raw(0, 0), 1);
        m.set_area(0, 0, None);
        assert_eq!(m.raw(0, 0), 0);
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let m: OccupancyMatrix = serde_json::from_str("[[1, 0], [1, 0], [0, 1]]").unwrap();
        assert_eq!(m.groups(), 3);
        assert_eq!(m.floors(), 2);
        assert_eq!(serde_json::to_string(&m).unwrap(), "[[1,0],[1,0],[0,1]]");

        assert!(serde_json::from_str::<OccupancyMatrix>("[[1, 0], [1]]").is_err());
        assert!(serde_json::from_str::<OccupancyMatrix>(
            r#"{"groups": 3, "floors": 2, "cells": [1]}"#
        )
        .is_err());
    }

    #[test]
    fn test_to_rows_without_floors() {
        let m = OccupancyMatrix::new(2, 0);
        assert_eq!(m.to_rows(), vec![Vec::<u32>::new(), Vec::new()]);
    }

    #[test]
    fn test_empty() {
        let m = OccupancyMatrix::from_triples(Vec::new()).unwrap();
        assert_eq!(m.groups(), 0);
        assert_eq!(m, OccupancyMatrix::from_rows(Vec::new()).unwrap());
    }
}
