//! Interval partitioning of areas into rows.
//!
//! On one floor every area spans an inclusive range of groups. Two areas whose
//! ranges overlap cannot share a row. Sweeping the ranges by start and reusing
//! the lowest row that has become free yields the minimum number of rows
//! (interval graphs are perfect, so the greedy colouring hits the clique
//! number).

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

/// Inclusive group range covered by one area on a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSpan {
    pub area: i32,
    pub start: i32,
    pub end: i32,
}

impl AreaSpan {
    pub fn overlaps(&self, other: &AreaSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Row assignment for a single floor. Rows are local, starting at 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloorRows {
    /// area → local row
    pub rows: BTreeMap<i32, usize>,
    pub row_count: usize,
}

/// Collapse `(group, area)` occupancy pairs into one span per area.
///
/// The result is sorted by `(start, end, area)`.
pub fn area_spans<I>(pairs: I) -> Vec<AreaSpan>
where
    I: IntoIterator<Item = (i32, i32)>,
{
    let mut bounds: BTreeMap<i32, (i32, i32)> = BTreeMap::new();
    for (group, area) in pairs {
        bounds
            .entry(area)
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(group);
                *hi = (*hi).max(group);
            })
            .or_insert((group, group));
    }

    let mut spans: Vec<AreaSpan> = bounds
        .into_iter()
        .map(|(area, (start, end))| AreaSpan { area, start, end })
        .collect();
    spans.sort_by_key(|s| (s.start, s.end, s.area));
    spans
}

/// Assign each span a row so that overlapping spans never share one.
///
/// `spans` must be sorted by `(start, end)`, as [`area_spans`] returns them.
pub fn partition_rows(spans: &[AreaSpan]) -> FloorRows {
    let mut result = FloorRows::default();
    let mut free: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    // (end, row) of spans still occupying a row
    let mut active: Vec<(i32, usize)> = Vec::new();

    for span in spans {
        // Starts never decrease, so a span ending before this start is done.
        active.retain(|&(end, row)| {
            if end < span.start {
                free.push(Reverse(row));
                false
            } else {
                true
            }
        });

        let row = match free.pop() {
            Some(Reverse(row)) => row,
            None => {
                let row = result.row_count;
                result.row_count += 1;
                row
            }
        };
        active.push((span.end, row));
        result.rows.insert(span.area, row);
    }

    result
}
