//! Reservation-driven grid layout.
//!
//! Clients reserve (Floor, Group, Area) cells through [`GridLayout::update_reservation`].
//! The grid itself is derived state: rows come from per-floor interval
//! partitioning of areas (see [`crate::packing`]), columns from the sorted set
//! of distinct groups. It is recomputed lazily, at most once per change, from
//! [`GridLayout::measure`].
//!
//! ```
//! use floorgrid_logic::fga::{Fga, Size};
//! use floorgrid_logic::grid::GridLayout;
//! use floorgrid_logic::reservation::ClientHandle;
//!
//! let mut layout = GridLayout::default();
//! let panel = ClientHandle::new();
//! layout.update_reservation(&panel, vec![Fga::new(0, 0, 0), Fga::new(0, 1, 0)]);
//! let size = layout.measure(Size::new(10.0, 10.0));
//! assert_eq!(size, Size::new(20.0, 10.0));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::LayoutConfig;
use crate::fga::{Fga, Rect, Size};
use crate::packing::{area_spans, partition_rows};
use crate::reservation::{ClientHandle, ClientId, ReservationStore};

/// Row and column assignment computed from one snapshot of reservations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutGrid {
    /// (floor, area) → global row
    rows: HashMap<(i32, i32), usize>,
    /// group → column
    columns: BTreeMap<i32, usize>,
    /// floor → number of rows it occupies
    floor_rows: BTreeMap<i32, usize>,
    row_count: usize,
}

impl LayoutGrid {
    /// Compute rows and columns for a set of triples. Unplaced triples are
    /// skipped.
    pub fn compute<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = Fga>,
    {
        let mut by_floor: BTreeMap<i32, Vec<(i32, i32)>> = BTreeMap::new();
        let mut groups: BTreeSet<i32> = BTreeSet::new();
        for t in triples.into_iter().filter(Fga::is_placed) {
            by_floor.entry(t.floor).or_default().push((t.group, t.area));
            groups.insert(t.group);
        }

        let mut grid = LayoutGrid::default();

        // Floors never share rows: each one starts after the previous floor's.
        let mut global_row = 0;
        for (floor, pairs) in by_floor {
            let spans = area_spans(pairs);
            let floor_rows = partition_rows(&spans);
            for (area, row) in floor_rows.rows {
                grid.rows.insert((floor, area), global_row + row);
            }
            grid.floor_rows.insert(floor, floor_rows.row_count);
            global_row += floor_rows.row_count;
        }
        grid.row_count = global_row;

        grid.columns = groups
            .into_iter()
            .enumerate()
            .map(|(column, group)| (group, column))
            .collect();

        grid
    }

    pub fn row_of(&self, floor: i32, area: i32) -> Option<usize> {
        self.rows.get(&(floor, area)).copied()
    }

    pub fn column_of(&self, group: i32) -> Option<usize> {
        self.columns.get(&group).copied()
    }

    /// Rows used by `floor`; 0 for floors with no placed triple.
    pub fn rows_on_floor(&self, floor: i32) -> usize {
        self.floor_rows.get(&floor).copied().unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Groups in column order.
    pub fn groups(&self) -> impl Iterator<Item = i32> + '_ {
        self.columns.keys().copied()
    }

    /// Extent of the whole grid for a given cell size.
    pub fn total_size(&self, cell: Size) -> Size {
        Size::new(
            self.column_count() as f64 * cell.width,
            self.row_count as f64 * cell.height,
        )
    }

    /// Rectangle of a cell, or `None` if the triple is unplaced or was never
    /// reserved. Row 0 is drawn at the bottom.
    pub fn cell_rect(&self, fga: Fga, cell: Size) -> Option<Rect> {
        if !fga.is_placed() {
            return None;
        }
        let row = self.row_of(fga.floor, fga.area)?;
        let column = self.column_of(fga.group)?;
        let inverted = self.row_count - 1 - row;
        Some(Rect::new(
            column as f64 * cell.width,
            inverted as f64 * cell.height,
            cell.width,
            cell.height,
        ))
    }
}

/// Grid layout engine: reservation store plus the memoized grid.
pub struct GridLayout {
    store: ReservationStore,
    grid: LayoutGrid,
    valid: bool,
    cell_size: Size,
}

impl GridLayout {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            store: ReservationStore::new(),
            grid: LayoutGrid::default(),
            valid: false,
            cell_size: config.cell_size(),
        }
    }

    /// Replace the cells reserved by `client`. Only marks the grid dirty;
    /// the next [`measure`](Self::measure) recomputes.
    pub fn update_reservation<I>(&mut self, client: &ClientHandle, triples: I)
    where
        I: IntoIterator<Item = Fga>,
    {
        self.store.update(client, triples);
        self.valid = false;
    }

    /// Drop a client's reservation without waiting for it to be released.
    pub fn remove_client(&mut self, client: ClientId) {
        if self.store.remove(client) {
            self.valid = false;
        }
    }

    /// Total size of the grid, recomputing it first if anything changed.
    pub fn measure(&mut self, cell_size: Size) -> Size {
        if self.store.has_dead() {
            self.store.sweep();
            self.valid = false;
        }
        self.cell_size = cell_size;
        if !self.valid {
            self.recompute();
        }
        self.grid.total_size(cell_size)
    }

    fn recompute(&mut self) {
        self.grid = LayoutGrid::compute(self.store.placed());
        self.valid = true;
        log::debug!(
            "Grid recomputed: {} clients, {} rows, {} columns",
            self.store.live_clients(),
            self.grid.row_count(),
            self.grid.column_count()
        );
    }

    /// Rectangle for a triple, using the cell size of the last measurement.
    ///
    /// Unplaced or unknown triples get a cell-sized rectangle at the origin.
    pub fn cell_rect(&self, floor: i32, group: i32, area: i32) -> Rect {
        self.grid
            .cell_rect(Fga::new(floor, group, area), self.cell_size)
            .unwrap_or_else(|| Rect::at_origin(self.cell_size))
    }

    /// Rectangles for every placed triple of one live client.
    pub fn arrange(&self, client: ClientId) -> Vec<(Fga, Rect)> {
        self.store
            .triples_of(client)
            .unwrap_or(&[])
            .iter()
            .filter(|t| t.is_placed())
            .map(|&t| (t, self.cell_rect(t.floor, t.group, t.area)))
            .collect()
    }

    /// True between a recompute and the next change.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn grid(&self) -> &LayoutGrid {
        &self.grid
    }

    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    pub fn cell_size(&self) -> Size {
        self.cell_size
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}
