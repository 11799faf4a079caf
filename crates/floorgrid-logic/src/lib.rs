//! Pure facility grid logic for floorgrid.
//!
//! This crate holds the two algorithmic pieces of the indoor-map editor: the
//! reservation-driven grid layout and the group-ordering solver. Functions
//! take plain data and return results, so the presentation and persistence
//! layers stay outside and everything here is unit-testable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`christofides`] | MST, odd-vertex matching, Eulerian circuit, shortcut tour |
//! | [`config`] | Cell size and cost weights, with validation |
//! | [`cost`] | Group × Group cost matrix derived from occupancy |
//! | [`error`] | Solver errors |
//! | [`fga`] | (Floor, Group, Area) triples, sizes and rectangles |
//! | [`grid`] | Lazily recomputed row/column layout and cell rectangles |
//! | [`occupancy`] | Shifted Group × Floor occupancy table |
//! | [`ordering`] | Group permutation solver and remapping |
//! | [`packing`] | Interval partitioning of areas into rows |
//! | [`reservation`] | Per-client reservations with non-owning client handles |

pub mod christofides;
pub mod config;
pub mod cost;
pub mod error;
pub mod fga;
pub mod grid;
pub mod occupancy;
pub mod ordering;
pub mod packing;
pub mod reservation;
