#![warn(missing_docs)]

//! # `shapelock`
//!
//! Answer checking for shape-unlock puzzles: a setter registers an illustration together with a small square grid of shapes, and a player unlocks the setter's text by recreating that grid.
//! Build a [`Grid`] (by hand, with [`Grid::from_json`] from an uploaded reference file, or cell by cell through a [`Session`](session::Session)),
//! then compare it against a reference with a [`Matcher`](matching::Matcher) such as [`Policy`](matching::Policy).
//!
//! `shapelock` is generic over the set of states a cell can take, as encoded by the `C` type parameter.
//! Cell sets must implement [`CellState`](cell::CellState) and will automatically have [`Cycle`](cell::Cycle) `impl`'d as well.
//! [`BasicCell`](cell::BasicCell) has empty, square and an orientation-less triangle; [`OrientedCell`](cell::OrientedCell) gives triangles one of four corners.
//!
//! # Matching
//! Two rules are provided and neither is a special case of the other:
//!
//! 1. [`Strict`](matching::Strict): both grids are reduced to a [`Signature`](normalize::Signature), the set of filled `(row, col, state)` triples
//!    shifted so the smallest filled row and the smallest filled column are 0. The answer is correct if its signature equals the signature of the reference
//!    under any of the four reflections in [`Axis`](symmetry::Axis); reflecting also mirrors triangle orientations.
//!    The same drawing placed anywhere on the grid, or mirrored, is accepted.
//! 2. [`Tolerant`](matching::Tolerant): the answer is correct if it has as many squares and as many triangles as the reference.
//!    Positions and orientations are ignored.
//!
//! Checking with no reference loaded yields [`Verdict::NotLoaded`](matching::Verdict::NotLoaded), which is not a mismatch.
//!
//! Everything above is pure and synchronous over caller-owned grids.
//! The [`problem`] and [`session`] modules hold the problem list and the editor state around it, and the `wasm` feature exposes them to a browser page.

pub use grid::Grid;
pub use location::{Coord, Dimension, Location};

pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub(crate) mod location;
pub mod matching;
pub mod normalize;
pub mod problem;
pub mod session;
pub mod storage;
pub mod symmetry;
#[cfg(feature = "wasm")]
pub mod wasm;
mod tests;
