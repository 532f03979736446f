use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::cell::CellState;
use crate::grid::Grid;
use crate::location::Location;

/// A translation-invariant encoding of the non-empty cells of a grid.
///
/// Two grids holding the same pattern at different offsets have equal signatures.
/// Every empty grid has the same, distinguished, empty signature.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Signature<C: CellState> {
    // anchored at (0, 0), sorted by row, column, then state name
    cells: Vec<(Location, C)>,
}

impl<C: CellState> Signature<C> {
    /// The signature of a grid with no filled cells.
    pub fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The anchored cells, in canonical order.
    pub fn cells(&self) -> &[(Location, C)] {
        &self.cells
    }
}

impl<C: CellState> Display for Signature<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.cells.is_empty() {
            return write!(f, "∅");
        }

        write!(f, "{}", self.cells.iter()
            .map(|(Location(row, col), state)| format!("{row},{col},{}", state.name()))
            .join(";"))
    }
}

/// Compute the [`Signature`] of `grid`.
///
/// The minimum row and minimum column are taken independently over all filled cells, so the bounding box of the pattern lands at `(0, 0)`.
pub fn normalize<C: CellState>(grid: &Grid<C>) -> Signature<C> {
    let filled = grid.filled().collect_vec();

    let (Some(min_row), Some(min_col)) = (
        filled.iter().map(|(Location(row, _), _)| *row).min(),
        filled.iter().map(|(Location(_, col), _)| *col).min(),
    ) else {
        return Signature::empty();
    };

    let cells = filled.into_iter()
        .map(|(Location(row, col), state)| (Location(row - min_row, col - min_col), state))
        .sorted_by(|(a, a_state), (b, b_state)| a.cmp(b).then_with(|| a_state.name().cmp(b_state.name())))
        .collect_vec();

    Signature { cells }
}
