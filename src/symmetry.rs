use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr, VariantArray};

use crate::cell::CellState;
use crate::grid::Grid;
use crate::location::{Dimension, Location};

/// A reflection applied to a grid before comparison.
///
/// A drawing mirrored left/right or top/bottom is treated as the same drawing, since which way the setter faced the reference is arbitrary.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, VariantArray, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// The grid unchanged.
    Identity,
    /// Mirror left/right: column `c` maps to `N - 1 - c`.
    Horizontal,
    /// Mirror top/bottom: row `r` maps to `N - 1 - r`.
    Vertical,
    /// Both mirrors at once, i.e. a half turn.
    Both,
}

impl Axis {
    /// The location `location` is carried to on a grid of side `side`.
    ///
    /// Every axis is an involution, so this is also the location carried to `location`.
    pub fn map(&self, location: Location, side: Dimension) -> Location {
        let last = side.get() - 1;
        let Location(row, col) = location;

        match self {
            Self::Identity => location,
            Self::Horizontal => Location(row, last - col),
            Self::Vertical => Location(last - row, col),
            Self::Both => Location(last - row, last - col),
        }
    }
}

/// Reflect `grid` along `axis`, moving every cell and mirroring its orientation.
pub fn reflect<C: CellState>(grid: &Grid<C>, axis: Axis) -> Grid<C> {
    if axis == Axis::Identity {
        return grid.clone();
    }

    let side = grid.side();
    Grid::from_fn(side, |location| grid[axis.map(location, side)].reflect(axis))
}

/// `grid` under each of the four axes, in [`Axis::VARIANTS`] order.
pub fn variants<C: CellState>(grid: &Grid<C>) -> impl Iterator<Item=(Axis, Grid<C>)> + '_ {
    Axis::VARIANTS.iter().map(move |axis| (*axis, reflect(grid, *axis)))
}
