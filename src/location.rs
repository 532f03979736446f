use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;

pub type Coord = usize;
/// Side length of a square grid.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(row, col)` on a grid. The top left corner is `Location(0, 0)`.
///
/// The derived ordering is row-major, which is the ordering signatures are sorted by.
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.0, self.1)
    }

    /// Shift this location by `(rows, cols)`.
    ///
    /// Returns [`None`] if the result would leave a grid of side `side`.
    pub fn offset_by(self, rhs: (isize, isize), side: Dimension) -> Option<Self> {
        let row = self.0.checked_add_signed(rhs.0)?;
        let col = self.1.checked_add_signed(rhs.1)?;
        (row < side.get() && col < side.get()).then_some(Self(row, col))
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
