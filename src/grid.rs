use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::ops::Index;
use std::str::FromStr;

use itertools::Itertools;
use ndarray::{Array2, AssignElem};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::cell::{CellState, Cycle};
use crate::error::GridError;
use crate::location::{Dimension, Location};

/// A square grid of cell states drawn from the set `C`.
///
/// Grids are plain values: the editor owns one, the matching engine borrows two and returns a verdict.
/// A grid with every cell empty is the canonical "unset" grid.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Grid<C: CellState> {
    side: Dimension,
    // row major
    cells: Array2<C>,
}

impl<C: CellState> Grid<C> {
    /// An all-empty grid of side `side`.
    pub fn empty(side: Dimension) -> Self {
        Self {
            side,
            cells: Array2::from_shape_simple_fn((side.get(), side.get()), C::default),
        }
    }

    pub(crate) fn from_fn(side: Dimension, mut f: impl FnMut(Location) -> C) -> Self {
        Self {
            side,
            cells: Array2::from_shape_fn((side.get(), side.get()), |index| f(Location::from(index))),
        }
    }

    /// Build a grid from `(location, state)` pairs on an otherwise empty grid.
    ///
    /// Fails with [`GridError::OutOfBounds`] on the first location outside the grid.
    pub fn with_cells(side: Dimension, cells: impl IntoIterator<Item=(Location, C)>) -> Result<Self, GridError> {
        let mut grid = Self::empty(side);
        for (location, state) in cells {
            grid.set(location, state)?;
        }

        Ok(grid)
    }

    pub fn side(&self) -> Dimension {
        self.side
    }

    pub fn get(&self, location: Location) -> Option<C> {
        self.cells.get(location.as_index()).copied()
    }

    /// Overwrite the state at `location`.
    pub fn set(&mut self, location: Location, state: C) -> Result<(), GridError> {
        match self.cells.get_mut(location.as_index()) {
            Some(cell) => {
                cell.assign_elem(state);
                Ok(())
            }
            None => Err(GridError::OutOfBounds(location)),
        }
    }

    /// Advance the state at `location` to its [`next`](Cycle::next) state, returning the new state.
    pub fn cycle(&mut self, location: Location) -> Result<C, GridError> {
        let next = self.get(location).ok_or(GridError::OutOfBounds(location))?.next();
        self.set(location, next)?;
        Ok(next)
    }

    /// Return every cell to the empty state.
    pub fn clear(&mut self) {
        self.cells.fill(C::default());
    }

    /// Whether every cell is empty.
    pub fn is_unset(&self) -> bool {
        self.cells.iter().all(Cycle::is_empty)
    }

    /// All non-empty cells in row-major order.
    pub fn filled(&self) -> impl Iterator<Item=(Location, C)> + '_ {
        self.cells.indexed_iter()
            .filter(|(_, state)| !state.is_empty())
            .map(|(index, state)| (Location::from(index), *state))
    }

    /// The grid as rows of state names, the shape it takes in reference grid files.
    pub fn to_rows(&self) -> Vec<Vec<&'static str>> {
        self.cells.rows().into_iter()
            .map(|row| row.iter().map(CellState::name).collect_vec())
            .collect_vec()
    }

    /// Parse an untrusted structured value as a grid of side `side`.
    ///
    /// Accepts only a list of exactly `side` lists, each of exactly `side` strings, each the name of a state in `C`.
    pub fn from_value(value: &Value, side: Dimension) -> Result<Self, GridError> {
        let rows = value.as_array().ok_or(GridError::NotRows)?;
        if rows.len() != side.get() {
            return Err(GridError::RowCount { expected: side.get(), found: rows.len() });
        }

        let mut grid = Self::empty(side);
        for (row, entries) in rows.iter().enumerate() {
            let entries = entries.as_array().ok_or(GridError::RowNotList { row })?;
            if entries.len() != side.get() {
                return Err(GridError::RowLength { row, expected: side.get(), found: entries.len() });
            }

            for (col, entry) in entries.iter().enumerate() {
                let name = entry.as_str().ok_or(GridError::NotAString { row, col })?;
                let state = C::from_name(name)
                    .ok_or_else(|| GridError::UnknownState { row, col, value: name.to_owned() })?;
                grid.cells[(row, col)] = state;
            }
        }

        Ok(grid)
    }

    /// Parse a reference grid document of side `side`.
    pub fn from_json(json: &str, side: Dimension) -> Result<Self, GridError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value, side)
    }
}

/// Whether `candidate` is a well-formed grid of side `side` over the states of `C`.
///
/// Any shape mismatch or unknown state rejects the whole structure.
pub fn validate<C: CellState>(candidate: &Value, side: Dimension) -> bool {
    Grid::<C>::from_value(candidate, side).is_ok()
}

impl<C: CellState> Index<Location> for Grid<C> {
    type Output = C;

    fn index(&self, location: Location) -> &Self::Output {
        &self.cells[location.as_index()]
    }
}

impl<C: CellState> Display for Grid<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.cells.nrows() * (self.cells.ncols() + 1));

        for row in self.cells.rows() {
            for state in row {
                out.push(state.glyph());
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}

/// Parses the text rendering produced by [`Display`]; the side is the number of lines.
impl<C: CellState> FromStr for Grid<C> {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s.lines().map(str::trim).filter(|line| !line.is_empty()).collect_vec();
        let side = NonZero::new(lines.len()).ok_or(GridError::NotRows)?;

        let mut grid = Self::empty(side);
        for (row, line) in lines.into_iter().enumerate() {
            let glyphs = line.chars().collect_vec();
            if glyphs.len() != side.get() {
                return Err(GridError::RowLength { row, expected: side.get(), found: glyphs.len() });
            }

            for (col, glyph) in glyphs.into_iter().enumerate() {
                grid.cells[(row, col)] = C::from_glyph(glyph).ok_or(GridError::UnknownGlyph { row, col, glyph })?;
            }
        }

        Ok(grid)
    }
}

impl<C: CellState> Serialize for Grid<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

/// Deserializes a square grid of any side; callers holding a configured side compare against [`Grid::side`].
impl<'de, C: CellState> Deserialize<'de> for Grid<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let side = value.as_array()
            .map(Vec::len)
            .and_then(NonZero::new)
            .ok_or_else(|| D::Error::custom(GridError::NotRows))?;

        Self::from_value(&value, side).map_err(D::Error::custom)
    }
}
