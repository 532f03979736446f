use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use strum::{EnumString, IntoStaticStr, VariantArray};

use crate::symmetry::Axis;

/// The orientation-independent category of a cell state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ShapeClass {
    #[default]
    Empty,
    Square,
    Triangle,
}

/// Functionality that must be implemented on a case-by-case basis for any set of cell states.
///
/// [`BasicCell`] and [`OrientedCell`] are built-in implementations.
/// The declaration order of [`VariantArray::VARIANTS`] is the order the editor cycles through, and its first entry must be the empty state.
pub trait CellState: Sized + Copy + Default + VariantArray + Eq + Hash + Debug + 'static {
    /// The shape class of this state; all orientations of a triangle share [`ShapeClass::Triangle`].
    fn shape_class(&self) -> ShapeClass;
    /// The name this state is written as in reference grid files and stored problems.
    fn name(&self) -> &'static str;
    /// The image of this state when its grid is reflected along `axis`.
    ///
    /// Implementations should be an exhaustive lookup; orientations are discrete and have no meaningful arithmetic.
    fn reflect(&self, axis: Axis) -> Self;
    /// A single character used when rendering grids as text.
    fn glyph(&self) -> char;

    /// Parse a state from its [`name`](CellState::name).
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().find(|state| state.name() == name).copied()
    }

    /// Parse a state from its [`glyph`](CellState::glyph).
    fn from_glyph(glyph: char) -> Option<Self> {
        Self::VARIANTS.iter().find(|state| state.glyph() == glyph).copied()
    }
}

/// Functionality on top of [`CellState`] with identical implementation across all cell sets.
pub trait Cycle: CellState {
    /// The successor of this state in declaration order, wrapping from the last state back to the first.
    fn next(&self) -> Self;
    /// Whether this state is the empty state.
    fn is_empty(&self) -> bool;
}

impl<C> Cycle for C
where
    C: CellState,
{
    fn next(&self) -> Self {
        let position = Self::VARIANTS.iter().position(|state| state == self).unwrap_or(0);
        Self::VARIANTS[(position + 1) % Self::VARIANTS.len()]
    }

    fn is_empty(&self) -> bool {
        self.shape_class() == ShapeClass::Empty
    }
}

/// The three-state set: triangles carry no orientation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum BasicCell {
    #[default]
    Empty,
    Square,
    Triangle,
}

impl CellState for BasicCell {
    fn shape_class(&self) -> ShapeClass {
        match self {
            Self::Empty => ShapeClass::Empty,
            Self::Square => ShapeClass::Square,
            Self::Triangle => ShapeClass::Triangle,
        }
    }

    fn name(&self) -> &'static str {
        self.into()
    }

    // nothing in this set has a handedness
    fn reflect(&self, _axis: Axis) -> Self {
        *self
    }

    fn glyph(&self) -> char {
        match self {
            Self::Empty => '.',
            Self::Square => '#',
            Self::Triangle => '^',
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }
}

/// The compass corner a triangle's right angle points to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Corner {
    Ne,
    Nw,
    Se,
    Sw,
}

impl Corner {
    /// Mirror this corner along `axis`.
    pub fn reflect(&self, axis: Axis) -> Self {
        match (axis, self) {
            (Axis::Identity, corner) => *corner,

            (Axis::Horizontal, Self::Ne) => Self::Nw,
            (Axis::Horizontal, Self::Nw) => Self::Ne,
            (Axis::Horizontal, Self::Se) => Self::Sw,
            (Axis::Horizontal, Self::Sw) => Self::Se,

            (Axis::Vertical, Self::Ne) => Self::Se,
            (Axis::Vertical, Self::Nw) => Self::Sw,
            (Axis::Vertical, Self::Se) => Self::Ne,
            (Axis::Vertical, Self::Sw) => Self::Nw,

            (Axis::Both, Self::Ne) => Self::Sw,
            (Axis::Both, Self::Nw) => Self::Se,
            (Axis::Both, Self::Se) => Self::Nw,
            (Axis::Both, Self::Sw) => Self::Ne,
        }
    }
}

/// The six-state set: triangles carry one of four orientations.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum OrientedCell {
    #[default]
    Empty,
    Square,
    Triangle(Corner),
}

// strum cannot derive this for a variant carrying data
impl VariantArray for OrientedCell {
    const VARIANTS: &'static [Self] = &[
        Self::Empty,
        Self::Square,
        Self::Triangle(Corner::Ne),
        Self::Triangle(Corner::Nw),
        Self::Triangle(Corner::Se),
        Self::Triangle(Corner::Sw),
    ];
}

impl CellState for OrientedCell {
    fn shape_class(&self) -> ShapeClass {
        match self {
            Self::Empty => ShapeClass::Empty,
            Self::Square => ShapeClass::Square,
            Self::Triangle(_) => ShapeClass::Triangle,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Square => "square",
            Self::Triangle(Corner::Ne) => "triangle-ne",
            Self::Triangle(Corner::Nw) => "triangle-nw",
            Self::Triangle(Corner::Se) => "triangle-se",
            Self::Triangle(Corner::Sw) => "triangle-sw",
        }
    }

    fn reflect(&self, axis: Axis) -> Self {
        match self {
            Self::Triangle(corner) => Self::Triangle(corner.reflect(axis)),
            other => *other,
        }
    }

    fn glyph(&self) -> char {
        match self {
            Self::Empty => '.',
            Self::Square => '#',
            Self::Triangle(Corner::Ne) => '◥',
            Self::Triangle(Corner::Nw) => '◤',
            Self::Triangle(Corner::Se) => '◢',
            Self::Triangle(Corner::Sw) => '◣',
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "empty" => Some(Self::Empty),
            "square" => Some(Self::Square),
            _ => name.strip_prefix("triangle-")
                .and_then(|corner| Corner::from_str(corner).ok())
                .map(Self::Triangle),
        }
    }
}
