use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};
use tracing::debug;

use crate::cell::{CellState, ShapeClass};
use crate::grid::Grid;
use crate::normalize::normalize;
use crate::symmetry::{variants, Axis};

/// A rule deciding whether a user's grid solves a reference grid.
pub trait Matcher {
    /// Whether `user` counts as a correct answer for `target`.
    fn matches<C: CellState>(&self, user: &Grid<C>, target: &Grid<C>) -> bool;
}

/// The geometric rule: the user's pattern must equal the reference pattern up to translation and one of the four [`Axis`] reflections.
///
/// Shape, position relative to the other shapes, and (after reflection) orientation must all agree.
#[derive(Copy, Clone, Debug, Default)]
pub struct Strict;

impl Strict {
    /// The first axis under which `user` matches `target`, if any.
    pub fn matching_axis<C: CellState>(user: &Grid<C>, target: &Grid<C>) -> Option<Axis> {
        let wanted = normalize(user);

        variants(target)
            .find(|(_, reflected)| normalize(reflected) == wanted)
            .map(|(axis, _)| axis)
    }
}

impl Matcher for Strict {
    fn matches<C: CellState>(&self, user: &Grid<C>, target: &Grid<C>) -> bool {
        let axis = Self::matching_axis(user, target);
        debug!(?axis, "strict comparison");
        axis.is_some()
    }
}

/// The count-based rule: the user must place as many squares and as many triangles as the reference, anywhere and in any orientation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Tolerant;

impl Tolerant {
    /// The number of square-class and triangle-class cells in `grid`, in that order.
    pub fn class_counts<C: CellState>(grid: &Grid<C>) -> (usize, usize) {
        let counts = grid.filled()
            .map(|(_, state)| state.shape_class())
            .counts();

        (
            counts.get(&ShapeClass::Square).copied().unwrap_or(0),
            counts.get(&ShapeClass::Triangle).copied().unwrap_or(0),
        )
    }
}

impl Matcher for Tolerant {
    fn matches<C: CellState>(&self, user: &Grid<C>, target: &Grid<C>) -> bool {
        let (user_counts, target_counts) = (Self::class_counts(user), Self::class_counts(target));
        debug!(?user_counts, ?target_counts, "tolerant comparison");
        user_counts == target_counts
    }
}

/// Selects one of the two matching rules at runtime.
///
/// The two rules are kept separate: [`Strict`] rejects a relocated shape that [`Tolerant`] accepts, and neither is a refinement of the other on every input.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// See [`Strict`].
    Strict,
    /// See [`Tolerant`].
    #[default]
    Tolerant,
}

impl Matcher for Policy {
    fn matches<C: CellState>(&self, user: &Grid<C>, target: &Grid<C>) -> bool {
        match self {
            Self::Strict => Strict.matches(user, target),
            Self::Tolerant => Tolerant.matches(user, target),
        }
    }
}

/// The outcome of checking an answer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, IntoStaticStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// There was nothing to compare against; this is not a mismatch.
    NotLoaded,
    Correct,
    Incorrect,
}

/// Check `user` against the loaded reference `target` with `matcher`.
pub fn check<C: CellState, M: Matcher>(user: &Grid<C>, target: Option<&Grid<C>>, matcher: &M) -> Verdict {
    let Some(target) = target else {
        return Verdict::NotLoaded;
    };

    if matcher.matches(user, target) {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}
