use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cell::CellState;
use crate::error::StoreError;
use crate::grid::Grid;
use crate::location::Dimension;
use crate::storage::Storage;

/// A registered puzzle: an illustration, the reference grid that solves it, and the text revealed on solving it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Problem<C: CellState> {
    /// Raw vector image markup; opaque to this crate.
    pub image: String,
    pub grid: Grid<C>,
    pub unlock_text: String,
    /// ISO-8601 timestamp of registration.
    pub created_at: String,
}

/// Parse a problem list, requiring every grid to have side `side`.
fn parse_list<C: CellState>(json: &str, side: Dimension) -> Result<Vec<Problem<C>>, StoreError> {
    let problems: Vec<Problem<C>> = serde_json::from_str(json).map_err(|err| StoreError::Corrupt(err.to_string()))?;

    match problems.iter().find(|problem| problem.grid.side() != side) {
        Some(problem) => Err(StoreError::GridSize { expected: side.get(), found: problem.grid.side().get() }),
        None => Ok(problems),
    }
}

/// The read-only problem list shipped alongside the app.
#[derive(Clone, Debug)]
pub struct Bundle<C: CellState> {
    pub(crate) problems: Vec<Problem<C>>,
    pub(crate) notice: Option<String>,
}

impl<C: CellState> Default for Bundle<C> {
    fn default() -> Self {
        Self { problems: Vec::new(), notice: None }
    }
}

impl<C: CellState> Bundle<C> {
    /// Build a bundle from the result of fetching it.
    ///
    /// A failed fetch or an unreadable document yields an empty bundle carrying a notice for the user; it is never fatal.
    pub fn from_fetch<E: Display>(fetched: Result<String, E>, side: Dimension) -> Self {
        let parsed = fetched
            .map_err(|err| StoreError::Backend(err.to_string()))
            .and_then(|json| parse_list(&json, side));

        match parsed {
            Ok(problems) => Self { problems, notice: None },
            Err(err) => {
                warn!(%err, "bundled problems unavailable");
                Self { problems: Vec::new(), notice: Some("Bundled problems could not be loaded.".to_owned()) }
            }
        }
    }

    pub fn problems(&self) -> &[Problem<C>] {
        &self.problems
    }

    /// A message for the user if the bundle could not be loaded.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

/// The problem list: bundled problems first, then problems registered on this device, each in their own order.
///
/// Only the registered part is persisted, as one JSON document under a single key of `S`.
pub struct ProblemStore<C: CellState, S: Storage> {
    storage: S,
    key: String,
    side: Dimension,
    bundled: Vec<Problem<C>>,
    stored: Vec<Problem<C>>,
    notice: Option<String>,
}

impl<C: CellState, S: Storage> ProblemStore<C, S> {
    /// Open the list persisted under `key` in `storage`.
    ///
    /// A missing document is an empty list. An unreadable one is logged, left in place, and treated as empty with a notice for the user.
    pub fn open(storage: S, key: impl Into<String>, side: Dimension) -> Self {
        let key = key.into();
        let (stored, notice) = match storage.get(&key).and_then(|raw| match raw {
            None => Ok(Vec::new()),
            Some(json) => parse_list(&json, side),
        }) {
            Ok(stored) => (stored, None),
            Err(err) => {
                warn!(%err, key = %key, "discarding unreadable problem list");
                (Vec::new(), Some("Saved problems could not be read.".to_owned()))
            }
        };

        Self {
            storage,
            key,
            side,
            bundled: Vec::new(),
            stored,
            notice,
        }
    }

    /// Replace the bundled problems, ahead of the stored ones.
    pub fn set_bundle(&mut self, bundle: Bundle<C>) {
        self.bundled = bundle.problems;
        if bundle.notice.is_some() {
            self.notice = bundle.notice;
        }
    }

    /// Take the pending notice for the user, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn len(&self) -> usize {
        self.bundled.len() + self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bundled_len(&self) -> usize {
        self.bundled.len()
    }

    pub fn get(&self, index: usize) -> Option<&Problem<C>> {
        self.iter().nth(index)
    }

    pub fn iter(&self) -> impl Iterator<Item=&Problem<C>> {
        self.bundled.iter().chain(self.stored.iter())
    }

    /// Position of `index` within the stored list, if it names a stored problem.
    fn stored_index(&self, index: usize) -> Result<usize, StoreError> {
        if index >= self.len() {
            return Err(StoreError::OutOfRange { index, len: self.len() });
        }

        index.checked_sub(self.bundled.len()).ok_or(StoreError::ReadOnly { index })
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.stored)?;
        self.storage.set(&self.key, &json)
    }

    /// Append `problem` and persist, returning its index in the full list.
    ///
    /// If persisting fails the list is left as it was.
    pub fn register(&mut self, problem: Problem<C>) -> Result<usize, StoreError> {
        if problem.grid.side() != self.side {
            return Err(StoreError::GridSize { expected: self.side.get(), found: problem.grid.side().get() });
        }

        self.stored.push(problem);
        if let Err(err) = self.persist() {
            self.stored.pop();
            return Err(err);
        }

        info!(index = self.len() - 1, "registered problem");
        Ok(self.len() - 1)
    }

    /// Swap the problem at `index` for `problem` wholesale, returning the old one.
    pub fn replace(&mut self, index: usize, problem: Problem<C>) -> Result<Problem<C>, StoreError> {
        let position = self.stored_index(index)?;
        if problem.grid.side() != self.side {
            return Err(StoreError::GridSize { expected: self.side.get(), found: problem.grid.side().get() });
        }

        let old = std::mem::replace(&mut self.stored[position], problem);
        if let Err(err) = self.persist() {
            self.stored[position] = old;
            return Err(err);
        }

        info!(index, "replaced problem");
        Ok(old)
    }

    /// Remove the problem at `index` and persist, returning it.
    pub fn delete(&mut self, index: usize) -> Result<Problem<C>, StoreError> {
        let position = self.stored_index(index)?;

        let removed = self.stored.remove(position);
        if let Err(err) = self.persist() {
            self.stored.insert(position, removed);
            return Err(err);
        }

        info!(index, "deleted problem");
        Ok(removed)
    }

    /// Give back the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }
}
