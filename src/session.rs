use serde::Serialize;
use tracing::{debug, warn};

use crate::cell::CellState;
use crate::config::Config;
use crate::error::{GridError, SessionError, StoreError};
use crate::grid::Grid;
use crate::location::Location;
use crate::matching::{check, Verdict};
use crate::problem::{Bundle, Problem, ProblemStore};
use crate::storage::Storage;

pub(crate) const MSG_RESET: &str = "Grid reset.";
pub(crate) const MSG_REFERENCE_LOADED: &str = "Reference grid loaded.";
pub(crate) const MSG_REFERENCE_INVALID: &str = "Reference grid format is invalid.";
pub(crate) const MSG_REFERENCE_UNREADABLE: &str = "Failed to read reference grid JSON.";
pub(crate) const MSG_NOT_LOADED: &str = "No reference grid is loaded.";
pub(crate) const MSG_CORRECT: &str = "Correct!";
pub(crate) const MSG_INCORRECT: &str = "Incorrect. Try again.";
pub(crate) const MSG_PROBLEM_SELECTED: &str = "Problem selected. Recreate its pattern.";
pub(crate) const MSG_REGISTERED: &str = "Problem registered.";
pub(crate) const MSG_DELETED: &str = "Problem deleted.";
pub(crate) const MSG_ADMIN_UNLOCKED: &str = "Admin mode unlocked.";
pub(crate) const MSG_ADMIN_REJECTED: &str = "Wrong password.";

/// How a status message should be presented.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Failure,
    #[default]
    Neutral,
}

/// The message shown under the grid.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Status {
    pub message: String,
    pub tone: Tone,
}

impl Status {
    fn new(message: impl Into<String>, tone: Tone) -> Self {
        Self { message: message.into(), tone }
    }
}

/// Everything the editor and player views hold between user actions.
///
/// The UI keeps one of these, calls into it on every action, and re-renders from its accessors.
/// Grids are owned here and only lent to the matching engine.
pub struct Session<C: CellState, S: Storage> {
    config: Config,
    grid: Grid<C>,
    reference: Option<Grid<C>>,
    selected: Option<usize>,
    revealed: Option<String>,
    status: Status,
    admin: bool,
    store: ProblemStore<C, S>,
}

impl<C: CellState, S: Storage> Session<C, S> {
    /// Start a session over the problem list persisted in `storage`.
    pub fn new(config: Config, storage: S) -> Self {
        let mut store = ProblemStore::open(storage, config.storage_key.clone(), config.grid_size);
        let status = match store.take_notice() {
            Some(notice) => Status::new(notice, Tone::Failure),
            None => Status::default(),
        };

        Self {
            grid: Grid::empty(config.grid_size),
            reference: None,
            selected: None,
            revealed: None,
            status,
            admin: false,
            store,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The grid the user is drawing.
    pub fn grid(&self) -> &Grid<C> {
        &self.grid
    }

    /// The grid answers are checked against, if one is loaded.
    pub fn reference(&self) -> Option<&Grid<C>> {
        self.reference.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Index of the problem being solved, if the reference came from one.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The unlock text of the selected problem, once it has been solved.
    pub fn revealed(&self) -> Option<&str> {
        self.revealed.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn problems(&self) -> &ProblemStore<C, S> {
        &self.store
    }

    /// Merge the bundled problem list in ahead of the stored problems.
    ///
    /// Indices shift, so any selection is dropped.
    pub fn load_bundle(&mut self, bundle: Bundle<C>) {
        self.store.set_bundle(bundle);
        self.selected = None;
        self.revealed = None;
        if let Some(notice) = self.store.take_notice() {
            self.status = Status::new(notice, Tone::Failure);
        }
    }

    /// Advance the cell at `location` to its next state.
    pub fn cycle_cell(&mut self, location: Location) -> Result<C, GridError> {
        let state = self.grid.cycle(location)?;
        self.revealed = None;
        debug!(%location, state = state.name(), "cycled cell");
        Ok(state)
    }

    /// Replace the user's grid wholesale, e.g. with an answer read from a file.
    pub fn set_grid(&mut self, grid: Grid<C>) -> Result<(), GridError> {
        if grid.side() != self.config.grid_size {
            return Err(GridError::RowCount { expected: self.config.grid_size.get(), found: grid.side().get() });
        }

        self.grid = grid;
        self.revealed = None;
        Ok(())
    }

    /// Clear the user's grid.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.revealed = None;
        self.status = Status::new(MSG_RESET, Tone::Neutral);
    }

    /// Load a reference grid document uploaded by the user.
    ///
    /// On failure the previously loaded reference, if any, stays active.
    pub fn load_reference(&mut self, json: &str) -> Result<(), GridError> {
        match Grid::from_json(json, self.config.grid_size) {
            Ok(reference) => {
                self.reference = Some(reference);
                self.selected = None;
                self.revealed = None;
                self.status = Status::new(MSG_REFERENCE_LOADED, Tone::Success);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "rejected reference grid");
                let message = if err.is_syntax() { MSG_REFERENCE_UNREADABLE } else { MSG_REFERENCE_INVALID };
                self.status = Status::new(message, Tone::Failure);
                Err(err)
            }
        }
    }

    /// Start solving the problem at `index`.
    pub fn select_problem(&mut self, index: usize) -> Result<(), SessionError> {
        let Some(problem) = self.store.get(index) else {
            return Err(self.fail(StoreError::OutOfRange { index, len: self.store.len() }.into()));
        };

        self.reference = Some(problem.grid.clone());
        self.selected = Some(index);
        self.revealed = None;
        self.grid.clear();
        self.status = Status::new(MSG_PROBLEM_SELECTED, Tone::Neutral);
        Ok(())
    }

    /// Check the user's grid against the reference with the configured policy.
    ///
    /// A correct answer to a selected problem reveals its unlock text.
    pub fn check(&mut self) -> Verdict {
        let verdict = check(&self.grid, self.reference.as_ref(), &self.config.policy);
        debug!(?verdict, policy = ?self.config.policy, "checked answer");

        if verdict != Verdict::Correct {
            self.revealed = None;
        }
        self.status = match verdict {
            Verdict::NotLoaded => Status::new(MSG_NOT_LOADED, Tone::Failure),
            Verdict::Incorrect => Status::new(MSG_INCORRECT, Tone::Failure),
            Verdict::Correct => {
                self.revealed = self.selected
                    .and_then(|index| self.store.get(index))
                    .map(|problem| problem.unlock_text.clone());
                Status::new(MSG_CORRECT, Tone::Success)
            }
        };

        verdict
    }

    /// Compare `password` against the configured admin password.
    pub fn unlock_admin(&mut self, password: &str) -> bool {
        self.admin = password == self.config.admin_password;
        self.status = if self.admin {
            Status::new(MSG_ADMIN_UNLOCKED, Tone::Success)
        } else {
            Status::new(MSG_ADMIN_REJECTED, Tone::Failure)
        };

        self.admin
    }

    pub fn lock_admin(&mut self) {
        self.admin = false;
    }

    /// Register a new problem from an uploaded image, an uploaded reference grid, and its unlock text.
    ///
    /// Requires the admin gate. Returns the index of the new problem.
    pub fn register_problem(&mut self, image: String, grid_json: &str, unlock_text: String, created_at: String) -> Result<usize, SessionError> {
        let registered = self.try_register(image, grid_json, unlock_text, created_at);
        match registered {
            Ok(index) => {
                self.status = Status::new(MSG_REGISTERED, Tone::Success);
                Ok(index)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn try_register(&mut self, image: String, grid_json: &str, unlock_text: String, created_at: String) -> Result<usize, SessionError> {
        if !self.admin {
            return Err(SessionError::Locked);
        }
        if image.trim().is_empty() {
            return Err(SessionError::EmptyImage);
        }

        let grid = Grid::from_json(grid_json, self.config.grid_size)?;
        if grid.is_unset() {
            return Err(SessionError::EmptyReference);
        }

        Ok(self.store.register(Problem { image, grid, unlock_text, created_at })?)
    }

    /// Delete the problem at `index`. Requires the admin gate.
    pub fn delete_problem(&mut self, index: usize) -> Result<Problem<C>, SessionError> {
        if !self.admin {
            return Err(self.fail(SessionError::Locked));
        }

        let removed = match self.store.delete(index) {
            Ok(removed) => removed,
            Err(err) => return Err(self.fail(err.into())),
        };
        match self.selected {
            Some(selected) if selected == index => {
                self.selected = None;
                self.reference = None;
                self.revealed = None;
            }
            Some(selected) if selected > index => self.selected = Some(selected - 1),
            _ => {}
        }

        self.status = Status::new(MSG_DELETED, Tone::Success);
        Ok(removed)
    }

    /// Show `err` as a failure status and hand it back.
    fn fail(&mut self, err: SessionError) -> SessionError {
        warn!(%err, "session action failed");
        self.status = Status::new(err.to_string(), Tone::Failure);
        err
    }
}
