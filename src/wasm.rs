use std::str::FromStr;

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use crate::cell::{CellState, OrientedCell};
use crate::config::Config;
use crate::grid::{validate, Grid};
use crate::location::{Dimension, Location};
use crate::matching::{check, Matcher, Policy, Verdict};
use crate::normalize::normalize;
use crate::problem::Bundle;
use crate::session::{Session, Status};
use crate::storage::BrowserStorage;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value.serialize(&Serializer::json_compatible()).map_err(Into::into)
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn side(size: usize) -> Result<Dimension, JsValue> {
    Dimension::new(size).ok_or_else(|| js_error("grid size must be positive"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport<'a> {
    verdict: Verdict,
    status: &'a Status,
    unlock_text: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemSummary<'a> {
    index: usize,
    image: &'a str,
    created_at: &'a str,
    bundled: bool,
}

/// The editor and player state for one page, over the six-state cell set and the window's `localStorage`.
#[wasm_bindgen]
pub struct Editor {
    session: Session<OrientedCell, BrowserStorage>,
}

#[wasm_bindgen]
impl Editor {
    /// Create an editor. `config` may be `undefined` or a partial config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Editor, JsValue> {
        let config: Config = if config.is_undefined() || config.is_null() {
            Config::default()
        } else {
            serde_wasm_bindgen::from_value::<Config>(config)?
                .validate()
                .map_err(js_error)?
        };

        Ok(Self { session: Session::new(config, BrowserStorage::open()) })
    }

    /// Hand over the bundled problem list; `None` means the fetch failed.
    #[wasm_bindgen(js_name = "loadBundle")]
    pub fn load_bundle(&mut self, json: Option<String>) {
        let fetched = json.ok_or("fetch failed");
        let bundle = Bundle::from_fetch(fetched, self.session.config().grid_size);
        self.session.load_bundle(bundle);
    }

    /// Cycle the cell at `(row, col)`, returning its new state name.
    pub fn cycle(&mut self, row: usize, col: usize) -> Result<String, JsValue> {
        self.session.cycle_cell(Location(row, col))
            .map(|state| state.name().to_owned())
            .map_err(js_error)
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Load an uploaded reference grid document. Returns whether it was accepted.
    #[wasm_bindgen(js_name = "loadReference")]
    pub fn load_reference(&mut self, json: &str) -> bool {
        self.session.load_reference(json).is_ok()
    }

    #[wasm_bindgen(js_name = "selectProblem")]
    pub fn select_problem(&mut self, index: usize) -> Result<(), JsValue> {
        self.session.select_problem(index).map_err(js_error)
    }

    /// Check the current grid, returning `{ verdict, status, unlockText }`.
    pub fn check(&mut self) -> Result<JsValue, JsValue> {
        let verdict = self.session.check();
        to_js(&CheckReport {
            verdict,
            status: self.session.status(),
            unlock_text: self.session.revealed(),
        })
    }

    pub fn status(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.status())
    }

    /// The user's grid as rows of state names.
    pub fn grid(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.grid())
    }

    pub fn problems(&self) -> Result<JsValue, JsValue> {
        let bundled = self.session.problems().bundled_len();
        let summaries: Vec<_> = self.session.problems().iter()
            .enumerate()
            .map(|(index, problem)| ProblemSummary {
                index,
                image: &problem.image,
                created_at: &problem.created_at,
                bundled: index < bundled,
            })
            .collect();

        to_js(&summaries)
    }

    #[wasm_bindgen(js_name = "unlockAdmin")]
    pub fn unlock_admin(&mut self, password: &str) -> bool {
        self.session.unlock_admin(password)
    }

    /// Register a problem, stamping it with the current time. Returns its index.
    pub fn register(&mut self, image: String, grid_json: &str, unlock_text: String) -> Result<usize, JsValue> {
        let created_at = String::from(js_sys::Date::new_0().to_iso_string());
        self.session.register_problem(image, grid_json, unlock_text, created_at).map_err(js_error)
    }

    pub fn delete(&mut self, index: usize) -> Result<(), JsValue> {
        self.session.delete_problem(index).map(|_| ()).map_err(js_error)
    }
}

/// Whether `json` is a well-formed reference grid of side `size`.
#[wasm_bindgen(js_name = "validateGrid")]
pub fn validate_grid(json: &str, size: usize) -> bool {
    let Ok(side) = side(size) else {
        return false;
    };

    serde_json::from_str(json).is_ok_and(|value| validate::<OrientedCell>(&value, side))
}

/// The normalized signature of a grid document, as text.
#[wasm_bindgen(js_name = "normalizeGrid")]
pub fn normalize_grid(json: &str, size: usize) -> Result<String, JsValue> {
    let grid = Grid::<OrientedCell>::from_json(json, side(size)?).map_err(js_error)?;
    Ok(normalize(&grid).to_string())
}

/// Whether `user_json` solves `target_json` under `policy` (`"strict"` or `"tolerant"`).
#[wasm_bindgen(js_name = "matchGrids")]
pub fn match_grids(user_json: &str, target_json: &str, size: usize, policy: &str) -> Result<bool, JsValue> {
    let side = side(size)?;
    let policy = Policy::from_str(policy).map_err(js_error)?;
    let user = Grid::<OrientedCell>::from_json(user_json, side).map_err(js_error)?;
    let target = Grid::<OrientedCell>::from_json(target_json, side).map_err(js_error)?;

    Ok(policy.matches(&user, &target))
}

/// Check `user_json` against an optional reference, distinguishing a missing reference from a mismatch.
#[wasm_bindgen(js_name = "checkGrids")]
pub fn check_grids(user_json: &str, target_json: Option<String>, size: usize, policy: &str) -> Result<String, JsValue> {
    let side = side(size)?;
    let policy = Policy::from_str(policy).map_err(js_error)?;
    let user = Grid::<OrientedCell>::from_json(user_json, side).map_err(js_error)?;
    let target = target_json
        .map(|json| Grid::<OrientedCell>::from_json(&json, side))
        .transpose()
        .map_err(js_error)?;

    let verdict: &'static str = check(&user, target.as_ref(), &policy).into();
    Ok(verdict.to_owned())
}
