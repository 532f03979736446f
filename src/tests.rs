#[cfg(test)]
mod tests {
    use std::num::NonZero;
    use std::str::FromStr;

    use serde_json::json;
    use strum::VariantArray;

    use crate::cell::{BasicCell, CellState, Corner, Cycle, OrientedCell, ShapeClass};
    use crate::config::Config;
    use crate::error::{ConfigError, GridError, SessionError, StoreError};
    use crate::grid::{validate, Grid};
    use crate::location::{Dimension, Location};
    use crate::matching::{check, Matcher, Policy, Strict, Tolerant, Verdict};
    use crate::normalize::{normalize, Signature};
    use crate::problem::{Bundle, Problem, ProblemStore};
    use crate::session::{Session, Tone, MSG_CORRECT, MSG_INCORRECT, MSG_NOT_LOADED, MSG_REFERENCE_INVALID, MSG_REFERENCE_UNREADABLE};
    use crate::storage::{MemoryStorage, Storage};
    use crate::symmetry::{reflect, Axis};

    fn side(n: usize) -> Dimension {
        NonZero::new(n).unwrap()
    }

    fn basic(text: &str) -> Grid<BasicCell> {
        Grid::from_str(text).unwrap()
    }

    fn oriented(text: &str) -> Grid<OrientedCell> {
        Grid::from_str(text).unwrap()
    }

    fn problem_json(text: &str, grid: &Grid<OrientedCell>) -> serde_json::Value {
        json!({
            "image": "<svg xmlns=\"http://www.w3.org/2000/svg\"/>",
            "grid": grid,
            "unlockText": text,
            "createdAt": "2024-05-01T09:30:00.000Z",
        })
    }

    #[test]
    fn cycle_basic_wraps() {
        let mut state = BasicCell::Empty;
        let mut seen = Vec::new();
        for _ in 0..4 {
            state = state.next();
            seen.push(state);
        }

        assert_eq!(seen, vec![BasicCell::Square, BasicCell::Triangle, BasicCell::Empty, BasicCell::Square]);
    }

    #[test]
    fn cycle_oriented_visits_every_state() {
        let mut state = OrientedCell::Empty;
        let mut names = Vec::new();
        for _ in 0..OrientedCell::VARIANTS.len() {
            state = state.next();
            names.push(state.name());
        }

        assert_eq!(names, vec!["square", "triangle-ne", "triangle-nw", "triangle-se", "triangle-sw", "empty"]);
    }

    #[test]
    fn state_names() {
        assert_eq!(OrientedCell::from_name("triangle-se"), Some(OrientedCell::Triangle(Corner::Se)));
        assert_eq!(OrientedCell::from_name("triangle"), None);
        assert_eq!(OrientedCell::from_name("triangle-up"), None);
        assert_eq!(OrientedCell::from_name("Square"), None);
        assert_eq!(BasicCell::from_name("triangle"), Some(BasicCell::Triangle));
        assert_eq!(BasicCell::from_name("triangle-ne"), None);

        for state in OrientedCell::VARIANTS {
            assert_eq!(OrientedCell::from_name(state.name()), Some(*state));
        }
    }

    #[test]
    fn shape_classes() {
        assert!(OrientedCell::VARIANTS.iter()
            .filter(|state| matches!(state, OrientedCell::Triangle(_)))
            .all(|state| state.shape_class() == ShapeClass::Triangle));
        assert_eq!(OrientedCell::Square.shape_class(), ShapeClass::Square);
        assert!(OrientedCell::Empty.is_empty());
        assert!(!BasicCell::Triangle.is_empty());
    }

    #[test]
    fn grid_text_round_trip() {
        let text = "◥#..\n....\n..◣.\n...◢\n";
        let grid = oriented(text);

        assert_eq!(grid.side(), side(4));
        assert_eq!(grid[Location(0, 0)], OrientedCell::Triangle(Corner::Ne));
        assert_eq!(grid[Location(3, 3)], OrientedCell::Triangle(Corner::Se));
        assert_eq!(format!("{}", grid), text);
    }

    #[test]
    fn grid_serializes_as_rows_of_names() {
        let grid = basic("#.\n.^\n");

        assert_eq!(serde_json::to_value(&grid).unwrap(), json!([["square", "empty"], ["empty", "triangle"]]));
        assert_eq!(serde_json::from_value::<Grid<BasicCell>>(json!([["square", "empty"], ["empty", "triangle"]])).unwrap(), grid);
        assert!(serde_json::from_value::<Grid<BasicCell>>(json!([["square", "empty"], ["empty"]])).is_err());
        assert!(serde_json::from_value::<Grid<BasicCell>>(json!([])).is_err());
    }

    #[test]
    fn cycle_cell_in_place() {
        let mut grid = Grid::<BasicCell>::empty(side(4));

        assert_eq!(grid.cycle(Location(1, 2)).unwrap(), BasicCell::Square);
        assert_eq!(grid.cycle(Location(1, 2)).unwrap(), BasicCell::Triangle);
        assert!(matches!(grid.cycle(Location(4, 0)), Err(GridError::OutOfBounds(Location(4, 0)))));
        assert_eq!(format!("{}", grid), "....\n..^.\n....\n....\n");

        grid.clear();
        assert!(grid.is_unset());
    }

    #[test]
    fn validate_accepts_well_formed() {
        let candidate = json!([
            ["empty", "square", "empty", "empty"],
            ["empty", "empty", "triangle", "empty"],
            ["empty", "empty", "empty", "empty"],
            ["square", "empty", "empty", "empty"],
        ]);

        assert!(validate::<BasicCell>(&candidate, side(4)));
        assert!(!validate::<OrientedCell>(&candidate, side(4)));
        assert!(!validate::<BasicCell>(&candidate, side(5)));
    }

    #[test]
    fn validate_rejects_three_rows() {
        let candidate = json!([
            ["empty", "empty", "empty", "empty"],
            ["empty", "empty", "empty", "empty"],
            ["empty", "empty", "empty", "empty"],
        ]);

        assert!(!validate::<BasicCell>(&candidate, side(4)));
        assert!(matches!(
            Grid::<BasicCell>::from_value(&candidate, side(4)),
            Err(GridError::RowCount { expected: 4, found: 3 })
        ));
    }

    #[test]
    fn validate_fails_closed() {
        let short_row = json!([["empty", "empty"], ["empty"]]);
        let unknown = json!([["empty", "circle"], ["empty", "empty"]]);
        let not_a_string = json!([["empty", 1], ["empty", "empty"]]);
        let not_rows = json!({"rows": []});
        let row_not_list = json!(["empty", ["empty", "empty"]]);

        assert!(matches!(Grid::<BasicCell>::from_value(&short_row, side(2)), Err(GridError::RowLength { row: 1, expected: 2, found: 1 })));
        assert!(matches!(Grid::<BasicCell>::from_value(&unknown, side(2)), Err(GridError::UnknownState { row: 0, col: 1, .. })));
        assert!(matches!(Grid::<BasicCell>::from_value(&not_a_string, side(2)), Err(GridError::NotAString { row: 0, col: 1 })));
        assert!(matches!(Grid::<BasicCell>::from_value(&not_rows, side(2)), Err(GridError::NotRows)));
        assert!(matches!(Grid::<BasicCell>::from_value(&row_not_list, side(2)), Err(GridError::RowNotList { row: 0 })));
        assert!(Grid::<BasicCell>::from_json("[[\"empty\",", side(2)).is_err_and(|err| err.is_syntax()));
    }

    #[test]
    fn normalize_reflexive_and_translation_invariant() {
        let grid = oriented("◥#..\n.◣..\n....\n....\n");
        let shifted = Grid::with_cells(
            side(4),
            grid.filled().map(|(location, state)| (location.offset_by((2, 2), side(4)).unwrap(), state)),
        ).unwrap();

        assert_eq!(format!("{}", shifted), "....\n....\n..◥#\n...◣\n");
        assert_eq!(normalize(&grid), normalize(&grid));
        assert_eq!(normalize(&grid), normalize(&shifted));
    }

    #[test]
    fn normalize_empty() {
        let empty = Grid::<OrientedCell>::empty(side(4));
        let other_empty = Grid::<OrientedCell>::empty(side(4));
        let single = oriented("....\n....\n....\n...#\n");

        assert_eq!(normalize(&empty), normalize(&other_empty));
        assert_eq!(normalize(&empty), Signature::empty());
        assert_ne!(normalize(&empty), normalize(&single));
        assert_eq!(normalize(&empty).to_string(), "∅");
    }

    #[test]
    fn normalize_anchors_rows_and_columns_independently() {
        let corner = basic("..#.\n....\n#...\n....\n");
        let inset = basic("....\n...#\n....\n.#..\n");

        assert_eq!(normalize(&corner).to_string(), "0,2,square;2,0,square");
        assert_eq!(normalize(&corner), normalize(&inset));
    }

    #[test]
    fn normalize_sorts_by_row_then_column() {
        let grid = basic("....\n#^..\n.^..\n....\n");

        assert_eq!(normalize(&grid).to_string(), "0,0,square;0,1,triangle;1,1,triangle");
    }

    #[test]
    fn reflect_oriented() {
        let grid = oriented("◥#..\n....\n..◣.\n....\n");

        assert_eq!(format!("{}", reflect(&grid, Axis::Identity)), "◥#..\n....\n..◣.\n....\n");
        assert_eq!(format!("{}", reflect(&grid, Axis::Horizontal)), "..#◤\n....\n.◢..\n....\n");
        assert_eq!(format!("{}", reflect(&grid, Axis::Vertical)), "....\n..◤.\n....\n◢#..\n");
        assert_eq!(format!("{}", reflect(&grid, Axis::Both)), "....\n.◥..\n....\n..#◣\n");
    }

    #[test]
    fn reflect_involutions() {
        let grid = oriented("◥#.◢\n.◤..\n..◣.\n#...\n");

        assert_eq!(reflect(&reflect(&grid, Axis::Horizontal), Axis::Horizontal), grid);
        assert_eq!(reflect(&reflect(&grid, Axis::Vertical), Axis::Vertical), grid);
        assert_eq!(reflect(&grid, Axis::Both), reflect(&reflect(&grid, Axis::Horizontal), Axis::Vertical));
        assert_eq!(reflect(&grid, Axis::Both), reflect(&reflect(&grid, Axis::Vertical), Axis::Horizontal));
    }

    #[test]
    fn corner_table() {
        for corner in Corner::VARIANTS {
            for axis in Axis::VARIANTS {
                assert_eq!(corner.reflect(*axis).reflect(*axis), *corner);
            }
            assert_eq!(corner.reflect(Axis::Horizontal).reflect(Axis::Vertical), corner.reflect(Axis::Both));
            assert_ne!(corner.reflect(Axis::Horizontal), *corner);
            assert_ne!(corner.reflect(Axis::Vertical), *corner);
        }

        assert_eq!(Corner::Ne.reflect(Axis::Horizontal), Corner::Nw);
        assert_eq!(Corner::Ne.reflect(Axis::Vertical), Corner::Se);
        assert_eq!(Corner::Ne.reflect(Axis::Both), Corner::Sw);
        assert_eq!(Corner::Nw.reflect(Axis::Both), Corner::Se);
    }

    #[test]
    fn basic_cells_have_no_handedness() {
        for state in BasicCell::VARIANTS {
            for axis in Axis::VARIANTS {
                assert_eq!(state.reflect(*axis), *state);
            }
        }
        assert_eq!(OrientedCell::Square.reflect(Axis::Both), OrientedCell::Square);
        assert_eq!(OrientedCell::Empty.reflect(Axis::Horizontal), OrientedCell::Empty);
    }

    #[test]
    fn translated_square_matches() {
        let target = basic("#...\n....\n....\n....\n");
        let user = basic("....\n....\n..#.\n....\n");

        assert!(Strict.matches(&user, &target));
        assert!(Tolerant.matches(&user, &target));
        assert_eq!(check(&user, Some(&target), &Policy::Strict), Verdict::Correct);
    }

    #[test]
    fn mirrored_triangle_matches() {
        let target = Grid::with_cells(side(4), [(Location(1, 1), OrientedCell::Triangle(Corner::Ne))]).unwrap();
        let user = Grid::with_cells(side(4), [(Location(1, 2), OrientedCell::Triangle(Corner::Nw))]).unwrap();

        assert_eq!(Strict::matching_axis(&user, &target), Some(Axis::Horizontal));
        assert!(Tolerant.matches(&user, &target));
    }

    #[test]
    fn different_classes_do_not_match() {
        let target = basic("##..\n....\n....\n....\n");
        let user = basic("#^..\n....\n....\n....\n");

        assert!(!Strict.matches(&user, &target));
        assert!(!Tolerant.matches(&user, &target));
        assert_eq!(check(&user, Some(&target), &Policy::Tolerant), Verdict::Incorrect);
    }

    #[test]
    fn mirror_image_matches_both_ways() {
        let grid = oriented("◥#..\n.◣..\n...◤\n....\n");
        let mirrored = reflect(&grid, Axis::Horizontal);

        assert!(Strict.matches(&mirrored, &grid));
        assert!(Strict.matches(&grid, &mirrored));
        assert!(Strict.matches(&reflect(&grid, Axis::Both), &grid));
    }

    #[test]
    fn strict_keeps_orientation_within_reflections() {
        let target = oriented("◥◥..\n....\n....\n....\n");
        let user = oriented("◥◤..\n....\n....\n....\n");

        assert_eq!(Strict::matching_axis(&user, &target), None);
        assert!(Tolerant.matches(&user, &target));
    }

    #[test]
    fn tolerant_ignores_positions_and_orientations() {
        let target = oriented("◥#..\n.◣..\n....\n...#\n");
        let user = oriented("....\n#..◢\n....\n◤.#.\n");

        assert_eq!(Tolerant::class_counts(&target), (2, 2));
        assert!(Tolerant.matches(&user, &target));
    }

    /// The two policies are both offered because they disagree: a relocated shape passes the count rule and fails the geometric one.
    /// Which one a deployment wants is a product decision carried in [`Config::policy`].
    #[test]
    fn policies_disagree_on_rotation() {
        let target = basic("#...\n#...\n....\n....\n");
        let user = basic("##..\n....\n....\n....\n");

        assert_eq!(check(&user, Some(&target), &Policy::Strict), Verdict::Incorrect);
        assert_eq!(check(&user, Some(&target), &Policy::Tolerant), Verdict::Correct);
    }

    #[test]
    fn nothing_to_compare() {
        let user = basic("#...\n....\n....\n....\n");

        assert_eq!(check(&user, None, &Policy::Strict), Verdict::NotLoaded);
        assert_eq!(check(&user, None, &Policy::Tolerant), Verdict::NotLoaded);
    }

    #[test]
    fn empty_grids_match_each_other() {
        let empty = Grid::<OrientedCell>::empty(side(4));
        let single = oriented("#...\n....\n....\n....\n");

        assert!(Strict.matches(&empty, &empty));
        assert!(!Strict.matches(&single, &empty));
        assert!(!Strict.matches(&empty, &single));
    }

    #[test]
    fn config_defaults_and_overrides() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.grid_size, side(4));
        assert_eq!(config.policy, Policy::Tolerant);

        let config = Config::from_json(r#"{"gridSize": 5, "policy": "strict", "adminPassword": "hunter2"}"#).unwrap();
        assert_eq!(config.grid_size, side(5));
        assert_eq!(config.policy, Policy::Strict);
        assert_eq!(config.admin_password, "hunter2");
        assert_eq!(config.storage_key, "problems");

        assert!(Config::from_json(r#"{"gridSize": 0}"#).is_err());
        assert!(Config::from_json(r#"{"policy": "lenient"}"#).is_err());
        assert!(Config::from_json(r#"{"storageKey": ""}"#).is_err());

        let blank_key = Config { storage_key: String::new(), ..Config::default() };
        assert!(matches!(blank_key.validate(), Err(ConfigError::EmptyStorageKey)));
        assert_eq!(Config::default().validate().unwrap(), Config::default());
        assert_eq!(Policy::from_str("strict").unwrap(), Policy::Strict);
    }

    #[test]
    fn problem_record_keys() {
        let grid = oriented("◥...\n....\n....\n....\n");
        let problem = Problem {
            image: "<svg/>".to_owned(),
            grid: grid.clone(),
            unlock_text: "The lighthouse keeper was never alone.".to_owned(),
            created_at: "2024-05-01T09:30:00.000Z".to_owned(),
        };

        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value["unlockText"], "The lighthouse keeper was never alone.");
        assert_eq!(value["createdAt"], "2024-05-01T09:30:00.000Z");
        assert_eq!(value["grid"][0][0], "triangle-ne");
        assert_eq!(serde_json::from_value::<Problem<OrientedCell>>(value).unwrap(), problem);
    }

    #[test]
    fn store_orders_bundled_before_stored() {
        let mut storage = MemoryStorage::new();
        let stored = json!([
            problem_json("stored first", &oriented("#...\n....\n....\n....\n")),
            problem_json("stored second", &oriented(".#..\n....\n....\n....\n")),
        ]);
        storage.set("problems", &stored.to_string()).unwrap();
        let bundled = json!([
            problem_json("bundled first", &oriented("◥...\n....\n....\n....\n")),
            problem_json("bundled second", &oriented("◤...\n....\n....\n....\n")),
        ]);

        let mut store = ProblemStore::<OrientedCell, _>::open(storage, "problems", side(4));
        store.set_bundle(Bundle::from_fetch(Ok::<_, String>(bundled.to_string()), side(4)));

        let texts: Vec<_> = store.iter().map(|problem| problem.unlock_text.as_str()).collect();
        assert_eq!(texts, vec!["bundled first", "bundled second", "stored first", "stored second"]);
        assert_eq!(store.bundled_len(), 2);
        assert_eq!(store.take_notice(), None);
    }

    #[test]
    fn store_persists_registration_and_deletion() {
        let mut storage = MemoryStorage::new();
        {
            let mut store = ProblemStore::<OrientedCell, _>::open(&mut storage, "problems", side(4));
            assert!(store.is_empty());

            for text in ["one", "two", "three"] {
                let problem: Problem<OrientedCell> = serde_json::from_value(problem_json(text, &oriented("#...\n....\n....\n....\n"))).unwrap();
                store.register(problem).unwrap();
            }
            assert_eq!(store.delete(1).unwrap().unlock_text, "two");
            assert!(matches!(store.delete(5), Err(StoreError::OutOfRange { index: 5, len: 2 })));
        }

        let raw = storage.get("problems").unwrap().unwrap();
        assert!(raw.contains("\"unlockText\":\"one\""));
        assert!(raw.contains("\"createdAt\""));

        let reopened = ProblemStore::<OrientedCell, _>::open(storage, "problems", side(4));
        let texts: Vec<_> = reopened.iter().map(|problem| problem.unlock_text.as_str()).collect();
        assert_eq!(texts, vec!["one", "three"]);
    }

    #[test]
    fn store_replaces_wholesale() {
        let mut store = ProblemStore::<OrientedCell, _>::open(MemoryStorage::new(), "problems", side(4));
        let first: Problem<OrientedCell> = serde_json::from_value(problem_json("before", &oriented("#...\n....\n....\n....\n"))).unwrap();
        let second: Problem<OrientedCell> = serde_json::from_value(problem_json("after", &oriented("◢...\n....\n....\n....\n"))).unwrap();

        store.register(first).unwrap();
        assert_eq!(store.replace(0, second).unwrap().unlock_text, "before");
        assert_eq!(store.get(0).unwrap().unlock_text, "after");
    }

    #[test]
    fn bundled_problems_are_read_only() {
        let bundled = json!([problem_json("bundled", &oriented("#...\n....\n....\n....\n"))]);
        let mut store = ProblemStore::<OrientedCell, _>::open(MemoryStorage::new(), "problems", side(4));
        store.set_bundle(Bundle::from_fetch(Ok::<_, String>(bundled.to_string()), side(4)));

        assert!(matches!(store.delete(0), Err(StoreError::ReadOnly { index: 0 })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn corrupt_store_degrades_to_empty() {
        let mut storage = MemoryStorage::new();
        storage.set("problems", "{not json").unwrap();

        let mut store = ProblemStore::<OrientedCell, _>::open(storage, "problems", side(4));
        assert!(store.is_empty());
        assert!(store.take_notice().is_some());

        let mut storage = MemoryStorage::new();
        storage.set("problems", &json!([problem_json("too small", &oriented("#.\n..\n"))]).to_string()).unwrap();
        let mut store = ProblemStore::<OrientedCell, _>::open(storage, "problems", side(4));
        assert!(store.is_empty());
        assert!(store.take_notice().is_some());
    }

    #[test]
    fn failed_fetch_yields_empty_bundle() {
        let failed = Bundle::<OrientedCell>::from_fetch(Err::<String, _>("network unreachable"), side(4));
        assert!(failed.problems().is_empty());
        assert!(failed.notice().is_some());

        let garbled = Bundle::<OrientedCell>::from_fetch(Ok::<_, String>("<!doctype html>".to_owned()), side(4));
        assert!(garbled.problems().is_empty());
        assert!(garbled.notice().is_some());
    }

    #[test]
    fn session_keeps_previous_reference_on_bad_upload() {
        let mut session = Session::<BasicCell, _>::new(Config::default(), MemoryStorage::new());
        let good = json!([
            ["square", "empty", "empty", "empty"],
            ["empty", "empty", "empty", "empty"],
            ["empty", "empty", "empty", "empty"],
            ["empty", "empty", "empty", "empty"],
        ]);
        let three_rows = json!([
            ["square", "square", "empty", "empty"],
            ["empty", "empty", "empty", "empty"],
            ["empty", "empty", "empty", "empty"],
        ]);

        session.load_reference(&good.to_string()).unwrap();
        assert_eq!(session.status().tone, Tone::Success);

        assert!(session.load_reference(&three_rows.to_string()).is_err());
        assert_eq!(session.status().message, MSG_REFERENCE_INVALID);
        assert_eq!(session.status().tone, Tone::Failure);
        assert_eq!(format!("{}", session.reference().unwrap()), "#...\n....\n....\n....\n");

        assert!(session.load_reference("not json").is_err());
        assert_eq!(session.status().message, MSG_REFERENCE_UNREADABLE);
        assert!(session.reference().is_some());
    }

    #[test]
    fn session_reports_missing_reference() {
        let mut session = Session::<BasicCell, _>::new(Config::default(), MemoryStorage::new());
        session.cycle_cell(Location(0, 0)).unwrap();

        assert_eq!(session.check(), Verdict::NotLoaded);
        assert_eq!(session.status().message, MSG_NOT_LOADED);
        assert_ne!(session.status().message, MSG_INCORRECT);
    }

    #[test]
    fn session_admin_gate() {
        let mut session = Session::<OrientedCell, _>::new(Config::default(), MemoryStorage::new());
        let grid_json = serde_json::to_string(&oriented("#...\n....\n....\n....\n")).unwrap();
        let empty_json = serde_json::to_string(&Grid::<OrientedCell>::empty(side(4))).unwrap();

        assert!(matches!(
            session.register_problem("<svg/>".into(), &grid_json, "secret".into(), "2024-05-01T00:00:00Z".into()),
            Err(SessionError::Locked)
        ));
        assert!(!session.unlock_admin("guess"));
        assert!(session.unlock_admin("admin"));

        assert!(matches!(
            session.register_problem("<svg/>".into(), &empty_json, "secret".into(), "2024-05-01T00:00:00Z".into()),
            Err(SessionError::EmptyReference)
        ));
        assert!(matches!(
            session.register_problem("  ".into(), &grid_json, "secret".into(), "2024-05-01T00:00:00Z".into()),
            Err(SessionError::EmptyImage)
        ));
        assert_eq!(session.register_problem("<svg/>".into(), &grid_json, "secret".into(), "2024-05-01T00:00:00Z".into()).unwrap(), 0);

        session.lock_admin();
        assert!(matches!(session.delete_problem(0), Err(SessionError::Locked)));
        assert_eq!(session.status().message, SessionError::Locked.to_string());
        assert_eq!(session.status().tone, Tone::Failure);
    }

    #[test]
    fn session_hides_unlock_text_once_answer_changes() {
        let mut session = Session::<OrientedCell, _>::new(Config::default(), MemoryStorage::new());
        let target = oriented("#...\n....\n....\n....\n");

        session.unlock_admin("admin");
        let index = session.register_problem(
            "<svg/>".into(),
            &serde_json::to_string(&target).unwrap(),
            "secret".into(),
            "2024-05-01T00:00:00Z".into(),
        ).unwrap();
        session.select_problem(index).unwrap();

        session.cycle_cell(Location(0, 0)).unwrap();
        assert_eq!(session.check(), Verdict::Correct);
        assert_eq!(session.revealed(), Some("secret"));

        // editing hides the text even before the next check
        session.cycle_cell(Location(3, 3)).unwrap();
        assert_eq!(session.revealed(), None);
        assert_eq!(session.check(), Verdict::Incorrect);
        assert_eq!(session.revealed(), None);

        session.cycle_cell(Location(3, 3)).unwrap();
        session.cycle_cell(Location(3, 3)).unwrap();
        session.cycle_cell(Location(3, 3)).unwrap();
        session.cycle_cell(Location(3, 3)).unwrap();
        session.cycle_cell(Location(3, 3)).unwrap();
        assert!(session.grid()[Location(3, 3)].is_empty());
        assert_eq!(session.check(), Verdict::Correct);
        assert_eq!(session.revealed(), Some("secret"));

        session.reset();
        assert_eq!(session.revealed(), None);
    }

    #[test]
    fn session_reveals_unlock_text_on_solve() {
        let config = Config { policy: Policy::Strict, ..Config::default() };
        let mut session = Session::<OrientedCell, _>::new(config, MemoryStorage::new());
        let target = Grid::with_cells(side(4), [(Location(1, 1), OrientedCell::Triangle(Corner::Ne))]).unwrap();

        session.unlock_admin("admin");
        let index = session.register_problem(
            "<svg/>".into(),
            &serde_json::to_string(&target).unwrap(),
            "The key is under the third stair.".into(),
            "2024-05-01T00:00:00Z".into(),
        ).unwrap();
        session.select_problem(index).unwrap();
        assert!(session.grid().is_unset());

        // one square is not the answer
        session.cycle_cell(Location(0, 0)).unwrap();
        assert_eq!(session.check(), Verdict::Incorrect);
        assert_eq!(session.revealed(), None);

        // a mirrored triangle elsewhere is
        session.reset();
        for _ in 0..3 {
            session.cycle_cell(Location(2, 3)).unwrap();
        }
        assert_eq!(session.grid()[Location(2, 3)], OrientedCell::Triangle(Corner::Nw));
        assert_eq!(session.check(), Verdict::Correct);
        assert_eq!(session.status().message, MSG_CORRECT);
        assert_eq!(session.revealed(), Some("The key is under the third stair."));
    }

    #[test]
    fn session_deletion_tracks_selection() {
        let mut session = Session::<BasicCell, _>::new(Config::default(), MemoryStorage::new());
        let grid_json = serde_json::to_string(&basic("#...\n....\n....\n....\n")).unwrap();

        session.unlock_admin("admin");
        for text in ["a", "b", "c"] {
            session.register_problem("<svg/>".into(), &grid_json, text.into(), "2024-05-01T00:00:00Z".into()).unwrap();
        }

        session.select_problem(2).unwrap();
        session.delete_problem(0).unwrap();
        assert_eq!(session.selected(), Some(1));

        session.delete_problem(1).unwrap();
        assert_eq!(session.selected(), None);
        assert!(session.reference().is_none());

        let err = session.select_problem(7).unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::OutOfRange { index: 7, len: 1 })));
        assert_eq!(session.status().message, err.to_string());
        assert_eq!(session.status().tone, Tone::Failure);
    }

    #[test]
    fn session_surfaces_corrupt_storage() {
        let mut storage = MemoryStorage::new();
        storage.set("problems", "[{\"image\": 3}]").unwrap();

        let session = Session::<BasicCell, _>::new(Config::default(), storage);
        assert!(session.problems().is_empty());
        assert_eq!(session.status().tone, Tone::Failure);
    }
}
