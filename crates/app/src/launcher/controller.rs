//! Search state behind the launcher entry.
//!
//! The controller owns the query text and the ranked, length-capped result
//! list derived from it. Both are observable through `futures_signals`, so
//! the view never needs an explicit redraw call.

use std::cell::Cell;

use futures_signals::signal::{Mutable, MutableSignalCloned};
use services::{AppIndex, Launch};
use tracing::debug;

use super::window::HostResolver;

/// Number of results kept after ranking, and the upper bound for a
/// configured cap.
pub const DEFAULT_MAX_RESULTS: usize = 8;

pub struct SearchController<I: AppIndex> {
    index: I,
    resolve_host: HostResolver,
    max_results: Cell<usize>,
    query: Mutable<String>,
    results: Mutable<Vec<I::App>>,
}

impl<I: AppIndex> SearchController<I> {
    /// Create a controller with an empty query and no results.
    ///
    /// `resolve_host` is called on every launch to find the window that
    /// should be hidden; it may return `None`.
    pub fn new(index: I, resolve_host: HostResolver) -> Self {
        Self {
            index,
            resolve_host,
            max_results: Cell::new(DEFAULT_MAX_RESULTS),
            query: Mutable::new(String::new()),
            results: Mutable::new(Vec::new()),
        }
    }

    pub fn with_max_results(self, max_results: usize) -> Self {
        self.set_max_results(max_results);
        self
    }

    /// Change the result cap, clamped to `1..=DEFAULT_MAX_RESULTS`. Takes
    /// effect at the next search.
    pub fn set_max_results(&self, max_results: usize) {
        let clamped = max_results.clamp(1, DEFAULT_MAX_RESULTS);
        if clamped != max_results {
            debug!("max_results {} out of range, using {}", max_results, clamped);
        }
        self.max_results.set(clamped);
    }

    pub fn max_results(&self) -> usize {
        self.max_results.get()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Current query text.
    pub fn query(&self) -> String {
        self.query.get_cloned()
    }

    /// Snapshot of the current results, best match first.
    pub fn results(&self) -> Vec<I::App> {
        self.results.get_cloned()
    }

    pub fn result(&self, index: usize) -> Option<I::App> {
        self.results.lock_ref().get(index).cloned()
    }

    pub fn query_signal(&self) -> MutableSignalCloned<String> {
        self.query.signal_cloned()
    }

    pub fn results_signal(&self) -> MutableSignalCloned<Vec<I::App>> {
        self.results.signal_cloned()
    }

    /// Set the query and recompute the results from the index.
    ///
    /// The result list is replaced in one step; observers never see a
    /// partially updated list.
    pub fn search(&self, text: &str) {
        let mut results = self.index.fuzzy_query(text);
        results.truncate(self.max_results.get());
        debug!("Search {:?}: {} results", text, results.len());

        self.query.set(text.to_string());
        self.results.set(results);
    }

    /// Start `app`, hide the host window and clear the search state.
    ///
    /// `app` does not have to be one of the current results.
    pub fn launch(&self, app: &I::App) {
        app.launch();

        match (self.resolve_host)() {
            Some(window) => window.set_visible(false),
            None => debug!("No host window to hide after launch"),
        }

        self.reset();
    }

    /// Launch the first result, if any. Returns whether a launch happened.
    pub fn activate_default(&self) -> bool {
        let first = self.results.lock_ref().first().cloned();
        match first {
            Some(app) => {
                self.launch(&app);
                true
            }
            None => false,
        }
    }

    /// Re-seed the baseline listing when the host window is shown.
    pub fn on_show(&self) {
        self.search("");
    }

    /// Clear the query and results without consulting the index.
    pub fn reset(&self) {
        self.query.set(String::new());
        self.results.set(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use futures::StreamExt;
    use futures::executor::block_on;
    use futures_signals::signal::SignalExt;

    use super::*;
    use crate::launcher::window::HostWindow;

    #[derive(Debug, Clone)]
    struct FakeApp {
        name: &'static str,
        launches: Rc<Cell<usize>>,
    }

    impl FakeApp {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                launches: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Launch for FakeApp {
        fn launch(&self) {
            self.launches.set(self.launches.get() + 1);
        }
    }

    /// Index that answers from a fixed table; the baseline for blank input.
    struct FakeIndex {
        baseline: Vec<FakeApp>,
        answers: HashMap<&'static str, Vec<FakeApp>>,
    }

    impl AppIndex for FakeIndex {
        type App = FakeApp;

        fn fuzzy_query(&self, pattern: &str) -> Vec<FakeApp> {
            if pattern.is_empty() {
                return self.baseline.clone();
            }
            self.answers.get(pattern).cloned().unwrap_or_default()
        }
    }

    struct FakeWindow(Rc<Cell<bool>>);

    impl HostWindow for FakeWindow {
        fn is_visible(&self) -> bool {
            self.0.get()
        }

        fn set_visible(&self, visible: bool) {
            self.0.set(visible);
        }
    }

    struct Fixture {
        controller: SearchController<FakeIndex>,
        firefox: FakeApp,
        files: FakeApp,
        visible: Rc<Cell<bool>>,
    }

    fn fixture() -> Fixture {
        let firefox = FakeApp::new("Firefox");
        let files = FakeApp::new("FileManager");
        let baseline: Vec<FakeApp> = (0..10)
            .map(|i| FakeApp::new(["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"][i]))
            .collect();

        let mut answers = HashMap::new();
        answers.insert("fire", vec![firefox.clone(), files.clone()]);

        let visible = Rc::new(Cell::new(true));
        let host = Rc::clone(&visible);
        let controller = SearchController::new(
            FakeIndex { baseline, answers },
            Box::new(move || Some(Box::new(FakeWindow(Rc::clone(&host))) as Box<dyn HostWindow>)),
        );

        Fixture {
            controller,
            firefox,
            files,
            visible,
        }
    }

    fn names(apps: &[FakeApp]) -> Vec<&'static str> {
        apps.iter().map(|a| a.name).collect()
    }

    #[test]
    fn test_search_sets_query_and_keeps_order() {
        let f = fixture();
        f.controller.search("fire");

        assert_eq!(f.controller.query(), "fire");
        assert_eq!(names(&f.controller.results()), vec!["Firefox", "FileManager"]);
    }

    #[test]
    fn test_search_caps_results() {
        let f = fixture();
        f.controller.search("");

        assert_eq!(f.controller.query(), "");
        assert_eq!(
            names(&f.controller.results()),
            vec!["A", "B", "C", "D", "E", "F", "G", "H"]
        );
    }

    #[test]
    fn test_max_results_applies_on_next_search() {
        let f = fixture();
        f.controller.search("");
        f.controller.set_max_results(3);
        assert_eq!(f.controller.results().len(), 8);

        f.controller.search("");
        assert_eq!(names(&f.controller.results()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_max_results_is_clamped() {
        let f = fixture();
        f.controller.set_max_results(20);
        assert_eq!(f.controller.max_results(), DEFAULT_MAX_RESULTS);
        f.controller.search("");
        assert_eq!(f.controller.results().len(), DEFAULT_MAX_RESULTS);

        f.controller.set_max_results(0);
        f.controller.search("");
        assert_eq!(names(&f.controller.results()), vec!["A"]);
    }

    #[test]
    fn test_no_match() {
        let f = fixture();
        f.controller.search("fire");
        assert_eq!(f.controller.results().len(), 2);

        f.controller.search("zzzznomatch");
        assert!(f.controller.results().is_empty());

        assert!(!f.controller.activate_default());
        assert_eq!(f.firefox.launches.get(), 0);
        assert_eq!(f.files.launches.get(), 0);
        assert_eq!(f.controller.query(), "zzzznomatch");
        assert!(f.controller.results().is_empty());
        assert!(f.visible.get());
    }

    #[test]
    fn test_activate_default_launches_first() {
        let f = fixture();
        f.controller.search("fire");

        assert!(f.controller.activate_default());
        assert_eq!(f.firefox.launches.get(), 1);
        assert_eq!(f.files.launches.get(), 0);
        assert_eq!(f.controller.query(), "");
        assert!(f.controller.results().is_empty());
        assert!(!f.visible.get());
    }

    #[test]
    fn test_launch_outside_results() {
        let f = fixture();
        let other = FakeApp::new("Other");
        f.controller.search("fire");

        f.controller.launch(&other);
        assert_eq!(other.launches.get(), 1);
        assert_eq!(f.firefox.launches.get(), 0);
        assert_eq!(f.controller.query(), "");
        assert!(f.controller.results().is_empty());
    }

    #[test]
    fn test_launch_without_host_window() {
        let firefox = FakeApp::new("Firefox");
        let mut answers = HashMap::new();
        answers.insert("fire", vec![firefox.clone()]);
        let controller = SearchController::new(
            FakeIndex {
                baseline: Vec::new(),
                answers,
            },
            Box::new(|| None),
        );

        controller.search("fire");
        assert!(controller.activate_default());
        assert_eq!(firefox.launches.get(), 1);
        assert_eq!(controller.query(), "");
        assert!(controller.results().is_empty());
    }

    #[test]
    fn test_on_show_is_idempotent() {
        let f = fixture();
        f.controller.search("fire");

        f.controller.on_show();
        let first = names(&f.controller.results());
        f.controller.on_show();
        let second = names(&f.controller.results());

        assert_eq!(f.controller.query(), "");
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_signals_follow_state() {
        let f = fixture();
        let mut query = f.controller.query_signal().to_stream();
        let mut results = f.controller.results_signal().to_stream();

        assert_eq!(block_on(query.next()), Some(String::new()));
        assert_eq!(block_on(results.next()).map(|r| r.len()), Some(0));

        f.controller.search("fire");
        assert_eq!(block_on(query.next()), Some("fire".to_string()));
        assert_eq!(block_on(results.next()).map(|r| names(&r)), Some(vec!["Firefox", "FileManager"]));

        f.controller.activate_default();
        assert_eq!(block_on(query.next()), Some(String::new()));
        assert_eq!(block_on(results.next()).map(|r| r.len()), Some(0));
    }
}
