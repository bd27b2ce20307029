//! Application launcher.
//!
//! The launcher is a hosting window plus a [`SearchController`]. Typing
//! updates the query, Enter launches the first result, Escape hides the
//! window. Each time the window becomes visible the baseline listing is
//! re-seeded.

pub mod config;
pub mod controller;
pub mod item;
pub mod view;
pub mod window;

use std::rc::Rc;

use anyhow::anyhow;
use futures_signals::signal::{Mutable, MutableSignalCloned};
use services::ApplicationsService;
use tracing::{debug, warn};

use self::config::LauncherConfig;
use self::controller::SearchController;
use self::window::{HostWindow, Window, WindowRegistry};
use crate::keybinds::Action;

pub struct Launcher {
    window: Window,
    controller: Rc<SearchController<ApplicationsService>>,
    placeholder: Mutable<String>,
}

impl Launcher {
    /// Create the launcher and register its (hidden) window in `windows`.
    pub fn new(
        config: &LauncherConfig,
        applications: ApplicationsService,
        windows: &WindowRegistry,
    ) -> Self {
        let window = Window::new(&config.window_name, false);
        windows.insert(window.clone());

        let controller = Rc::new(
            SearchController::new(applications, windows.resolver(&config.window_name))
                .with_max_results(config.max_results),
        );

        // Re-seed on every hidden-to-visible transition, whoever shows the window.
        let shown = Rc::downgrade(&controller);
        window.on_show(move || {
            if let Some(controller) = shown.upgrade() {
                debug!("Launcher shown");
                controller.on_show();
            }
        });

        Self {
            window,
            controller,
            placeholder: Mutable::new(config.placeholder.clone()),
        }
    }

    pub fn controller(&self) -> &SearchController<ApplicationsService> {
        &self.controller
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn is_visible(&self) -> bool {
        self.window.is_visible()
    }

    pub fn placeholder_signal(&self) -> MutableSignalCloned<String> {
        self.placeholder.signal_cloned()
    }

    /// Show the window. A hidden-to-visible transition re-seeds the results.
    pub fn show(&mut self) {
        self.window.set_visible(true);
    }

    /// Hide the window and drop the search state.
    pub fn dismiss(&mut self) {
        self.window.set_visible(false);
        self.controller.reset();
    }

    /// Toggle the launcher with optional prefilled input.
    ///
    /// - Hidden: shows it, then searches `input` if given.
    /// - Visible with `input`: replaces the query.
    /// - Visible without `input`: dismisses it.
    pub fn toggle(&mut self, input: Option<String>) {
        match (self.is_visible(), input) {
            (false, input) => {
                self.show();
                if let Some(text) = input {
                    self.controller.search(&text);
                }
            }
            (true, Some(text)) => self.controller.search(&text),
            (true, None) => self.dismiss(),
        }
    }

    /// Show the launcher if needed and replace the query.
    pub fn set_query(&mut self, text: &str) {
        self.show();
        self.controller.search(text);
    }

    /// Apply a keyboard action. Returns `false` when the launcher is hidden
    /// and the action was ignored.
    pub fn handle_action(&mut self, action: Action) -> bool {
        if !self.is_visible() {
            debug!("Ignoring {:?}: launcher hidden", action);
            return false;
        }

        let query = self.controller.query();
        match action {
            Action::Cancel => self.dismiss(),
            Action::Confirm => {
                if !self.controller.activate_default() {
                    debug!("Nothing to activate for {:?}", query);
                }
            }
            Action::Insert(text) => self.controller.search(&format!("{query}{text}")),
            Action::Backspace => {
                let mut query = query;
                if query.pop().is_some() {
                    self.controller.search(&query);
                }
            }
            Action::DeleteWordBack => self.controller.search(delete_word_back(&query)),
            Action::Clear => self.controller.search(""),
        }
        true
    }

    /// Launch the result at `index`, as when its row is clicked.
    pub fn click(&mut self, index: usize) -> anyhow::Result<()> {
        let app = self
            .controller
            .result(index)
            .ok_or_else(|| anyhow!("No result at index {}", index))?;
        self.controller.launch(&app);
        Ok(())
    }

    /// Recompute the results for the current query, e.g. after the index
    /// was refreshed. Does nothing while hidden.
    pub fn refresh_results(&self) {
        if self.is_visible() {
            self.controller.search(&self.controller.query());
        }
    }

    /// Apply a reloaded configuration.
    pub fn apply_config(&mut self, config: &LauncherConfig) {
        if config.window_name != self.window.name() {
            warn!(
                "Launcher window name change to {:?} requires a restart",
                config.window_name
            );
        }
        self.controller.set_max_results(config.max_results);
        self.placeholder.set_neq(config.placeholder.clone());
        self.refresh_results();
    }
}

/// Drop the last word of `query`, along with trailing whitespace.
fn delete_word_back(query: &str) -> &str {
    query
        .trim_end()
        .trim_end_matches(|c: char| !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use services::MatchWeights;
    use tempfile::TempDir;

    use super::*;

    fn write_entry(dir: &Path, name: &str, exec: &str) {
        fs::write(
            dir.join(format!("{}.desktop", name.to_lowercase())),
            format!("[Desktop Entry]\nType=Application\nName={name}\nExec={exec}\n"),
        )
        .unwrap();
    }

    /// Launcher over a temp applications dir. Exec lines are `true` so a
    /// launch spawns a harmless process.
    fn launcher(max_results: usize) -> (Launcher, WindowRegistry, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Firefox", "Files", "Foot", "Gimp", "Thunar"] {
            write_entry(dir.path(), name, "true");
        }

        let applications =
            ApplicationsService::from_dirs(vec![dir.path().to_path_buf()], MatchWeights::default());
        let windows = WindowRegistry::new();
        let config = LauncherConfig {
            max_results,
            ..LauncherConfig::default()
        };
        (Launcher::new(&config, applications, &windows), windows, dir)
    }

    fn names(launcher: &Launcher) -> Vec<String> {
        launcher
            .controller()
            .results()
            .iter()
            .map(|a| a.name.clone())
            .collect()
    }

    #[test]
    fn test_registers_hidden_window() {
        let (launcher, windows, _dir) = launcher(8);
        assert!(!launcher.is_visible());
        assert!(windows.get("launcher").is_some());
        assert!(launcher.controller().results().is_empty());
    }

    #[test]
    fn test_show_seeds_baseline() {
        let (mut launcher, _windows, _dir) = launcher(3);
        launcher.show();

        assert!(launcher.is_visible());
        assert_eq!(names(&launcher), vec!["Files", "Firefox", "Foot"]);
    }

    #[test]
    fn test_external_show_seeds_baseline() {
        let (launcher, windows, _dir) = launcher(8);
        windows.get("launcher").unwrap().set_visible(true);

        assert!(launcher.is_visible());
        assert_eq!(names(&launcher).len(), 5);
    }

    #[test]
    fn test_configured_cap_above_default_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..12 {
            write_entry(dir.path(), &format!("App{i:02}"), "true");
        }
        let config: crate::config::Config = toml::from_str("[launcher]\nmax_results = 20\n").unwrap();

        let applications =
            ApplicationsService::from_dirs(vec![dir.path().to_path_buf()], MatchWeights::default());
        let windows = WindowRegistry::new();
        let mut launcher = Launcher::new(&config.launcher, applications, &windows);
        launcher.show();

        assert_eq!(names(&launcher).len(), 8);
    }

    #[test]
    fn test_show_when_visible_keeps_query() {
        let (mut launcher, _windows, _dir) = launcher(8);
        launcher.show();
        launcher.handle_action(Action::Insert("thu".into()));
        launcher.show();

        assert_eq!(launcher.controller().query(), "thu");
    }

    #[test]
    fn test_toggle() {
        let (mut launcher, _windows, _dir) = launcher(8);

        launcher.toggle(Some("gimp".into()));
        assert!(launcher.is_visible());
        assert_eq!(names(&launcher), vec!["Gimp"]);

        launcher.toggle(Some("thunar".into()));
        assert_eq!(names(&launcher), vec!["Thunar"]);

        launcher.toggle(None);
        assert!(!launcher.is_visible());
        assert_eq!(launcher.controller().query(), "");
        assert!(launcher.controller().results().is_empty());
    }

    #[test]
    fn test_typing_and_editing() {
        let (mut launcher, _windows, _dir) = launcher(8);
        launcher.show();

        for c in ["g", "i", "m"] {
            assert!(launcher.handle_action(Action::Insert(c.into())));
        }
        assert_eq!(launcher.controller().query(), "gim");
        assert_eq!(names(&launcher), vec!["Gimp"]);

        launcher.handle_action(Action::Backspace);
        assert_eq!(launcher.controller().query(), "gi");

        launcher.handle_action(Action::Insert(" x".into()));
        launcher.handle_action(Action::DeleteWordBack);
        assert_eq!(launcher.controller().query(), "gi ");

        launcher.handle_action(Action::Clear);
        assert_eq!(launcher.controller().query(), "");
        assert_eq!(names(&launcher).len(), 5);
    }

    #[test]
    fn test_actions_ignored_while_hidden() {
        let (mut launcher, _windows, _dir) = launcher(8);
        assert!(!launcher.handle_action(Action::Insert("f".into())));
        assert_eq!(launcher.controller().query(), "");
    }

    #[test]
    fn test_confirm_launches_and_hides() {
        let (mut launcher, _windows, _dir) = launcher(8);
        launcher.set_query("foot");
        assert_eq!(names(&launcher).first().map(String::as_str), Some("Foot"));

        launcher.handle_action(Action::Confirm);
        assert!(!launcher.is_visible());
        assert_eq!(launcher.controller().query(), "");
        assert!(launcher.controller().results().is_empty());
    }

    #[test]
    fn test_confirm_without_results_is_noop() {
        let (mut launcher, _windows, _dir) = launcher(8);
        launcher.set_query("zzzznomatch");

        launcher.handle_action(Action::Confirm);
        assert!(launcher.is_visible());
        assert_eq!(launcher.controller().query(), "zzzznomatch");
    }

    #[test]
    fn test_escape_dismisses() {
        let (mut launcher, _windows, _dir) = launcher(8);
        launcher.set_query("fi");
        launcher.handle_action(Action::Cancel);

        assert!(!launcher.is_visible());
        assert_eq!(launcher.controller().query(), "");
    }

    #[test]
    fn test_click() {
        let (mut launcher, _windows, _dir) = launcher(8);
        launcher.show();

        assert!(launcher.click(42).is_err());
        assert!(launcher.is_visible());

        launcher.click(1).unwrap();
        assert!(!launcher.is_visible());
        assert!(launcher.controller().results().is_empty());
    }

    #[test]
    fn test_launch_after_window_removed() {
        let (mut launcher, windows, _dir) = launcher(8);
        launcher.show();
        windows.remove("launcher");

        launcher.click(0).unwrap();
        assert_eq!(launcher.controller().query(), "");
        assert!(launcher.controller().results().is_empty());
    }

    #[test]
    fn test_apply_config() {
        let (mut launcher, _windows, _dir) = launcher(8);
        launcher.show();
        assert_eq!(names(&launcher).len(), 5);

        launcher.apply_config(&LauncherConfig {
            max_results: 2,
            ..LauncherConfig::default()
        });
        assert_eq!(names(&launcher), vec!["Files", "Firefox"]);
    }

    #[test]
    fn test_delete_word_back() {
        assert_eq!(delete_word_back("foo bar"), "foo ");
        assert_eq!(delete_word_back("foo bar  "), "foo ");
        assert_eq!(delete_word_back("foo"), "");
        assert_eq!(delete_word_back(""), "");
    }
}
