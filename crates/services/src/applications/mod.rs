//! Applications service for indexing and launching desktop applications.
//!
//! Desktop entries are scanned from the standard XDG directories, ranked
//! with a fuzzy matcher, and launched detached from the shell process.

mod desktop_entry;
pub mod icons;
mod matching;

use std::collections::HashSet;
use std::fs;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use futures_signals::signal::{Mutable, MutableSignalCloned};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

pub use desktop_entry::{parse_desktop_entry, strip_field_codes};
pub use matching::{MatchWeights, rank};

/// Terminal used for `Terminal=true` entries when `$TERMINAL` is unset.
const FALLBACK_TERMINAL: &str = "xterm";

/// Something that can be started without waiting for the outcome.
pub trait Launch {
    /// Start the application. Success or failure is not reported back.
    fn launch(&self);
}

impl<T: Launch + ?Sized> Launch for Arc<T> {
    fn launch(&self) {
        (**self).launch();
    }
}

/// A searchable collection of launchable applications.
pub trait AppIndex {
    type App: Launch + Clone;

    /// Return applications matching `pattern`, best match first.
    ///
    /// An empty pattern yields every application in baseline order.
    fn fuzzy_query(&self, pattern: &str) -> Vec<Self::App>;
}

/// A desktop application entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Desktop file ID, e.g. `org.mozilla.firefox.desktop`.
    pub id: String,
    pub name: String,
    /// Comment, or GenericName when no comment is present.
    pub description: Option<String>,
    /// Icon name or absolute path.
    pub icon: Option<String>,
    /// Icon file resolved when the entry was scanned.
    pub icon_path: Option<PathBuf>,
    /// Raw `Exec` value, field codes included.
    pub exec: String,
    pub keywords: Vec<String>,
    /// Whether the application must run inside a terminal emulator.
    pub terminal: bool,
    pub desktop_file: PathBuf,
}

impl Application {
    /// The shell command used to start the application.
    pub fn command_line(&self) -> String {
        let command = strip_field_codes(&self.exec);
        if !self.terminal {
            return command;
        }

        let terminal = std::env::var("TERMINAL")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_TERMINAL.to_string());
        format!("{terminal} -e {command}")
    }

    /// Basename of the program in the `Exec` line.
    pub fn executable(&self) -> Option<&str> {
        let program = self.exec.split_whitespace().next()?;
        let program = program.trim_matches('"');
        Path::new(program).file_name().and_then(|s| s.to_str())
    }

    /// Get the icon name for lookup (without path or extension).
    pub fn icon_name(&self) -> Option<&str> {
        self.icon.as_deref().map(|i| {
            if i.contains('/') {
                Path::new(i)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(i)
            } else {
                i
            }
        })
    }
}

impl Launch for Application {
    fn launch(&self) {
        let command = self.command_line();
        let name = self.name.clone();

        thread::spawn(move || {
            debug!("Launching application: {} ({})", name, command);

            let spawned = Command::new("sh")
                .args(["-c", &command])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .process_group(0)
                .spawn();

            match spawned {
                Ok(mut child) => {
                    debug!("Application launched: {} (pid {})", name, child.id());
                    if let Err(e) = child.wait() {
                        warn!("Failed to reap {}: {}", name, e);
                    }
                }
                Err(e) => error!("Failed to launch {}: {}", name, e),
            }
        });
    }
}

/// Service for indexing installed applications.
///
/// Clones share the same application list, so a refresh is visible to
/// every holder.
#[derive(Debug, Clone)]
pub struct ApplicationsService {
    apps: Mutable<Vec<Arc<Application>>>,
    weights: Mutable<MatchWeights>,
    dirs: Arc<Vec<PathBuf>>,
}

impl ApplicationsService {
    /// Create a service by scanning the XDG application directories.
    pub fn new(weights: MatchWeights) -> Self {
        Self::from_dirs(application_dirs(), weights)
    }

    /// Create a service scanning `dirs`, highest priority first.
    pub fn from_dirs(dirs: Vec<PathBuf>, weights: MatchWeights) -> Self {
        let apps = scan(&dirs);
        debug!("Found {} applications", apps.len());
        Self {
            apps: Mutable::new(apps),
            weights: Mutable::new(weights),
            dirs: Arc::new(dirs),
        }
    }

    /// Directories this service scans.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Get a signal that emits when the application list changes.
    pub fn subscribe(&self) -> MutableSignalCloned<Vec<Arc<Application>>> {
        self.apps.signal_cloned()
    }

    /// Get all applications in baseline order.
    pub fn get(&self) -> Vec<Arc<Application>> {
        self.apps.get_cloned()
    }

    /// Find an application by desktop file ID.
    pub fn find_by_id(&self, id: &str) -> Option<Arc<Application>> {
        self.apps.lock_ref().iter().find(|app| app.id == id).cloned()
    }

    /// Replace the match weights used by subsequent queries.
    pub fn set_weights(&self, weights: MatchWeights) {
        self.weights.set_neq(weights);
    }

    /// Rescan for applications.
    pub fn refresh(&self) {
        let apps = scan(&self.dirs);
        debug!("Refreshed applications, found {}", apps.len());
        self.apps.set(apps);
    }
}

impl Default for ApplicationsService {
    fn default() -> Self {
        Self::new(MatchWeights::default())
    }
}

impl AppIndex for ApplicationsService {
    type App = Arc<Application>;

    fn fuzzy_query(&self, pattern: &str) -> Vec<Arc<Application>> {
        let apps = self.apps.lock_ref();
        rank(&apps, pattern, self.weights.get())
    }
}

/// Get XDG application directories in priority order.
pub fn application_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(data_home) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        dirs.push(PathBuf::from(data_home).join("applications"));
    } else if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".local/share/applications"));
    }

    if let Some(data_dirs) = std::env::var_os("XDG_DATA_DIRS").filter(|v| !v.is_empty()) {
        for dir in std::env::split_paths(&data_dirs) {
            dirs.push(dir.join("applications"));
        }
    } else {
        dirs.push(PathBuf::from("/usr/local/share/applications"));
        dirs.push(PathBuf::from("/usr/share/applications"));
    }

    dirs
}

/// Scan `dirs` for desktop entries, returning them in baseline order.
///
/// The first directory providing a desktop file ID wins, even when that
/// entry is hidden, so user entries can mask system ones.
pub fn scan(dirs: &[PathBuf]) -> Vec<Arc<Application>> {
    let mut seen = HashSet::new();
    let mut apps = Vec::new();

    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }

        for entry in WalkDir::new(dir).follow_links(true).into_iter().flatten() {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().map(|e| e != "desktop").unwrap_or(true)
            {
                continue;
            }

            let Some(id) = desktop_file_id(dir, path) else {
                continue;
            };
            if !seen.insert(id.clone()) {
                continue;
            }

            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    debug!("Skipping unreadable desktop file {}: {}", path.display(), e);
                    continue;
                }
            };

            if let Some(mut app) = parse_desktop_entry(&id, path, &content) {
                app.icon_path = app.icon.as_deref().and_then(icons::lookup_icon);
                apps.push(Arc::new(app));
            }
        }
    }

    apps.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    apps
}

/// Desktop file ID: the path below the applications dir, `/` replaced by `-`.
fn desktop_file_id(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("-"))
}
