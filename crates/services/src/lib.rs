//! Services for system integration consumed by the launcher.
//!
//! This crate owns the desktop application index (XDG desktop entries,
//! fuzzy matching, launching) and the inotify-based file watcher used to
//! keep the index and configuration fresh.

pub mod applications;
pub mod watcher;

pub use applications::{AppIndex, Application, ApplicationsService, Launch, MatchWeights};
pub use watcher::FileWatcher;

/// Shared services container for all system integrations.
///
/// Created once at startup and handed to the launcher.
#[derive(Debug, Clone)]
pub struct Services {
    pub applications: ApplicationsService,
}

impl Services {
    /// Create and initialize all services.
    ///
    /// Scans the XDG application directories immediately.
    pub fn new(weights: MatchWeights) -> Self {
        Self {
            applications: ApplicationsService::new(weights),
        }
    }
}
