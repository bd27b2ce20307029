//! Launcher configuration.

use serde::{Deserialize, Serialize};
use services::MatchWeights;

use super::controller::DEFAULT_MAX_RESULTS;

/// Launcher window and search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Name the launcher window is registered under (requires restart to change).
    pub window_name: String,
    pub max_results: usize,
    pub placeholder: String,
    pub weights: MatchWeights,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            window_name: "launcher".into(),
            max_results: DEFAULT_MAX_RESULTS,
            placeholder: "Search apps...".into(),
            weights: MatchWeights::default(),
        }
    }
}
