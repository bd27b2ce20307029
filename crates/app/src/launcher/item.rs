//! Display rows for launcher results.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use services::Application;

/// One result row as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LauncherItem {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub icon_path: Option<PathBuf>,
}

impl LauncherItem {
    pub fn new(index: usize, app: &Application) -> Self {
        Self {
            index,
            id: app.id.clone(),
            name: app.name.clone(),
            description: app.description.clone(),
            icon: app.icon_name().map(str::to_string),
            icon_path: app.icon_path.clone(),
        }
    }

    /// Single-line label: name, then the description when present.
    pub fn label(&self) -> String {
        match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => format!("{}  {}", self.name, description),
            None => self.name.clone(),
        }
    }
}

/// Project results into display rows, keeping their order.
pub fn project(results: &[Arc<Application>]) -> Vec<LauncherItem> {
    results
        .iter()
        .enumerate()
        .map(|(index, app)| LauncherItem::new(index, app))
        .collect()
}
