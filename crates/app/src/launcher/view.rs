//! Headless launcher view.
//!
//! Renders the launcher as text lines whenever the window visibility, the
//! query, or the results change, and writes them to the log. Nothing here
//! holds state of its own; it only follows the controller's signals.

use futures_signals::map_ref;
use futures_signals::signal::SignalExt;
use futures_util::StreamExt;
use tracing::debug;

use super::Launcher;
use super::item::{LauncherItem, project};

const SEARCH_ICON: &str = "";

/// Render the launcher body.
///
/// The first line is the entry (query, or the placeholder when empty);
/// each following line is one result, the first marked as the default.
pub fn render(query: &str, placeholder: &str, items: &[LauncherItem]) -> Vec<String> {
    let entry = if query.is_empty() { placeholder } else { query };
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(format!("{SEARCH_ICON}  {entry}"));

    lines.extend(items.iter().map(|item| {
        let marker = if item.index == 0 { '>' } else { ' ' };
        format!("{marker} {}", item.label())
    }));

    lines
}

/// Follow the launcher's signals and log each rendered frame.
///
/// Must be called from within a tokio runtime.
pub fn spawn(launcher: &Launcher) {
    let controller = launcher.controller();
    let frames = map_ref! {
        let visible = launcher.window().visible_signal(),
        let query = controller.query_signal(),
        let placeholder = launcher.placeholder_signal(),
        let results = controller.results_signal() =>
        (*visible).then(|| render(query, placeholder, &project(results)))
    };
    let mut frames = frames.to_stream();

    tokio::spawn(async move {
        while let Some(frame) = frames.next().await {
            match frame {
                Some(lines) => debug!("launcher:\n{}", lines.join("\n")),
                None => debug!("launcher hidden"),
            }
        }
    });
}
