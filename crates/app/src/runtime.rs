//! Event loop driving the launcher from IPC requests and file watchers.

use std::future;

use services::FileWatcher;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::ipc::{IpcReceiver, handle_message};
use crate::state::AppState;

type ChangeReceiver = mpsc::UnboundedReceiver<()>;

/// Serve requests until the IPC listener closes or the process is interrupted.
pub async fn run(mut state: AppState, mut requests: IpcReceiver) {
    let mut app_changes = applications_watcher(&state);
    let mut config_changes = config_watcher(&state);

    loop {
        tokio::select! {
            message = requests.recv() => match message {
                Some(message) => handle_message(message, &mut state),
                None => {
                    warn!("IPC listener closed");
                    break;
                }
            },
            changed = next_change(&mut app_changes) => match changed {
                Some(()) => {
                    info!("Desktop entries changed, rescanning");
                    state.refresh_applications();
                }
                None => app_changes = None,
            },
            changed = next_change(&mut config_changes) => match changed {
                Some(()) => {
                    info!("Config file changed, reloading");
                    if let Some(config) = Config::reload() {
                        state.apply_config(config);
                    }
                }
                None => config_changes = None,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }
}

fn applications_watcher(state: &AppState) -> Option<ChangeReceiver> {
    if !state.config().watch_applications {
        debug!("Application watching disabled");
        return None;
    }
    let dirs = state.services().applications.dirs().to_vec();
    Some(FileWatcher::watch_dirs(dirs))
}

fn config_watcher(state: &AppState) -> Option<ChangeReceiver> {
    if !state.config().watch_config {
        debug!("Config hot reload disabled");
        return None;
    }
    match Config::path() {
        Ok(path) => Some(FileWatcher::watch(path)),
        Err(err) => {
            warn!("Failed to determine config path for hot reload: {}", err);
            None
        }
    }
}

/// Wait for the next change; pends forever once the watcher is gone.
async fn next_change(receiver: &mut Option<ChangeReceiver>) -> Option<()> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => future::pending().await,
    }
}
