//! File watcher service using inotify.
//!
//! Watchers run on a dedicated thread and report debounced change
//! notifications over an unbounded channel. Dropping the receiver stops
//! the watcher at the next event.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use inotify::{EventMask, Inotify, WatchMask};
use tokio::sync::mpsc;

const DEBOUNCE_MS: u64 = 200;

pub struct FileWatcher;

impl FileWatcher {
    /// Watch a single file, e.g. the config file.
    ///
    /// The parent directory is watched so that editors replacing the file
    /// via rename are still noticed.
    pub fn watch(path: PathBuf) -> mpsc::UnboundedReceiver<()> {
        spawn(move |tx| {
            let (dir, name) = watch_target(&path)?;
            run(&[dir.to_path_buf()], tx, move |event_name| {
                event_name == Some(name.as_os_str())
            })
        })
    }

    /// Watch directories for desktop entry changes.
    ///
    /// Directories that do not exist are skipped; the watcher stops with a
    /// warning if none can be watched.
    pub fn watch_dirs(dirs: Vec<PathBuf>) -> mpsc::UnboundedReceiver<()> {
        spawn(move |tx| {
            let existing: Vec<PathBuf> = dirs.into_iter().filter(|d| d.is_dir()).collect();
            run(&existing, tx, is_desktop_file)
        })
    }
}

fn spawn<F>(watch: F) -> mpsc::UnboundedReceiver<()>
where
    F: FnOnce(mpsc::UnboundedSender<()>) -> anyhow::Result<()> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        if let Err(err) = watch(tx) {
            tracing::warn!("File watcher stopped: {:#}", err);
        }
    });
    rx
}

fn run<F>(dirs: &[PathBuf], tx: mpsc::UnboundedSender<()>, relevant: F) -> anyhow::Result<()>
where
    F: Fn(Option<&OsStr>) -> bool,
{
    if dirs.is_empty() {
        return Err(anyhow!("No directories to watch"));
    }

    let mut inotify = Inotify::init().context("Failed to initialize inotify")?;
    for dir in dirs {
        inotify
            .watches()
            .add(
                dir,
                WatchMask::MODIFY
                    | WatchMask::CLOSE_WRITE
                    | WatchMask::CREATE
                    | WatchMask::DELETE
                    | WatchMask::MOVED_FROM
                    | WatchMask::MOVED_TO
                    | WatchMask::MOVE_SELF
                    | WatchMask::DELETE_SELF,
            )
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        tracing::debug!("Watching {}", dir.display());
    }

    let mut buffer = [0u8; 4096];
    let mut last_sent: Option<Instant> = None;

    loop {
        let events = inotify.read_events_blocking(&mut buffer)?;
        let changed = events.into_iter().any(|event| {
            event.mask.contains(EventMask::MOVE_SELF)
                || event.mask.contains(EventMask::DELETE_SELF)
                || relevant(event.name)
        });

        if !changed {
            continue;
        }

        let now = Instant::now();
        let debounce_elapsed = last_sent
            .map(|last| now.duration_since(last) >= Duration::from_millis(DEBOUNCE_MS))
            .unwrap_or(true);
        if debounce_elapsed {
            if tx.send(()).is_err() {
                break;
            }
            last_sent = Some(now);
        }
    }

    Ok(())
}

fn is_desktop_file(name: Option<&OsStr>) -> bool {
    name.map(|n| Path::new(n).extension() == Some(OsStr::new("desktop")))
        .unwrap_or(false)
}

fn watch_target(path: &Path) -> anyhow::Result<(&Path, OsString)> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow!("Path has no parent directory: {}", path.display()))?;
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("Path has no file name: {}", path.display()))?;
    Ok((parent, name.to_os_string()))
}
