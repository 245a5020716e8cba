//! Hot reload of the configuration file.
//!
//! The parent directory is watched rather than the file itself so editors
//! that save through a rename are picked up too. Only configurations that
//! parse and validate are forwarded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::FailoverConfig;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<FailoverConfig>,
}

fn touches(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == path.file_name())
}

fn reload(path: &Path, tx: &mpsc::UnboundedSender<FailoverConfig>) {
    match load_config(path) {
        Ok(config) => {
            tracing::info!(
                path = %path.display(),
                primary = %config.links.primary,
                backup = %config.links.backup,
                fallback = ?config.links.fallback,
                "Link configuration reloaded"
            );
            // receiver gone means the controller is shutting down
            let _ = tx.send(config);
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Rejected configuration change, keeping the current one")
        }
    }
}

impl ConfigWatcher {
    /// Returns the watcher and the stream of validated configurations.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<FailoverConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Reloads stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let target = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &target) => reload(&target, &update_tx),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(POLL_INTERVAL),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Watching configuration for changes");
        Ok(watcher)
    }
}
