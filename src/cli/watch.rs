//! Watch Mode
//!
//! Re-reads the inputs whenever one of the watched files changes, re-evaluates
//! the resolver against them and prints each resulting change event as one
//! JSON line.

use crate::cli::presentation::format_event_line;
use crate::cli::route::RunContext;
use crate::config::ConfigLoader;
use crate::error::ApiError;
use crate::notify::ChangeEvent;
use crate::resolver::SettingsResolver;
use ::notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub struct SettingsWatcher<'a> {
    context: &'a RunContext,
    debounce: Duration,
}

impl<'a> SettingsWatcher<'a> {
    pub fn new(context: &'a RunContext, debounce_ms: u64) -> Self {
        Self {
            context,
            debounce: Duration::from_millis(debounce_ms),
        }
    }

    /// Files whose changes trigger a re-evaluation.
    pub fn watched_files(&self) -> BTreeSet<PathBuf> {
        let root = self.context.workspace_root();
        let inputs = &self.context.config().inputs;
        let absolute = |path: &Path| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            }
        };
        let mut files = BTreeSet::new();
        if let Some(ref preboot) = inputs.preboot {
            files.insert(absolute(preboot));
        }
        if let Some(ref html) = inputs.html {
            files.insert(absolute(html));
        }
        files.insert(ConfigLoader::workspace_config_path(root));
        files
    }

    /// Run until the watcher channel closes.
    pub fn run(&self) -> Result<(), ApiError> {
        let mut resolver = self.context.resolver()?;
        let (_id, events) = resolver.subscribe_channel();

        let (tx, rx) = mpsc::channel();
        let mut watcher = ::notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })
        .map_err(|e| ApiError::WatchFailed(format!("Failed to create watcher: {}", e)))?;

        // Editors replace files on save, so watch the parent directories.
        let files = self.watched_files();
        let directories: BTreeSet<&Path> = files.iter().filter_map(|f| f.parent()).collect();
        for directory in directories {
            watcher
                .watch(directory, RecursiveMode::NonRecursive)
                .map_err(|e| {
                    ApiError::WatchFailed(format!("Failed to watch {:?}: {}", directory, e))
                })?;
        }
        info!(files = ?files, "Watching inputs");

        let mut dirty_since: Option<Instant> = None;
        loop {
            let timeout = match dirty_since {
                Some(since) => self.debounce.saturating_sub(since.elapsed()),
                None => Duration::from_secs(3600),
            };
            match rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    if self.is_relevant(&event, &files) {
                        debug!(paths = ?event.paths, "Input changed");
                        dirty_since = Some(Instant::now());
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if dirty_since.take().is_some() {
                        self.reevaluate(&mut resolver);
                        print_events(&events);
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }
        }
        Ok(())
    }

    fn is_relevant(&self, event: &Event, files: &BTreeSet<PathBuf>) -> bool {
        matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) && event.paths.iter().any(|p| files.contains(p))
    }

    /// Re-read the inputs into `resolver`. Read failures keep the previous
    /// settings in place.
    pub fn reevaluate(&self, resolver: &mut SettingsResolver) {
        let mut env = match self.context.environment_without_store() {
            Ok(env) => env,
            Err(e) => {
                warn!(error = %e, "Keeping previous settings; inputs could not be read");
                return;
            }
        };
        // The store stays open for the lifetime of the resolver.
        env.storage = resolver.environment().storage.clone();
        if let Err(e) = resolver.reevaluate(env) {
            warn!(error = %e, "Keeping previous settings; re-evaluation failed");
        }
    }
}

fn print_events(events: &Receiver<ChangeEvent>) {
    for event in events.try_iter() {
        match format_event_line(&event) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!(error = %e, "Failed to render change event"),
        }
    }
}
