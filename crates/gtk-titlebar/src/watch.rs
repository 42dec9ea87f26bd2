//! File system notifications for the `watch` command.
//!
//! Editors usually save by writing a temporary file and renaming it over the
//! original, which replaces the inode a direct file watch would follow. The
//! watcher therefore watches each input's parent directory and filters events
//! down to the input file names.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches a fixed set of input files for changes.
pub struct InputWatcher {
    // Dropping the watcher stops event delivery.
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    targets: Vec<PathBuf>,
    settle: Duration,
}

impl InputWatcher {
    /// Start watching `paths`. Each file may be missing, but its directory
    /// must exist.
    ///
    /// `settle` is how long the watcher waits for the burst of events a
    /// single save produces to die down before reporting a change.
    pub fn new<'a, I>(paths: I, settle: Duration) -> notify::Result<Self>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let (tx, events) = channel();
        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })?;

        let mut dirs: Vec<PathBuf> = Vec::new();
        let mut targets = Vec::new();
        for path in paths {
            let (dir, name) = split(path)?;
            targets.push(dir.join(name));
            if !dirs.contains(&dir) {
                watcher.watch(&dir, RecursiveMode::NonRecursive)?;
                tracing::debug!(dir = %dir.display(), "watching directory");
                dirs.push(dir);
            }
        }

        Ok(Self {
            _watcher: watcher,
            events,
            targets,
            settle,
        })
    }

    /// The files this watcher reports on, with canonical directories.
    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    /// Block until one of the target files changes.
    ///
    /// Returns `false` once no more events can arrive.
    pub fn next_change(&self) -> bool {
        loop {
            match self.events.recv() {
                Ok(Ok(event)) if is_relevant(&event, &self.targets) => {
                    tracing::debug!(paths = ?event.paths, kind = ?event.kind, "input changed");
                    self.settle();
                    return true;
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "file watcher error"),
                Err(_) => return false,
            }
        }
    }

    /// Swallow the rest of the current burst of events.
    fn settle(&self) {
        loop {
            match self.events.recv_timeout(self.settle) {
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}

/// True when `event` creates or modifies one of `targets`.
pub fn is_relevant(event: &Event, targets: &[PathBuf]) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|path| targets.contains(path))
}

/// Canonical parent directory and file name of `path`.
fn split(path: &Path) -> notify::Result<(PathBuf, PathBuf)> {
    let name = path
        .file_name()
        .ok_or_else(|| notify::Error::generic(&format!("not a file path: {}", path.display())))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = fs::canonicalize(parent).map_err(|e| notify::Error::io(e).add_path(parent.into()))?;
    Ok((dir, PathBuf::from(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind, RenameMode};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    fn targets() -> Vec<PathBuf> {
        vec![PathBuf::from("/home/u/.config/Code/User/settings.json")]
    }

    #[test]
    fn create_and_modify_of_a_target_are_relevant() {
        let path = "/home/u/.config/Code/User/settings.json";
        assert!(is_relevant(
            &event(EventKind::Create(CreateKind::File), path),
            &targets()
        ));
        assert!(is_relevant(
            &event(
                EventKind::Modify(ModifyKind::Data(DataChange::Content)),
                path
            ),
            &targets()
        ));
    }

    #[test]
    fn rename_over_a_target_is_relevant() {
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("/home/u/.config/Code/User/.settings.json.tmp"))
            .add_path(PathBuf::from("/home/u/.config/Code/User/settings.json"));
        assert!(is_relevant(&event, &targets()));
    }

    #[test]
    fn other_files_and_removals_are_ignored() {
        assert!(!is_relevant(
            &event(
                EventKind::Modify(ModifyKind::Data(DataChange::Content)),
                "/home/u/.config/Code/User/keybindings.json"
            ),
            &targets()
        ));
        assert!(!is_relevant(
            &event(
                EventKind::Remove(RemoveKind::File),
                "/home/u/.config/Code/User/settings.json"
            ),
            &targets()
        ));
    }

    #[test]
    fn targets_use_canonical_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let watcher = InputWatcher::new([path.as_path()], Duration::from_millis(10)).unwrap();
        let expected = fs::canonicalize(dir.path()).unwrap().join("settings.json");
        assert_eq!(watcher.targets(), &[expected]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let path = Path::new("/nonexistent/dir/settings.json");
        assert!(InputWatcher::new([path], Duration::from_millis(10)).is_err());
    }

    #[test]
    fn reports_a_write_to_a_watched_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{}").unwrap();

        let watcher = InputWatcher::new([path.as_path()], Duration::from_millis(50)).unwrap();
        fs::write(dir.path().join("unrelated.json"), "{}").unwrap();
        fs::write(&path, r#"{ "gtkTitleBar.mode": "dark" }"#).unwrap();

        assert!(watcher.next_change());
    }
}
