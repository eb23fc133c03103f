use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;

use tracing::{debug, warn};

use crate::error::WipeError;
use crate::obfuscate::{self, NAME_OVERWRITE_ROUNDS};
use crate::overwrite;
use crate::progress::{BatchProgress, ProgressObserver};

/// Number of concurrent workers processing files in a directory batch.
pub const MAX_WORKERS: usize = 5;

/// How directory-name obfuscation failures are handled during cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenamePolicy {
    /// Log a warning and remove the directory under the last name that
    /// still exists.
    #[default]
    BestEffort,
    /// Treat a failed directory rename as fatal to the batch.
    Strict,
}

/// Options for a sanitization batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizeOptions {
    /// Policy applied to directory renames during cleanup.
    pub rename_policy: RenamePolicy,
}

/// Sanitize `path`, dispatching on its filesystem type.
///
/// Files run through the single-file pipeline with a batch total of one;
/// directories run through the concurrent tree sanitizer.
pub fn sanitize_path(
    path: &Path,
    observer: &dyn ProgressObserver,
    options: SanitizeOptions,
) -> Result<(), WipeError> {
    let metadata = fs::metadata(path).map_err(|e| WipeError::io("stat", path, e))?;
    if metadata.is_dir() {
        sanitize_dir(path, observer, options)
    } else {
        let progress = BatchProgress::new(1, observer);
        overwrite::sanitize_file(path, &progress)
    }
}

/// Sanitize a directory tree.
///
/// The tree is walked once to freeze the progress total, then a fixed
/// pool of [`MAX_WORKERS`] workers drains a shared queue of file paths,
/// each claimed path exclusively owned by one worker for its entire
/// pipeline. After the pool drains, directories are renamed and removed
/// strictly bottom-up, so a parent is never removed before its
/// descendants. Worker failures are collected in detection order and the
/// batch fails with the first one; files removed before the failure stay
/// removed.
pub fn sanitize_dir(
    root: &Path,
    observer: &dyn ProgressObserver,
    options: SanitizeOptions,
) -> Result<(), WipeError> {
    let total = count_files(root)?;

    if total == 0 {
        let current = obfuscate_dir(root, options.rename_policy)?;
        return fs::remove_dir_all(&current).map_err(|e| WipeError::io("remove", &current, e));
    }

    debug!("sanitizing '{}' ({} files)", root.display(), total);

    let progress = BatchProgress::new(total, observer);
    let errors = ErrorSink::default();
    let (sender, receiver) = mpsc::channel::<PathBuf>();
    let receiver = Mutex::new(receiver);

    thread::scope(|s| {
        for _ in 0..MAX_WORKERS {
            s.spawn(|| loop {
                // Pull-based claim: holding the lock only for the
                // receive keeps workers independent during I/O.
                let task = receiver
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .recv();
                match task {
                    Ok(path) => {
                        if let Err(err) = overwrite::sanitize_file(&path, &progress) {
                            errors.record(err);
                        }
                    }
                    // Queue closed and drained.
                    Err(_) => break,
                }
            });
        }

        // Producer: enumerate files into the queue; dropping the sender
        // closes it, and leaving the scope joins every worker.
        if let Err(err) = push_files(root, &sender) {
            errors.record(err);
        }
        drop(sender);
    });

    if let Some(first) = errors.into_first() {
        return Err(first);
    }

    // Directory cleanup starts only after every worker has exited.
    let mut dirs = vec![root.to_path_buf()];
    collect_dirs(root, &mut dirs)?;
    for dir in dirs.iter().rev() {
        let current = obfuscate_dir(dir, options.rename_policy)?;
        fs::remove_dir(&current).map_err(|e| WipeError::io("remove", &current, e))?;
    }

    Ok(())
}

/// Obfuscate a directory's name according to `policy`, returning the
/// path all further operations must target.
fn obfuscate_dir(dir: &Path, policy: RenamePolicy) -> Result<PathBuf, WipeError> {
    match obfuscate::rename_chain(dir, NAME_OVERWRITE_ROUNDS) {
        Ok(renamed) => Ok(renamed),
        Err(err) if policy == RenamePolicy::BestEffort => {
            warn!("could not obfuscate directory name: {err}");
            Ok(err.reached)
        }
        Err(err) => Err(err.into()),
    }
}

/// Collects worker failures in detection order. The batch fails with the
/// first one; the rest are logged once the pool drains.
#[derive(Default)]
struct ErrorSink {
    errors: Mutex<Vec<WipeError>>,
}

impl ErrorSink {
    fn record(&self, err: WipeError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(err);
    }

    fn into_first(self) -> Option<WipeError> {
        let mut errors = self
            .errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        for extra in errors.iter().skip(1) {
            warn!("additional failure after the first: {extra}");
        }
        if errors.is_empty() {
            None
        } else {
            Some(errors.remove(0))
        }
    }
}

/// Depth-first pre-order walk over everything beneath `dir`; the root
/// itself is not visited. Symlinks are reported as non-directories and
/// never followed.
fn walk_tree(
    dir: &Path,
    visit: &mut dyn FnMut(&Path, bool) -> Result<(), WipeError>,
) -> Result<(), WipeError> {
    let entries = fs::read_dir(dir).map_err(|e| WipeError::walk(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| WipeError::walk(dir, e))?;
        let path = entry.path();
        let is_dir = entry
            .file_type()
            .map_err(|e| WipeError::walk(&path, e))?
            .is_dir();
        visit(&path, is_dir)?;
        if is_dir {
            walk_tree(&path, visit)?;
        }
    }
    Ok(())
}

/// Count non-directory entries beneath `root`. This count becomes the
/// frozen progress total for the batch.
fn count_files(root: &Path) -> Result<usize, WipeError> {
    let mut count = 0;
    walk_tree(root, &mut |_, is_dir| {
        if !is_dir {
            count += 1;
        }
        Ok(())
    })?;
    Ok(count)
}

fn push_files(root: &Path, sender: &mpsc::Sender<PathBuf>) -> Result<(), WipeError> {
    walk_tree(root, &mut |path, is_dir| {
        if !is_dir {
            // Send cannot fail while the workers hold the receiver.
            let _ = sender.send(path.to_path_buf());
        }
        Ok(())
    })
}

/// Collect every directory beneath `root` in pre-order; iterating the
/// result in reverse yields strict bottom-up order.
fn collect_dirs(root: &Path, dirs: &mut Vec<PathBuf>) -> Result<(), WipeError> {
    walk_tree(root, &mut |path, is_dir| {
        if is_dir {
            dirs.push(path.to_path_buf());
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_best_effort() {
        assert_eq!(
            SanitizeOptions::default().rename_policy,
            RenamePolicy::BestEffort
        );
    }

    #[test]
    fn error_sink_retains_first_error() {
        let sink = ErrorSink::default();
        sink.record(WipeError::io(
            "open",
            Path::new("first"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        ));
        sink.record(WipeError::io(
            "open",
            Path::new("second"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        ));

        let first = sink.into_first().unwrap();
        assert!(matches!(
            first,
            WipeError::Io { ref path, .. } if path == Path::new("first")
        ));
    }

    #[test]
    fn collect_dirs_is_pre_order() {
        let dir = tempfile::tempdir().unwrap();
        let outer = dir.path().join("outer");
        let inner = outer.join("inner");
        fs::create_dir_all(&inner).unwrap();

        let mut dirs = vec![dir.path().to_path_buf()];
        collect_dirs(dir.path(), &mut dirs).unwrap();

        assert_eq!(dirs, vec![dir.path().to_path_buf(), outer.clone(), inner]);
    }
}
