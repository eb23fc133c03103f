use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::error::WipeError;
use crate::obfuscate::{self, NAME_OVERWRITE_ROUNDS};
use crate::patterns::{ErasePattern, DOD_PASSES, FINAL_PASS, GUTMANN_PASSES};
use crate::progress::BatchProgress;

/// Size of each write block in bytes.
pub const BLOCK_SIZE: usize = 8192;

/// Additional bytes written beyond the original file size, covering
/// filesystem block rounding and slack space.
pub const EXTRA_SIZE: u64 = 4096;

/// A writable destination for overwrite passes.
///
/// `sync` must force written bytes to stable storage; in-memory test
/// doubles may make it a no-op.
pub trait OverwriteTarget: Write + Seek {
    /// Force written bytes to stable storage.
    fn sync(&mut self) -> io::Result<()>;
}

impl OverwriteTarget for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

/// Write `pattern` across the byte range `[0, total_bytes)` of `target`
/// in [`BLOCK_SIZE`] blocks (the last block truncated to the remainder),
/// then issue a durable flush.
///
/// `path` is used for error context only. A failed write or flush aborts
/// the remaining passes for this file; bytes already written are left in
/// place.
pub fn apply_pass<T: OverwriteTarget>(
    target: &mut T,
    total_bytes: u64,
    pattern: ErasePattern,
    path: &Path,
) -> Result<(), WipeError> {
    target
        .seek(SeekFrom::Start(0))
        .map_err(|e| WipeError::io("seek", path, e))?;

    let mut block = [0u8; BLOCK_SIZE];
    if let ErasePattern::Fixed(_) = pattern {
        pattern.fill(&mut block)?;
    }

    let mut remaining = total_bytes;
    while remaining > 0 {
        let len = remaining.min(BLOCK_SIZE as u64) as usize;
        if pattern == ErasePattern::Random {
            pattern.fill(&mut block[..len])?;
        }
        target
            .write_all(&block[..len])
            .map_err(|e| WipeError::io("write", path, e))?;
        remaining -= len as u64;
    }

    target.sync().map_err(|e| WipeError::io("flush", path, e))
}

/// Securely erase a single file.
///
/// The pipeline obfuscates the name first, then overwrites the content
/// with the DoD sequence, the Gutmann sequence and one standalone random
/// pass, truncates back to the original size, and removes the entry. All
/// stages are mandatory and sequential; zero-length files still receive
/// margin-sized writes. Any stage failure stops the remaining stages for
/// this file, which may be left behind overwritten but not removed,
/// under its most recent name.
pub fn sanitize_file(path: &Path, progress: &BatchProgress<'_>) -> Result<(), WipeError> {
    progress.started(&display_name(path));

    let metadata = fs::metadata(path).map_err(|e| WipeError::io("stat", path, e))?;
    let size = metadata.len();

    // Obfuscate the directory entry before touching content; every
    // operation from here on targets the renamed path.
    let current = obfuscate::rename_chain(path, NAME_OVERWRITE_ROUNDS)?;

    let mut file = OpenOptions::new()
        .write(true)
        .open(&current)
        .map_err(|e| WipeError::io("open", &current, e))?;

    let target_bytes = size + EXTRA_SIZE;
    debug!(
        "overwriting '{}' ({} bytes over {} passes)",
        current.display(),
        target_bytes,
        DOD_PASSES.len() + GUTMANN_PASSES.len() + 1
    );

    for pattern in DOD_PASSES
        .iter()
        .chain(GUTMANN_PASSES.iter())
        .copied()
        .chain(std::iter::once(FINAL_PASS))
    {
        apply_pass(&mut file, target_bytes, pattern, &current)?;
    }

    file.set_len(size)
        .map_err(|e| WipeError::io("truncate", &current, e))?;
    drop(file);

    fs::remove_file(&current).map_err(|e| WipeError::io("remove", &current, e))?;

    progress.finished(&display_name(&current));
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
