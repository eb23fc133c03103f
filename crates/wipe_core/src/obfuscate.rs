use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RenameChainError, WipeError};
use crate::patterns::fill_random;

/// Number of rename rounds applied to an entry before it is removed.
pub const NAME_OVERWRITE_ROUNDS: usize = 3;

/// Extensions drawn at random during renaming, chosen so sanitized
/// remnants blend with ordinary file types.
pub const COMMON_EXTENSIONS: &[&str] = &[
    ".txt", ".doc", ".docx", ".pdf", ".xls", ".xlsx", ".ppt", ".pptx",
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg", ".psd",
    ".mp3", ".wav", ".wma", ".aac", ".ogg", ".flac", ".m4a", ".mid",
    ".mp4", ".avi", ".mov", ".wmv", ".flv", ".mkv", ".webm", ".m4v",
    ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".iso", ".cab",
    ".exe", ".dll", ".sys", ".msi", ".bat", ".cmd", ".reg", ".ini",
    ".html", ".htm", ".css", ".js", ".xml", ".json", ".yaml", ".sql",
    ".php", ".py", ".rb", ".sh", ".c", ".cpp", ".h", ".hpp", ".java",
    ".class", ".jar", ".war", ".ear", ".go", ".rs", ".swift", ".kt",
    ".apk", ".ipa", ".app", ".deb", ".rpm", ".pkg", ".dmg",
];

/// Generate a random 16-byte identifier, hex-encoded.
fn random_name() -> Result<String, WipeError> {
    let mut bytes = [0u8; 16];
    fill_random(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// Pick an extension uniformly at random from the catalog.
fn random_extension() -> Result<&'static str, WipeError> {
    let mut bytes = [0u8; 4];
    fill_random(&mut bytes)?;
    let index = u32::from_le_bytes(bytes) as usize % COMMON_EXTENSIONS.len();
    Ok(COMMON_EXTENSIONS[index])
}

/// Rename `path` through `rounds` random intermediate names inside its
/// existing parent directory, returning the final path.
///
/// Each round renames the entry to a fresh hex identifier with a random
/// common extension; the next round operates on the just-produced path.
/// On failure the returned [`RenameChainError`] carries the last path
/// that still exists, which the caller must treat as authoritative.
pub fn rename_chain(path: &Path, rounds: usize) -> Result<PathBuf, RenameChainError> {
    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut current = path.to_path_buf();

    for _ in 0..rounds {
        let next = match obfuscated_path(&parent) {
            Ok(next) => next,
            Err(source) => {
                return Err(RenameChainError {
                    reached: current,
                    source,
                })
            }
        };

        if let Err(err) = fs::rename(&current, &next) {
            return Err(RenameChainError {
                reached: current.clone(),
                source: WipeError::Rename {
                    path: current,
                    source: err,
                },
            });
        }

        current = next;
    }

    Ok(current)
}

fn obfuscated_path(parent: &Path) -> Result<PathBuf, WipeError> {
    let name = random_name()?;
    let extension = random_extension()?;
    Ok(parent.join(format!("{name}{extension}")))
}
