//! # SafeWipe Core - Forensic-Resistant File Deletion
//!
//! This crate provides the sanitization engine for the SafeWipe secure
//! deletion tool. It destroys file content through multiple overwrite
//! passes and obscures filesystem metadata before removing entries:
//!
//! - DoD 5220.22-M and Gutmann-style overwrite-pass sequences plus a
//!   final standalone random pass
//! - Block-wise overwriting with a durable flush after every pass
//! - Name obfuscation through chains of random renames before removal
//! - A concurrent directory-tree sanitizer with a fixed worker pool and
//!   pluggable progress reporting
//!
//! ## Ordering Guarantees
//!
//! The pipeline upholds a strict I/O order for every entry:
//!
//! 1. An entry is renamed before its content is overwritten; once
//!    renamed, all further operations target the new path.
//! 2. A file is never truncated or removed before every configured pass
//!    has completed.
//! 3. A directory is never removed before every descendant beneath it
//!    has been removed.
//!
//! ## Limits
//!
//! Overwriting is logical: storage that retains old physical data
//! irrespective of logical overwrites (wear-leveled flash, copy-on-write
//! or journaled filesystems, snapshots, backups) is out of scope. The
//! crate guarantees only that the file content and directory-entry name
//! it directly controls are overwritten and renamed through the
//! specified sequence before removal.
//!
//! ## Usage Example
//!
//! ```no_run
//! use safe_wipe_core::{sanitize_path, NoopObserver, SanitizeOptions};
//! use std::path::Path;
//!
//! // Irreversibly destroy a file or a whole directory tree.
//! sanitize_path(
//!     Path::new("/tmp/classified"),
//!     &NoopObserver,
//!     SanitizeOptions::default(),
//! )
//! .unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error taxonomy for the sanitization core
///
/// Every failure carries the operation and path that produced it:
/// - I/O failures (stat, open, write, flush, truncate, remove)
/// - Rename failures, with the authoritative current path
/// - Entropy-source and tree-traversal failures
pub mod error;

/// Name obfuscation through random rename chains
///
/// Renames an entry several times to random hex identifiers with
/// extensions drawn from a catalog of common file types, reducing the
/// recoverability of the original name from filesystem metadata.
pub mod obfuscate;

/// Multi-pass overwrite engine
///
/// Writes erase patterns across a file's byte range in fixed-size
/// blocks with a durable flush per pass, and drives the complete
/// single-file pipeline: rename, overwrite, truncate, remove.
pub mod overwrite;

/// Overwrite-pass catalog
///
/// Defines the erase-pattern type and the fixed DoD and Gutmann-style
/// pass sequences, plus cryptographically secure random data.
pub mod patterns;

/// Batch progress tracking and the pluggable observer capability
///
/// A frozen total, an atomically increasing completed count, and an
/// injectable observer; the default console renderer lives in the CLI.
pub mod progress;

/// Concurrent directory-tree sanitizer
///
/// Enumerates a tree, runs a bounded worker pool over its files, then
/// renames and removes directories strictly bottom-up.
pub mod sanitizer;

// Re-export commonly used types and functions
pub use error::{RenameChainError, WipeError};

pub use obfuscate::{rename_chain, COMMON_EXTENSIONS, NAME_OVERWRITE_ROUNDS};

pub use overwrite::{apply_pass, sanitize_file, OverwriteTarget, BLOCK_SIZE, EXTRA_SIZE};

pub use patterns::{
    random_block, ErasePattern, PassSequence, DOD_PASSES, FINAL_PASS, GUTMANN_PASSES,
};

pub use progress::{BatchProgress, NoopObserver, ProgressObserver};

pub use sanitizer::{sanitize_dir, sanitize_path, RenamePolicy, SanitizeOptions, MAX_WORKERS};
