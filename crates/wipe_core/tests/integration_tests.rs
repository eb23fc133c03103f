use std::collections::HashSet;
use std::fs;
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use rand::{thread_rng, RngCore};
use test_case::test_case;

use safe_wipe_core::{
    apply_pass, rename_chain, sanitize_file, sanitize_path, BatchProgress, ErasePattern,
    NoopObserver, OverwriteTarget, ProgressObserver, SanitizeOptions, WipeError, BLOCK_SIZE,
    COMMON_EXTENSIONS, DOD_PASSES, EXTRA_SIZE, NAME_OVERWRITE_ROUNDS,
};

fn generate_random_data(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    thread_rng().fill_bytes(&mut data);
    data
}

/// In-memory overwrite target that counts write and sync calls.
struct MemTarget {
    cursor: Cursor<Vec<u8>>,
    writes: usize,
    syncs: usize,
}

impl MemTarget {
    fn new() -> Self {
        Self {
            cursor: Cursor::new(Vec::new()),
            writes: 0,
            syncs: 0,
        }
    }

    fn contents(&self) -> &[u8] {
        self.cursor.get_ref()
    }
}

impl Write for MemTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.cursor.flush()
    }
}

impl Seek for MemTarget {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl OverwriteTarget for MemTarget {
    fn sync(&mut self) -> io::Result<()> {
        self.syncs += 1;
        Ok(())
    }
}

/// Observer that records every start and done callback.
#[derive(Default)]
struct RecordingObserver {
    started: Mutex<Vec<String>>,
    done: Mutex<Vec<(String, usize, usize)>>,
}

impl ProgressObserver for RecordingObserver {
    fn on_item_start(&self, label: &str) {
        self.started.lock().unwrap().push(label.to_string());
    }

    fn on_item_done(&self, label: &str, completed: usize, total: usize) {
        self.done
            .lock()
            .unwrap()
            .push((label.to_string(), completed, total));
    }
}

#[test_case(0; "empty_file")]
#[test_case(1; "single_byte")]
#[test_case(4096; "exactly_margin")]
#[test_case(8192; "one_block")]
#[test_case(100_000; "many_blocks")]
fn write_calls_per_pass_match_block_math(size: u64) {
    let total = size + EXTRA_SIZE;
    let mut target = MemTarget::new();

    apply_pass(
        &mut target,
        total,
        ErasePattern::Fixed(0x00),
        Path::new("mem"),
    )
    .unwrap();

    let expected = total.div_ceil(BLOCK_SIZE as u64) as usize;
    assert_eq!(target.writes, expected);
    assert_eq!(target.syncs, 1);
    assert_eq!(target.contents().len() as u64, total);
}

#[test]
fn dod_sequence_produces_expected_content_per_pass() {
    let total: u64 = 10_000;
    let mut target = MemTarget::new();

    apply_pass(&mut target, total, DOD_PASSES[0], Path::new("mem")).unwrap();
    assert!(target.contents().iter().all(|&b| b == 0x00));

    apply_pass(&mut target, total, DOD_PASSES[1], Path::new("mem")).unwrap();
    assert!(target.contents().iter().all(|&b| b == 0xFF));

    apply_pass(&mut target, total, DOD_PASSES[2], Path::new("mem")).unwrap();
    assert_eq!(target.contents().len() as u64, total);
    // Random data will not be a uniform fill.
    assert!(target.contents().iter().any(|&b| b != 0xFF));
    assert!(target.contents().iter().any(|&b| b != 0x00));
}

#[test_case(0; "zero_length")]
#[test_case(10; "tiny")]
#[test_case(8192; "block_sized")]
#[test_case(50_000; "multi_block")]
fn sanitize_file_removes_the_entry(size: usize) {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("doomed.bin");
    fs::write(&target, generate_random_data(size)).unwrap();

    let progress = BatchProgress::new(1, &NoopObserver);
    sanitize_file(&target, &progress).unwrap();

    assert!(!target.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(progress.completed(), 1);
}

#[test]
fn sanitize_file_reports_start_and_done() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("report-me.txt");
    fs::write(&target, b"data").unwrap();

    let observer = RecordingObserver::default();
    let progress = BatchProgress::new(1, &observer);
    sanitize_file(&target, &progress).unwrap();

    assert_eq!(
        observer.started.lock().unwrap().as_slice(),
        ["report-me.txt"]
    );
    let done = observer.done.lock().unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!((done[0].1, done[0].2), (1, 1));
    // The done label carries the obfuscated name, not the original.
    assert_ne!(done[0].0, "report-me.txt");
}

#[test]
fn rename_chain_lands_on_catalog_extension() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("visible-name.txt");
    fs::write(&original, b"data").unwrap();

    let renamed = rename_chain(&original, NAME_OVERWRITE_ROUNDS).unwrap();

    assert!(!original.exists());
    assert!(renamed.exists());

    let name = renamed.file_name().unwrap().to_string_lossy();
    let stem = name.split('.').next().unwrap();
    assert_eq!(stem.len(), 32);
    assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
    let extension = &name[stem.len()..];
    assert!(COMMON_EXTENSIONS.contains(&extension));
}

#[test]
fn empty_directory_is_removed_without_pool() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("hollow");
    fs::create_dir(&empty).unwrap();

    let observer = RecordingObserver::default();
    sanitize_path(&empty, &observer, SanitizeOptions::default()).unwrap();

    assert!(!empty.exists());
    // No file ever entered the pipeline.
    assert!(observer.started.lock().unwrap().is_empty());
    assert!(observer.done.lock().unwrap().is_empty());
}

#[test]
fn nested_directories_are_removed_bottom_up() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a");
    let sub = root.join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(root.join("file1"), b"one").unwrap();
    fs::write(sub.join("file2"), b"two").unwrap();

    sanitize_path(&root, &NoopObserver, SanitizeOptions::default()).unwrap();

    // remove_dir on a non-empty directory fails, so success implies
    // sub/ was removed strictly before a/.
    assert!(!root.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn hundred_files_all_processed_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("bulk");
    fs::create_dir(&root).unwrap();

    let mut expected = HashSet::new();
    for i in 0..100 {
        let name = format!("file-{i:03}.dat");
        fs::write(root.join(&name), vec![i as u8; 64]).unwrap();
        expected.insert(name);
    }

    let observer = RecordingObserver::default();
    sanitize_path(&root, &observer, SanitizeOptions::default()).unwrap();

    assert!(!root.exists());

    let started: HashSet<String> = observer.started.lock().unwrap().iter().cloned().collect();
    assert_eq!(started, expected);

    let done = observer.done.lock().unwrap();
    assert_eq!(done.len(), 100);
    assert!(done.iter().all(|(_, _, total)| *total == 100));
    assert_eq!(done.iter().map(|(_, c, _)| *c).max(), Some(100));
}

#[test]
fn injected_failure_fails_batch_after_drain() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("batch");
    fs::create_dir(&root).unwrap();

    for i in 0..100 {
        fs::write(root.join(format!("file-{i:03}.dat")), b"payload").unwrap();
    }
    // A dangling symlink is enumerated as a file but fails its stat.
    #[cfg(unix)]
    std::os::unix::fs::symlink(dir.path().join("void"), root.join("file-037-broken")).unwrap();
    #[cfg(not(unix))]
    return;

    let err = sanitize_path(&root, &NoopObserver, SanitizeOptions::default()).unwrap_err();
    assert!(matches!(err, WipeError::Io { op: "stat", .. }));

    // Every healthy file was still destroyed; only the directory
    // skeleton and the poisoned entry survive the failed batch.
    let survivors: Vec<_> = fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(survivors, ["file-037-broken"]);
}

#[test]
fn stat_failure_on_missing_target() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("ghost");

    let err = sanitize_path(&missing, &NoopObserver, SanitizeOptions::default()).unwrap_err();
    assert!(matches!(err, WipeError::Io { op: "stat", .. }));
}
