use dupepurge::actions::{DeleteError, PermanentRemover, PurgeMode};
use dupepurge::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupepurge::stats::RunStatistics;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn finder(prefix: &Path, mode: PurgeMode) -> DuplicateFinder {
    let config = FinderConfig::default()
        .with_delete_prefix(prefix.to_string_lossy())
        .with_mode(mode);
    DuplicateFinder::new(config).unwrap()
}

fn run(finder: &DuplicateFinder, root: &Path) -> RunStatistics {
    finder
        .run(&[root.to_path_buf()], &mut PermanentRemover, &mut std::io::sink())
        .unwrap()
}

#[test]
fn test_prefix_matching_every_copy_is_refused() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "dup/A/file.bin", b"payload");
    let b = write(dir.path(), "dup/B/file.bin", b"payload");

    let stats = run(&finder(&dir.path().join("dup"), PurgeMode::Execute), dir.path());

    assert_eq!(stats.duplicate_sets, 1);
    assert_eq!(stats.duplicates_removed, 0);
    assert_eq!(stats.bytes_reclaimed, 0);
    assert_eq!(stats.refused_sets, 1);
    assert!(a.exists());
    assert!(b.exists());
}

#[test]
fn test_prefix_matching_one_copy_removes_it() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "A/file.bin", b"payload");
    let b = write(dir.path(), "B/file.bin", b"payload");

    let stats = run(&finder(&dir.path().join("A"), PurgeMode::Execute), dir.path());

    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(stats.bytes_reclaimed, 7);
    assert!(!a.exists());
    assert!(b.exists());
}

#[test]
fn test_report_only_touches_nothing() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "A/file.bin", b"payload");
    let b = write(dir.path(), "B/file.bin", b"payload");

    let stats = run(&finder(&dir.path().join("A"), PurgeMode::ReportOnly), dir.path());

    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(stats.bytes_reclaimed, 7);
    assert!(a.exists());
    assert!(b.exists());
}

#[test]
fn test_second_run_removes_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep/x.dat", b"0123456789");
    write(dir.path(), "old/x.dat", b"0123456789");
    write(dir.path(), "old/nested/x.dat", b"0123456789");

    let finder = finder(&dir.path().join("old"), PurgeMode::Execute);
    let first = run(&finder, dir.path());
    let second = run(&finder, dir.path());

    assert_eq!(first.duplicates_removed, 2);
    assert_eq!(first.bytes_reclaimed, 20);
    assert_eq!(second.duplicates_removed, 0);
    assert_eq!(second.duplicate_sets, 0);
    assert!(dir.path().join("keep/x.dat").exists());
}

#[test]
fn test_empty_prefix_never_removes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "A/f", b"same");
    write(dir.path(), "B/f", b"same");

    let finder = DuplicateFinder::new(FinderConfig::default().with_mode(PurgeMode::Execute)).unwrap();
    let stats = run(&finder, dir.path());

    assert_eq!(stats.duplicate_sets, 1);
    assert_eq!(stats.duplicates_removed, 0);
    assert_eq!(stats.refused_sets, 0);
}

#[test]
fn test_removal_failure_is_counted_and_run_continues() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep/a", b"aa");
    write(dir.path(), "old/a", b"aa");
    write(dir.path(), "keep/b", b"bb");
    let old_b = write(dir.path(), "old/b", b"bb");

    let finder = finder(&dir.path().join("old"), PurgeMode::Execute);
    let mut remover = |path: &Path| -> Result<(), DeleteError> {
        if path.ends_with("a") {
            Err(DeleteError::PermissionDenied(path.to_path_buf()))
        } else {
            fs::remove_file(path).map_err(|e| DeleteError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let stats = finder
        .run(&[dir.path().to_path_buf()], &mut remover, &mut std::io::sink())
        .unwrap();

    assert_eq!(stats.removal_failures, 1);
    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(stats.bytes_reclaimed, 2);
    assert!(!old_b.exists());
}

#[test]
fn test_strict_failure_keeps_partial_statistics() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep/a", b"aa");
    write(dir.path(), "old/a", b"aa");

    let config = FinderConfig::default()
        .with_delete_prefix(dir.path().join("old").to_string_lossy())
        .with_mode(PurgeMode::Execute)
        .with_strict_delete(true);
    let finder = DuplicateFinder::new(config).unwrap();
    let mut remover =
        |path: &Path| -> Result<(), DeleteError> { Err(DeleteError::NotFound(path.to_path_buf())) };
    let mut stats = RunStatistics::default();

    let err = finder
        .run_into(
            &[dir.path().to_path_buf()],
            &mut remover,
            &mut std::io::sink(),
            &mut stats,
        )
        .unwrap_err();

    assert!(matches!(err, FinderError::DeletionFailed(DeleteError::NotFound(_))));
    assert!(!err.is_invalid_root());
    assert_eq!(stats.duplicate_sets, 1);
    assert_eq!(stats.removal_failures, 1);
    assert_eq!(stats.files_scanned, 2);
    assert_eq!(stats.bytes_wasted, 2);
}
