use dupepurge::actions::{PermanentRemover, PurgeMode};
use dupepurge::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_duplicates_across_roots() {
    let home = tempdir().unwrap();
    let backup = tempdir().unwrap();
    let original = write(home.path(), "photos/img.jpg", b"jpeg bytes");
    let copy = write(backup.path(), "photos/img.jpg", b"jpeg bytes");
    write(backup.path(), "photos/unique.jpg", b"other bytes");

    let config = FinderConfig::default()
        .with_delete_prefix(backup.path().to_string_lossy())
        .with_mode(PurgeMode::Execute);
    let finder = DuplicateFinder::new(config).unwrap();
    let roots = vec![home.path().to_path_buf(), backup.path().to_path_buf()];

    let stats = finder
        .run(&roots, &mut PermanentRemover, &mut std::io::sink())
        .unwrap();

    assert_eq!(stats.files_scanned, 3);
    assert_eq!(stats.directories_visited, 4);
    assert_eq!(stats.duplicates_removed, 1);
    assert_eq!(stats.bytes_reclaimed, 10);
    assert!(original.exists());
    assert!(!copy.exists());
}

#[test]
fn test_listing_follows_root_order() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let a = write(first.path(), "x.txt", b"same");
    let b = write(second.path(), "x.txt", b"same");

    let finder =
        DuplicateFinder::new(FinderConfig::default().with_list_duplicates(true)).unwrap();
    let mut out = Vec::new();
    finder
        .run(
            &[first.path().to_path_buf(), second.path().to_path_buf()],
            &mut PermanentRemover,
            &mut out,
        )
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    let pos_a = text.find(&format!(" duplicate 0: {}", a.display())).unwrap();
    let pos_b = text.find(&format!(" duplicate 1: {}", b.display())).unwrap();
    assert!(pos_a < pos_b);
}

#[test]
fn test_missing_root_fails_before_scanning() {
    let dir = tempdir().unwrap();
    let kept = write(dir.path(), "a/x", b"same");
    write(dir.path(), "b/x", b"same");

    let config = FinderConfig::default()
        .with_delete_prefix(dir.path().join("b").to_string_lossy())
        .with_mode(PurgeMode::Execute);
    let finder = DuplicateFinder::new(config).unwrap();
    let roots = vec![dir.path().to_path_buf(), dir.path().join("missing")];

    let err = finder
        .run(&roots, &mut PermanentRemover, &mut std::io::sink())
        .unwrap_err();

    assert!(matches!(err, FinderError::PathNotFound(_)));
    assert!(err.is_invalid_root());
    assert!(kept.exists());
    assert!(dir.path().join("b/x").exists());
}

#[test]
fn test_file_root_is_not_a_directory() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "plain.txt", b"x");

    let err = DuplicateFinder::with_defaults()
        .run(&[file], &mut PermanentRemover, &mut std::io::sink())
        .unwrap_err();

    assert!(matches!(err, FinderError::NotADirectory(_)));
}
