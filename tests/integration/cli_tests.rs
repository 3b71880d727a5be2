use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::tempdir;

fn write(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn dupepurge(args: &[&str], config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dupepurge"))
        .args(["--config", config_dir.join("none.toml").to_str().unwrap()])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_no_roots_prints_usage() {
    let dir = tempdir().unwrap();
    let output = dupepurge(&[], dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn test_missing_root_exits_with_two() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let output = dupepurge(&[missing.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[DP002] Error"));
}

#[test]
fn test_report_lists_and_deletes_nothing() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a/file.txt", b"contents");
    let b = write(dir.path(), "b/file.txt", b"contents");

    let output = dupepurge(
        &["--report", "--for-real", dir.path().to_str().unwrap()],
        dir.path(),
    );
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(text.contains(&format!(" duplicate 0: {}", a.display())));
    assert!(text.contains(&format!(" duplicate 1: {}", b.display())));
    assert!(text.contains("Duplicate copies removed: 0"));
    assert!(a.exists() && b.exists());
}

#[test]
fn test_dry_run_announces_removal() {
    let dir = tempdir().unwrap();
    let prefix = dir.path().join("b");
    write(dir.path(), "a/file.txt", b"contents");
    let b = write(dir.path(), "b/file.txt", b"contents");

    let output = dupepurge(
        &[
            "--delete-prefix",
            prefix.to_str().unwrap(),
            dir.path().to_str().unwrap(),
        ],
        dir.path(),
    );
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(text.contains(&format!(" would remove: {}", b.display())));
    assert!(text.contains("Duplicate copies removed: 1"));
    assert!(text.contains("Bytes reclaimed:          8"));
    assert!(text.contains("(dry run: nothing was deleted)"));
    assert!(b.exists());
}

#[test]
fn test_for_real_removes_and_reports() {
    let dir = tempdir().unwrap();
    let prefix = dir.path().join("b");
    let a = write(dir.path(), "a/file.txt", b"contents");
    let b = write(dir.path(), "b/file.txt", b"contents");

    let output = dupepurge(
        &[
            "--delete-prefix",
            prefix.to_str().unwrap(),
            "--for-real",
            dir.path().to_str().unwrap(),
        ],
        dir.path(),
    );
    let text = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(!text.contains(" duplicate 0:"));
    assert!(text.contains("Duplicate copies removed: 1"));
    assert!(text.contains("Files scanned:            2"));
    assert!(text.contains("Directories visited:      3"));
    assert!(a.exists());
    assert!(!b.exists());
}

#[test]
fn test_prefix_covering_all_copies_is_refused() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "dup/a/file.txt", b"contents");
    let b = write(dir.path(), "dup/b/file.txt", b"contents");
    let prefix = dir.path().join("dup");

    let output = dupepurge(
        &[
            "--delete-prefix",
            prefix.to_str().unwrap(),
            "--quiet",
            dir.path().to_str().unwrap(),
        ],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Duplicate copies removed: 0"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("more restrictive"));
    assert!(a.exists() && b.exists());
}

#[test]
fn test_ignore_suffixes_flag() {
    let dir = tempdir().unwrap();
    let prefix = dir.path().join("b");
    write(dir.path(), "a/file.swp", b"contents");
    let b = write(dir.path(), "b/file.swp", b"contents");

    let output = dupepurge(
        &[
            "--delete-prefix",
            prefix.to_str().unwrap(),
            "--for-real",
            "--ignore-suffixes",
            ".tmp,.swp",
            dir.path().to_str().unwrap(),
        ],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Files scanned:            0"));
    assert!(b.exists());
}
