#![allow(clippy::unwrap_used)]

use super::*;
use std::fs::File;

fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .unwrap();
    path
}

#[test]
fn test_discover_sorted_oldest_first() {
    let dir = tempfile::tempdir().unwrap();
    let newest = touch(dir.path(), "c.csv", 10);
    let oldest = touch(dir.path(), "a.csv", 300);
    let middle = touch(dir.path(), "b.CSV", 100);

    let files = discover_input_files(dir.path(), "csv").unwrap();
    assert_eq!(files, vec![oldest, middle, newest]);
}

#[test]
fn test_discover_filters_extension() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "statement.pdf", 10);
    touch(dir.path(), "notes.txt", 10);
    let csv = touch(dir.path(), "export.csv", 10);
    std::fs::create_dir(dir.path().join("folder.csv")).unwrap();

    let files = discover_input_files(dir.path(), ".csv").unwrap();
    assert_eq!(files, vec![csv]);
}

#[test]
fn test_discover_missing_dir_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(discover_input_files(&missing, "csv").is_err());
}

#[test]
fn test_discover_empty_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert!(discover_input_files(dir.path(), "csv").unwrap().is_empty());
}

#[test]
fn test_clean_removes_only_stale_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    let day = 24 * 60 * 60;
    let stale = touch(dir.path(), "old.csv", 10 * day);
    let fresh = touch(dir.path(), "new.csv", day);
    let other = touch(dir.path(), "old.txt", 10 * day);

    let removed = clean_stale_files(dir.path(), "csv", Duration::from_secs(5 * day)).unwrap();
    assert_eq!(removed, vec![stale.clone()]);
    assert!(!stale.exists());
    assert!(fresh.exists());
    assert!(other.exists());
}
