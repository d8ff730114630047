use namedupe::actions::{permanent_delete, remove_duplicate, DeleteError, DeleteMode};
use namedupe::duplicates::{DuplicateFinder, FinderConfig, Resolution};
use namedupe::scanner::ScanOptions;
use std::fs::{self, File};
use tempfile::tempdir;

#[test]
fn test_remove_without_confirmation_deletes_every_duplicate() {
    let dir = tempdir().unwrap();
    for sub in ["a", "b", "c"] {
        fs::create_dir(dir.path().join(sub)).unwrap();
        File::create(dir.path().join(sub).join("dup.log")).unwrap();
    }
    File::create(dir.path().join("solo.log")).unwrap();

    let config = FinderConfig::default()
        .with_options(ScanOptions::new(false, true))
        .with_delete_mode(DeleteMode::Permanent);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicate_count(), 2);
    assert_eq!(report.detection.removed_count(), 2);

    let survivors: Vec<_> = ["a", "b", "c"]
        .iter()
        .filter(|sub| dir.path().join(sub).join("dup.log").exists())
        .collect();
    assert_eq!(survivors.len(), 1);
    assert_eq!(
        report.duplicates()[0].first_seen,
        dir.path().join(survivors[0]).join("dup.log")
    );
    assert!(dir.path().join("solo.log").exists());
}

#[test]
fn test_simulated_removal_by_default() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    File::create(dir.path().join("x")).unwrap();
    File::create(dir.path().join("sub/x")).unwrap();

    let config = FinderConfig::default().with_options(ScanOptions::new(false, true));
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(
        report.duplicates()[0].resolution,
        Resolution::Removed(DeleteMode::Simulate)
    );
    assert!(dir.path().join("x").exists());
    assert!(dir.path().join("sub/x").exists());
}

#[test]
fn test_remove_missing_file_reports_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone.txt");

    let err = remove_duplicate(&missing, DeleteMode::Permanent).unwrap_err();
    assert!(matches!(err, DeleteError::NotFound(_)));
    assert_eq!(err.path(), missing.as_path());

    // simulation never touches the filesystem
    let result = remove_duplicate(&missing, DeleteMode::Simulate).unwrap();
    assert_eq!(result.mode, DeleteMode::Simulate);
}

#[test]
fn test_permanent_delete_removes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("victim.txt");
    fs::write(&path, b"bye").unwrap();

    let result = permanent_delete(&path).unwrap();
    assert_eq!(result.path, path);
    assert!(!path.exists());
}
