use namedupe::duplicates::{DuplicateFinder, FinderConfig, Resolution};
use namedupe::scanner::{ScanOptions, WalkerConfig};
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap();
}

fn finder_with_workers(workers: usize) -> DuplicateFinder {
    DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_workers(workers)),
    )
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files(), 0);
    assert_eq!(report.directories, 1);
    assert!(!report.has_duplicates());
    assert!(!report.is_partial());
}

#[test]
fn test_scan_unique_names() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.txt"));
    touch(&dir.path().join("b.txt"));
    touch(&dir.path().join("x/c.txt"));
    touch(&dir.path().join("x/y/d.txt"));

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files(), 4);
    assert_eq!(report.unique_names(), 4);
    assert_eq!(report.directories, 3);
    assert_eq!(report.duplicate_count(), 0);
}

#[test]
fn test_scan_reports_one_duplicate_per_extra_occurrence() {
    let dir = tempdir().unwrap();
    for sub in ["one", "two", "two/three", "four/five/six"] {
        touch(&dir.path().join(sub).join("notes.md"));
    }
    touch(&dir.path().join("unique.md"));

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files(), 5);
    assert_eq!(report.unique_names(), 2);
    assert_eq!(report.duplicate_count(), 3);

    // all duplicates point back at the same first occurrence
    let first = &report.duplicates()[0].first_seen;
    for dup in report.duplicates() {
        assert_eq!(&dup.first_seen, first);
        assert_ne!(&dup.path, first);
        assert_eq!(dup.path.file_name().unwrap(), "notes.md");
        assert!(dup.path.exists());
    }
}

#[test]
fn test_scan_matches_names_not_contents() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("report.txt"), b"first").unwrap();
    fs::write(dir.path().join("sub/report.txt"), b"completely different").unwrap();
    fs::write(dir.path().join("copy_a.bin"), b"same").unwrap();
    fs::write(dir.path().join("copy_b.bin"), b"same").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicate_count(), 1);
    assert_eq!(report.duplicates()[0].path.file_name().unwrap(), "report.txt");
}

#[cfg(target_os = "linux")]
#[test]
fn test_scan_names_are_case_sensitive() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("Readme"));
    touch(&dir.path().join("sub/README"));
    touch(&dir.path().join("sub/readme"));

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicate_count(), 0);
    assert_eq!(report.unique_names(), 3);
}

#[test]
fn test_directory_names_never_collide_with_files() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("data"));
    touch(&dir.path().join("nested/data/inner.txt"));

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files(), 2);
    assert_eq!(report.duplicate_count(), 0);
}

#[test]
fn test_pool_size_does_not_change_counts() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        touch(&dir.path().join(format!("d{}/e{}/common.txt", i % 4, i)));
        touch(&dir.path().join(format!("d{}/e{}/own{}.txt", i % 4, i, i)));
    }

    let single = finder_with_workers(1).find_duplicates(dir.path()).unwrap();
    let many = finder_with_workers(16).find_duplicates(dir.path()).unwrap();

    assert_eq!(single.total_files(), 40);
    assert_eq!(single.duplicate_count(), 19);
    assert_eq!(single.unique_names(), 21);
    assert_eq!(single.directories, 25);

    assert_eq!(many.total_files(), single.total_files());
    assert_eq!(many.duplicate_count(), single.duplicate_count());
    assert_eq!(many.unique_names(), single.unique_names());
    assert_eq!(many.directories, single.directories);
}

#[test]
fn test_consecutive_scans_are_independent() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.txt"));
    touch(&dir.path().join("sub/a.txt"));

    let finder = DuplicateFinder::with_defaults();
    let first = finder.find_duplicates(dir.path()).unwrap();
    let second = finder.find_duplicates(dir.path()).unwrap();

    // the presence table does not leak between scans
    assert_eq!(first.duplicate_count(), 1);
    assert_eq!(second.duplicate_count(), 1);
    assert_eq!(first.unique_names(), second.unique_names());
}

#[test]
fn test_without_remove_flag_nothing_is_deleted() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.txt"));
    touch(&dir.path().join("sub/a.txt"));

    let config = FinderConfig::default()
        .with_options(ScanOptions::new(false, false))
        .with_delete_mode(namedupe::actions::DeleteMode::Permanent);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.duplicate_count(), 1);
    assert!(matches!(
        report.duplicates()[0].resolution,
        Resolution::Removed(namedupe::actions::DeleteMode::Simulate)
    ));
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("sub/a.txt").exists());
}

#[test]
fn test_skip_hidden_and_ignore_patterns() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("keep.txt"));
    touch(&dir.path().join(".git/keep.txt"));
    touch(&dir.path().join("build/keep.txt"));
    touch(&dir.path().join("src/keep.txt"));
    touch(&dir.path().join("src/scratch.tmp"));
    touch(&dir.path().join("other/scratch.tmp"));

    let walker = WalkerConfig::default()
        .with_skip_hidden(true)
        .with_ignore_patterns(vec!["build".to_string(), "*.tmp".to_string()]);
    let report = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files(), 2);
    assert_eq!(report.duplicate_count(), 1);
    assert_eq!(
        report.duplicates()[0].path.file_name().unwrap(),
        "keep.txt"
    );
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_files_unless_followed() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("target/inner.txt"));
    fs::create_dir(dir.path().join("links")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("links/target")).unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    // links/target is a file entry named "target"; the directory "target" is not
    assert_eq!(report.total_files(), 2);
    assert_eq!(report.duplicate_count(), 0);

    let followed = DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(WalkerConfig::default().with_follow_symlinks(true)),
    )
    .find_duplicates(dir.path())
    .unwrap();
    assert_eq!(followed.total_files(), 2);
    assert_eq!(followed.duplicate_count(), 1);
}
