use namedupe::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use namedupe::scanner::{ErrorPolicy, ScanError, WalkerConfig};
use std::fs::{self, File};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn finder(policy: ErrorPolicy) -> DuplicateFinder {
    DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(WalkerConfig::default().with_error_policy(policy)),
    )
}

#[test]
fn test_scan_non_existent_path() {
    let result = DuplicateFinder::with_defaults()
        .find_duplicates(std::path::Path::new("/non/existent/path/12345"));

    match result {
        Err(FinderError::PathNotFound(path)) => {
            assert!(path.to_string_lossy().contains("non/existent/path/12345"));
        }
        other => panic!("Expected PathNotFound error, got {:?}", other),
    }
}

#[test]
fn test_scan_file_instead_of_directory() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("file.txt");
    File::create(&file_path).unwrap();

    let result = DuplicateFinder::with_defaults().find_duplicates(&file_path);
    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[test]
fn test_shutdown_requested_before_scan() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("a.txt")).unwrap();

    let config = FinderConfig::default().with_shutdown_flag(Arc::new(AtomicBool::new(true)));
    let result = DuplicateFinder::new(config).find_duplicates(dir.path());

    assert!(matches!(result, Err(FinderError::Interrupted)));
}

#[cfg(unix)]
mod unreadable {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Revokes all permissions on a directory and restores them on drop.
    struct Locked(PathBuf);

    impl Locked {
        /// `None` when the process can read the directory anyway (e.g. as root).
        fn new(path: &Path) -> Option<Self> {
            fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
            let locked = Self(path.to_path_buf());
            if fs::read_dir(path).is_ok() {
                return None;
            }
            Some(locked)
        }
    }

    impl Drop for Locked {
        fn drop(&mut self) {
            let _ = fs::set_permissions(&self.0, fs::Permissions::from_mode(0o755));
        }
    }

    fn setup() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        fs::create_dir(dir.path().join("open")).unwrap();
        File::create(dir.path().join("open/a.txt")).unwrap();
        fs::create_dir(dir.path().join("locked")).unwrap();
        File::create(dir.path().join("locked/a.txt")).unwrap();
        dir
    }

    #[test]
    fn test_unreadable_directory_aborts_by_default() {
        let dir = setup();
        let Some(_lock) = Locked::new(&dir.path().join("locked")) else {
            return;
        };

        let result = finder(ErrorPolicy::Abort).find_duplicates(dir.path());
        match result {
            Err(FinderError::ScanError(ScanError::PermissionDenied(path))) => {
                assert!(path.ends_with("locked"));
            }
            other => panic!("Expected PermissionDenied, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_directory_recorded_with_continue() {
        let dir = setup();
        let Some(_lock) = Locked::new(&dir.path().join("locked")) else {
            return;
        };

        let report = finder(ErrorPolicy::Continue)
            .find_duplicates(dir.path())
            .unwrap();

        assert!(report.is_partial());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0]
            .path
            .as_ref()
            .is_some_and(|p| p.ends_with("locked")));
        // the readable part of the tree is fully reported
        assert_eq!(report.total_files(), 2);
        assert_eq!(report.duplicate_count(), 1);
    }
}
