use namedupe::actions::DeleteMode;
use namedupe::duplicates::{DuplicateFinder, FinderConfig, LinePrompt, Resolution, ScanReport};
use namedupe::scanner::{ScanOptions, WalkerConfig};
use std::fs::{self, File};
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// Writer whose contents stay readable after the prompt is moved into the finder.
#[derive(Clone, Default)]
struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// root/{a.txt, c.txt, one/a.txt, two/c.txt}
fn setup_two_duplicates() -> TempDir {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("a.txt")).unwrap();
    File::create(dir.path().join("c.txt")).unwrap();
    fs::create_dir(dir.path().join("one")).unwrap();
    fs::create_dir(dir.path().join("two")).unwrap();
    File::create(dir.path().join("one/a.txt")).unwrap();
    File::create(dir.path().join("two/c.txt")).unwrap();
    dir
}

fn confirm_scan(root: &Path, mode: DeleteMode, answers: &str) -> (ScanReport, SharedOutput) {
    let output = SharedOutput::default();
    // a single worker walks the root before any subdirectory
    let config = FinderConfig::default()
        .with_options(ScanOptions::new(true, true))
        .with_delete_mode(mode)
        .with_walker_config(WalkerConfig::default().with_workers(1));
    let prompt = LinePrompt::new(Cursor::new(answers.to_string()), output.clone());

    let report = DuplicateFinder::new(config)
        .find_duplicates_with(root, Box::new(prompt))
        .unwrap();
    (report, output)
}

#[test]
fn test_confirm_remove_and_skip_permanent() {
    let dir = setup_two_duplicates();
    let (report, output) = confirm_scan(dir.path(), DeleteMode::Permanent, "y\nn\n");

    assert_eq!(report.duplicate_count(), 2);
    assert_eq!(report.detection.removed_count(), 1);
    assert_eq!(report.detection.skipped_count(), 1);
    assert_eq!(report.detection.reprompts, 0);

    // first occurrences are never touched
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("c.txt").exists());

    let removed = &report.duplicates()[0];
    let skipped = &report.duplicates()[1];
    assert_eq!(removed.resolution, Resolution::Removed(DeleteMode::Permanent));
    assert_eq!(skipped.resolution, Resolution::Skipped);
    assert!(!removed.path.exists());
    assert!(skipped.path.exists());

    let text = output.text();
    assert_eq!(text.matches("? (y/n): ").count(), 2);
    assert!(text.contains(&format!("Remove duplicate file {}? (y/n): ", removed.path.display())));
}

#[test]
fn test_confirm_invalid_answers_reprompt() {
    let dir = setup_two_duplicates();
    let (report, output) = confirm_scan(dir.path(), DeleteMode::Simulate, "Y\nyes\n n\ny\nN\n\nn\n");

    assert_eq!(report.detection.reprompts, 5);
    assert_eq!(report.detection.removed_count(), 1);
    assert_eq!(report.detection.skipped_count(), 1);
    assert_eq!(output.text().matches("Invalid input. Please answer y or n: ").count(), 5);

    // simulated removal leaves every file in place
    assert!(dir.path().join("one/a.txt").exists());
    assert!(dir.path().join("two/c.txt").exists());
}

#[test]
fn test_confirm_crlf_answers_accepted() {
    let dir = setup_two_duplicates();
    let (report, _) = confirm_scan(dir.path(), DeleteMode::Simulate, "y\r\ny\r\n");

    assert_eq!(report.detection.reprompts, 0);
    assert_eq!(report.detection.removed_count(), 2);
}

#[test]
fn test_confirm_closed_input_skips_remaining() {
    let dir = setup_two_duplicates();
    let (report, _) = confirm_scan(dir.path(), DeleteMode::Permanent, "");

    assert_eq!(report.duplicate_count(), 2);
    assert_eq!(report.detection.skipped_count(), 2);
    assert!(dir.path().join("one/a.txt").exists());
    assert!(dir.path().join("two/c.txt").exists());
}

#[test]
fn test_confirm_mode_emits_boundary_markers() {
    let dir = setup_two_duplicates();
    let (report, _) = confirm_scan(dir.path(), DeleteMode::Simulate, "n\nn\n");

    assert_eq!(report.directories, 3);
    assert_eq!(report.detection.directory_markers, 3);
    // markers never count as files
    assert_eq!(report.total_files(), 4);
    assert_eq!(report.unique_names(), 2);
}

#[test]
fn test_no_prompt_without_remove_flag() {
    let dir = setup_two_duplicates();
    let output = SharedOutput::default();
    let prompt = LinePrompt::new(Cursor::new(String::new()), output.clone());
    let config = FinderConfig::default().with_options(ScanOptions::new(true, false));

    let report = DuplicateFinder::new(config)
        .find_duplicates_with(dir.path(), Box::new(prompt))
        .unwrap();

    assert_eq!(report.detection.removed_count(), 2);
    assert!(output.text().is_empty());
}
