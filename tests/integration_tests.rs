/// Integration tests for sortbox
///
/// These tests exercise the complete organize/undo flow the way the CLI
/// and an embedding front end would drive it:
///
/// 1. Organizing across the full default category table
/// 2. Round-tripping organize + undo
/// 3. CLI invocations, including dry-run and custom rules files
/// 4. Edge cases: empty directories, collisions, reserved log file
use sortbox::classifier::CategoryRule;
use sortbox::cli::{Cli, run_cli};
use sortbox::events::MemorySink;
use sortbox::organizer::{Organizer, RESERVED_LOG_FILE};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers for seeding files and asserting on
/// the resulting layout.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a text file directly under the fixture directory.
    fn create_file(&self, name: &str, content: &str) {
        let file_path = self.path().join(name);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, "content");
        }
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Direct entry names, excluding the reserved event log.
    fn entry_names(&self) -> BTreeSet<String> {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name != RESERVED_LOG_FILE)
            .collect()
    }

    fn count_dirs(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .flatten()
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .count()
    }

    fn cli(&self) -> Cli {
        Cli {
            directory: self.path().to_path_buf(),
            rules: None,
            dry_run: false,
        }
    }
}

fn organizer() -> Organizer {
    Organizer::new(Box::new(MemorySink::new()))
}

const ALL_FOLDERS: [&str; 7] = [
    "Images",
    "Videos",
    "Documents",
    "Music",
    "Archives",
    "Codes",
    "Other",
];

// ============================================================================
// Test Suite 1: Organizing across the default table
// ============================================================================

#[test]
fn test_organize_one_file_per_category() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "photo.jpg",
        "clip.mp4",
        "report.pdf",
        "track.mp3",
        "backup.zip",
        "script.py",
        "mystery.xyz",
    ]);

    let mut organizer = organizer();
    let report = organizer
        .organize(fixture.path(), None)
        .expect("Organize failed");

    assert_eq!(report.moved, 7);
    assert!(report.is_complete_success());

    for folder in ALL_FOLDERS {
        fixture.assert_dir_exists(folder);
    }
    fixture.assert_file_exists("Images/photo.jpg");
    fixture.assert_file_exists("Videos/clip.mp4");
    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Music/track.mp3");
    fixture.assert_file_exists("Archives/backup.zip");
    fixture.assert_file_exists("Codes/script.py");
    fixture.assert_file_exists("Other/mystery.xyz");
    fixture.assert_file_not_exists("photo.jpg");
}

#[test]
fn test_organize_uppercase_extensions() {
    let fixture = TestFixture::new();
    fixture.create_files(&["REPORT.PDF", "HOLIDAY.JPG"]);

    let mut organizer = organizer();
    organizer
        .organize(fixture.path(), None)
        .expect("Organize failed");

    fixture.assert_file_exists("Documents/REPORT.PDF");
    fixture.assert_file_exists("Images/HOLIDAY.JPG");
}

#[test]
fn test_organize_empty_directory_still_creates_folders() {
    let fixture = TestFixture::new();

    let mut organizer = organizer();
    let report = organizer
        .organize(fixture.path(), None)
        .expect("Organize failed");

    assert_eq!(report.moved, 0);
    assert_eq!(fixture.count_dirs(), ALL_FOLDERS.len());
}

#[test]
fn test_organize_leaves_subdirectories_alone() {
    let fixture = TestFixture::new();
    fixture.create_subdir("projects");
    fixture.create_file("projects-notes.txt", "notes");

    let mut organizer = organizer();
    let report = organizer
        .organize(fixture.path(), None)
        .expect("Organize failed");

    assert_eq!(report.moved, 1);
    fixture.assert_dir_exists("projects");
    fixture.assert_file_exists("Documents/projects-notes.txt");
}

// ============================================================================
// Test Suite 2: Round trip
// ============================================================================

#[test]
fn test_round_trip_restores_entry_set() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.mp4", "c.pdf", "d.mp3", "e.zip", "f.py", "g.xyz"]);
    let before = fixture.entry_names();

    let mut organizer = organizer();
    organizer
        .organize(fixture.path(), None)
        .expect("Organize failed");
    let report = organizer.undo().expect("Undo failed");

    assert_eq!(report.restored, 7);
    assert!(report.is_complete_success());
    assert_eq!(fixture.entry_names(), before);
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_round_trip_with_reserved_log_present() {
    let fixture = TestFixture::new();
    fixture.create_file(RESERVED_LOG_FILE, "an earlier run's events\n");
    fixture.create_files(&["song.flac", "deck.pptx"]);
    let before = fixture.entry_names();

    let mut organizer = organizer();
    organizer
        .organize(fixture.path(), None)
        .expect("Organize failed");

    // The reserved name is never organized.
    fixture.assert_file_exists(RESERVED_LOG_FILE);

    organizer.undo().expect("Undo failed");
    assert_eq!(fixture.entry_names(), before);
    fixture.assert_file_exists(RESERVED_LOG_FILE);
}

// ============================================================================
// Test Suite 3: CLI adapter
// ============================================================================

#[test]
fn test_cli_organize_sorts_and_logs() {
    let fixture = TestFixture::new();
    fixture.create_files(&["image.png", "doc.docx"]);

    run_cli(&fixture.cli()).expect("CLI run failed");

    fixture.assert_file_exists("Images/image.png");
    fixture.assert_file_exists("Documents/doc.docx");

    // Events land in the reserved append-only log.
    fixture.assert_file_exists(RESERVED_LOG_FILE);
    let log = fs::read_to_string(fixture.path().join(RESERVED_LOG_FILE))
        .expect("Failed to read log");
    assert!(log.contains("Moved image.png to Images folder"));
    assert!(log.contains("INFO"));
}

#[test]
fn test_cli_dry_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["image.png", "doc.docx"]);
    let before = fixture.entry_names();

    let mut cli = fixture.cli();
    cli.dry_run = true;
    run_cli(&cli).expect("CLI dry run failed");

    assert_eq!(fixture.entry_names(), before);
    assert_eq!(fixture.count_dirs(), 0);
    fixture.assert_file_not_exists(RESERVED_LOG_FILE);
}

#[test]
fn test_cli_custom_rules_file_routes_new_extension() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.heic", "photo.jpg"]);

    let rules_path = fixture.path().join("custom-rules.toml");
    fs::write(
        &rules_path,
        r#"
[[categories]]
name = "Images"
extensions = [".heic", ".jpg"]
"#,
    )
    .expect("Failed to write rules file");

    let mut cli = fixture.cli();
    cli.rules = Some(rules_path.clone());
    run_cli(&cli).expect("CLI run failed");

    fixture.assert_file_exists("Images/photo.heic");
    fixture.assert_file_exists("Images/photo.jpg");
    // The rules file itself is a .toml at the top level; it is not in any
    // category, so it lands in Other.
    fixture.assert_file_exists("Other/custom-rules.toml");
}

#[test]
fn test_cli_missing_directory_fails_fast() {
    let cli = Cli {
        directory: PathBuf::from("/no/such/directory"),
        rules: None,
        dry_run: false,
    };
    let result = run_cli(&cli);
    assert!(result.is_err());
}

#[test]
fn test_cli_missing_rules_file_fails_fast() {
    let fixture = TestFixture::new();
    let mut cli = fixture.cli();
    cli.rules = Some(PathBuf::from("/no/such/rules.toml"));

    let result = run_cli(&cli);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Rules file not found"));
}

// ============================================================================
// Test Suite 4: Failure tolerance
// ============================================================================

#[test]
fn test_collision_fails_one_file_and_moves_the_rest() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Documents");
    fixture.create_file("Documents/notes.txt", "from a prior run");
    fixture.create_files(&["notes.txt", "photo.jpg"]);

    let mut organizer = organizer();
    let report = organizer
        .organize(fixture.path(), None)
        .expect("Organize failed");

    assert_eq!(report.moved, 1);
    assert_eq!(report.failed_moves.len(), 1);
    fixture.assert_file_exists("notes.txt");
    fixture.assert_file_exists("Images/photo.jpg");

    let kept = fs::read_to_string(fixture.path().join("Documents/notes.txt"))
        .expect("Failed to read file");
    assert_eq!(kept, "from a prior run");
}

#[test]
fn test_custom_category_appends_after_defaults() {
    let fixture = TestFixture::new();
    fixture.create_files(&["novel.epub", "photo.jpg"]);

    let mut organizer = organizer();
    let custom = vec![CategoryRule::new("Ebooks", [".epub"])];
    organizer
        .organize(fixture.path(), Some(custom))
        .expect("Organize failed");

    fixture.assert_file_exists("Ebooks/novel.epub");
    // Default routing is untouched by an unrelated custom category.
    fixture.assert_file_exists("Images/photo.jpg");
    fixture.assert_dir_exists("Ebooks");
}
