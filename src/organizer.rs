/// The organize/undo state machine.
///
/// An [`Organizer`] binds one source directory at a time, sorts that
/// directory's direct entries into category subfolders, and keeps the
/// in-memory history (move records, created folders) needed to reverse its
/// own actions. Per-file trouble never aborts a pass; directory-level
/// preconditions do.
use crate::classifier::{CategoryRule, CategoryTable, FALLBACK_CATEGORY};
use crate::events::{Event, EventSink, Level};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the append-only event log; always skipped during a scan so
/// the organizer never files its own log away.
pub const RESERVED_LOG_FILE: &str = "organization_log.txt";

/// One successful move: where the file was and where it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Absolute path of the file before the move.
    pub original: PathBuf,
    /// Absolute path of the file after the move.
    pub destination: PathBuf,
}

/// Errors that abort an `organize()` or `undo()` call outright.
///
/// Per-entry failures (a move that collides, a folder that will not delete)
/// are not in this taxonomy; they are emitted as error events and collected
/// in the pass report instead.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source path is missing or not a directory.
    InvalidDirectory { path: PathBuf },
    /// `undo()` was called before any source directory was bound.
    NoActiveSession,
    /// The source directory could not be enumerated.
    ScanFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDirectory { path } => {
                write!(f, "Invalid source directory: {}", path.display())
            }
            Self::NoActiveSession => {
                write!(f, "No source directory bound; nothing to undo")
            }
            Self::ScanFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organizer operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Outcome of one `organize()` pass.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Number of files moved into category folders.
    pub moved: usize,
    /// Files left in place, with the reason each move failed.
    pub failed_moves: Vec<(PathBuf, String)>,
    /// Successful moves per category, for adapter summaries.
    pub category_counts: HashMap<String, usize>,
}

impl OrganizeReport {
    /// True when every attempted move completed.
    pub fn is_complete_success(&self) -> bool {
        self.failed_moves.is_empty()
    }
}

/// Sorts a directory's files into category subfolders and remembers how to
/// put them back.
///
/// Construction injects the event sink; the rule table starts from the
/// standard categories unless [`Organizer::with_table`] is used. One
/// organizer instance is one session: its history lives in memory only and
/// is drained by [`Organizer::undo`](crate::organizer::Organizer::undo).
///
/// # Examples
///
/// ```no_run
/// use sortbox::events::MemorySink;
/// use sortbox::organizer::Organizer;
/// use std::path::Path;
///
/// let mut organizer = Organizer::new(Box::new(MemorySink::new()));
/// let report = organizer.organize(Path::new("/home/user/Downloads"), None)?;
/// println!("moved {} files", report.moved);
/// let undo = organizer.undo()?;
/// println!("restored {} files", undo.restored);
/// # Ok::<(), sortbox::organizer::OrganizeError>(())
/// ```
pub struct Organizer {
    pub(crate) table: CategoryTable,
    pub(crate) source_dir: Option<PathBuf>,
    pub(crate) moved_files: Vec<MoveRecord>,
    pub(crate) created_folders: Vec<PathBuf>,
    pub(crate) sink: Box<dyn EventSink>,
}

impl Organizer {
    /// Creates an organizer with the standard category table.
    pub fn new(sink: Box<dyn EventSink>) -> Self {
        Self::with_table(CategoryTable::default(), sink)
    }

    /// Creates an organizer with a caller-supplied rule table.
    pub fn with_table(table: CategoryTable, sink: Box<dyn EventSink>) -> Self {
        Self {
            table,
            source_dir: None,
            moved_files: Vec::new(),
            created_folders: Vec::new(),
            sink,
        }
    }

    /// Binds the session to a source directory without organizing it.
    ///
    /// `organize()` binds implicitly; this is for callers that want to set
    /// up a session ahead of time.
    pub fn set_source_directory(&mut self, path: &Path) -> OrganizeResult<()> {
        if !path.is_dir() {
            return Err(OrganizeError::InvalidDirectory {
                path: path.to_path_buf(),
            });
        }
        self.source_dir = Some(path.to_path_buf());
        Ok(())
    }

    /// The directory this session is bound to, if any.
    pub fn source_directory(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    /// Returns the category label for a filename under the session's
    /// current rules. Exposed for inspection and testing.
    pub fn categorize(&self, filename: &str) -> &str {
        self.table.categorize(filename)
    }

    /// The session's rule table.
    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Moves recorded by this session, in move order.
    pub fn moved_files(&self) -> &[MoveRecord] {
        &self.moved_files
    }

    /// Folders this session created, in creation order.
    pub fn created_folders(&self) -> &[PathBuf] {
        &self.created_folders
    }

    /// Organizes the direct entries of `source_dir` into category folders.
    ///
    /// The pass binds the session to `source_dir`, merges any custom rules
    /// into the table, ensures one subfolder per category (plus the
    /// fallback), and then classifies and moves every non-directory entry
    /// except the reserved log file. A move never overwrites an existing
    /// destination. Each failed move is emitted as an error event and
    /// listed in the report; it does not abort the pass.
    ///
    /// History is additive: a second pass without an intervening `undo()`
    /// accumulates further records.
    pub fn organize(
        &mut self,
        source_dir: &Path,
        custom_rules: Option<Vec<CategoryRule>>,
    ) -> OrganizeResult<OrganizeReport> {
        self.set_source_directory(source_dir)?;

        if let Some(rules) = custom_rules {
            self.table.merge_rules(rules);
        }

        self.ensure_category_folders(source_dir);

        let entries = scan_entries(source_dir)?;
        let mut report = OrganizeReport::default();

        for (name, path) in entries {
            let category = self.table.categorize(&name).to_string();
            let destination = source_dir.join(&category).join(&name);

            match move_file(&path, &destination) {
                Ok(()) => {
                    self.moved_files.push(MoveRecord {
                        original: path,
                        destination,
                    });
                    *report.category_counts.entry(category.clone()).or_insert(0) += 1;
                    report.moved += 1;
                    self.emit(Level::Info, format!("Moved {name} to {category} folder"));
                }
                Err(reason) => {
                    self.emit(Level::Error, format!("Error moving {name}: {reason}"));
                    report.failed_moves.push((path, reason));
                }
            }
        }

        Ok(report)
    }

    /// Ensures a subfolder for every category in the table plus the
    /// fallback, recording the ones this session actually created.
    ///
    /// A folder that already exists is left alone and not recorded, so a
    /// later `undo()` cannot delete anything that pre-dated the session.
    /// Creation failures are per-folder events; moves into the missing
    /// folder will fail individually later.
    fn ensure_category_folders(&mut self, source_dir: &Path) {
        let names: Vec<String> = self
            .table
            .category_names()
            .chain(std::iter::once(FALLBACK_CATEGORY))
            .map(str::to_string)
            .collect();

        for name in names {
            let folder = source_dir.join(&name);
            if folder.exists() {
                continue;
            }
            match fs::create_dir(&folder) {
                Ok(()) => {
                    self.emit(Level::Info, format!("Created folder {}", folder.display()));
                    if !self.created_folders.contains(&folder) {
                        self.created_folders.push(folder);
                    }
                }
                Err(e) => {
                    self.emit(
                        Level::Error,
                        format!("Error creating folder {}: {e}", folder.display()),
                    );
                }
            }
        }
    }

    pub(crate) fn emit(&mut self, level: Level, message: String) {
        let event = match level {
            Level::Info => Event::info(message),
            Level::Error => Event::error(message),
        };
        self.sink.emit(event);
    }
}

/// Enumerates the direct non-directory entries of `source_dir`, skipping the
/// reserved log file, sorted by name for a deterministic pass.
fn scan_entries(source_dir: &Path) -> OrganizeResult<Vec<(String, PathBuf)>> {
    let read_dir = fs::read_dir(source_dir).map_err(|e| OrganizeError::ScanFailed {
        path: source_dir.to_path_buf(),
        source: e,
    })?;

    let mut entries = Vec::new();
    for entry in read_dir.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name == RESERVED_LOG_FILE {
            continue;
        }
        entries.push((name, entry.path()));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Renames `original` to `destination` without clobbering.
fn move_file(original: &Path, destination: &Path) -> Result<(), String> {
    if destination.exists() {
        return Err(format!(
            "destination {} already exists",
            destination.display()
        ));
    }
    fs::rename(original, destination).map_err(|e| e.to_string())
}
