/// Reversal of an organize pass.
///
/// Undo replays the session's move records in recorded order, removes the
/// folders the session itself created, and then drains the history whether
/// or not every individual step worked. It is best-effort, not
/// transactional: partial success is expected, and the unconditional drain
/// keeps the session from pointing at stale paths afterwards.
use crate::events::Level;
use crate::organizer::{MoveRecord, OrganizeError, OrganizeResult, Organizer};
use std::fs;
use std::path::PathBuf;

/// Outcome of one `undo()` call.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Number of files moved back to their original paths.
    pub restored: usize,
    /// Files left where they were, with the reason each restore failed.
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Number of session-created folders removed.
    pub removed_folders: usize,
    /// Folders left in place, with the reason each removal failed.
    pub failed_removals: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// True when every recorded action was reversed.
    pub fn is_complete_success(&self) -> bool {
        self.failed_restores.is_empty() && self.failed_removals.is_empty()
    }
}

impl Organizer {
    /// Reverses every action recorded by this session.
    ///
    /// Requires a bound source directory
    /// ([`OrganizeError::NoActiveSession`] otherwise). Each recorded move is
    /// replayed back to its original path; each recorded folder is removed
    /// non-recursively, so a folder still holding anything (a file that
    /// failed to restore, or content placed there by someone else) stays on
    /// disk and is reported rather than deleted. Every attempt emits an
    /// event; no individual failure aborts the rest.
    ///
    /// The history is cleared unconditionally after all attempts, so a
    /// failed restore cannot be retried through a second `undo()`.
    pub fn undo(&mut self) -> OrganizeResult<UndoReport> {
        if self.source_dir.is_none() {
            return Err(OrganizeError::NoActiveSession);
        }

        // Drain up front: the clear must happen regardless of failures.
        let records = std::mem::take(&mut self.moved_files);
        let folders = std::mem::take(&mut self.created_folders);

        let mut report = UndoReport::default();

        for record in &records {
            let name = file_name_of(&record.destination);
            match restore_file(record) {
                Ok(()) => {
                    report.restored += 1;
                    self.emit(Level::Info, format!("Restored {name} to original location"));
                }
                Err(reason) => {
                    self.emit(Level::Error, format!("Error restoring {name}: {reason}"));
                    report
                        .failed_restores
                        .push((record.destination.clone(), reason));
                }
            }
        }

        for folder in folders {
            match fs::remove_dir(&folder) {
                Ok(()) => {
                    report.removed_folders += 1;
                    self.emit(Level::Info, format!("Removed folder {}", folder.display()));
                }
                Err(e) => {
                    self.emit(
                        Level::Error,
                        format!("Error removing folder {}: {e}", folder.display()),
                    );
                    report.failed_removals.push((folder, e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

/// Moves a file back to its original path without clobbering.
fn restore_file(record: &MoveRecord) -> Result<(), String> {
    if !record.destination.exists() {
        return Err("file not found at expected location".to_string());
    }
    if record.original.exists() {
        return Err(format!(
            "original location {} is occupied",
            record.original.display()
        ));
    }
    fs::rename(&record.destination, &record.original).map_err(|e| e.to_string())
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
