//! NoteStore — path-validated access to the note tree
//!
//! Filesystem and path errors stop here: reads and appends report a tagged
//! outcome instead of an error so the conversation keeps flowing.

use super::file_ops;
use super::paths::PathRule;
use std::path::{Path, PathBuf};

/// Protocol text shown to the model for a rejected path
pub const INVALID_PATH_SENTINEL: &str = "<invalid path>";
/// Protocol text shown to the model for a note that doesn't exist yet
pub const EMPTY_NOTE_SENTINEL: &str = "<empty>";

/// Outcome of reading a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteRead {
    Content(String),
    InvalidPath,
    NotFound,
}

impl NoteRead {
    /// Text injected into the conversation for this outcome
    pub fn render(&self) -> &str {
        match self {
            NoteRead::Content(content) => content,
            NoteRead::InvalidPath => INVALID_PATH_SENTINEL,
            NoteRead::NotFound => EMPTY_NOTE_SENTINEL,
        }
    }
}

/// Outcome of appending to a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteWrite {
    Appended { bytes: usize },
    InvalidPath,
    Failed(String),
}

pub struct NoteStore {
    notes_dir: PathBuf,
    rule: PathRule,
}

impl NoteStore {
    /// Create a note store rooted at `notes_dir`. The directory is created at
    /// startup by `config::initialize_notes_dir`.
    pub fn new(notes_dir: PathBuf, rule: PathRule) -> Self {
        Self { notes_dir, rule }
    }

    /// Get the notes directory path
    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    pub fn path_rule(&self) -> PathRule {
        self.rule
    }

    fn resolve(&self, rel_path: &str) -> Option<PathBuf> {
        if self.rule.is_valid(rel_path) {
            Some(self.notes_dir.join(rel_path))
        } else {
            None
        }
    }

    /// Read a note's full content
    pub fn read(&self, rel_path: &str) -> NoteRead {
        let Some(full_path) = self.resolve(rel_path) else {
            log::warn!("[NOTES] Rejected read of invalid path {:?}", rel_path);
            return NoteRead::InvalidPath;
        };

        match file_ops::read_note(&full_path) {
            Ok(Some(content)) => NoteRead::Content(content),
            Ok(None) => NoteRead::NotFound,
            Err(e) => {
                log::warn!("[NOTES] Failed to read note {:?}: {}", rel_path, e);
                NoteRead::NotFound
            }
        }
    }

    /// Append content to a note, creating it (and its directories) if needed.
    /// Not idempotent: appending the same content twice stores it twice.
    pub fn append(&self, rel_path: &str, content: &str) -> NoteWrite {
        let Some(full_path) = self.resolve(rel_path) else {
            log::warn!("[NOTES] Ignored write to invalid path {:?}", rel_path);
            return NoteWrite::InvalidPath;
        };

        log::info!("[NOTES] Writing to {:?}", full_path);
        match file_ops::append_note(&full_path, content) {
            Ok(bytes) => NoteWrite::Appended { bytes },
            Err(e) => NoteWrite::Failed(e.to_string()),
        }
    }

    /// Render the note tree for the system prompt
    pub fn render_tree(&self) -> String {
        file_ops::render_tree(&self.notes_dir).unwrap_or_else(|e| {
            log::warn!("[NOTES] Failed to render note tree: {}", e);
            String::new()
        })
    }

    /// List all note files (relative paths)
    pub fn list_notes(&self) -> Vec<String> {
        match file_ops::list_notes(&self.notes_dir) {
            Ok(files) => files
                .into_iter()
                .filter_map(|p| file_ops::relative_path(&self.notes_dir, &p))
                .collect(),
            Err(e) => {
                log::warn!("[NOTES] Failed to list notes: {}", e);
                Vec::new()
            }
        }
    }
}
