//! File operations for notes system
//!
//! Handles reading/appending plain text note files and rendering the note tree.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const INDENT: &str = "    ";

/// Append to a note file (creates parent directories and the file as needed).
///
/// If the file already has content that doesn't end with a newline, a newline
/// is written first so the appended text starts on its own line.
pub fn append_note(path: &Path, content: &str) -> io::Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let needs_separator = match fs::read_to_string(path) {
        Ok(existing) => !existing.ends_with('\n'),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e),
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut written = 0;
    if needs_separator {
        file.write_all(b"\n")?;
        written += 1;
    }
    file.write_all(content.as_bytes())?;
    written += content.len();
    Ok(written)
}

/// Read a note file, returning None if not found
pub fn read_note(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// List all note files under the notes directory (recursively), sorted
pub fn list_notes(notes_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if !notes_dir.exists() {
        return Ok(files);
    }

    fn visit_dir(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
        let (dirs, plain) = sorted_entries(dir)?;
        files.extend(plain);
        for sub in dirs {
            visit_dir(&sub, files)?;
        }
        Ok(())
    }

    visit_dir(notes_dir, &mut files)?;
    Ok(files)
}

/// Render the notes directory as an indented tree.
///
/// The root itself is not listed. Each directory lists its files first, then
/// its subdirectories (suffixed with `/`), both sorted by name. Every line ends
/// with a newline; an empty directory renders as an empty string.
pub fn render_tree(notes_dir: &Path) -> io::Result<String> {
    let mut tree = String::new();

    if !notes_dir.exists() {
        return Ok(tree);
    }

    fn visit_dir(dir: &Path, depth: usize, tree: &mut String) -> io::Result<()> {
        let indent = INDENT.repeat(depth);
        let (dirs, files) = sorted_entries(dir)?;
        for file in &files {
            tree.push_str(&indent);
            tree.push_str(&file_name(file));
            tree.push('\n');
        }
        for sub in &dirs {
            tree.push_str(&indent);
            tree.push_str(&file_name(sub));
            tree.push_str("/\n");
            visit_dir(sub, depth + 1, tree)?;
        }
        Ok(())
    }

    visit_dir(notes_dir, 0, &mut tree)?;
    Ok(tree)
}

/// Get relative path from notes_dir for a file, always slash-separated
pub fn relative_path(notes_dir: &Path, file_path: &Path) -> Option<String> {
    let rel = file_path.strip_prefix(notes_dir).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

/// Split a directory's entries into (subdirectories, files), each sorted by name.
/// Symlinks are skipped so the walk can't leave the note root.
fn sorted_entries(dir: &Path) -> io::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            log::warn!("[NOTES] Skipping symlink in note tree: {:?}", entry.path());
            continue;
        }
        if file_type.is_dir() {
            dirs.push(entry.path());
        } else {
            files.push(entry.path());
        }
    }
    dirs.sort();
    files.sort();
    Ok((dirs, files))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
