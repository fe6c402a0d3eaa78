//! Filesystem utilities for code generation

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write content to a file, creating parent directories if needed
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, contents)
}

/// Delete every regular file directly inside `dir`, returning the deleted
/// paths in sorted order. Subdirectories are left alone; a missing `dir` is
/// treated as empty.
pub fn clear_directory_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    for file in &files {
        fs::remove_file(file)?;
    }
    Ok(files)
}

/// Whether the current process can create files in `dir`. A uniquely named
/// scratch file is created and dropped again; any failure counts as no.
pub fn is_writable<P: AsRef<Path>>(dir: P) -> bool {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return false;
    }
    tempfile::Builder::new()
        .prefix(".repogen-write-check")
        .tempfile_in(dir)
        .is_ok()
}
