use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::engine_debug;
use thiserror::Error;
use walkdir::WalkDir;

use crate::FilePayload;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not a file: {0}")]
    NotAFile(PathBuf),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Reads each path into memory, named by its final path component.
pub fn read_files(paths: &[PathBuf]) -> Result<Vec<FilePayload>, SourceError> {
    paths.iter().map(|path| read_one(path)).collect()
}

/// Reads every file below `dir` whose name passes `keep`, in file-name order.
///
/// Files are named by their final path component only, so two files with the
/// same name in different subfolders yield two payloads with equal names.
pub fn read_folder(
    dir: &Path,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<FilePayload>, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::NotADirectory(dir.to_path_buf()));
    }

    let mut payloads = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !keep(&name) {
            engine_debug!("Skipping {} (name filter)", entry.path().display());
            continue;
        }
        payloads.push(read_one(entry.path())?);
    }
    Ok(payloads)
}

fn read_one(path: &Path) -> Result<FilePayload, SourceError> {
    if !path.is_file() {
        return Err(SourceError::NotAFile(path.to_path_buf()));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SourceError::NotAFile(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FilePayload { name, bytes })
}
