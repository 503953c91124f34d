use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::ArchiveFile;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use output directory {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates the archive directory (and parents) unless it already exists.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    fs::create_dir_all(dir)
        .map_err(|err| PersistError::OutputDir(format!("{}: {err}", dir.display())))
}

/// Saves downloaded archives into one directory, via temp file and rename so
/// a reader never sees a partial archive.
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    dir: PathBuf,
}

impl ArchiveWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, file_name: &str, bytes: &[u8]) -> Result<ArchiveFile, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(file_name);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replaces an archive of the same name from an earlier run in one rename.
        tmp.persist(&target).map_err(|err| PersistError::Io(err.error))?;

        Ok(ArchiveFile {
            file_name: file_name.to_string(),
            path: target,
            byte_len: bytes.len() as u64,
        })
    }
}
