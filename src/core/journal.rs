//! Append-only JSON Lines journals
//!
//! Activity entries and stock transactions are stored one JSON object per
//! line. Records are never rewritten; readers get them oldest first.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::core::entity::Entity;

#[derive(Debug, Error, Diagnostic)]
pub enum JournalError {
    #[error("IO error on {path}: {source}")]
    #[diagnostic(code(minv::journal::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt record at {path}:{line}: {message}")]
    #[diagnostic(
        code(minv::journal::corrupt),
        help("Journals are append-only JSON Lines; fix or remove the damaged line")
    )]
    Corrupt {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A typed JSON Lines file
#[derive(Debug, Clone)]
pub struct Journal<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T: Entity> Journal<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record
    pub fn append(&self, record: &T) -> Result<(), JournalError> {
        let line = serde_json::to_string(record)?;
        let io_err = |source| JournalError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        writeln!(file, "{}", line).map_err(io_err)?;
        log::debug!("Appended {} {} to {}", T::PREFIX, record.id(), self.path.display());
        Ok(())
    }

    /// Read every record, oldest first; a missing file is an empty journal
    pub fn read_all(&self) -> Result<Vec<T>, JournalError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(JournalError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| JournalError::Io {
                path: self.path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| JournalError::Corrupt {
                path: self.path.clone(),
                line: idx + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }
        Ok(records)
    }
}
