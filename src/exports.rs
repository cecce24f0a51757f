//! Durable export history with versioned read-modify-write.
//!
//! The client is the sole owner of this list, but two processes can share
//! the file. Every save checks that the on-disk version still matches the
//! version that was loaded; a losing writer gets [`ExportStoreError::Stale`]
//! and must reload instead of silently clobbering the other write.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::ExportEntry;

#[derive(Debug)]
pub enum ExportStoreError {
    Io(std::io::Error),
    Parse(String),
    /// The file changed under us since the list was loaded.
    Stale {
        expected: u64,
        found: u64,
    },
    NoDataDir,
}

impl fmt::Display for ExportStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStoreError::Io(err) => write!(f, "Filesystem error: {err}"),
            ExportStoreError::Parse(err) => write!(f, "{err}"),
            ExportStoreError::Stale { expected, found } => write!(
                f,
                "Export history changed since it was loaded (version {found}, expected {expected}); reload and retry"
            ),
            ExportStoreError::NoDataDir => {
                write!(f, "Could not determine the user data directory")
            }
        }
    }
}

impl std::error::Error for ExportStoreError {}

impl From<std::io::Error> for ExportStoreError {
    fn from(value: std::io::Error) -> Self {
        ExportStoreError::Io(value)
    }
}

/// On-disk schema.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    version: u64,
    entries: Vec<ExportEntry>,
}

/// A loaded snapshot of the export history. `version` pins the snapshot for
/// the compare-and-swap on save.
#[derive(Debug)]
pub struct ExportList {
    pub entries: Vec<ExportEntry>,
    version: u64,
}

impl ExportList {
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Clone)]
pub struct ExportStore {
    path: PathBuf,
}

impl ExportStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The standard location: `<data_dir>/storiq/exports.json`.
    pub fn default_location() -> Result<Self, ExportStoreError> {
        let mut path = dirs::data_dir().ok_or(ExportStoreError::NoDataDir)?;
        path.push("storiq");
        path.push("exports.json");
        Ok(Self { path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the history. A missing file reads as an empty list at version 0.
    pub fn load(&self) -> Result<ExportList, ExportStoreError> {
        let file = self.read_file()?;
        Ok(ExportList {
            entries: file.entries,
            version: file.version,
        })
    }

    /// Persists the list if nobody else saved since it was loaded. On
    /// success the snapshot's version is bumped so the caller can keep
    /// mutating and saving.
    pub fn save(&self, list: &mut ExportList) -> Result<(), ExportStoreError> {
        let on_disk = self.read_file()?.version;
        if on_disk != list.version {
            return Err(ExportStoreError::Stale {
                expected: list.version,
                found: on_disk,
            });
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = StoreFile {
            version: list.version + 1,
            entries: list.entries.clone(),
        };
        let payload = serde_json::to_string_pretty(&file).map_err(|err| {
            ExportStoreError::Parse(format!(
                "Failed to serialize export history at {}: {err}",
                self.path.display()
            ))
        })?;
        fs::write(&self.path, payload)?;
        list.version = file.version;
        Ok(())
    }

    /// Appends one entry, retrying the read-modify-write a few times if a
    /// concurrent writer races it.
    pub fn append(&self, entry: ExportEntry) -> Result<(), ExportStoreError> {
        const MAX_ATTEMPTS: usize = 3;

        let mut last = None;
        for _ in 0..MAX_ATTEMPTS {
            let mut list = self.load()?;
            list.entries.push(entry.clone());
            match self.save(&mut list) {
                Ok(()) => return Ok(()),
                Err(err @ ExportStoreError::Stale { .. }) => last = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last.unwrap_or(ExportStoreError::Stale {
            expected: 0,
            found: 0,
        }))
    }

    fn read_file(&self) -> Result<StoreFile, ExportStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(err) => return Err(ExportStoreError::from(err)),
        };
        serde_json::from_str(&contents).map_err(|err| {
            ExportStoreError::Parse(format!(
                "Failed to parse export history {}: {err}",
                self.path.display()
            ))
        })
    }
}
