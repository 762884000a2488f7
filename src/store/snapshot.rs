use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::catalog::CatalogSnapshot;
use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const EXTENSION: &str = "json";

/// A snapshot file found in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Handle on the snapshot directory. The directory is created lazily on first write.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the snapshot for `date`, whether or not it exists yet
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}.{EXTENSION}", date.format(DATE_FORMAT)))
    }

    /// Persist a snapshot as that day's file, replacing any earlier one.
    ///
    /// The document is staged next to its destination and renamed into place,
    /// so a reader sees either the old file or the complete new one.
    pub fn write(&self, snapshot: &CatalogSnapshot, date: NaiveDate) -> Result<PathBuf> {
        let path = self.path_for(date);
        let write_err = |source: io::Error| Error::SnapshotWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        let mut staged = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        {
            let mut out = io::BufWriter::new(staged.as_file_mut());
            let mut ser =
                serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
            snapshot
                .serialize(&mut ser)
                .map_err(|e| write_err(e.into()))?;
            out.write_all(b"\n").map_err(write_err)?;
            out.flush().map_err(write_err)?;
        }
        staged.persist(&path).map_err(|e| write_err(e.error))?;

        debug!(path = %path.display(), items = snapshot.len(), "snapshot written");
        Ok(path)
    }

    /// Load a snapshot this store wrote earlier
    pub fn read(&self, path: &Path) -> Result<CatalogSnapshot> {
        read_snapshot(path)
    }

    /// All snapshot files, newest first. A missing directory holds no snapshots.
    pub fn list(&self) -> Result<Vec<SnapshotFile>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::SnapshotRead {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::SnapshotRead {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if let Some(date) = snapshot_date(&path) {
                files.push(SnapshotFile { date, path });
            }
        }

        // filenames are YYYY-MM-DD so date order is filename order
        files.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(files)
    }

    /// Most recent snapshot dated strictly before `current`.
    ///
    /// `None` is the normal first-run answer, not an error.
    pub fn find_previous(&self, current: &Path) -> Result<Option<SnapshotFile>> {
        let current_name = current.file_name();
        let previous = self
            .list()?
            .into_iter()
            .find(|file| match current_name {
                Some(name) => file.path.file_name().is_some_and(|n| n < name),
                None => true,
            });

        match &previous {
            Some(file) => debug!(path = %file.path.display(), "found previous snapshot"),
            None => debug!(dir = %self.dir.display(), "no previous snapshot"),
        }
        Ok(previous)
    }
}

/// Load a snapshot document; it must be a JSON object.
pub fn read_snapshot(path: &Path) -> Result<CatalogSnapshot> {
    let read_err = |source: io::Error| Error::SnapshotRead {
        path: path.to_path_buf(),
        source,
    };

    let text = fs::read_to_string(path).map_err(read_err)?;
    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| read_err(e.into()))?;

    CatalogSnapshot::from_value(value).map_err(|_| {
        read_err(io::Error::new(
            io::ErrorKind::InvalidData,
            "snapshot is not a JSON object",
        ))
    })
}

/// Date encoded in a snapshot filename, or `None` for anything else in the directory.
fn snapshot_date(path: &Path) -> Option<NaiveDate> {
    if path.extension()? != EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}
