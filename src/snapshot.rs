//! Snapshot persistence for counter mappings.
//!
//! A snapshot is the full key to count mapping at a point in time. It is
//! stored as a pretty-printed JSON object whose field names are the keys
//! and whose values are the counts:
//!
//! ```json
//! {
//!   "about": 12,
//!   "index": 1042
//! }
//! ```
//!
//! Writes go to a sibling temporary file which is synced and then renamed
//! over the target, so a concurrent reader sees either the previous or the
//! new snapshot, never a partial one.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, SnapshotReadError};

/// A key to count mapping, ordered by key so the file is deterministic.
pub type Snapshot = BTreeMap<String, u64>;

/// Reads and decodes the snapshot at `path`.
///
/// Returns [`SnapshotReadError::NotFound`] when nothing has been written
/// there yet.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, SnapshotReadError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(SnapshotReadError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(SnapshotReadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&data).map_err(|source| SnapshotReadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `snapshot` and atomically replaces the file at `path`.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), PersistenceError> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp_path = temp_path(path);

    let write_err = |source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let result = File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(&json)?;
            file.write_all(b"\n")?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(err));
    }
    Ok(())
}

/// Returns `<path>.tmp`, next to the target so the rename stays on one
/// filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_owned();
    name.push(".tmp");
    path.with_file_name(name)
}
