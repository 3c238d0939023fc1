use anyhow::Result;
use dust_common::snapshot::SnapshotData;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Interface to the snapshot files produced by the simulation code.
///
/// `Ok(None)` means "no snapshot exists at this index" and is a recoverable
/// condition; callers leave the slot unloaded and move on.
pub trait SnapshotReader {
    fn read(&self, index: usize) -> Result<Option<SnapshotData>>;
}

/// Reads bincode-encoded snapshot files named `snapshot_<idx>.bin` (zero-padded to
/// three digits) from a directory.
pub struct DirectoryReader {
    dir: PathBuf,
}

impl DirectoryReader {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        DirectoryReader {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("snapshot_{index:03}.bin"))
    }
}

impl SnapshotReader for DirectoryReader {
    fn read(&self, index: usize) -> Result<Option<SnapshotData>> {
        let path = self.path_for(index);
        if !path.exists() {
            debug!("No snapshot file at '{}'", path.display());
            return Ok(None);
        }
        let file = File::open(&path)
            .map_err(|e| anyhow::anyhow!("Failed to open snapshot file '{}': {}", path.display(), e))?;
        let snapshot: SnapshotData = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| anyhow::anyhow!("Failed to decode snapshot file '{}': {}", path.display(), e))?;
        Ok(Some(snapshot))
    }
}
