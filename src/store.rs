use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::Path;

use crate::model::Snapshot;

/// Load club data from a JSON snapshot.
///
/// A missing file is an empty club. Any of the four collections may be absent.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        log::debug!("No data file at {}; starting empty", path.display());
        return Ok(Snapshot::default());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open data file at {}", path.display()))?;

    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse club data from {}", path.display()))
}

/// Save club data as pretty JSON, atomically.
/// Creates the parent directory if needed.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, snapshot).context("Failed to serialize club data")?;

    file.commit().context("Failed to save club data")?;

    Ok(())
}
