use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace a roster data file (config, projects, employees) in one step.
///
/// The bytes go to a sibling temp file that is then renamed over `path`, so
/// a reader sees either the old project list or the new one, never a mix.
/// Missing company directories are created on the way.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.flush()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Seed a data file for a freshly initialized company. Existing files hold
/// real records and are never overwritten. Returns whether a file was seeded.
pub fn write_if_missing(path: &Path, seed: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, seed).map(|()| true)
}
