//! Atomic output files.
//!
//! Content is written to a temporary file next to the destination, flushed
//! and fsynced, and only then renamed over the destination. A failure at any
//! point removes the temporary file and leaves the destination untouched.
//!
//! The renamed file keeps the permissions of the file it replaces. A new file
//! gets the same mode a plain `File::create` would (0o666 under the umask).

use crate::{Error, Result};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A fully written temporary file waiting to replace its destination
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Write content for `target` into a temporary file in the same directory.
    ///
    /// Fails up front when `target` is an existing directory, so a later
    /// `commit` only has the rename left to do.
    pub fn write<F>(target: &Path, write: F) -> Result<Self>
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        let at_target = |source: io::Error| Error::write(target, source);

        if target.is_dir() {
            return Err(at_target(io::Error::other("destination is a directory")));
        }

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(at_target)?;

        let mut temp = new_temp_in(dir).map_err(at_target)?;
        if let Ok(existing) = std::fs::metadata(target) {
            temp.as_file()
                .set_permissions(existing.permissions())
                .map_err(at_target)?;
        }

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            write(&mut writer).map_err(|e| match e {
                Error::Io(source) => at_target(source),
                other => other,
            })?;
            writer.flush().map_err(at_target)?;
        }
        temp.as_file().sync_all().map_err(at_target)?;

        tracing::debug!("Staged {:?} at {:?}", target, temp.path());
        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    /// Rename the staged file over its destination
    pub fn commit(self) -> Result<PathBuf> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| Error::write(target.as_path(), e.error))?;
        tracing::debug!("Committed {:?}", target);
        Ok(target)
    }
}

#[cfg(unix)]
fn new_temp_in(dir: &Path) -> io::Result<NamedTempFile> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_in(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}
