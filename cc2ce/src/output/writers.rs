// SPDX-License-Identifier: GPL-3.0-or-later

use super::WriteError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The type represents a writer that replaces the target file atomically.
///
/// The content is written to a temporary file in the directory of the target,
/// which is renamed to the final file name only when everything was written.
/// The previous content of the target is left intact on failure, and the
/// temporary file is removed. The replaced file keeps its permissions, a new
/// file gets the permissions of a plain file creation.
pub(super) struct AtomicFileWriter {
    final_path: PathBuf,
}

impl AtomicFileWriter {
    pub(super) fn new(final_path: &Path) -> Self {
        Self { final_path: final_path.to_path_buf() }
    }

    /// The directory of the target, the temporary file has to be on the same file system.
    fn directory(&self) -> &Path {
        match self.final_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// The temporary file, with the permissions the target shall have.
    fn temporary(&self) -> io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // The umask applies, like for `fs::File::create`.
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let file = builder.tempfile_in(self.directory())?;

        match fs::metadata(&self.final_path) {
            Ok(metadata) if metadata.is_file() => file.as_file().set_permissions(metadata.permissions())?,
            _ => {}
        }
        Ok(file)
    }

    pub(super) fn write(self, content: &str) -> Result<(), WriteError> {
        let io_error = |source| WriteError::Io { path: self.final_path.clone(), source };

        let mut file = self.temporary().map_err(io_error)?;
        log::debug!("Writing temporary file: {}", file.path().display());
        file.write_all(content.as_bytes()).map_err(io_error)?;
        file.flush().map_err(io_error)?;

        file.persist(&self.final_path).map_err(|error| io_error(error.error))?;
        log::debug!("Output file written: {}", self.final_path.display());

        Ok(())
    }
}
