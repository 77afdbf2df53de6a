// SPDX-License-Identifier: GPL-3.0-or-later

//! This module is responsible for writing the library configuration of the
//! code browsing service.
//!
//! The output is a flat properties file (`key=value` per line), which declares
//! the libraries, their versions and the include paths of each version. The
//! file is replaced atomically, a reader sees either the previous or the new
//! content.

mod properties;
mod writers;

use crate::compilation::IncludePaths;
use std::path::{Path, PathBuf};
use thiserror::Error;
use writers::AtomicFileWriter;

pub use properties::render;

/// One version of a library as shown in the code browsing service.
#[derive(Clone, Debug, PartialEq)]
pub struct LibraryEntry {
    pub name: String,
    pub version: String,
    pub url: Option<String>,
    pub paths: IncludePaths,
}

impl LibraryEntry {
    /// The key of the library in the properties file.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Represents the output writer of the properties file.
pub struct OutputWriter {
    path: PathBuf,
}

impl OutputWriter {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    /// Renders the entries and replaces the output file with the result.
    pub fn write(self, entries: &[LibraryEntry]) -> Result<(), OutputError> {
        let content = render(entries)?;
        write_atomically(&self.path, &content)?;

        log::info!("Written {} library versions to {}", entries.len(), self.path.display());
        Ok(())
    }
}

/// Replaces the content of the file at `path` with `content` atomically.
pub fn write_atomically(path: &Path, content: &str) -> Result<(), WriteError> {
    AtomicFileWriter::new(path).write(content)
}

/// Represents errors of the rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No library entries to write")]
    NoEntries,
}

/// Represents errors of the file writing.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write output file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Write(#[from] WriteError),
}
