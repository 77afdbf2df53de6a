// SPDX-License-Identifier: GPL-3.0-or-later

//! This module provides the model of a JSON compilation database.
//!
//! A compilation database is a set of records which describe the compilation of the
//! source files in a given project. Each record holds the working directory, the
//! compiler invocation and the source file of one translation unit. The format is
//! defined in the LLVM project
//! [documentation](https://clang.llvm.org/docs/JSONCompilationDatabase.html).
//!
//! The database is read once, and the include paths and the compiler options are
//! derived from it. No record outlives the operation which produced these sets.

pub mod flags;
pub mod paths;
pub mod tokens;

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

pub use flags::OptionsPolicy;

/// The file name CMake and friends use for the compilation database.
pub const DATABASE_FILE_NAME: &str = "compile_commands.json";

/// A set of include paths.
///
/// Iteration order is sorted, but consumers shall not rely on any order.
pub type IncludePaths = BTreeSet<String>;

/// Represents an entry of the compilation database.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Entry {
    /// The working directory of the compilation. Relative paths in the command
    /// are relative to this directory.
    pub directory: PathBuf,
    /// The compile command as a single string.
    #[serde(default)]
    pub command: String,
    /// The main translation unit source processed by this compilation step.
    pub file: PathBuf,
    /// The compile command as a list of strings, alternative to `command`.
    #[serde(default)]
    pub arguments: Vec<String>,
    /// The name of the output created by this compilation step. Not used.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Entry {
    /// The tokens of the compiler invocation.
    ///
    /// The `command` field is preferred, the `arguments` field is only used when
    /// the command is absent.
    pub fn tokens(&self) -> Vec<&str> {
        if self.command.is_empty() {
            self.arguments.iter().map(String::as_str).collect()
        } else {
            tokens::split(&self.command)
        }
    }

    /// Constructor method for testing purposes.
    #[cfg(test)]
    pub fn from_command_str(file: &str, command: &str, directory: &str) -> Self {
        Self {
            directory: directory.into(),
            command: command.into(),
            file: file.into(),
            arguments: vec![],
            output: None,
        }
    }
}

/// The parsed representation of one compilation database.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Database {
    entries: Vec<Entry>,
}

impl Database {
    /// Reads the compilation database from a file.
    ///
    /// When the path does not name a `compile_commands.json` file, it is taken as
    /// the directory which contains one.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let path = locate(path);
        log::debug!("Reading compilation database: {}", path.display());

        let content = fs::read(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                DatabaseError::NotFound { path: path.clone(), source }
            } else {
                DatabaseError::Io { path: path.clone(), source }
            }
        })?;

        let database = Self::from_slice(&content)
            .map_err(|source| DatabaseError::Malformed { path: path.clone(), source })?;
        log::debug!("Read {} entries from {}", database.len(), path.display());

        Ok(database)
    }

    /// Parses the compilation database from its JSON content.
    ///
    /// Anything but a JSON array of records is an error, an empty array is not.
    pub fn from_slice(content: &[u8]) -> Result<Self, serde_json::Error> {
        let entries: Vec<Entry> = serde_json::from_slice(content)?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The union of the include paths of all translation units.
    ///
    /// Empty include paths are discarded. When `make_absolute` is set, relative
    /// paths are joined to the working directory of their record.
    pub fn include_paths(&self, make_absolute: bool) -> IncludePaths {
        let mut result = IncludePaths::new();
        for entry in &self.entries {
            let tokens = entry.tokens();
            for include in flags::include_flags(&tokens) {
                if include.is_empty() {
                    continue;
                }
                result.insert(paths::normalize(include, &entry.directory, make_absolute));
            }
        }
        result
    }

    /// The compiler options of the first translation unit.
    ///
    /// This is a sample, not a union. Translation units may well be compiled with
    /// different options.
    pub fn options(&self, policy: &OptionsPolicy) -> Result<String, DatabaseError> {
        let first = self.entries.first().ok_or(DatabaseError::NoTranslationUnits)?;
        Ok(flags::extract_options(&first.tokens(), policy))
    }
}

impl From<Vec<Entry>> for Database {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

/// The location of the compilation database file.
///
/// Any path whose name ends with the database file name is taken as the file,
/// e.g. `brunel_compile_commands.json`. Everything else is a directory.
pub fn locate(path: &Path) -> PathBuf {
    if path.as_os_str().to_string_lossy().ends_with(DATABASE_FILE_NAME) {
        path.to_path_buf()
    } else {
        path.join(DATABASE_FILE_NAME)
    }
}

/// Represents the errors of reading and sampling a compilation database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Compilation database does not exist: {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read compilation database '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed compilation database '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No translation units found in the compilation database")]
    NoTranslationUnits,
}

impl DatabaseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }
}
