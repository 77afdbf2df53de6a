// SPDX-License-Identifier: GPL-3.0-or-later

use crate::args;
use crate::compilation::{Database, OptionsPolicy};
use crate::output::{LibraryEntry, OutputWriter};
use std::path::PathBuf;

/// Configures a library from a compilation database of a local build.
///
/// All include paths of the build are kept, relative ones are made absolute
/// unless requested otherwise.
pub struct Local {
    database: PathBuf,
    library: args::Library,
    output: PathBuf,
}

impl Local {
    pub fn new(database: PathBuf, library: args::Library, output: PathBuf) -> Self {
        Self { database, library, output }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let database = Database::open(&self.database)?;
        let paths = database.include_paths(!self.library.relative);
        log::info!("Found {} include paths in {} translation units", paths.len(), database.len());

        let entry = LibraryEntry {
            name: self.library.name,
            version: self.library.version,
            url: self.library.url,
            paths,
        };
        OutputWriter::new(&self.output).write(&[entry])?;

        Ok(())
    }
}

/// Prints the compiler options of the first translation unit.
pub struct Options {
    database: PathBuf,
    policy: OptionsPolicy,
}

impl Options {
    pub fn new(database: PathBuf, policy: OptionsPolicy) -> Self {
        Self { database, policy }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let database = Database::open(&self.database)?;
        let options = database.options(&self.policy)?;
        println!("{}", options.trim_end());

        Ok(())
    }
}
