// SPDX-License-Identifier: GPL-3.0-or-later

use crate::compilation::IncludePaths;
use crate::output::{LibraryEntry, OutputWriter};
use crate::site::{Project, Site};
use anyhow::anyhow;
use std::path::PathBuf;

/// Configures a single project of the nightly or the release area.
pub struct Nightly {
    site: Site,
    project: Project,
    keep_local_includes: bool,
    url: Option<String>,
    output: PathBuf,
}

impl Nightly {
    pub fn new(
        site: Site,
        project: Project,
        keep_local_includes: bool,
        url: Option<String>,
        output: PathBuf,
    ) -> Self {
        Self { site, project, keep_local_includes, url, output }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let resolved = self.site.resolve(self.project, self.keep_local_includes)?;
        println!("{}", colon_separated(&resolved.includes));

        let entry = resolved.into_library(self.url);
        OutputWriter::new(&self.output).write(&[entry])?;

        Ok(())
    }
}

/// Configures every candidate project which exists in the nightly area.
pub struct Collect {
    site: Site,
    candidates: Vec<Project>,
    url: Option<String>,
    output: PathBuf,
}

impl Collect {
    pub fn new(site: Site, candidates: Vec<Project>, url: Option<String>, output: PathBuf) -> Self {
        Self { site, candidates, url, output }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let total = self.candidates.len();
        let resolved = self.site.collect(self.candidates)?;
        log::info!("Found {} of {total} nightly builds", resolved.len());
        if resolved.is_empty() {
            return Err(anyhow!("No nightly build found under {}", self.site.nightly_root.display()));
        }

        let entries: Vec<LibraryEntry> =
            resolved.into_iter().map(|project| project.into_library(self.url.clone())).collect();
        OutputWriter::new(&self.output).write(&entries)?;

        Ok(())
    }
}

fn colon_separated(paths: &IncludePaths) -> String {
    paths.iter().map(String::as_str).collect::<Vec<_>>().join(":")
}
