// SPDX-License-Identifier: GPL-3.0-or-later

//! Site specific treatment of the include paths found in the nightly and the
//! release builds.
//!
//! The projects are built in a workspace (`/workspace/build`) and deployed to a
//! read-only distribution file system afterwards. The include paths recorded by
//! the build point into the workspace, while the code browsing service sees
//! the deployed tree only. Every include path is classified:
//!
//! - paths on the distribution file system are accepted as they are,
//! - paths into the install area of a dependency (built by the same slot) are
//!   rewritten to their deployment destination,
//! - paths into the sources of the current project are dropped (or rewritten
//!   when local includes are requested), its installed headers are covered by
//!   the install area which is always added,
//! - empty paths are dropped,
//! - anything else is an error, because it signals a build layout which is not
//!   modeled here and would produce a wrong configuration.

use crate::compilation::{Database, DatabaseError, IncludePaths};
use crate::config;
use crate::output::LibraryEntry;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DISTRIBUTION_ROOT: &str = "/cvmfs";
pub const DEFAULT_RELEASE_ROOT: &str = "/cvmfs/lhcb.cern.ch/lib/lhcb";
pub const DEFAULT_NIGHTLY_ROOT: &str = "/cvmfs/lhcbdev.cern.ch/nightlies";
pub const DEFAULT_WORKSPACE_ROOT: &str = "/workspace/build";
pub const DEFAULT_INSTALL_MARKER: &str = "InstallArea";
pub const DEFAULT_PLATFORM: &str = "x86_64+avx2+fma-centos7-gcc7-opt";

/// One version of a library in the code browsing service.
///
/// Given the deployment of the nightly builds, it is defined by the slot, the
/// day (or build id), the project name and version, and the platform.
///
/// - `slot` is the slot of the nightly build system (e.g. `lhcb-head`).
/// - `day` is the build id, or a symlink name like `Today` or `Mon`.
/// - `name` is the project name as it appears in the nightly tree (e.g. `Brunel`).
/// - `version` is usually `HEAD` or `master` for nightlies.
/// - `platform` is the binary tag, e.g. `x86_64-centos7-gcc7-opt`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    pub slot: String,
    pub day: String,
    pub name: String,
    pub version: String,
    pub platform: String,
}

impl Project {
    /// The key of the library in the output configuration.
    pub fn config_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// The version of the library as shown in the output configuration.
    pub fn config_version(&self) -> String {
        format!("{}/{}/{}", self.slot, self.day, self.version)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.config_version(), self.platform)
    }
}

/// A project with the include paths it is compiled with.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub project: Project,
    pub includes: IncludePaths,
}

impl Resolved {
    pub fn into_library(self, url: Option<String>) -> LibraryEntry {
        LibraryEntry {
            name: self.project.config_name(),
            version: self.project.config_version(),
            url,
            paths: self.includes,
        }
    }
}

/// The category of an include path, in the order the rules are checked.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IncludeKind {
    /// On the distribution file system.
    Public,
    /// Install area of a dependency in the build workspace.
    Dependency,
    /// Source tree of the current project in the build workspace.
    LocalSource,
    /// Artifact of the extraction.
    Empty,
}

/// The deployment environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    /// Paths under this prefix are public and accepted as they are.
    pub distribution_root: String,
    /// Where released projects are deployed.
    pub release_root: PathBuf,
    /// Where the nightly builds are deployed.
    pub nightly_root: PathBuf,
    /// Where the projects are built. Stored without a trailing separator.
    pub workspace_root: String,
    /// The directory name of install areas.
    pub install_marker: String,
    /// Look for released projects instead of nightly builds.
    pub released: bool,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            distribution_root: DEFAULT_DISTRIBUTION_ROOT.into(),
            release_root: DEFAULT_RELEASE_ROOT.into(),
            nightly_root: DEFAULT_NIGHTLY_ROOT.into(),
            workspace_root: DEFAULT_WORKSPACE_ROOT.into(),
            install_marker: DEFAULT_INSTALL_MARKER.into(),
            released: false,
        }
    }
}

impl From<&config::Site> for Site {
    fn from(value: &config::Site) -> Self {
        Self {
            distribution_root: value.distribution_root.clone(),
            release_root: clean(&value.release_root),
            nightly_root: clean(&value.nightly_root),
            workspace_root: value.workspace_root.trim_end_matches('/').to_string(),
            install_marker: value.install_marker.clone(),
            released: false,
        }
    }
}

/// Drops trailing separators and repeated ones from a deployment root.
pub fn clean(path: &Path) -> PathBuf {
    path.components().collect()
}

impl Site {
    /// The deployment directory of the slot and day the project belongs to.
    pub fn build_area(&self, project: &Project) -> PathBuf {
        if self.released {
            self.release_root.clone()
        } else {
            self.nightly_root.join(&project.slot).join(&project.day)
        }
    }

    /// The deployment directory of the build outputs of the project.
    pub fn install_area(&self, project: &Project) -> PathBuf {
        if self.released {
            let upper = project.name.to_uppercase();
            self.release_root
                .join(&upper)
                .join(format!("{upper}_{}", project.version))
                .join(&self.install_marker)
                .join(&project.platform)
        } else {
            self.build_area(project)
                .join(&project.name)
                .join(&self.install_marker)
                .join(&project.platform)
        }
    }

    /// The headers the project itself publishes.
    pub fn install_include_dir(&self, project: &Project) -> String {
        self.install_area(project).join("include").to_string_lossy().into_owned()
    }

    /// The source locations of the project in the build workspace.
    ///
    /// The first is the layout of the nightly builds, the second is the layout
    /// used by older releases.
    fn local_source_prefixes(&self, project: &Project) -> [String; 2] {
        let upper = project.name.to_uppercase();
        [
            format!("{}/{}", self.workspace_root, project.name),
            format!("{}/{upper}/{upper}_{}", self.workspace_root, project.version),
        ]
    }

    /// Replaces the build workspace root with the deployment directory.
    fn rewrite(&self, path: &str, project: &Project) -> String {
        let from = format!("{}/", self.workspace_root);
        let to = format!("{}/", self.build_area(project).to_string_lossy());
        path.replacen(&from, &to, 1)
    }

    /// Classifies a single include path. The first matching rule wins.
    pub fn classify(&self, path: &str, project: &Project) -> Result<IncludeKind, ClassificationError> {
        if path.starts_with(&self.distribution_root) {
            Ok(IncludeKind::Public)
        } else if path.contains(&self.install_marker) {
            Ok(IncludeKind::Dependency)
        } else if self
            .local_source_prefixes(project)
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            Ok(IncludeKind::LocalSource)
        } else if path.is_empty() {
            Ok(IncludeKind::Empty)
        } else {
            Err(ClassificationError::UnexpectedIncludePath(path.to_string()))
        }
    }

    /// Produces the include paths as seen on the deployment file system.
    ///
    /// The install area of the project is always part of the result.
    pub fn classify_and_rewrite(
        &self,
        paths: &IncludePaths,
        project: &Project,
        keep_local_includes: bool,
    ) -> Result<IncludePaths, ClassificationError> {
        let mut result = IncludePaths::new();
        result.insert(self.install_include_dir(project));

        for path in paths {
            match self.classify(path, project)? {
                IncludeKind::Public => {
                    result.insert(path.clone());
                }
                IncludeKind::Dependency => {
                    let rewritten = self.rewrite(path, project);
                    log::debug!("Include path of a dependency: {path} -> {rewritten}");
                    result.insert(rewritten);
                }
                IncludeKind::LocalSource if keep_local_includes => {
                    result.insert(self.rewrite(path, project));
                }
                IncludeKind::LocalSource => {
                    log::debug!("Include path of the project sources is skipped: {path}");
                }
                IncludeKind::Empty => {}
            }
        }
        Ok(result)
    }

    /// Reads the compilation database of the project and classifies its include paths.
    pub fn resolve(&self, project: Project, keep_local_includes: bool) -> Result<Resolved, ResolveError> {
        let database = Database::open(&self.install_area(&project))?;
        let paths = database.include_paths(false);
        let includes = self.classify_and_rewrite(&paths, &project, keep_local_includes)?;
        log::info!("Resolved {project} with {} include paths", includes.len());

        Ok(Resolved { project, includes })
    }

    /// Resolves all candidates which exist on the deployment file system.
    ///
    /// A candidate without compilation database is skipped, because not every
    /// slot is published every day. Any other failure stops the collection.
    pub fn collect(&self, candidates: impl IntoIterator<Item = Project>) -> Result<Vec<Resolved>, ResolveError> {
        let mut result = Vec::new();
        for candidate in candidates {
            match self.resolve(candidate, false) {
                Ok(resolved) => result.push(resolved),
                Err(error) if error.is_not_found() => {
                    log::warn!("Configuration doesn't exist, skipped: {error}");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(result)
    }
}

/// The cartesian product of the configured slots, days, projects and versions.
pub fn candidates(nightlies: &config::Nightlies, platform: &str) -> Vec<Project> {
    let mut result = Vec::new();
    for slot in &nightlies.slots {
        for day in &nightlies.days {
            for name in &nightlies.projects {
                for version in &nightlies.versions {
                    result.push(Project {
                        slot: slot.clone(),
                        day: day.clone(),
                        name: name.clone(),
                        version: version.clone(),
                        platform: platform.to_string(),
                    });
                }
            }
        }
    }
    result
}

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("Unexpected include path for the nightly treatment: {0}")]
    UnexpectedIncludePath(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Classification(#[from] ClassificationError),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::Database(error) if error.is_not_found())
    }
}
