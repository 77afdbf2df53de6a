// SPDX-License-Identifier: GPL-3.0-or-later

//! This module defines the configuration of the application.
//!
//! The configuration is either loaded from a file or used with default
//! values, which are defined in the code. It describes the deployment site
//! (where the nightly builds and the releases are), the parameters of the
//! compiler option extraction, and the nightly builds to enumerate.
//!
//! The configuration file syntax is based on the YAML format.
//! The default configuration file name is `cc2ce.yml`.
//!
//! The configuration file location is searched in the following order:
//! 1. The current working directory
//! 2. The local configuration directory of the user
//! 3. The configuration directory of the user
//! 4. The local configuration directory of the application
//! 5. The configuration directory of the application
//!
//! ```yaml
//! schema: 1.0
//!
//! site:
//!   distribution_root: /cvmfs
//!   release_root: /cvmfs/lhcb.cern.ch/lib/lhcb
//!   nightly_root: /cvmfs/lhcbdev.cern.ch/nightlies
//!   workspace_root: /workspace/build
//!   install_marker: InstallArea
//!   platform: x86_64+avx2+fma-centos7-gcc7-opt
//!   url: https://lhcb-nightlies.cern.ch/nightly/summary/
//!
//! options:
//!   package_name: CompilerExplorer
//!   package_version: v0r0
//!   dropped_defines: [-DGAUDI_LINKER_LIBRARY]
//!   unescape_quote_limit: 2
//!
//! nightlies:
//!   slots: [lhcb-head, lhcb-gaudi-head]
//!   days: [latest, Today, Yesterday, Mon, Tue, Wed, Thu, Fri, Sat, Sun]
//!   projects: [Brunel, Gaudi]
//!   versions: [HEAD, master]
//! ```
//!
//! Every section and every field is optional. The `unescape_quote_limit` can
//! be set to `null` to unescape all quotes of a define.

// Re-Export the types and the loader module content.
pub use loader::{ConfigError, Loader};
pub use types::*;
pub use validation::Validator;

mod types {
    use crate::compilation::flags;
    use crate::site;
    use serde::Deserialize;
    use std::fmt;
    use std::path::PathBuf;

    /// Represents the application configuration.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Main {
        #[serde(deserialize_with = "validate_schema_version")]
        pub schema: String,
        #[serde(default)]
        pub site: Site,
        #[serde(default)]
        pub options: Options,
        #[serde(default)]
        pub nightlies: Nightlies,
    }

    impl Default for Main {
        fn default() -> Self {
            Self {
                schema: String::from(SUPPORTED_SCHEMA_VERSION),
                site: Site::default(),
                options: Options::default(),
                nightlies: Nightlies::default(),
            }
        }
    }

    impl fmt::Display for Main {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "Configuration:")?;
            let yaml_string = serde_yml::to_string(self).map_err(|_| fmt::Error)?;
            for line in yaml_string.lines() {
                writeln!(f, "{line}")?;
            }
            Ok(())
        }
    }

    /// The layout of the deployment site.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Site {
        #[serde(default = "default_distribution_root")]
        pub distribution_root: String,
        #[serde(default = "default_release_root")]
        pub release_root: PathBuf,
        #[serde(default = "default_nightly_root")]
        pub nightly_root: PathBuf,
        #[serde(default = "default_workspace_root")]
        pub workspace_root: String,
        #[serde(default = "default_install_marker")]
        pub install_marker: String,
        /// The default platform of the nightly builds.
        #[serde(default = "default_platform")]
        pub platform: String,
        /// The link shown for the nightly libraries.
        #[serde(default = "default_url", skip_serializing_if = "Option::is_none")]
        pub url: Option<String>,
    }

    impl Default for Site {
        fn default() -> Self {
            Self {
                distribution_root: default_distribution_root(),
                release_root: default_release_root(),
                nightly_root: default_nightly_root(),
                workspace_root: default_workspace_root(),
                install_marker: default_install_marker(),
                platform: default_platform(),
                url: default_url(),
            }
        }
    }

    /// The parameters of the compiler option extraction.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Options {
        #[serde(default = "default_package_name")]
        pub package_name: String,
        #[serde(default = "default_package_version")]
        pub package_version: String,
        #[serde(default = "default_dropped_defines")]
        pub dropped_defines: Vec<String>,
        #[serde(default = "default_unescape_quote_limit")]
        pub unescape_quote_limit: Option<usize>,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                package_name: default_package_name(),
                package_version: default_package_version(),
                dropped_defines: default_dropped_defines(),
                unescape_quote_limit: default_unescape_quote_limit(),
            }
        }
    }

    /// The nightly builds to look for when collecting.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Nightlies {
        #[serde(default = "default_slots")]
        pub slots: Vec<String>,
        #[serde(default = "default_days")]
        pub days: Vec<String>,
        #[serde(default = "default_projects")]
        pub projects: Vec<String>,
        #[serde(default = "default_versions")]
        pub versions: Vec<String>,
    }

    impl Default for Nightlies {
        fn default() -> Self {
            Self {
                slots: default_slots(),
                days: default_days(),
                projects: default_projects(),
                versions: default_versions(),
            }
        }
    }

    pub(super) const SUPPORTED_SCHEMA_VERSION: &str = "1.0";
    const DEFAULT_URL: &str = "https://lhcb-nightlies.cern.ch/nightly/summary/";

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().copied().map(String::from).collect()
    }

    fn default_distribution_root() -> String {
        site::DEFAULT_DISTRIBUTION_ROOT.into()
    }

    fn default_release_root() -> PathBuf {
        PathBuf::from(site::DEFAULT_RELEASE_ROOT)
    }

    fn default_nightly_root() -> PathBuf {
        PathBuf::from(site::DEFAULT_NIGHTLY_ROOT)
    }

    fn default_workspace_root() -> String {
        site::DEFAULT_WORKSPACE_ROOT.into()
    }

    fn default_install_marker() -> String {
        site::DEFAULT_INSTALL_MARKER.into()
    }

    fn default_platform() -> String {
        site::DEFAULT_PLATFORM.into()
    }

    fn default_url() -> Option<String> {
        Some(DEFAULT_URL.into())
    }

    fn default_package_name() -> String {
        flags::DEFAULT_PACKAGE_NAME.into()
    }

    fn default_package_version() -> String {
        flags::DEFAULT_PACKAGE_VERSION.into()
    }

    fn default_dropped_defines() -> Vec<String> {
        strings(&flags::DEFAULT_DROPPED_DEFINES)
    }

    fn default_unescape_quote_limit() -> Option<usize> {
        Some(flags::DEFAULT_UNESCAPE_QUOTE_LIMIT)
    }

    fn default_slots() -> Vec<String> {
        strings(&["lhcb-head", "lhcb-gaudi-head"])
    }

    fn default_days() -> Vec<String> {
        strings(&["latest", "Today", "Yesterday", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"])
    }

    fn default_projects() -> Vec<String> {
        strings(&["Brunel", "Gaudi"])
    }

    fn default_versions() -> Vec<String> {
        strings(&["HEAD", "master"])
    }

    // Custom deserialization function to validate the schema version
    fn validate_schema_version<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let schema: String = Deserialize::deserialize(deserializer)?;
        if schema != SUPPORTED_SCHEMA_VERSION {
            use serde::de::Error;
            Err(Error::custom(format!(
                "Unsupported schema version: {schema}. Expected: {SUPPORTED_SCHEMA_VERSION}"
            )))
        } else {
            Ok(schema)
        }
    }
}

pub mod validation {

    use super::types::*;
    use std::path::Path;
    use thiserror::Error;

    /// Trait for validating configuration objects
    pub trait Validator<T> {
        type Error: std::error::Error;

        fn validate(config: &T) -> Result<(), Self::Error>;
    }

    /// Validation errors for configuration
    #[derive(Debug, Error)]
    pub enum ValidationError {
        #[error("Empty string value for field '{field}'")]
        EmptyString { field: &'static str },
        #[error("Path of field '{field}' is not absolute: '{path}'")]
        NotAbsolute { field: &'static str, path: String },
        #[error("Empty list for field '{field}'")]
        EmptyList { field: &'static str },
        #[error("Multiple validation errors: {errors:?}")]
        Multiple { errors: Vec<ValidationError> },
    }

    /// Combinator for collecting and handling validation errors
    #[derive(Default)]
    struct ValidationCollector {
        errors: Vec<ValidationError>,
    }

    impl ValidationCollector {
        fn add_result(&mut self, result: Result<(), ValidationError>) {
            if let Err(error) = result {
                match error {
                    ValidationError::Multiple { errors } => {
                        self.errors.extend(errors);
                    }
                    single_error => self.errors.push(single_error),
                }
            }
        }

        fn finish(mut self) -> Result<(), ValidationError> {
            match self.errors.len() {
                0 => Ok(()),
                1 => Err(self.errors.remove(0)),
                _ => Err(ValidationError::Multiple { errors: self.errors }),
            }
        }
    }

    fn not_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            Err(ValidationError::EmptyString { field })
        } else {
            Ok(())
        }
    }

    fn absolute(field: &'static str, value: &Path) -> Result<(), ValidationError> {
        if value.is_absolute() {
            Ok(())
        } else {
            Err(ValidationError::NotAbsolute { field, path: value.display().to_string() })
        }
    }

    fn not_empty_list(field: &'static str, values: &[String]) -> Result<(), ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::EmptyList { field });
        }
        if values.iter().any(String::is_empty) {
            return Err(ValidationError::EmptyString { field });
        }
        Ok(())
    }

    impl Validator<Main> for Main {
        type Error = ValidationError;

        fn validate(config: &Main) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            collector.add_result(Site::validate(&config.site));
            collector.add_result(Options::validate(&config.options));
            collector.add_result(Nightlies::validate(&config.nightlies));

            collector.finish()
        }
    }

    impl Validator<Site> for Site {
        type Error = ValidationError;

        fn validate(config: &Site) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            collector.add_result(not_empty("site.distribution_root", &config.distribution_root));
            collector.add_result(absolute("site.distribution_root", Path::new(&config.distribution_root)));
            collector.add_result(absolute("site.release_root", &config.release_root));
            collector.add_result(absolute("site.nightly_root", &config.nightly_root));
            collector.add_result(absolute("site.workspace_root", Path::new(&config.workspace_root)));
            collector.add_result(not_empty("site.install_marker", &config.install_marker));
            collector.add_result(not_empty("site.platform", &config.platform));

            collector.finish()
        }
    }

    impl Validator<Options> for Options {
        type Error = ValidationError;

        fn validate(config: &Options) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            collector.add_result(not_empty("options.package_name", &config.package_name));
            collector.add_result(not_empty("options.package_version", &config.package_version));
            if config.dropped_defines.iter().any(String::is_empty) {
                collector.add_result(Err(ValidationError::EmptyString { field: "options.dropped_defines" }));
            }

            collector.finish()
        }
    }

    impl Validator<Nightlies> for Nightlies {
        type Error = ValidationError;

        fn validate(config: &Nightlies) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            collector.add_result(not_empty_list("nightlies.slots", &config.slots));
            collector.add_result(not_empty_list("nightlies.days", &config.days));
            collector.add_result(not_empty_list("nightlies.projects", &config.projects));
            collector.add_result(not_empty_list("nightlies.versions", &config.versions));

            collector.finish()
        }
    }

}

pub mod loader {
    use super::{Main, Validator};
    use directories::{BaseDirs, ProjectDirs};
    use log::{debug, info};
    use std::fs::OpenOptions;
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    const CONFIG_FILE_NAME: &str = "cc2ce.yml";

    pub struct Loader {}

    impl Loader {
        /// Loads the configuration from the specified file or the default locations.
        ///
        /// If the configuration file is specified, it will be used. Otherwise, the default locations
        /// will be searched for the configuration file. If the configuration file is not found, the
        /// default configuration will be returned.
        pub fn load(context: &crate::context::Context, filename: &Option<String>) -> Result<Main, ConfigError> {
            if let Some(path) = filename {
                Self::from_file(Path::new(path))
            } else {
                for location in Self::file_locations(context) {
                    debug!("Checking configuration file: {}", location.display());
                    if location.exists() {
                        return Self::from_file(location.as_path());
                    }
                }
                debug!("Configuration file not found. Using the default configuration.");
                Ok(Main::default())
            }
        }

        /// The default locations where the configuration file can be found.
        fn file_locations(context: &crate::context::Context) -> Vec<PathBuf> {
            let mut locations = Vec::new();

            locations.push(context.current_directory.clone());
            if let Some(base_dirs) = BaseDirs::new() {
                locations.push(base_dirs.config_local_dir().to_path_buf());
                locations.push(base_dirs.config_dir().to_path_buf());
            }
            if let Some(proj_dirs) = ProjectDirs::from("com.github", "pseyfert", "cc2ce") {
                locations.push(proj_dirs.config_local_dir().to_path_buf());
                locations.push(proj_dirs.config_dir().to_path_buf());
            }
            locations.dedup();

            locations.iter().map(|p| p.join(CONFIG_FILE_NAME)).collect()
        }

        /// Loads the configuration from the specified file.
        pub fn from_file(path: &Path) -> Result<Main, ConfigError> {
            info!("Loading configuration file: {}", path.display());

            let reader = OpenOptions::new()
                .read(true)
                .open(path)
                .map_err(|source| ConfigError::FileAccess { path: path.to_path_buf(), source })?;

            let content: Main = Self::from_reader(reader)
                .map_err(|source| ConfigError::ParseError { path: path.to_path_buf(), source })?;

            Main::validate(&content)
                .map_err(|source| ConfigError::ValidationError { path: path.to_path_buf(), source })?;

            Ok(content)
        }

        /// Define the deserialization format of the config file.
        fn from_reader<R, T>(rdr: R) -> serde_yml::Result<T>
        where
            R: std::io::Read,
            T: serde::de::DeserializeOwned,
        {
            serde_yml::from_reader(rdr)
        }
    }

    /// Represents all possible configuration-related errors.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        /// Error when opening or reading a configuration file.
        #[error("Failed to access configuration file '{path}': {source}")]
        FileAccess {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        /// Error when parsing the configuration file format.
        #[error("Failed to parse configuration from file '{path}': {source}")]
        ParseError {
            path: PathBuf,
            #[source]
            source: serde_yml::Error,
        },
        /// Error when configuration validation fails.
        #[error("Configuration validation failed '{path}': {source}")]
        ValidationError {
            path: PathBuf,
            #[source]
            source: crate::config::validation::ValidationError,
        },
    }

}
