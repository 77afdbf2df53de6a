// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains the command line interface of the application.
//!
//! The command line parsing is implemented using the `clap` library.
//! The module is defining types to represent a structured form of the
//! program invocation. The `Arguments` type is used to represent all
//! possible invocations of the program.

use anyhow::anyhow;
use clap::{ArgAction, ArgMatches, Command, arg, command};
use std::fmt;

/// Common constants used in the module.
const MODE_LOCAL_SUBCOMMAND: &str = "local";
const MODE_OPTIONS_SUBCOMMAND: &str = "options";
const MODE_NIGHTLY_SUBCOMMAND: &str = "nightly";
const MODE_COLLECT_SUBCOMMAND: &str = "collect";
const DEFAULT_DATABASE_PATH: &str = ".";
const DEFAULT_OUTPUT_FILE: &str = "./c++.local.properties";
const DEFAULT_LOCAL_NAME: &str = "local";
const DEFAULT_LOCAL_VERSION: &str = "master";
const DEFAULT_SLOT: &str = "lhcb-head";
const DEFAULT_DAY: &str = "Today";
const DEFAULT_PROJECT: &str = "Brunel";
const DEFAULT_NIGHTLY_VERSION: &str = "HEAD";

/// Represents the command line arguments of the application.
#[derive(Debug, PartialEq)]
pub struct Arguments {
    // The verbosity level of the logging.
    pub verbose: u8,
    // The path of the configuration file.
    pub config: Option<String>,
    // The mode of the application.
    pub mode: Mode,
}

/// Represents the mode of the application.
#[derive(Debug, PartialEq)]
pub enum Mode {
    /// Configure a locally built project.
    Local { input: Database, library: Library, output: Properties },
    /// Print the compiler options of the first translation unit.
    Options { input: Database, skip_package_name_version: bool },
    /// Configure a single nightly (or released) project.
    Nightly {
        coordinate: Coordinate,
        site: SiteOverride,
        keep_local_includes: bool,
        output: Properties,
    },
    /// Configure all nightly projects which can be found.
    Collect { site: SiteOverride, output: Properties },
}

/// The compilation database file, or the directory which contains it.
#[derive(Debug, PartialEq)]
pub struct Database {
    pub path: String,
}

/// How a locally built project is shown.
#[derive(Debug, PartialEq)]
pub struct Library {
    pub name: String,
    pub url: Option<String>,
    pub version: String,
    /// Keep relative include paths as they are.
    pub relative: bool,
}

/// Identifies a nightly build, the platform is part of the site.
#[derive(Debug, PartialEq)]
pub struct Coordinate {
    pub slot: String,
    pub day: String,
    pub project: String,
    pub version: String,
}

/// Values which override the site configuration.
#[derive(Debug, Default, PartialEq)]
pub struct SiteOverride {
    pub platform: Option<String>,
    pub nightly_base: Option<String>,
    pub released: bool,
}

/// The output file.
#[derive(Debug, PartialEq)]
pub struct Properties {
    pub file_name: String,
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arguments: verbose={}, config={:?}, mode={:?}", self.verbose, self.config, self.mode)
    }
}

/// Returns the value of an argument which has a default value.
fn defaulted(matches: &ArgMatches, id: &str) -> anyhow::Result<String> {
    matches
        .get_one::<String>(id)
        .map(String::to_string)
        .ok_or_else(|| anyhow!("missing value for argument: {id}"))
}

fn optional(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).map(String::to_string)
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches.get_one::<bool>(id).copied().unwrap_or(false)
}

impl TryFrom<ArgMatches> for Arguments {
    type Error = anyhow::Error;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let verbose = matches.get_count("verbose");
        let config = optional(&matches, "config");

        let mode = match matches.subcommand() {
            Some((MODE_LOCAL_SUBCOMMAND, local_matches)) => Mode::Local {
                input: Database::try_from(local_matches)?,
                library: Library::try_from(local_matches)?,
                output: Properties::try_from(local_matches)?,
            },
            Some((MODE_OPTIONS_SUBCOMMAND, options_matches)) => Mode::Options {
                input: Database::try_from(options_matches)?,
                skip_package_name_version: flag(options_matches, "skip-package-name-version"),
            },
            Some((MODE_NIGHTLY_SUBCOMMAND, nightly_matches)) => Mode::Nightly {
                coordinate: Coordinate::try_from(nightly_matches)?,
                site: SiteOverride::from(nightly_matches),
                keep_local_includes: flag(nightly_matches, "keep-local-includes"),
                output: Properties::try_from(nightly_matches)?,
            },
            Some((MODE_COLLECT_SUBCOMMAND, collect_matches)) => Mode::Collect {
                site: SiteOverride::from(collect_matches),
                output: Properties::try_from(collect_matches)?,
            },
            _ => return Err(anyhow!("unrecognized subcommand")),
        };

        Ok(Arguments { verbose, config, mode })
    }
}

impl TryFrom<&ArgMatches> for Database {
    type Error = anyhow::Error;

    fn try_from(matches: &ArgMatches) -> Result<Self, Self::Error> {
        Ok(Database { path: defaulted(matches, "path")? })
    }
}

impl TryFrom<&ArgMatches> for Library {
    type Error = anyhow::Error;

    fn try_from(matches: &ArgMatches) -> Result<Self, Self::Error> {
        Ok(Library {
            name: defaulted(matches, "name")?,
            url: optional(matches, "url").filter(|url| !url.is_empty()),
            version: defaulted(matches, "lib-version")?,
            relative: flag(matches, "relative"),
        })
    }
}

impl TryFrom<&ArgMatches> for Coordinate {
    type Error = anyhow::Error;

    fn try_from(matches: &ArgMatches) -> Result<Self, Self::Error> {
        Ok(Coordinate {
            slot: defaulted(matches, "slot")?,
            day: defaulted(matches, "day")?,
            project: defaulted(matches, "project")?,
            version: defaulted(matches, "lib-version")?,
        })
    }
}

impl From<&ArgMatches> for SiteOverride {
    fn from(matches: &ArgMatches) -> Self {
        // Not every subcommand has the `released` flag.
        let released = matches.try_get_one::<bool>("released").ok().flatten().copied().unwrap_or(false);

        SiteOverride {
            platform: optional(matches, "platform"),
            nightly_base: optional(matches, "nightly-base"),
            released,
        }
    }
}

impl TryFrom<&ArgMatches> for Properties {
    type Error = anyhow::Error;

    fn try_from(matches: &ArgMatches) -> Result<Self, Self::Error> {
        Ok(Properties { file_name: defaulted(matches, "output")? })
    }
}

fn database_arg() -> clap::Arg {
    arg!(-p --path <PATH> "Path of the compilation database, or the directory which contains it")
        .default_value(DEFAULT_DATABASE_PATH)
        .hide_default_value(false)
}

fn output_arg() -> clap::Arg {
    arg!(-o --output <FILE> "Path of the result file")
        .default_value(DEFAULT_OUTPUT_FILE)
        .hide_default_value(false)
}

fn site_args() -> [clap::Arg; 2] {
    [
        arg!(--platform <PLATFORM> "Platform of the nightly builds [default: from configuration]"),
        arg!(--"nightly-base" <DIR> "Root directory of the nightly builds [default: from configuration]"),
    ]
}

/// Represents the command line interface of the application.
///
/// The different modes of the application are represented as subcommands.
/// The `local` mode configures a project built in a local directory, the
/// `nightly` and `collect` modes configure projects deployed by the nightly
/// build system, and the `options` mode prints the compiler options.
pub fn cli() -> Command {
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(&[
            arg!(-v --verbose ... "Sets the level of verbosity").action(ArgAction::Count),
            arg!(-c --config <FILE> "Path of the config file"),
        ])
        .subcommand(
            Command::new(MODE_LOCAL_SUBCOMMAND)
                .about("configure a library from a local compilation database")
                .args(&[
                    database_arg(),
                    arg!(-l --name <NAME> "Library name shown in the code browser")
                        .default_value(DEFAULT_LOCAL_NAME)
                        .hide_default_value(false),
                    arg!(-u --url <URL> "Url linked from the code browser"),
                    arg!(--"lib-version" <VERSION> "Library version shown in the code browser")
                        .default_value(DEFAULT_LOCAL_VERSION)
                        .hide_default_value(false),
                    output_arg(),
                    arg!(--relative "Keep relative include paths as they are").action(ArgAction::SetTrue),
                ]),
        )
        .subcommand(
            Command::new(MODE_OPTIONS_SUBCOMMAND)
                .about("print the compiler options of the first translation unit")
                .args(&[
                    database_arg(),
                    arg!(--"skip-package-name-version" "Drop the package name and version defines")
                        .action(ArgAction::SetTrue),
                ]),
        )
        .subcommand(
            Command::new(MODE_NIGHTLY_SUBCOMMAND)
                .about("configure a library from a nightly or released build")
                .args(&[
                    arg!(--slot <SLOT> "Slot of the nightly build")
                        .default_value(DEFAULT_SLOT)
                        .hide_default_value(false),
                    arg!(--day <DAY> "Day or build id of the nightly build")
                        .default_value(DEFAULT_DAY)
                        .hide_default_value(false),
                    arg!(--project <PROJECT> "Project name")
                        .default_value(DEFAULT_PROJECT)
                        .hide_default_value(false),
                    arg!(--"lib-version" <VERSION> "Project version")
                        .default_value(DEFAULT_NIGHTLY_VERSION)
                        .hide_default_value(false),
                    arg!(-R --released "Look for a released project instead of a nightly build")
                        .action(ArgAction::SetTrue),
                    arg!(--"keep-local-includes" "Keep the include paths into the project sources")
                        .action(ArgAction::SetTrue),
                    output_arg(),
                ])
                .args(site_args()),
        )
        .subcommand(
            Command::new(MODE_COLLECT_SUBCOMMAND)
                .about("configure all nightly builds which can be found")
                .args(&[output_arg()])
                .args(site_args()),
        )
}
