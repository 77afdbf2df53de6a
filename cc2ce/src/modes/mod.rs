// SPDX-License-Identifier: GPL-3.0-or-later

mod local;
mod nightly;

use crate::context::Context;
use crate::{args, config, site};
use std::process::ExitCode;

/// Represent the modes the application can run in.
///
/// To the user the modes are:
/// - local: configure a library from a local compilation database.
/// - options: print the compiler options of a local compilation database.
/// - nightly: configure one project of the nightly (or release) area.
/// - collect: configure every project found in the nightly area.
pub enum Mode {
    Local(local::Local),
    Options(local::Options),
    Nightly(nightly::Nightly),
    Collect(nightly::Collect),
}

impl Mode {
    /// Configure the application mode based on the command line arguments and the configuration.
    ///
    /// Command line arguments override the values of the configuration. Relative
    /// paths are resolved against the working directory of the context.
    pub fn configure(
        context: Context,
        args: args::Arguments,
        config: config::Main,
    ) -> Result<Self, ConfigurationError> {
        match args.mode {
            args::Mode::Local { input, library, output } => {
                log::debug!("Mode: configure a local library");

                let local = local::Local::new(
                    context.resolve(&input.path),
                    library,
                    context.resolve(&output.file_name),
                );
                Ok(Self::Local(local))
            }
            args::Mode::Options { input, skip_package_name_version } => {
                log::debug!("Mode: print compiler options");

                let mut policy = crate::compilation::OptionsPolicy::from(&config.options);
                policy.skip_package_name_version = skip_package_name_version;

                Ok(Self::Options(local::Options::new(context.resolve(&input.path), policy)))
            }
            args::Mode::Nightly { coordinate, site, keep_local_includes, output } => {
                log::debug!("Mode: configure a nightly library");

                let (deployment, platform) = Self::site(&context, &config, &site)?;
                let project = site::Project {
                    slot: coordinate.slot,
                    day: coordinate.day,
                    name: coordinate.project,
                    version: coordinate.version,
                    platform,
                };
                let nightly = nightly::Nightly::new(
                    deployment,
                    project,
                    keep_local_includes,
                    config.site.url.clone(),
                    context.resolve(&output.file_name),
                );
                Ok(Self::Nightly(nightly))
            }
            args::Mode::Collect { site, output } => {
                log::debug!("Mode: collect nightly libraries");

                let (deployment, platform) = Self::site(&context, &config, &site)?;
                let candidates = site::candidates(&config.nightlies, &platform);
                let collect = nightly::Collect::new(
                    deployment,
                    candidates,
                    config.site.url.clone(),
                    context.resolve(&output.file_name),
                );
                Ok(Self::Collect(collect))
            }
        }
    }

    /// The deployment site and the platform, with the command line overrides applied.
    fn site(
        context: &Context,
        config: &config::Main,
        overrides: &args::SiteOverride,
    ) -> Result<(site::Site, String), ConfigurationError> {
        let mut deployment = site::Site::from(&config.site);
        if let Some(base) = &overrides.nightly_base {
            deployment.nightly_root = site::clean(&context.resolve(base));
        }
        deployment.released = overrides.released;

        let platform = overrides.platform.clone().unwrap_or_else(|| config.site.platform.clone());
        if platform.is_empty() {
            return Err(ConfigurationError::InvalidConfiguration("empty platform".into()));
        }
        log::debug!("Site: {deployment:?}, platform: {platform}");

        Ok((deployment, platform))
    }

    /// It actually runs the application mode.
    ///
    /// These errors are all run-time errors, the user were passing valid
    /// arguments and configurations.
    pub fn run(self) -> ExitCode {
        let status = match self {
            Self::Local(local) => local.run(),
            Self::Options(options) => options.run(),
            Self::Nightly(nightly) => nightly.run(),
            Self::Collect(collect) => collect.run(),
        };
        status.map(|_| ExitCode::SUCCESS).unwrap_or_else(|error| {
            log::error!("cc2ce: {error:#}");
            ExitCode::FAILURE
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
