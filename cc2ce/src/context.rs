// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::{Context as AnyhowContext, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Application context containing runtime environment information.
///
/// It is captured once at startup, the later phases (configuration loading,
/// argument resolution) work from it without querying the environment again.
#[derive(Debug, Clone)]
pub struct Context {
    /// Current working directory when the application was invoked
    pub current_directory: PathBuf,
}

impl Context {
    /// Capture the current application context.
    pub fn capture() -> Result<Self> {
        let current_directory =
            env::current_dir().with_context(|| "Failed to get current working directory")?;

        Ok(Context { current_directory })
    }

    /// Resolves a path given on the command line against the working directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.current_directory.join(path)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Application Context:")?;
        write!(f, "Current Directory: {}", self.current_directory.display())
    }
}
