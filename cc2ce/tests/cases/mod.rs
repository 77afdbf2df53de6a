// SPDX-License-Identifier: GPL-3.0-or-later

mod exit_codes;
mod local;
mod nightly;

use serde_json::Value;
use std::fs;
use std::path::Path;

pub const CC2CE_BIN: &str = "cc2ce";
pub const OUTPUT_FILE: &str = "c++.local.properties";

/// Writes a compilation database into the given directory.
pub fn write_database(directory: &Path, commands: Value) {
    fs::create_dir_all(directory).unwrap();
    fs::write(directory.join("compile_commands.json"), commands.to_string()).unwrap();
}
