// SPDX-License-Identifier: GPL-3.0-or-later

//! Extracts include paths and compiler options from tokenized compiler invocations.
//!
//! Include paths are recognized in the `-I<path>` and in the `-isystem <path>`
//! form. Compiler options are the `-D`, `-W`, `-f`, `-m`, `-p`, `-O` and `-std`
//! families, where some of the defines are dropped or replaced by placeholders.

use std::borrow::Cow;

use super::IncludePaths;
use crate::config;

const INCLUDE_FLAG: &str = "-I";
const SYSTEM_INCLUDE_FLAG: &str = "-isystem";
const DEFINE_FLAG: &str = "-D";
const EXPORTS_SUFFIX: &str = "EXPORTS";
const PACKAGE_NAME_DEFINE: &str = "-DPACKAGE_NAME";
const PACKAGE_VERSION_DEFINE: &str = "-DPACKAGE_VERSION";
const ESCAPED_QUOTE: &str = "\\\"";

/// Option families which are forwarded verbatim.
const FORWARDED_PREFIXES: [&str; 6] = ["-p", "-O", "-m", "-f", "-W", "-std"];

pub const DEFAULT_PACKAGE_NAME: &str = "CompilerExplorer";
pub const DEFAULT_PACKAGE_VERSION: &str = "v0r0";
pub const DEFAULT_DROPPED_DEFINES: [&str; 1] = ["-DGAUDI_LINKER_LIBRARY"];
pub const DEFAULT_UNESCAPE_QUOTE_LIMIT: usize = 2;

/// The parameters of the compiler option extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionsPolicy {
    /// Drop the package name and version defines instead of replacing them.
    pub skip_package_name_version: bool,
    /// The value of the `PACKAGE_NAME` define.
    pub package_name: String,
    /// The value of the `PACKAGE_VERSION` define.
    pub package_version: String,
    /// Defines which are marker only and dropped.
    pub dropped_defines: Vec<String>,
    /// How many escaped quotes are unescaped per define. `None` means all of them.
    pub unescape_quote_limit: Option<usize>,
}

impl Default for OptionsPolicy {
    fn default() -> Self {
        Self {
            skip_package_name_version: false,
            package_name: DEFAULT_PACKAGE_NAME.into(),
            package_version: DEFAULT_PACKAGE_VERSION.into(),
            dropped_defines: DEFAULT_DROPPED_DEFINES.into_iter().map(String::from).collect(),
            unescape_quote_limit: Some(DEFAULT_UNESCAPE_QUOTE_LIMIT),
        }
    }
}

impl From<&config::Options> for OptionsPolicy {
    fn from(value: &config::Options) -> Self {
        Self {
            skip_package_name_version: false,
            package_name: value.package_name.clone(),
            package_version: value.package_version.clone(),
            dropped_defines: value.dropped_defines.clone(),
            unescape_quote_limit: value.unescape_quote_limit,
        }
    }
}

/// Collects the include path arguments in the order of appearance.
///
/// The `-I` flag without a value yields an empty string, the caller decides
/// what to do with it. The `-isystem` flag without a following token is skipped.
pub fn include_flags<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    let mut result = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if token.len() < 2 {
            continue;
        }
        if let Some(path) = token.strip_prefix(INCLUDE_FLAG) {
            result.push(path);
        } else if *token == SYSTEM_INCLUDE_FLAG {
            match tokens.get(index + 1) {
                Some(path) => result.push(*path),
                None => log::debug!("Flag {SYSTEM_INCLUDE_FLAG} without value is ignored"),
            }
        }
    }
    result
}

/// Extracts the set of include paths from the tokens.
pub fn extract_include_paths(tokens: &[&str]) -> IncludePaths {
    include_flags(tokens).into_iter().map(String::from).collect()
}

/// Extracts the compiler options from the tokens of a single translation unit.
///
/// Every kept option is followed by a single space.
pub fn extract_options(tokens: &[&str], policy: &OptionsPolicy) -> String {
    let mut result = String::new();
    for token in tokens {
        if let Some(option) = option(token, policy) {
            result.push_str(&option);
            result.push(' ');
        }
    }
    result
}

fn option<'a>(token: &'a str, policy: &'a OptionsPolicy) -> Option<Cow<'a, str>> {
    if token.starts_with(DEFINE_FLAG) {
        define(token, policy)
    } else if FORWARDED_PREFIXES.iter().any(|prefix| token.starts_with(prefix)) {
        Some(Cow::Borrowed(token))
    } else {
        None
    }
}

fn define<'a>(token: &'a str, policy: &'a OptionsPolicy) -> Option<Cow<'a, str>> {
    if token.ends_with(EXPORTS_SUFFIX) {
        None
    } else if token.starts_with(PACKAGE_NAME_DEFINE) {
        placeholder(PACKAGE_NAME_DEFINE, &policy.package_name, policy)
    } else if token.starts_with(PACKAGE_VERSION_DEFINE) {
        placeholder(PACKAGE_VERSION_DEFINE, &policy.package_version, policy)
    } else if policy.dropped_defines.iter().any(|dropped| dropped == token) {
        None
    } else {
        Some(unescape_quotes(token, policy.unescape_quote_limit))
    }
}

fn placeholder<'a>(define: &str, value: &str, policy: &OptionsPolicy) -> Option<Cow<'a, str>> {
    if policy.skip_package_name_version {
        None
    } else {
        Some(Cow::Owned(format!("{define}=\"{value}\"")))
    }
}

/// Replaces shell-escaped quotes (`\"`) with plain quotes.
///
/// Build logs carry macro values like `-DNAME=\"value\"`, while the consumer
/// expects `-DNAME="value"`.
pub fn unescape_quotes(token: &str, limit: Option<usize>) -> Cow<'_, str> {
    if !token.contains(ESCAPED_QUOTE) {
        return Cow::Borrowed(token);
    }
    match limit {
        Some(count) => Cow::Owned(token.replacen(ESCAPED_QUOTE, "\"", count)),
        None => Cow::Owned(token.replace(ESCAPED_QUOTE, "\"")),
    }
}
