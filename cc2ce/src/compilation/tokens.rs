// SPDX-License-Identifier: GPL-3.0-or-later

//! Splits a compiler invocation into words.
//!
//! The split happens on runs of ASCII whitespace. There is no quoting or escaping
//! awareness: a quoted macro value with a space in it ends up in two tokens. This
//! matches how build logs are consumed by the rest of the pipeline, which only
//! looks at flags that do not contain whitespace.

/// Splits the command into whitespace-delimited tokens.
pub fn split(command: &str) -> Vec<&str> {
    command.split_ascii_whitespace().collect()
}
