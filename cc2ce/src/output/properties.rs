// SPDX-License-Identifier: GPL-3.0-or-later

//! Renders library entries in the properties format of Compiler Explorer.
//!
//! ```text
//! libs=brunel:gaudi
//! libs.brunel.name=Brunel
//! libs.brunel.url=https://lhcb-nightlies.cern.ch/nightly/summary/
//! libs.brunel.versions=lhcb-head/Today/HEAD:lhcb-head/Mon/HEAD
//! libs.brunel.versions.lhcb-head/Today/HEAD.version=lhcb-head/Today/HEAD
//! libs.brunel.versions.lhcb-head/Today/HEAD.path=/cvmfs/a/include:/cvmfs/b/include
//! ...
//! ```

use super::{LibraryEntry, RenderError};

/// The separator of list values. The consumer splits path lists on it.
const LIST_SEPARATOR: &str = ":";

/// One `libs.<key>` block: the declaration of a library and its versions.
struct Library<'a> {
    key: String,
    name: &'a str,
    url: Option<&'a str>,
    versions: Vec<&'a str>,
}

/// Groups the entries by their lowercase name in the order of first appearance.
fn group(entries: &[LibraryEntry]) -> Vec<Library<'_>> {
    let mut libraries: Vec<Library> = Vec::new();
    for entry in entries {
        let key = entry.key();
        match libraries.iter_mut().find(|library| library.key == key) {
            Some(library) => {
                library.versions.push(&entry.version);
                if library.url.is_none() {
                    library.url = entry.url.as_deref();
                }
            }
            None => libraries.push(Library {
                key,
                name: &entry.name,
                url: entry.url.as_deref(),
                versions: vec![&entry.version],
            }),
        }
    }
    libraries
}

/// Renders the properties text of the given entries.
pub fn render(entries: &[LibraryEntry]) -> Result<String, RenderError> {
    if entries.is_empty() {
        return Err(RenderError::NoEntries);
    }

    let libraries = group(entries);
    let keys: Vec<&str> = libraries.iter().map(|library| library.key.as_str()).collect();

    let mut lines = vec![format!("libs={}", keys.join(LIST_SEPARATOR))];
    for library in &libraries {
        let key = &library.key;
        lines.push(format!("libs.{key}.name={}", library.name));
        if let Some(url) = library.url.filter(|url| !url.is_empty()) {
            lines.push(format!("libs.{key}.url={url}"));
        }
        lines.push(format!("libs.{key}.versions={}", library.versions.join(LIST_SEPARATOR)));
    }
    for entry in entries {
        let key = entry.key();
        let version = &entry.version;
        lines.push(format!("libs.{key}.versions.{version}.version={version}"));
        lines.push(format!("libs.{key}.versions.{version}.path={}", path_list(entry)));
    }

    let mut result = lines.join("\n");
    result.push('\n');
    Ok(result)
}

fn path_list(entry: &LibraryEntry) -> String {
    for path in entry.paths.iter().filter(|path| path.contains(LIST_SEPARATOR)) {
        log::warn!(
            "Include path of {} {} contains '{LIST_SEPARATOR}', it will be split by the consumer: {path}",
            entry.name,
            entry.version
        );
    }
    entry.paths.iter().map(String::as_str).collect::<Vec<_>>().join(LIST_SEPARATOR)
}
