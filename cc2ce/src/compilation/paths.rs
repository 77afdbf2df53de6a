// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

/// Turns a relative include path into an absolute one.
///
/// The path is returned unchanged when `make_absolute` is not set or when it is
/// absolute already. Otherwise it is joined to the working directory of the
/// compilation, `..` components are not resolved.
pub fn normalize(path: &str, working_dir: &Path, make_absolute: bool) -> String {
    if !make_absolute || Path::new(path).is_absolute() {
        return path.to_string();
    }
    working_dir.join(path).to_string_lossy().into_owned()
}
