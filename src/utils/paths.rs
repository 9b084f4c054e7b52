// Path conversion for scanned files
//
// Scanned files are identified by their path relative to the project root,
// always with `/` separators regardless of platform.

use anyhow::{Context, Result};
use std::path::{Path, MAIN_SEPARATOR};

/// Path of `absolute` relative to `root`, with `/` separators
pub fn to_relative_unix_style(absolute: &Path, root: &Path) -> Result<String> {
    let relative = absolute.strip_prefix(root).with_context(|| {
        format!(
            "File path '{}' is not within project root '{}'",
            absolute.display(),
            root.display()
        )
    })?;

    let path_str = relative.to_str().context("Path contains invalid UTF-8")?;
    Ok(unix_separators(path_str))
}

/// Replace native separators with `/` (no-op on Unix)
pub fn unix_separators(path: &str) -> String {
    if MAIN_SEPARATOR == '\\' {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}
