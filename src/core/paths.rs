//! Path display helpers
//!
//! Header lines and status messages always show '/' separated paths for
//! cross-platform consistency.

use std::path::Path;

/// Normalize a path to use '/' as separator
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
