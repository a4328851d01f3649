//! Collector - lazy depth-first file discovery
//!
//! Walks a root directory with walkdir in pre-order, directory entries in
//! listing order (no sorting), and yields a FileRecord for every file whose
//! name ends with one of the configured extensions. Any traversal or read
//! error ends the run; there is no partial-success mode.
//!
//! Known limitation: symlink cycles are not guarded against (links are not
//! followed, which covers the common case).

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::core::model::{FileRecord, MergeError};

/// Case-sensitive suffix match against the file name
fn matches_extension(name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Lazily yield one FileRecord per matched file under `root`.
///
/// Contents are read eagerly per yielded item, decoded strictly as UTF-8;
/// a non-UTF-8 file or an unreadable entry yields a Filesystem error naming
/// the offending path.
pub fn collect_records<'a>(
    root: &Path,
    extensions: &'a [String],
) -> impl Iterator<Item = Result<FileRecord, MergeError>> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| match entry {
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                let message = err.to_string();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other(message));
                Some(Err(MergeError::Filesystem { path, source }))
            }
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                let name = entry.file_name().to_string_lossy();
                if !matches_extension(&name, extensions) {
                    return None;
                }
                let path = entry.into_path();
                Some(match fs::read_to_string(&path) {
                    Ok(content) => Ok(FileRecord { path, content }),
                    Err(source) => Err(MergeError::Filesystem { path, source }),
                })
            }
        })
}
