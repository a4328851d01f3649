//! Core data model
//!
//! A run is described by a ScanRequest, which is validated before any
//! filesystem I/O happens. Everything downstream consumes it read-only.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// How the merged output is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Accumulate everything and write a single `merged.txt` at the end
    SingleFile,
    /// Flush to `merged_<N>.txt` whenever the estimated token count of the
    /// buffer exceeds the limit (always > 0 in this variant)
    SplitByTokens(usize),
}

impl SplitMode {
    /// Build a mode from a raw token limit.
    ///
    /// A limit of 0 means "no splitting" rather than "split after every
    /// append" — it downgrades to SingleFile.
    pub fn from_limit(limit: usize) -> Self {
        if limit == 0 {
            SplitMode::SingleFile
        } else {
            SplitMode::SplitByTokens(limit)
        }
    }
}

/// A validated merge request: roots to scan, extensions to match, split mode,
/// and the output directory. Consumed once per run.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Traversal starting points, in the order given by the user
    pub roots: Vec<PathBuf>,
    /// Filename suffixes to match (case-sensitive), e.g. ".dart", ".ts"
    pub extensions: Vec<String>,
    pub mode: SplitMode,
    pub out_dir: PathBuf,
}

impl ScanRequest {
    /// Validate raw user input and resolve paths against `base`.
    ///
    /// Entries are trimmed; empty entries are dropped. An empty roots or
    /// extensions list is an input error, raised before any filesystem I/O.
    pub fn from_parts(
        base: &Path,
        dirs: &[String],
        extensions: &[String],
        mode: SplitMode,
        out_dir: &Path,
    ) -> Result<Self, MergeError> {
        let roots: Vec<PathBuf> = dirs
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(|d| base.join(d))
            .collect();
        if roots.is_empty() {
            return Err(MergeError::Input(
                "no root directory given (use --dirs)".to_string(),
            ));
        }

        let extensions: Vec<String> = extensions
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(MergeError::Input(
                "no file extensions given (use --ext)".to_string(),
            ));
        }

        let out_dir = if out_dir.is_absolute() {
            out_dir.to_path_buf()
        } else {
            base.join(out_dir)
        };

        Ok(Self {
            roots,
            extensions,
            mode,
            out_dir,
        })
    }
}

/// One matched file: absolute path plus its full UTF-8 content.
/// Produced in depth-first pre-order, directory entries in listing order.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub content: String,
}

/// Error taxonomy for a merge run. Every error is terminal: the run aborts
/// on the first one, leaving already-written output files on disk.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Invalid user-supplied parameter; raised before any filesystem I/O
    #[error("invalid input: {0}")]
    Input(String),

    /// A directory or file could not be read (or decoded as UTF-8) during
    /// traversal
    #[error("cannot read {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output directory creation or output file write failed
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a completed run, reported on stderr with --stats
#[derive(Debug, Clone, Default)]
pub struct MergeStats {
    /// Number of matched files appended to the output
    pub files_merged: usize,
    /// Number of output files written
    pub chunks_written: usize,
    /// Sum of estimated token counts over all written chunks
    pub estimated_tokens: usize,
}
