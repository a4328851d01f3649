//! Aggregator/Splitter - buffer accumulation and flushing
//!
//! Consumes FileRecords in root order, frames each one with a
//! `// File: <path>` header, and writes the growing buffer out either as a
//! single `merged.txt` or as `merged_1.txt`, `merged_2.txt`, ... when the
//! estimated token count crosses the configured limit.

use std::fs;
use std::path::PathBuf;

use crate::collect::collect_records;
use crate::core::model::{FileRecord, MergeError, MergeStats, ScanRequest, SplitMode};
use crate::core::paths::normalize_path;
use crate::core::tokenizer::estimate_tokens;

/// Fixed output name in SingleFile mode
const SINGLE_FILE_NAME: &str = "merged.txt";

/// Output name prefix in SplitByTokens mode, suffixed with `_<index>.txt`
const SPLIT_FILE_PREFIX: &str = "merged";

/// Accumulates framed file contents and flushes them to the output
/// directory. All mutable run state (buffer, file index) lives here.
pub struct Aggregator {
    mode: SplitMode,
    out_dir: PathBuf,
    buffer: String,
    /// 1-based index of the next split output file
    file_index: usize,
    files_merged: usize,
    chunks_written: usize,
    tokens_flushed: usize,
}

impl Aggregator {
    pub fn new(mode: SplitMode, out_dir: PathBuf) -> Self {
        Self {
            mode,
            out_dir,
            buffer: String::new(),
            file_index: 1,
            files_merged: 0,
            chunks_written: 0,
            tokens_flushed: 0,
        }
    }

    /// Append one record: header line, raw content, two newlines. No other
    /// framing or escaping is applied.
    ///
    /// In SplitByTokens mode the token count of the entire buffer is
    /// re-estimated after the append (the splitting rule is defined over the
    /// whole buffer, not the increment) and the buffer is flushed when the
    /// count strictly exceeds the limit.
    pub fn append(&mut self, record: &FileRecord) -> Result<(), MergeError> {
        self.buffer.push_str("// File: ");
        self.buffer.push_str(&normalize_path(&record.path));
        self.buffer.push('\n');
        self.buffer.push_str(&record.content);
        self.buffer.push_str("\n\n");
        self.files_merged += 1;

        if let SplitMode::SplitByTokens(limit) = self.mode {
            if estimate_tokens(&self.buffer) > limit {
                self.flush()?;
            }
        }
        Ok(())
    }

    /// Flush any remaining buffered content and return the run summary.
    ///
    /// In SingleFile mode this is the only write of the run; in
    /// SplitByTokens mode the remainder takes the next sequential index.
    pub fn finish(mut self) -> Result<MergeStats, MergeError> {
        self.flush()?;
        Ok(MergeStats {
            files_merged: self.files_merged,
            chunks_written: self.chunks_written,
            estimated_tokens: self.tokens_flushed,
        })
    }

    /// Write the buffer to the next output file and reset it.
    /// A buffer that is empty or whitespace-only is never written.
    fn flush(&mut self) -> Result<(), MergeError> {
        if self.buffer.trim().is_empty() {
            return Ok(());
        }

        let name = match self.mode {
            SplitMode::SingleFile => SINGLE_FILE_NAME.to_string(),
            SplitMode::SplitByTokens(_) => {
                format!("{}_{}.txt", SPLIT_FILE_PREFIX, self.file_index)
            }
        };
        let dest = self.out_dir.join(name);
        fs::write(&dest, &self.buffer).map_err(|source| MergeError::Io {
            path: dest.clone(),
            source,
        })?;

        self.tokens_flushed += estimate_tokens(&self.buffer);
        self.buffer.clear();
        self.file_index += 1;
        self.chunks_written += 1;
        Ok(())
    }
}

/// Execute one merge run: create the output directory, walk every root in
/// order, feed matched files through the Aggregator, and return the summary.
pub fn run_merge(request: &ScanRequest) -> Result<MergeStats, MergeError> {
    fs::create_dir_all(&request.out_dir).map_err(|source| MergeError::Io {
        path: request.out_dir.clone(),
        source,
    })?;

    let mut aggregator = Aggregator::new(request.mode, request.out_dir.clone());
    for root in &request.roots {
        for record in collect_records(root, &request.extensions) {
            aggregator.append(&record?)?;
        }
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn record(path: &str, content: &str) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            content: content.to_string(),
        }
    }

    fn read_out(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap()
    }

    fn out_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_single_file_mode_writes_once() {
        let temp = tempdir().unwrap();
        let mut agg = Aggregator::new(SplitMode::SingleFile, temp.path().to_path_buf());
        agg.append(&record("/lib/a.txt", "hello world")).unwrap();
        agg.append(&record("/lib/b.txt", "foo bar")).unwrap();
        let stats = agg.finish().unwrap();

        assert_eq!(stats.files_merged, 2);
        assert_eq!(stats.chunks_written, 1);
        assert_eq!(out_files(temp.path()), vec!["merged.txt"]);

        let content = read_out(temp.path(), "merged.txt");
        assert_eq!(
            content,
            "// File: /lib/a.txt\nhello world\n\n// File: /lib/b.txt\nfoo bar\n\n"
        );
    }

    #[test]
    fn test_no_appends_writes_nothing() {
        let temp = tempdir().unwrap();
        let agg = Aggregator::new(SplitMode::SingleFile, temp.path().to_path_buf());
        let stats = agg.finish().unwrap();

        assert_eq!(stats.chunks_written, 0);
        assert!(out_files(temp.path()).is_empty());
    }

    #[test]
    fn test_split_scenario_two_chunks() {
        let temp = tempdir().unwrap();
        let mut agg = Aggregator::new(SplitMode::SplitByTokens(5), temp.path().to_path_buf());
        agg.append(&record("/lib/a.txt", "hello world")).unwrap();
        agg.append(&record("/lib/b.txt", "foo bar baz qux")).unwrap();
        let stats = agg.finish().unwrap();

        assert_eq!(stats.chunks_written, 2);
        assert_eq!(out_files(temp.path()), vec!["merged_1.txt", "merged_2.txt"]);

        let first = read_out(temp.path(), "merged_1.txt");
        let second = read_out(temp.path(), "merged_2.txt");
        assert!(first.contains("hello world"));
        assert!(!first.contains("foo bar"));
        assert!(second.contains("foo bar baz qux"));
    }

    #[test]
    fn test_large_limit_single_indexed_chunk() {
        let temp = tempdir().unwrap();
        let mut agg = Aggregator::new(SplitMode::SplitByTokens(4000), temp.path().to_path_buf());
        agg.append(&record("/lib/a.txt", "hello world")).unwrap();
        agg.append(&record("/lib/b.txt", "foo bar")).unwrap();
        let stats = agg.finish().unwrap();

        // final forced flush uses index 1
        assert_eq!(stats.chunks_written, 1);
        assert_eq!(out_files(temp.path()), vec!["merged_1.txt"]);
    }

    #[test]
    fn test_split_numbering_is_sequential() {
        let temp = tempdir().unwrap();
        let mut agg = Aggregator::new(SplitMode::SplitByTokens(1), temp.path().to_path_buf());
        for i in 0..3 {
            agg.append(&record(&format!("/lib/f{i}.txt"), "word")).unwrap();
        }
        let stats = agg.finish().unwrap();

        assert_eq!(stats.chunks_written, 3);
        assert_eq!(
            out_files(temp.path()),
            vec!["merged_1.txt", "merged_2.txt", "merged_3.txt"]
        );
        assert!(stats.estimated_tokens > 0);
    }

    #[test]
    fn test_round_trip_strips_headers() {
        let temp = tempdir().unwrap();
        let contents = ["fn main() {}\n", "mod core;\n"];
        let mut agg = Aggregator::new(SplitMode::SingleFile, temp.path().to_path_buf());
        agg.append(&record("/src/main.rs", contents[0])).unwrap();
        agg.append(&record("/src/lib.rs", contents[1])).unwrap();
        agg.finish().unwrap();

        let merged = read_out(temp.path(), "merged.txt");
        let mut recovered = Vec::new();
        for chunk in merged.split("// File: ").filter(|c| !c.is_empty()) {
            let (_, body) = chunk.split_once('\n').unwrap();
            recovered.push(body.strip_suffix("\n\n").unwrap().to_string());
        }
        assert_eq!(recovered, contents);
    }

    #[test]
    fn test_run_merge_empty_root_yields_no_output() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("lib");
        fs::create_dir(&root).unwrap();
        let out = temp.path().join("build");

        let request = ScanRequest {
            roots: vec![root],
            extensions: vec![".txt".to_string()],
            mode: SplitMode::SplitByTokens(5),
            out_dir: out.clone(),
        };
        let stats = run_merge(&request).unwrap();

        assert_eq!(stats.files_merged, 0);
        assert_eq!(stats.chunks_written, 0);
        assert!(out_files(&out).is_empty());
    }

    #[test]
    fn test_run_merge_roots_in_order() {
        let temp = tempdir().unwrap();
        let first = temp.path().join("one");
        let second = temp.path().join("two");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        fs::write(first.join("a.txt"), "from one").unwrap();
        fs::write(second.join("b.txt"), "from two").unwrap();
        let out = temp.path().join("build");

        let request = ScanRequest {
            roots: vec![second.clone(), first.clone()],
            extensions: vec![".txt".to_string()],
            mode: SplitMode::SingleFile,
            out_dir: out.clone(),
        };
        run_merge(&request).unwrap();

        let merged = read_out(&out, "merged.txt");
        let pos_two = merged.find("from two").unwrap();
        let pos_one = merged.find("from one").unwrap();
        assert!(pos_two < pos_one, "roots must be aggregated in given order");
    }

    #[test]
    fn test_run_merge_missing_root_fails() {
        let temp = tempdir().unwrap();
        let request = ScanRequest {
            roots: vec![temp.path().join("missing")],
            extensions: vec![".txt".to_string()],
            mode: SplitMode::SingleFile,
            out_dir: temp.path().join("build"),
        };
        let err = run_merge(&request).unwrap_err();
        assert!(matches!(err, MergeError::Filesystem { .. }));
    }
}
