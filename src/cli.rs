//! CLI module - Command-line interface definition and run handler

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::model::{ScanRequest, SplitMode};
use crate::core::paths::normalize_path;
use crate::merge::run_merge;

/// codemerge - merge source files into one or more token-bounded text files.
#[derive(Parser, Debug)]
#[command(name = "codemerge")]
#[command(
    author,
    version,
    about,
    long_about = r#"codemerge scans a set of directories for files matching given extensions,
concatenates their contents with "// File: <path>" header lines, and writes
the result into an output directory.

With a token limit (--max-tokens), output is split across merged_1.txt,
merged_2.txt, ... whenever the estimated token count of the accumulated
buffer exceeds the limit. A limit of 0 (or --single) writes everything to a
single merged.txt instead.

Token counts are approximate: one token per word-character run, one per
other non-whitespace symbol. They are not real LLM tokenizer counts.

Examples:
    codemerge --dirs lib --ext .dart
    codemerge --dirs src,tests --ext .rs --max-tokens 8000
    codemerge --dirs lib --ext .dart,.ts --single --out dist
"#
)]
pub struct Cli {
    /// Base directory all other paths resolve against.
    #[arg(
        long,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Base directory for the run (defaults to the current directory).\n\n\
--dirs entries and --out are interpreted relative to this directory."
    )]
    pub root: PathBuf,

    /// Directories to scan, comma-separated, relative to ROOT.
    #[arg(
        long,
        default_value = "lib",
        value_delimiter = ',',
        value_name = "DIRS",
        long_help = "Comma-separated list of directories to scan, relative to ROOT.\n\n\
Entries are trimmed; each is walked depth-first in listing order.\n\n\
Example: --dirs lib,src"
    )]
    pub dirs: Vec<String>,

    /// File extensions to merge, comma-separated.
    #[arg(
        long,
        default_value = ".dart",
        value_delimiter = ',',
        value_name = "EXTS",
        long_help = "Comma-separated list of filename suffixes to merge.\n\n\
Matching is a case-sensitive suffix check on the file name.\n\n\
Example: --ext .dart,.ts"
    )]
    pub ext: Vec<String>,

    /// Approximate token limit per output file (0 disables splitting).
    #[arg(
        long,
        default_value = "4000",
        value_name = "N",
        long_help = "Approximate token limit per output file.\n\n\
After each appended file the whole buffer is re-estimated; when the count\n\
exceeds N the buffer is flushed to the next merged_<index>.txt.\n\n\
A limit of 0 disables splitting entirely (single merged.txt)."
    )]
    pub max_tokens: usize,

    /// Write a single merged.txt regardless of --max-tokens.
    #[arg(long)]
    pub single: bool,

    /// Output directory, relative to ROOT (created if missing).
    #[arg(long, default_value = "build", value_name = "DIR")]
    pub out: PathBuf,

    /// Print merge statistics to stderr.
    #[arg(
        long,
        long_help = "Print merge statistics (files merged, chunks written, estimated\n\
tokens) to stderr after the run."
    )]
    pub stats: bool,

    /// Quiet mode (suppress the success message).
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(
        long,
        long_help = "Disable colored output. Useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Absolute base so header lines carry absolute source paths
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    let mode = if cli.single {
        SplitMode::SingleFile
    } else {
        SplitMode::from_limit(cli.max_tokens)
    };

    let request = ScanRequest::from_parts(&root, &cli.dirs, &cli.ext, mode, &cli.out)?;
    let stats = run_merge(&request)?;

    if cli.stats {
        eprintln!("Merge statistics:");
        eprintln!("   Files merged:   {}", stats.files_merged);
        eprintln!("   Chunks written: {}", stats.chunks_written);
        eprintln!("   Tokens (est.):  {}", stats.estimated_tokens);
    }

    if !cli.quiet {
        if stats.chunks_written == 0 {
            println!(
                "{} no matching files under the given roots; nothing written",
                "note:".yellow().bold()
            );
        } else {
            println!(
                "{} merged {} file(s) into {}",
                "ok:".green().bold(),
                stats.files_merged,
                normalize_path(&request.out_dir)
            );
        }
    }

    Ok(())
}
