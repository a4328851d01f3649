//! codemerge - merge source files into token-bounded text files
//!
//! codemerge provides:
//! - Recursive scanning of root directories with extension filtering
//! - Concatenation with `// File: <path>` header framing
//! - Optional splitting by an approximate token limit

use clap::Parser;
use colored::Colorize;

mod cli;
mod collect;
mod core;
mod merge;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(err) = cli::run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
