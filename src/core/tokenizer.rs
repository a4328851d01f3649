//! Approximate token estimation
//!
//! Not a real LLM tokenizer: a word-character run counts as one token, every
//! other non-whitespace symbol counts as one token. Good enough for deciding
//! where to split output files, and deterministic across platforms.
//!
//! ```text
//! estimate_tokens("foo, bar!") == 4    // "foo", ",", "bar", "!"
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+|[^\w\s]").expect("token pattern is valid"));

/// Estimate the token count of `text`.
///
/// Whitespace runs are normalized to a single space first, then matches of
/// "one or more word characters" or "one non-whitespace non-word character"
/// are counted. Callers re-run this over an entire buffer after each append,
/// so cost is O(buffer size) per call; fine for source-tree-sized inputs.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let normalized = WHITESPACE_RUN.replace_all(text, " ");
    TOKEN.find_iter(&normalized).count()
}
