//! Word list loading
//!
//! One word per line; surrounding whitespace is trimmed and empty lines
//! dropped. The dictionary is loaded once, before any mode starts, and
//! looked up by exact lowercase match.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Parse a word list from its text contents
pub fn parse_words(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_lowercase())
        .collect()
}

/// Load a word list file
pub fn load_words(path: impl AsRef<Path>) -> Result<HashSet<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read word list {}", path.display()))?;
    let words = parse_words(&text);
    log::info!("loaded {} words from {}", words.len(), path.display());
    Ok(words)
}
