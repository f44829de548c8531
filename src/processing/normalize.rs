use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("non-word pattern is valid"));

/// Clean free text before matching.
///
/// Lowercases, drops every character that is neither a word character nor
/// whitespace, and trims. Applying it twice yields the same string.
pub fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_WORD.replace_all(&lowered, "").trim().to_string()
}
