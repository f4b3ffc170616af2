/*!
 * Approximate token counting
 *
 * A rough, language-agnostic estimate of how many LLM tokens a piece of text
 * costs. One priority-ordered pattern is applied left to right and the count
 * is the number of non-overlapping matches. This is deliberately not tied to
 * any specific model vocabulary.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// Branch order matters: contraction suffixes, identifier-like runs with one
// leading punctuation character absorbed, short digit groups, punctuation
// clusters, newline runs, trailing whitespace, remaining whitespace. The
// regex crate has no lookahead, so "whitespace not followed by non-space"
// is rendered as end-of-input whitespace (`\s+\z`).
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i:'s|'t|'re|'ve|'m|'ll|'d)|[^\r\n\w]?(?:[A-Za-z_]\w*)+|\d{1,3}| ?[^\s\w]+[\r\n]*|\s*[\r\n]+|\s+\z|\s+",
    )
    .expect("token pattern must compile")
});

/// Count approximate tokens in the given text
///
/// Empty input costs zero tokens; any non-empty input costs at least one.
pub fn count_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    TOKEN_PATTERN.find_iter(text).count()
}
