//! Approximate token accounting.
//!
//! Budgets are measured with a character-count heuristic (one token per four
//! characters), not a model tokenizer. Switching to a real tokenizer changes
//! which chunks fit a budget.

/// Characters per approximate token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of `text` as `ceil(chars / 4)`.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}
