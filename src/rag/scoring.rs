//! Relevance scoring between a question and transcript chunks.

use std::collections::HashSet;

/// Strategy for scoring how relevant a chunk is to a question.
///
/// Scores are expected in `[0, 1]`; the context builder clamps anything else.
pub trait RelevanceScorer: Send + Sync {
    /// Score a single chunk against the question.
    fn score(&self, question: &str, chunk: &str) -> f32;

    /// Score every chunk, in input order.
    fn score_all(&self, question: &str, chunks: &[String]) -> Vec<f32> {
        chunks.iter().map(|chunk| self.score(question, chunk)).collect()
    }
}

/// Scores chunks by the fraction of the question's distinct words they contain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self {
        Self
    }

    fn overlap(question_words: &HashSet<String>, chunk: &str) -> f32 {
        if question_words.is_empty() {
            return 0.0;
        }

        let chunk_words = word_tokens(chunk);
        let shared = question_words
            .iter()
            .filter(|word| chunk_words.contains(*word))
            .count();

        shared as f32 / question_words.len() as f32
    }
}

impl RelevanceScorer for LexicalScorer {
    fn score(&self, question: &str, chunk: &str) -> f32 {
        Self::overlap(&word_tokens(question), chunk)
    }

    fn score_all(&self, question: &str, chunks: &[String]) -> Vec<f32> {
        let question_words = word_tokens(question);
        chunks
            .iter()
            .map(|chunk| Self::overlap(&question_words, chunk))
            .collect()
    }
}

/// Distinct lowercase word tokens of `text`.
///
/// Splits on runs of non-word characters, where a word character is
/// `[A-Za-z0-9_]`. Empty pieces from leading or trailing separators are dropped.
pub fn word_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        let mut words: Vec<String> = word_tokens(text).into_iter().collect();
        words.sort();
        words
    }

    #[test]
    fn test_word_tokens_lowercase_and_distinct() {
        assert_eq!(tokens("The cat, the CAT!"), vec!["cat", "the"]);
    }

    #[test]
    fn test_word_tokens_drop_edge_separators() {
        assert_eq!(tokens("  what color? "), vec!["color", "what"]);
        assert!(word_tokens("???").is_empty());
        assert!(word_tokens("").is_empty());
    }

    #[test]
    fn test_word_tokens_keep_underscores_and_digits() {
        assert_eq!(tokens("snake_case v2"), vec!["snake_case", "v2"]);
    }

    #[test]
    fn test_word_tokens_split_on_non_ascii() {
        assert_eq!(tokens("café au lait"), vec!["au", "caf", "lait"]);
    }

    #[test]
    fn test_lexical_score_fraction() {
        let scorer = LexicalScorer::new();
        let score = scorer.score("what color is the cat", "the cat is black");
        assert!((score - 0.6).abs() < 1e-6);
        let score = scorer.score("what color is the cat", "color theory basics");
        assert!((score - 0.2).abs() < 1e-6);
        assert_eq!(scorer.score("what color is the cat", "dogs bark loudly"), 0.0);
    }

    #[test]
    fn test_lexical_score_ignores_repeats() {
        let scorer = LexicalScorer::new();
        assert_eq!(scorer.score("cat cat cat", "a cat"), 1.0);
        assert_eq!(scorer.score("cat dog", "cat cat cat cat"), 0.5);
    }

    #[test]
    fn test_degenerate_question_scores_zero() {
        let scorer = LexicalScorer::new();
        assert_eq!(scorer.score("???", "anything at all"), 0.0);
        assert_eq!(scorer.score("", ""), 0.0);
    }

    #[test]
    fn test_score_all_matches_score() {
        let scorer = LexicalScorer::new();
        let chunks = vec![
            "alpha beta".to_string(),
            "beta gamma".to_string(),
            "delta".to_string(),
        ];
        let all = scorer.score_all("alpha beta gamma", &chunks);
        let single: Vec<f32> = chunks
            .iter()
            .map(|c| scorer.score("alpha beta gamma", c))
            .collect();
        assert_eq!(all, single);
    }
}
