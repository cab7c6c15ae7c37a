//! Word-level fuzzy matching
//!
//! Splits a line into words and scores each word longer than
//! [`MAX_SKIPPED_WORD_LEN`] bytes against a keyword.

use tracing::trace;

use super::phonetic::phonetic_code;
use super::similarity::{jaro_similarity, MarkerBuffer};

/// Words of this many bytes or fewer are never scored
pub const MAX_SKIPPED_WORD_LEN: usize = 3;

/// Keyword side of a fuzzy comparison, precomputed once per node
#[derive(Debug, Clone)]
pub struct FuzzyKeyword {
    word: String,
    code: String,
}

impl FuzzyKeyword {
    pub fn new(word: impl Into<String>) -> Self {
        let word = word.into();
        let code = phonetic_code(&word);
        Self { word, code }
    }

    pub fn as_str(&self) -> &str {
        &self.word
    }

    pub fn len(&self) -> usize {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Phonetic code of the keyword
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Result of matching one line against a keyword.
///
/// `score` is the best similarity seen regardless of acceptance; callers
/// that only want accepted matches check `accepted`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyOutcome {
    pub score: f64,
    pub accepted: bool,
    /// A word equalled the keyword exactly
    pub exact: bool,
}

impl FuzzyOutcome {
    const NONE: Self = Self {
        score: 0.0,
        accepted: false,
        exact: false,
    };

    const EXACT: Self = Self {
        score: 1.0,
        accepted: true,
        exact: true,
    };
}

/// Match options for one keyword
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    /// Similarity a word must exceed to be accepted
    pub threshold: f64,
    /// Also require the word's phonetic code to equal the keyword's
    pub phonetic: bool,
}

/// Score every qualifying word of `line` against `keyword`.
///
/// `line` is expected to be lower-cased already.
pub fn match_words(
    line: &str,
    keyword: &FuzzyKeyword,
    options: MatchOptions,
    marks: &mut MarkerBuffer,
) -> FuzzyOutcome {
    let mut outcome = FuzzyOutcome::NONE;
    let mut floor = options.threshold;

    for word in line.split_whitespace() {
        if word.len() <= MAX_SKIPPED_WORD_LEN {
            continue;
        }

        if word == keyword.as_str() {
            return FuzzyOutcome::EXACT;
        }

        let score = jaro_similarity(word.as_bytes(), keyword.as_str().as_bytes(), marks);
        trace!(
            word,
            keyword = keyword.as_str(),
            score,
            threshold = options.threshold,
            "word scored"
        );

        if score > outcome.score {
            outcome.score = score;
        }

        if score > floor {
            if options.phonetic {
                let code = phonetic_code(word);
                trace!(word, code = %code, keyword_code = keyword.code(), "phonetic gate");
                if code != keyword.code() {
                    continue;
                }
            }
            outcome.accepted = true;
            floor = score;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str, keyword: &str, threshold: f64, phonetic: bool) -> FuzzyOutcome {
        let keyword = FuzzyKeyword::new(keyword);
        let mut marks = MarkerBuffer::new(keyword.len());
        match_words(line, &keyword, MatchOptions { threshold, phonetic }, &mut marks)
    }

    #[test]
    fn test_exact_word() {
        let outcome = run("i bought an apple today", "apple", 0.5, false);
        assert_eq!(outcome, FuzzyOutcome::EXACT);
    }

    #[test]
    fn test_typo_accepted() {
        let outcome = run("i bought an appel today", "apple", 0.5, false);
        assert!(outcome.accepted);
        assert!(!outcome.exact);
        assert!(outcome.score > 0.5 && outcome.score < 1.0);
    }

    #[test]
    fn test_short_words_ignored() {
        // "app" would score well but is too short to count
        let outcome = run("app ap a", "apple", 0.1, false);
        assert_eq!(outcome, FuzzyOutcome::NONE);
    }

    #[test]
    fn test_skip_length_boundary() {
        let skipped = "a".repeat(MAX_SKIPPED_WORD_LEN);
        assert_eq!(run(&skipped, "aaaaa", 0.1, false), FuzzyOutcome::NONE);

        let scored = "a".repeat(MAX_SKIPPED_WORD_LEN + 1);
        assert!(run(&scored, "aaaaa", 0.1, false).accepted);
    }

    #[test]
    fn test_short_exact_keyword_ignored() {
        let outcome = run("the cat sat", "cat", 0.5, false);
        assert!(!outcome.exact);
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_below_threshold_reports_score() {
        let outcome = run("i bought an appel today", "apple", 0.95, false);
        assert!(!outcome.accepted);
        assert!(outcome.score > 0.5);
    }

    #[test]
    fn test_phonetic_gate_passes() {
        // appel and apple share A140
        let outcome = run("an appel", "apple", 0.5, true);
        assert!(outcome.accepted);
    }

    #[test]
    fn test_phonetic_gate_rejects() {
        // close in spelling but different code: ample (A514) vs apple (A140)
        let gated = run("ample", "apple", 0.5, true);
        let open = run("ample", "apple", 0.5, false);
        assert!(open.accepted);
        assert!(!gated.accepted);
        assert_eq!(gated.score, open.score);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(run("", "apple", 0.5, false), FuzzyOutcome::NONE);
        assert_eq!(run("   \t ", "apple", 0.5, false), FuzzyOutcome::NONE);
    }

    #[test]
    fn test_max_over_words() {
        let single = run("appel", "apple", 0.5, false);
        let many = run("today appel orange", "apple", 0.5, false);
        assert_eq!(single.score, many.score);
    }
}
