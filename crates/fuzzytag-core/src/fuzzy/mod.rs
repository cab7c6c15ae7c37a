//! Fuzzy Matching Engine
//!
//! Word-granularity fuzzy matching built from two scorers:
//!
//! - **Similarity**: windowed Jaro score with transposition counting
//! - **Phonetic**: 4-character Soundex-style code, used as an optional gate
//!
//! # Example
//!
//! ```rust
//! use fuzzytag_core::fuzzy::{match_words, FuzzyKeyword, MarkerBuffer, MatchOptions};
//!
//! let keyword = FuzzyKeyword::new("apple");
//! let mut marks = MarkerBuffer::new(keyword.len());
//! let options = MatchOptions { threshold: 0.5, phonetic: true };
//!
//! let outcome = match_words("i bought an appel today", &keyword, options, &mut marks);
//! assert!(outcome.accepted);
//! ```

mod matcher;
mod phonetic;
mod similarity;

pub use matcher::{match_words, FuzzyKeyword, FuzzyOutcome, MatchOptions, MAX_SKIPPED_WORD_LEN};
pub use phonetic::{phonetic_code, CODE_LEN};
pub use similarity::{jaro_similarity, MarkerBuffer};
