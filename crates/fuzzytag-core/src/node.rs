//! Match node evaluation
//!
//! A node checks one lower-cased line in strict priority order, each step
//! terminal:
//!
//! 1. Exclusion (`ignore_if_has`) → 0
//! 2. Requirement (`must_has`, when non-empty) → 0 if none present
//! 3. Literal trigger (`explicit_search`) → 1.0
//! 4. Combined literal trigger (`explicit_search_combine`) → 1.0
//! 5. Fuzzy fallback against the keyword, with optional rescue terms

use memchr::memmem::Finder;

use crate::config::NodeRules;
use crate::fuzzy::{match_words, FuzzyKeyword, MarkerBuffer, MatchOptions};

/// Raw fuzzy score a rescue term can lift past a rejected gate
pub const RESCUE_FLOOR: f64 = 0.5;

/// Why a node scored what it did for one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Excluded,
    MissingRequired,
    Literal,
    CombinedLiteral,
    Fuzzy { raw: f64, accepted: bool, exact: bool },
    Rescued { raw: f64 },
}

impl Decision {
    /// Score in [0, 1] this decision contributes to aggregation
    pub fn score(&self) -> f64 {
        match *self {
            Decision::Excluded | Decision::MissingRequired => 0.0,
            Decision::Literal | Decision::CombinedLiteral => 1.0,
            Decision::Fuzzy { raw, accepted, .. } => {
                if accepted {
                    raw
                } else {
                    0.0
                }
            }
            Decision::Rescued { raw } => raw,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Excluded => "excluded",
            Decision::MissingRequired => "missing_required",
            Decision::Literal => "literal",
            Decision::CombinedLiteral => "combined_literal",
            Decision::Fuzzy { exact: true, .. } => "exact",
            Decision::Fuzzy { .. } => "fuzzy",
            Decision::Rescued { .. } => "rescued",
        }
    }
}

/// Precompiled substring set
struct Terms {
    finders: Vec<Finder<'static>>,
}

impl Terms {
    fn new(terms: &[String]) -> Self {
        Self {
            finders: terms
                .iter()
                .map(|t| Finder::new(t.as_bytes()).into_owned())
                .collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }

    fn any_in(&self, haystack: &[u8]) -> bool {
        self.finders.iter().any(|f| f.find(haystack).is_some())
    }

    fn all_in(&self, haystack: &[u8]) -> bool {
        self.finders.iter().all(|f| f.find(haystack).is_some())
    }
}

/// A node's rules plus its private scratch state.
///
/// Evaluation mutates the marker buffer, so a `MatchNode` is owned by exactly
/// one worker and evaluates one line at a time.
pub struct MatchNode {
    rules: NodeRules,
    ignore: Terms,
    required: Terms,
    literal: Terms,
    combined: Vec<Terms>,
    rescue: Terms,
    keyword: FuzzyKeyword,
    marks: MarkerBuffer,
}

impl MatchNode {
    pub fn new(rules: NodeRules) -> Self {
        let keyword = FuzzyKeyword::new(rules.fuzzy_keyword.clone());
        let marks = MarkerBuffer::new(keyword.len());
        Self {
            ignore: Terms::new(&rules.ignore_if_has),
            required: Terms::new(&rules.must_has),
            literal: Terms::new(&rules.explicit_search),
            combined: rules
                .explicit_search_combine
                .iter()
                .map(|group| Terms::new(group))
                .collect(),
            rescue: Terms::new(&rules.include_if_has),
            keyword,
            marks,
            rules,
        }
    }

    pub fn name(&self) -> &str {
        &self.rules.name
    }

    /// Phonetic code of the fuzzy keyword, computed at construction
    pub fn keyword_code(&self) -> &str {
        self.keyword.code()
    }

    /// Evaluate one lower-cased line
    pub fn evaluate(&mut self, line: &str) -> Decision {
        let haystack = line.as_bytes();

        if self.ignore.any_in(haystack) {
            return Decision::Excluded;
        }

        if !self.required.is_empty() && !self.required.any_in(haystack) {
            return Decision::MissingRequired;
        }

        if self.literal.any_in(haystack) {
            return Decision::Literal;
        }

        if self.combined.iter().any(|group| group.all_in(haystack)) {
            return Decision::CombinedLiteral;
        }

        let options = MatchOptions {
            threshold: self.rules.threshold,
            phonetic: self.rules.phonetic,
        };
        let outcome = match_words(line, &self.keyword, options, &mut self.marks);

        if !outcome.accepted && outcome.score > RESCUE_FLOOR && self.rescue.any_in(haystack) {
            return Decision::Rescued { raw: outcome.score };
        }

        Decision::Fuzzy {
            raw: outcome.score,
            accepted: outcome.accepted,
            exact: outcome.exact,
        }
    }
}

impl std::fmt::Debug for MatchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchNode")
            .field("name", &self.rules.name)
            .field("keyword", &self.keyword.as_str())
            .field("code", &self.keyword.code())
            .field("threshold", &self.rules.threshold)
            .finish()
    }
}
