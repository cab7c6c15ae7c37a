//! Node configuration and validation
//!
//! [`MatchNodeConfig`] is the externally supplied shape (deserializable from
//! YAML/JSON). [`MatchNodeConfig::validate`] turns it into [`NodeRules`]:
//! terms lower-cased and trimmed, empty terms dropped, threshold resolved.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Threshold applied when a node leaves it unset or zero
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Errors raised while validating node configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no match nodes configured")]
    NoNodes,

    #[error("match node has an empty name")]
    EmptyName,

    #[error("duplicate match node name: {0}")]
    DuplicateName(String),

    #[error("node '{node}' has no fuzzy keyword")]
    MissingKeyword { node: String },

    #[error("node '{node}' fuzzy keyword must be a single word, got '{keyword}'")]
    KeywordNotSingleWord { node: String, keyword: String },

    #[error("node '{node}' threshold {value} is outside (0, 1]")]
    InvalidThreshold { node: String, value: f64 },

    #[error("floor threshold {0} is outside [0, 1)")]
    InvalidFloor(f64),
}

/// One match node as supplied by configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchNodeConfig {
    /// Output tag for lines this node wins
    pub name: String,

    /// Any of these present forces score 0
    #[serde(alias = "ignoreIfHas", alias = "reject")]
    pub ignore_if_has: Vec<String>,

    /// When non-empty, at least one must be present
    #[serde(alias = "mustHas")]
    pub must_has: Vec<String>,

    /// Any of these present scores 1.0
    #[serde(alias = "explicitSearch")]
    pub explicit_search: Vec<String>,

    /// Any group whose terms are all present scores 1.0
    #[serde(alias = "explicitSearchCombine")]
    pub explicit_search_combine: Vec<Vec<String>>,

    #[serde(alias = "fuzzyKeyword", alias = "search")]
    pub fuzzy_keyword: String,

    /// Minimum similarity; `None` or 0 falls back to the run default
    pub threshold: Option<f64>,

    /// Gate fuzzy matches on equal phonetic codes
    #[serde(alias = "soundex")]
    pub phonetic: bool,

    /// Rescue terms for fuzzy scores the gate rejected
    #[serde(alias = "include")]
    pub include_if_has: Vec<String>,
}

/// Validated, normalized rules for one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRules {
    pub name: String,
    pub ignore_if_has: Vec<String>,
    pub must_has: Vec<String>,
    pub explicit_search: Vec<String>,
    pub explicit_search_combine: Vec<Vec<String>>,
    pub fuzzy_keyword: String,
    pub threshold: f64,
    pub phonetic: bool,
    pub include_if_has: Vec<String>,
}

fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

impl MatchNodeConfig {
    /// Convenience constructor for a fuzzy-only node
    pub fn fuzzy(name: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fuzzy_keyword: keyword.into(),
            ..Default::default()
        }
    }

    /// Validate and normalize, resolving an unset threshold to `default_threshold`
    pub fn validate(self, default_threshold: f64) -> Result<NodeRules, ConfigError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        let fuzzy_keyword = self.fuzzy_keyword.trim().to_lowercase();
        if fuzzy_keyword.is_empty() {
            return Err(ConfigError::MissingKeyword { node: name });
        }
        if fuzzy_keyword.split_whitespace().nth(1).is_some() {
            return Err(ConfigError::KeywordNotSingleWord {
                node: name,
                keyword: fuzzy_keyword,
            });
        }

        let threshold = match self.threshold {
            None => default_threshold,
            Some(t) if t == 0.0 => default_threshold,
            Some(t) => t,
        };
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold {
                node: name,
                value: threshold,
            });
        }

        let explicit_search_combine = self
            .explicit_search_combine
            .into_iter()
            .map(normalize_terms)
            .filter(|group| !group.is_empty())
            .collect();

        Ok(NodeRules {
            name,
            ignore_if_has: normalize_terms(self.ignore_if_has),
            must_has: normalize_terms(self.must_has),
            explicit_search: normalize_terms(self.explicit_search),
            explicit_search_combine,
            fuzzy_keyword,
            threshold,
            phonetic: self.phonetic,
            include_if_has: normalize_terms(self.include_if_has),
        })
    }
}

/// Validate a full node list: at least one node, unique names, each node valid
pub fn validate_nodes(
    configs: Vec<MatchNodeConfig>,
    default_threshold: f64,
) -> Result<Vec<NodeRules>, ConfigError> {
    if configs.is_empty() {
        return Err(ConfigError::NoNodes);
    }

    let mut seen = AHashSet::with_capacity(configs.len());
    let mut rules = Vec::with_capacity(configs.len());
    for config in configs {
        let node = config.validate(default_threshold)?;
        if !seen.insert(node.name.clone()) {
            return Err(ConfigError::DuplicateName(node.name));
        }
        rules.push(node);
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalizes_terms() {
        let config = MatchNodeConfig {
            name: " fruit ".into(),
            ignore_if_has: vec!["Juice".into(), "  ".into()],
            must_has: vec![" Fresh".into()],
            explicit_search: vec!["BANANA".into()],
            explicit_search_combine: vec![vec!["Green".into(), "Apple ".into()], vec![]],
            fuzzy_keyword: " Apple ".into(),
            threshold: Some(0.7),
            phonetic: true,
            include_if_has: vec!["Orchard".into()],
        };

        let rules = config.validate(DEFAULT_THRESHOLD).unwrap();
        assert_eq!(
            rules,
            NodeRules {
                name: "fruit".into(),
                ignore_if_has: vec!["juice".into()],
                must_has: vec!["fresh".into()],
                explicit_search: vec!["banana".into()],
                explicit_search_combine: vec![vec!["green".into(), "apple".into()]],
                fuzzy_keyword: "apple".into(),
                threshold: 0.7,
                phonetic: true,
                include_if_has: vec!["orchard".into()],
            }
        );
    }

    #[test]
    fn test_threshold_defaults() {
        let unset = MatchNodeConfig::fuzzy("a", "apple").validate(0.5).unwrap();
        assert_eq!(unset.threshold, 0.5);

        let zero = MatchNodeConfig {
            threshold: Some(0.0),
            ..MatchNodeConfig::fuzzy("a", "apple")
        };
        assert_eq!(zero.validate(0.6).unwrap().threshold, 0.6);
    }

    #[test]
    fn test_threshold_out_of_range() {
        for value in [-0.1, 1.5, f64::NAN] {
            let config = MatchNodeConfig {
                threshold: Some(value),
                ..MatchNodeConfig::fuzzy("a", "apple")
            };
            assert!(matches!(
                config.validate(0.5),
                Err(ConfigError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn test_missing_keyword() {
        let err = MatchNodeConfig::fuzzy("a", "  ").validate(0.5).unwrap_err();
        assert_eq!(err, ConfigError::MissingKeyword { node: "a".into() });
    }

    #[test]
    fn test_multi_word_keyword() {
        let err = MatchNodeConfig::fuzzy("a", "green apple")
            .validate(0.5)
            .unwrap_err();
        assert!(matches!(err, ConfigError::KeywordNotSingleWord { .. }));
    }

    #[test]
    fn test_empty_name() {
        let err = MatchNodeConfig::fuzzy("", "apple").validate(0.5).unwrap_err();
        assert_eq!(err, ConfigError::EmptyName);
    }

    #[test]
    fn test_validate_nodes() {
        assert_eq!(validate_nodes(vec![], 0.5), Err(ConfigError::NoNodes));

        let dup = validate_nodes(
            vec![
                MatchNodeConfig::fuzzy("a", "apple"),
                MatchNodeConfig::fuzzy("a", "orange"),
            ],
            0.5,
        );
        assert_eq!(dup, Err(ConfigError::DuplicateName("a".into())));

        let ok = validate_nodes(
            vec![
                MatchNodeConfig::fuzzy("a", "apple"),
                MatchNodeConfig::fuzzy("b", "orange"),
            ],
            0.5,
        )
        .unwrap();
        assert_eq!(ok.len(), 2);
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"{
            "name": "fruit",
            "ignoreIfHas": ["juice"],
            "mustHas": ["fresh"],
            "explicitSearch": ["banana"],
            "explicitSearchCombine": [["green", "apple"]],
            "fuzzyKeyword": "apple"
        }"#;
        let config: MatchNodeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignore_if_has, vec!["juice"]);
        assert_eq!(config.must_has, vec!["fresh"]);
        assert_eq!(config.explicit_search_combine, vec![vec!["green", "apple"]]);
        assert_eq!(config.fuzzy_keyword, "apple");
        assert_eq!(config.threshold, None);
        assert!(!config.phonetic);
    }
}
