//! Run settings from YAML or command-line flags
//!
//! ## Example YAML
//!
//! ```yaml
//! separator: ","
//! position: 1
//! floor_threshold: 0.1
//! default_threshold: 0.5
//! remove: ["inc."]
//! reject: [sample]
//! include: [orchard]
//! nodes:
//!   - name: fruit
//!     ignore_if_has: [juice]
//!     explicit_search: [banana]
//!     explicit_search_combine: [[green, apple]]
//!     fuzzy_keyword: apple
//!     threshold: 0.6
//!     phonetic: true
//!   - name: citrus
//!     fuzzyKeyword: orange
//! ```

use std::fs;
use std::path::Path;

use fuzzytag_core::{
    validate_nodes, ConfigError, DispatchConfig, LineOptions, MatchNodeConfig, NodeRules,
    DEFAULT_FLOOR, DEFAULT_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Args;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no search keyword: pass --search or --config")]
    MissingKeyword,
}

/// Everything needed to start a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "Separator")]
    pub separator: Option<String>,
    pub position: usize,
    pub floor_threshold: f64,
    pub default_threshold: f64,
    pub remove: Vec<String>,
    /// Exclusion terms added to every node
    pub reject: Vec<String>,
    /// Rescue terms added to every node
    pub include: Vec<String>,
    pub debug: bool,
    pub nodes: Vec<MatchNodeConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: None,
            position: 0,
            floor_threshold: DEFAULT_FLOOR,
            default_threshold: DEFAULT_THRESHOLD,
            remove: Vec::new(),
            reject: Vec::new(),
            include: Vec::new(),
            debug: false,
            nodes: Vec::new(),
        }
    }
}

/// Validated settings, ready to build a pipeline from
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub rules: Vec<NodeRules>,
    pub dispatch: DispatchConfig,
    pub lines: LineOptions,
}

fn words(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Settings from `--config`, or a single node described by flags
    pub fn from_args(args: &Args) -> Result<Self, SettingsError> {
        if let Some(path) = &args.config {
            return Self::from_file(path);
        }

        let keyword = args.search.clone().ok_or(SettingsError::MissingKeyword)?;
        let node = MatchNodeConfig {
            name: args.name.clone(),
            ignore_if_has: words(&args.reject),
            fuzzy_keyword: keyword,
            threshold: Some(args.threshold),
            phonetic: !args.nosoundex,
            include_if_has: words(&args.include),
            ..Default::default()
        };

        Ok(Self {
            separator: args.separator.clone(),
            position: args.position,
            floor_threshold: args.floor,
            remove: words(&args.remove),
            debug: args.debug,
            nodes: vec![node],
            ..Default::default()
        })
    }

    /// Merge run-level terms into each node, then validate every node and the floor
    pub fn into_plan(mut self) -> Result<RunPlan, SettingsError> {
        if !(self.default_threshold > 0.0 && self.default_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold {
                node: "<default>".to_string(),
                value: self.default_threshold,
            }
            .into());
        }
        for node in &mut self.nodes {
            node.ignore_if_has.extend(self.reject.iter().cloned());
            node.include_if_has.extend(self.include.iter().cloned());
        }

        let dispatch = DispatchConfig::new(self.floor_threshold)?;
        let rules = validate_nodes(self.nodes, self.default_threshold)?;

        Ok(RunPlan {
            rules,
            dispatch,
            lines: LineOptions {
                separator: self.separator.filter(|s| !s.is_empty()),
                position: self.position,
                remove: self.remove,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const YAML: &str = r#"
separator: ","
position: 1
floor_threshold: 0.2
remove: ["inc."]
nodes:
  - name: fruit
    ignore_if_has: [juice]
    explicit_search: [banana]
    explicit_search_combine: [[green, apple]]
    fuzzy_keyword: Apple
    threshold: 0.6
    phonetic: true
  - name: citrus
    fuzzyKeyword: orange
"#;

    #[test]
    fn test_from_yaml() {
        let settings = Settings::from_yaml(YAML).unwrap();
        assert_eq!(settings.separator.as_deref(), Some(","));
        assert_eq!(settings.position, 1);
        assert_eq!(settings.floor_threshold, 0.2);
        assert_eq!(settings.default_threshold, DEFAULT_THRESHOLD);
        assert_eq!(settings.nodes.len(), 2);
        assert_eq!(settings.nodes[1].fuzzy_keyword, "orange");
        assert_eq!(settings.nodes[1].threshold, None);
    }

    #[test]
    fn test_into_plan() {
        let plan = Settings::from_yaml(YAML).unwrap().into_plan().unwrap();
        assert_eq!(plan.dispatch.floor, 0.2);
        assert_eq!(plan.rules[0].fuzzy_keyword, "apple");
        assert_eq!(plan.rules[0].threshold, 0.6);
        assert!(plan.rules[0].phonetic);
        assert_eq!(plan.rules[1].threshold, 0.5);
        assert_eq!(
            plan.lines,
            LineOptions {
                separator: Some(",".into()),
                position: 1,
                remove: vec!["inc.".into()],
            }
        );
    }

    #[test]
    fn test_run_level_reject_and_include_reach_every_node() {
        let yaml = r#"
reject: [Juice]
include: [orchard]
nodes:
  - name: a
    fuzzy_keyword: apple
    ignore_if_has: [cider]
  - name: b
    fuzzy_keyword: orange
"#;
        let plan = Settings::from_yaml(yaml).unwrap().into_plan().unwrap();
        assert_eq!(plan.rules[0].ignore_if_has, vec!["cider", "juice"]);
        assert_eq!(plan.rules[0].include_if_has, vec!["orchard"]);
        assert_eq!(plan.rules[1].ignore_if_has, vec!["juice"]);
        assert_eq!(plan.rules[1].include_if_has, vec!["orchard"]);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings, Settings::from_yaml(YAML).unwrap());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, SettingsError::FileRead(_)));
    }

    #[test]
    fn test_bad_yaml() {
        let err = Settings::from_yaml("nodes: [[[").unwrap_err();
        assert!(matches!(err, SettingsError::YamlParse(_)));
    }

    #[test]
    fn test_node_without_keyword_rejected() {
        let settings = Settings::from_yaml("nodes:\n  - name: empty\n").unwrap();
        let err = settings.into_plan().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::MissingKeyword { .. })
        ));
    }

    #[test]
    fn test_no_nodes_rejected() {
        let err = Settings::default().into_plan().unwrap_err();
        assert!(matches!(err, SettingsError::Config(ConfigError::NoNodes)));
    }

    #[test]
    fn test_from_flags() {
        let args = Args::try_parse_from([
            "fuzzytag",
            "--search",
            "apple",
            "--reject",
            "juice cider",
            "--include",
            "orchard",
            "--remove",
            "inc.",
            "--separator",
            ";",
            "--position",
            "2",
        ])
        .unwrap();

        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.nodes.len(), 1);
        let node = &settings.nodes[0];
        assert_eq!(node.name, "match");
        assert_eq!(node.fuzzy_keyword, "apple");
        assert_eq!(node.ignore_if_has, vec!["juice", "cider"]);
        assert_eq!(node.include_if_has, vec!["orchard"]);
        assert_eq!(node.threshold, Some(0.5));
        assert!(node.phonetic);
        assert_eq!(settings.remove, vec!["inc."]);
        assert_eq!(settings.separator.as_deref(), Some(";"));
        assert_eq!(settings.position, 2);
    }

    #[test]
    fn test_flags_without_search() {
        let args = Args::try_parse_from(["fuzzytag"]).unwrap();
        assert!(matches!(
            Settings::from_args(&args),
            Err(SettingsError::MissingKeyword)
        ));
    }

    #[test]
    fn test_config_flag_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args =
            Args::try_parse_from(["fuzzytag", "--config", &path, "--search", "ignored"]).unwrap();
        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.nodes.len(), 2);
        assert_eq!(settings.nodes[0].name, "fruit");
    }
}
