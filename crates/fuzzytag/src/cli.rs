//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `node<TAB>line`
    Text,
    /// One JSON object per line
    Jsonl,
}

#[derive(Parser, Debug)]
#[command(name = "fuzzytag")]
#[command(about = "Tag text lines with the best-matching fuzzy/phonetic rule")]
#[command(version)]
pub struct Args {
    /// YAML settings file (takes precedence over node flags)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Input file; stdin when omitted
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Fuzzy keyword for a single flag-defined node
    #[arg(long)]
    pub search: Option<String>,

    /// Tag for the flag-defined node
    #[arg(long, default_value = "match")]
    pub name: String,

    /// Minimum similarity for the flag-defined node
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f64,

    /// Disable the phonetic gate for the flag-defined node
    #[arg(long)]
    pub nosoundex: bool,

    /// Field separator (for csv-like input)
    #[arg(long)]
    pub separator: Option<String>,

    /// Zero-based field to classify when a separator is given
    #[arg(long, default_value_t = 0)]
    pub position: usize,

    /// Rescue words, space separated
    #[arg(long, default_value = "")]
    pub include: String,

    /// Phrases removed before matching, space separated
    #[arg(long, default_value = "")]
    pub remove: String,

    /// Words that exclude a line, space separated
    #[arg(long, default_value = "")]
    pub reject: String,

    /// Score a winner must exceed
    #[arg(long, default_value_t = fuzzytag_core::DEFAULT_FLOOR)]
    pub floor: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Debug logging
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["fuzzytag", "--search", "apple"]).unwrap();
        assert_eq!(args.search.as_deref(), Some("apple"));
        assert_eq!(args.name, "match");
        assert_eq!(args.threshold, 0.5);
        assert_eq!(args.floor, 0.1);
        assert_eq!(args.format, Format::Text);
        assert!(!args.nosoundex);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_format_flag() {
        let args = Args::try_parse_from(["fuzzytag", "--format", "jsonl"]).unwrap();
        assert_eq!(args.format, Format::Jsonl);
        assert!(Args::try_parse_from(["fuzzytag", "--format", "parquet"]).is_err());
    }
}
