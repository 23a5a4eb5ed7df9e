//! Analysis configuration passed explicitly into every component.

use std::path::PathBuf;

use crate::scanner::Language;

/// Language restriction for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageFilter {
    /// Scan every supported language
    #[default]
    All,
    /// Scan only files of one language
    Only(Language),
}

impl LanguageFilter {
    pub fn accepts(&self, language: Language) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::Only(l) => *l == language,
        }
    }
}

/// Configuration for a full analysis run. There are no module-level
/// defaults anywhere in the engine; every threshold lives here.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Root directory to scan
    pub root: PathBuf,
    /// Language restriction
    pub language: LanguageFilter,
    /// Extra exclusion globs beyond the default ignore set
    pub exclude: Vec<String>,
    /// Include files with an unrecognized extension in the file index
    pub include_unknown: bool,
    /// Total-coupling threshold for `exceeds_threshold` on coupling records
    pub coupling_threshold: usize,
    /// Cyclomatic-complexity threshold for `exceeds_threshold` on functions
    pub complexity_threshold: u32,
    /// Line-count policy for `exceeds_size_policy` on file metrics
    pub size_policy: usize,
    /// File stems exempt from orphan classification
    pub entry_points: Vec<String>,
    /// Run the cycle detector and include `cycles[]` in the report
    pub detect_cycles: bool,
    /// Include fan-in/fan-out neighbor lists in coupling records
    pub show_details: bool,
    /// Force the heuristic JS/TS extractor even when the AST parser works
    pub force_heuristic: bool,
    /// Restrict complexity/file-metrics records to this project-relative file
    pub only_file: Option<PathBuf>,
    /// Worker threads for the per-file phase (0 = rayon default)
    pub threads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            language: LanguageFilter::All,
            exclude: Vec::new(),
            include_unknown: false,
            coupling_threshold: 10,
            complexity_threshold: 10,
            size_policy: 600,
            entry_points: default_entry_points(),
            detect_cycles: false,
            show_details: false,
            force_heuristic: false,
            only_file: None,
            threads: 0,
        }
    }
}

impl AnalysisConfig {
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}

/// Conventional entry-point stems, per language convention.
pub fn default_entry_points() -> Vec<String> {
    ["main", "__main__", "app", "index", "server"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
