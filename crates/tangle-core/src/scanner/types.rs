//! Scanner types - languages and the immutable source-file index.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;

/// Supported source languages, classified by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Unknown,
}

impl Language {
    /// Detect language from a file extension.
    pub fn from_path(path: &Path) -> Language {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(e) => e.to_lowercase(),
            None => return Language::Unknown,
        };

        match ext.as_str() {
            "py" | "pyi" | "pyw" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file in the walker's index. Immutable for the lifetime of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Project-relative path, forward slashes
    pub path: String,
    /// Detected language
    pub language: Language,
    /// Total line count
    pub line_count: usize,
}

/// Result of a walk: the sorted file index plus per-file skip diagnostics.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub files: Vec<SourceFile>,
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_language_from_extension() {
        assert_eq!(Language::from_path(Path::new("a.py")), Language::Python);
        assert_eq!(Language::from_path(Path::new("a.pyi")), Language::Python);
        assert_eq!(Language::from_path(Path::new("a.mjs")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("a.tsx")), Language::TypeScript);
        assert_eq!(Language::from_path(Path::new("a.rb")), Language::Unknown);
        assert_eq!(Language::from_path(Path::new("Makefile")), Language::Unknown);
    }
}
