//! Error taxonomy: fatal configuration errors versus additive diagnostics.
//!
//! Only invalid configuration aborts a run. Everything that goes wrong on a
//! single file (unparsable syntax, a path escaping the root, an ambiguous
//! resolution) is recorded as a `Diagnostic` and the scan continues.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors that abort a run before any scanning.
#[derive(Debug, Error)]
pub enum Error {
    #[error("scan root {0:?} does not exist or is not a directory")]
    RootNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("grammar initialization failed: {0}")]
    Grammar(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-fatal, per-file findings. These never abort the run and never mutate
/// already-computed records; they accumulate in the report's `diagnostics[]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Project-relative file the diagnostic refers to
    pub file: String,
    /// Category of the finding
    pub kind: DiagnosticKind,
    /// Human-readable detail (reason, candidates, chosen resolution)
    pub detail: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind,
            detail: detail.into(),
        }
    }
}

/// Diagnostic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Malformed source: the file contributed zero imports/functions
    ParseError,
    /// Multiple resolution candidates matched; a fixed priority order chose one
    ResolutionAmbiguity,
    /// A path resolved outside the scan root and was rejected
    SecurityRejection,
    /// The walker could not read a file; it was skipped, not fatal
    SkippedFile,
}
