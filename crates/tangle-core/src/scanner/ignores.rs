//! Default ignore patterns for dependency directories and build output.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::warn;

/// Directories that are never useful to analyze.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    // Package managers
    "node_modules",
    ".pnpm",
    ".yarn",
    "bower_components",
    // Python
    "__pycache__",
    ".venv",
    "venv",
    "site-packages",
    ".eggs",
    "*.egg-info",
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Build outputs
    "dist",
    "build",
    "out",
    "_build",
    ".next",
    ".nuxt",
    // Coverage/Testing
    "coverage",
    ".nyc_output",
    "htmlcov",
    // Caches
    ".cache",
    ".parcel-cache",
    ".turbo",
    // IDE/Editor
    ".idea",
    ".vscode",
];

/// Generated or minified files that would skew metrics.
pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    "*.pyc",
    "*.pyo",
    "*.min.js",
    "*.bundle.js",
    "*.map",
    "*.d.ts",
];

/// Combined ignore matcher: the built-in defaults in gitignore form plus
/// caller-supplied exclusion globs.
pub struct IgnorePatterns {
    defaults: Gitignore,
    excludes: GlobSet,
}

impl IgnorePatterns {
    pub fn new(root: &Path, extra_patterns: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in DEFAULT_IGNORE_DIRS.iter().chain(DEFAULT_IGNORE_FILES) {
            let _ = builder.add_line(None, pattern);
        }

        let mut excludes = GlobSetBuilder::new();
        for pattern in extra_patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    excludes.add(glob);
                }
                Err(e) => warn!(pattern = %pattern, error = %e, "invalid exclude glob"),
            }
        }

        Self {
            defaults: builder
                .build()
                .unwrap_or_else(|_| Gitignore::empty()),
            excludes: excludes.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.defaults.matched(path, is_dir).is_ignore() || self.excludes.is_match(path)
    }
}
