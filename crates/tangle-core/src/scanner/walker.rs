//! Source walker: enumerates candidate files under the scan root.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::debug;

use super::guard::PathGuard;
use super::ignores::IgnorePatterns;
use super::types::{Language, SourceFile, WalkOutcome};
use crate::config::AnalysisConfig;
use crate::error::{Diagnostic, DiagnosticKind};

/// Walks the scan root and produces the immutable source-file index.
pub struct Walker<'a> {
    config: &'a AnalysisConfig,
    guard: &'a PathGuard,
    ignores: IgnorePatterns,
}

impl<'a> Walker<'a> {
    pub fn new(config: &'a AnalysisConfig, guard: &'a PathGuard) -> Self {
        let ignores = IgnorePatterns::new(guard.root(), &config.exclude);
        Self {
            config,
            guard,
            ignores,
        }
    }

    /// Enumerate files. Unreadable entries are recorded as skip diagnostics;
    /// only the index itself is returned, sorted by project-relative path.
    pub fn walk(&self) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let mut visited = FxHashSet::default();
        visited.insert(self.guard.root().to_path_buf());
        self.walk_dir(self.guard.root(), &mut outcome, &mut visited);
        outcome.files.sort_by(|a, b| a.path.cmp(&b.path));
        outcome.diagnostics.sort();
        debug!(
            files = outcome.files.len(),
            skipped = outcome.skipped,
            "walk complete"
        );
        outcome
    }

    fn walk_dir(&self, dir: &Path, outcome: &mut WalkOutcome, visited: &mut FxHashSet<PathBuf>) {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let relative = path.strip_prefix(self.guard.root()).unwrap_or(&path);

            if path.is_dir() {
                if self.ignores.is_ignored(relative, true) {
                    continue;
                }
                // Directories go through the guard too; a symlink pointing
                // back at an ancestor would otherwise recurse forever.
                match self.guard.contain(&path) {
                    Some(resolved) => {
                        if visited.insert(resolved) {
                            self.walk_dir(&path, outcome, visited);
                        }
                    }
                    None => outcome.diagnostics.push(Diagnostic::new(
                        relative.to_string_lossy().replace('\\', "/"),
                        DiagnosticKind::SecurityRejection,
                        "directory resolves outside the scan root",
                    )),
                }
                continue;
            }
            if !path.is_file() || self.ignores.is_ignored(relative, false) {
                continue;
            }

            // Symlinks may point anywhere; the guard decides.
            let contained = match self.guard.contain(&path) {
                Some(p) => p,
                None => {
                    outcome.diagnostics.push(Diagnostic::new(
                        relative.to_string_lossy().replace('\\', "/"),
                        DiagnosticKind::SecurityRejection,
                        "path resolves outside the scan root",
                    ));
                    continue;
                }
            };

            let language = Language::from_path(&contained);
            if language == Language::Unknown && !self.config.include_unknown {
                outcome.skipped += 1;
                continue;
            }
            if !self.config.language.accepts(language) && language != Language::Unknown {
                outcome.skipped += 1;
                continue;
            }

            let rel = self.guard.relative(&contained);
            match fs::read_to_string(&contained) {
                Ok(text) => outcome.files.push(SourceFile {
                    path: rel,
                    language,
                    line_count: text.lines().count(),
                }),
                Err(e) => {
                    outcome.skipped += 1;
                    outcome.diagnostics.push(Diagnostic::new(
                        rel,
                        DiagnosticKind::SkippedFile,
                        format!("unreadable: {e}"),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn walk(config: &AnalysisConfig) -> WalkOutcome {
        let guard = PathGuard::new(&config.root).unwrap();
        Walker::new(config, &guard).walk()
    }

    #[test]
    fn indexes_supported_languages_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.py"), "x = 1\n").unwrap();
        fs::write(temp.path().join("a.ts"), "const x = 1;\n").unwrap();
        fs::write(temp.path().join("notes.txt"), "hello\n").unwrap();

        let outcome = walk(&AnalysisConfig::for_root(temp.path()));
        let paths: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.ts", "b.py"]);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn respects_language_filter() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "x = 1\n").unwrap();
        fs::write(temp.path().join("b.js"), "let x = 1;\n").unwrap();

        let mut config = AnalysisConfig::for_root(temp.path());
        config.language = crate::config::LanguageFilter::Only(Language::Python);
        let outcome = walk(&config);
        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].language, Language::Python);
    }

    #[test]
    fn skips_ignored_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("node_modules/pkg")).unwrap();
        fs::write(temp.path().join("node_modules/pkg/x.js"), "x\n").unwrap();
        fs::write(temp.path().join("a.js"), "let x = 1;\n").unwrap();

        let outcome = walk(&AnalysisConfig::for_root(temp.path()));
        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].path, "a.js");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loops_terminate() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "x = 1\n").unwrap();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("loop")).unwrap();

        let outcome = walk(&AnalysisConfig::for_root(temp.path()));
        let paths: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_outside_root_are_rejected() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("evil.py"), "x = 1\n").unwrap();
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "x = 1\n").unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("vendor")).unwrap();

        let outcome = walk(&AnalysisConfig::for_root(temp.path()));
        let paths: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.py"]);
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.kind == crate::error::DiagnosticKind::SecurityRejection));
    }

    #[test]
    fn records_line_counts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "a = 1\nb = 2\n\n").unwrap();

        let outcome = walk(&AnalysisConfig::for_root(temp.path()));
        assert_eq!(outcome.files[0].line_count, 3);
    }
}
