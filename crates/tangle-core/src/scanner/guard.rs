//! Path guard: every file the engine touches must resolve inside the root.

use std::path::{Component, Path, PathBuf};

/// Validates that candidate paths stay inside the configured scan root.
///
/// Stateless apart from the canonicalized root; a rejection is a pass/fail
/// decision with no side effects.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for a scan root. The root is canonicalized so that
    /// symlinked entries cannot smuggle reads outside it.
    pub fn new(root: &Path) -> std::io::Result<Self> {
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check a candidate path, returning its normalized absolute form or
    /// `None` when it escapes the root.
    pub fn contain(&self, candidate: &Path) -> Option<PathBuf> {
        let absolute = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };

        // Prefer the filesystem view when the path exists: this resolves
        // symlinks, which lexical normalization cannot see through.
        let resolved = match absolute.canonicalize() {
            Ok(p) => p,
            Err(_) => normalize_lexically(&absolute)?,
        };

        if resolved.starts_with(&self.root) {
            Some(resolved)
        } else {
            None
        }
    }

    /// The project-relative form of a contained path.
    pub fn relative(&self, contained: &Path) -> String {
        let rel = contained.strip_prefix(&self.root).unwrap_or(contained);
        rel.to_string_lossy().replace('\\', "/")
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
/// Returns `None` when `..` pops past the path's start.
pub fn normalize_lexically(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}
