//! Import resolution against the walker's file index.
//!
//! Resolution is purely lexical over project-relative paths. Relative
//! specifiers resolve against the importing file's directory; everything
//! else is probed root-relative; anything that matches no indexed file is
//! external. When several candidates exist the fixed probe order decides
//! and the tie is reported as a `resolution_ambiguity` diagnostic.

use rustc_hash::FxHashSet;

use crate::error::{Diagnostic, DiagnosticKind};
use crate::extract::RawImport;
use crate::scanner::{Language, SourceFile};

/// Outcome of resolving one raw import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Project-relative path of the imported file
    Internal(String),
    /// Specifier kept verbatim; not part of the scanned tree
    External(String),
}

/// Python probe order: module file before package init.
const PYTHON_SUFFIXES: &[&str] = &[".py", "/__init__.py"];
/// JS/TS probe order; TypeScript wins over JavaScript, direct file over
/// directory index.
const ECMA_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];

pub struct Resolver {
    index: FxHashSet<String>,
}

impl Resolver {
    pub fn new(files: &[SourceFile]) -> Self {
        Self {
            index: files.iter().map(|f| f.path.clone()).collect(),
        }
    }

    pub fn resolve(
        &self,
        importer: &SourceFile,
        import: &RawImport,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Resolution {
        let candidates = match importer.language {
            Language::Python => self.python_candidates(importer, import),
            Language::JavaScript | Language::TypeScript => {
                self.ecma_candidates(importer, import)
            }
            Language::Unknown => Vec::new(),
        };

        let mut hits: Vec<&String> = candidates
            .iter()
            .filter(|c| self.index.contains(*c) && *c != &importer.path)
            .collect();
        hits.dedup();

        match hits.split_first() {
            None => Resolution::External(import.specifier.clone()),
            Some((first, rest)) => {
                if !rest.is_empty() {
                    diagnostics.push(Diagnostic::new(
                        importer.path.clone(),
                        DiagnosticKind::ResolutionAmbiguity,
                        format!(
                            "'{}' matched {} candidates [{}]; chose {}",
                            import.specifier,
                            hits.len(),
                            hits.iter()
                                .map(|s| s.as_str())
                                .collect::<Vec<_>>()
                                .join(", "),
                            first
                        ),
                    ));
                }
                Resolution::Internal((*first).clone())
            }
        }
    }

    fn python_candidates(&self, importer: &SourceFile, import: &RawImport) -> Vec<String> {
        let module_path = import.specifier.replace('.', "/");
        let base = if import.relative_level > 0 {
            // Level 1 is the importer's own package; each extra dot pops one.
            let mut dir = parent_components(&importer.path);
            for _ in 1..import.relative_level {
                if dir.pop().is_none() {
                    return Vec::new();
                }
            }
            join(&dir, &module_path)
        } else {
            module_path
        };
        PYTHON_SUFFIXES
            .iter()
            .map(|suffix| format!("{base}{suffix}"))
            .collect()
    }

    fn ecma_candidates(&self, importer: &SourceFile, import: &RawImport) -> Vec<String> {
        let spec = import.specifier.as_str();
        let base = if spec.starts_with("./") || spec.starts_with("../") {
            let dir = parent_components(&importer.path);
            match join_normalized(&dir, spec) {
                Some(joined) => joined,
                None => return Vec::new(),
            }
        } else {
            spec.trim_start_matches('/').to_string()
        };

        let mut candidates = Vec::with_capacity(1 + ECMA_EXTENSIONS.len() * 2);
        // A specifier that already names a file wins outright.
        candidates.push(base.clone());
        for ext in ECMA_EXTENSIONS {
            candidates.push(format!("{base}{ext}"));
        }
        for ext in ECMA_EXTENSIONS {
            candidates.push(format!("{base}/index{ext}"));
        }
        candidates
    }
}

fn parent_components(path: &str) -> Vec<String> {
    let mut parts: Vec<String> = path.split('/').map(str::to_string).collect();
    parts.pop();
    parts
}

fn join(dir: &[String], tail: &str) -> String {
    if dir.is_empty() {
        tail.to_string()
    } else {
        format!("{}/{}", dir.join("/"), tail)
    }
}

/// Join a `./`/`../` specifier onto a directory, resolving dot segments.
/// `None` when the specifier climbs above the scan root.
fn join_normalized(dir: &[String], spec: &str) -> Option<String> {
    let mut parts = dir.to_vec();
    for segment in spec.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return None;
                }
            }
            other => parts.push(other.to_string()),
        }
    }
    Some(parts.join("/"))
}
