//! Per-language import and function extraction.
//!
//! Each source file is parsed exactly once; the resulting [`Extraction`]
//! carries everything downstream passes need: raw import specifiers,
//! function spans with their complexity scores, and a class count.
//! JavaScript and TypeScript fall back to a regex pass when the syntax
//! tree is unusable or the caller forces it.

mod ecma;
mod heuristic;
mod python;

pub use ecma::{EcmaExtractor, EcmaGrammar};
pub use python::PythonExtractor;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::scanner::{Language, SourceFile};

/// An import specifier exactly as written in the source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
    /// Module path or specifier text, quotes stripped
    pub specifier: String,
    /// 1-based source line of the import
    pub line: u32,
    /// Number of leading dots for Python relative imports, 0 otherwise
    pub relative_level: u32,
}

/// How a file's facts were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Ast,
    Heuristic,
}

/// One function (or method) found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan {
    pub name: String,
    /// 1-based inclusive line range
    pub start_line: u32,
    pub end_line: u32,
    pub complexity: u32,
}

/// Everything extracted from one file in a single pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub imports: Vec<RawImport>,
    pub functions: Vec<FunctionSpan>,
    pub class_count: usize,
    pub method: ExtractionMethod,
    /// Present when the parser reported syntax errors
    pub parse_error: Option<String>,
}

impl Extraction {
    pub fn new(method: ExtractionMethod) -> Self {
        Self {
            imports: Vec::new(),
            functions: Vec::new(),
            class_count: 0,
            method,
            parse_error: None,
        }
    }
}

/// One parser per grammar, reused across files. Parsers are stateful, so
/// each worker thread owns its own set.
pub struct Extractors {
    python: PythonExtractor,
    typescript: EcmaExtractor,
    tsx: EcmaExtractor,
    javascript: EcmaExtractor,
}

impl Extractors {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            python: PythonExtractor::new()?,
            typescript: EcmaExtractor::new(EcmaGrammar::TypeScript)?,
            tsx: EcmaExtractor::new(EcmaGrammar::Tsx)?,
            javascript: EcmaExtractor::new(EcmaGrammar::JavaScript)?,
        })
    }

    /// Extract facts from one file. `force_heuristic` bypasses the parser
    /// for JavaScript and TypeScript; Python has no regex fallback, so a
    /// failed parse there yields whatever the error-tolerant tree holds.
    pub fn extract(
        &mut self,
        file: &SourceFile,
        source: &str,
        force_heuristic: bool,
    ) -> Extraction {
        match file.language {
            Language::Python => self.python.extract(source),
            Language::TypeScript | Language::JavaScript => {
                if force_heuristic {
                    return heuristic::extract(source);
                }
                let extractor = match file.language {
                    Language::TypeScript if file.path.ends_with(".tsx") => &mut self.tsx,
                    Language::TypeScript => &mut self.typescript,
                    _ => &mut self.javascript,
                };
                let mut extraction = extractor.extract(source);
                if extraction.parse_error.is_some() {
                    // Unusable tree: rerun with the regex pass instead of
                    // trusting partial AST output.
                    let mut fallback = heuristic::extract(source);
                    fallback.parse_error = extraction.parse_error.take();
                    return fallback;
                }
                extraction
            }
            Language::Unknown => Extraction::new(ExtractionMethod::Ast),
        }
    }
}

pub(crate) fn node_text(node: tree_sitter::Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, language: Language) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            language,
            line_count: 0,
        }
    }

    #[test]
    fn dispatches_by_language() {
        let mut extractors = Extractors::new().unwrap();

        let py = extractors.extract(&file("a.py", Language::Python), "import os\n", false);
        assert_eq!(py.imports[0].specifier, "os");

        let ts = extractors.extract(
            &file("a.ts", Language::TypeScript),
            "import { x } from './b';\n",
            false,
        );
        assert_eq!(ts.imports[0].specifier, "./b");
        assert_eq!(ts.method, ExtractionMethod::Ast);
    }

    #[test]
    fn tsx_files_use_the_tsx_grammar() {
        let mut extractors = Extractors::new().unwrap();
        let src = "import React from 'react';\nexport function App() {\n  return <div>hi</div>;\n}\n";
        let out = extractors.extract(&file("app.tsx", Language::TypeScript), src, false);
        assert_eq!(out.method, ExtractionMethod::Ast);
        assert!(out.parse_error.is_none());
        assert_eq!(out.imports[0].specifier, "react");
        assert_eq!(out.functions[0].name, "App");
    }

    #[test]
    fn forced_heuristic_skips_the_parser() {
        let mut extractors = Extractors::new().unwrap();
        let out = extractors.extract(
            &file("a.js", Language::JavaScript),
            "const b = require('./b');\n",
            true,
        );
        assert_eq!(out.method, ExtractionMethod::Heuristic);
        assert_eq!(out.imports[0].specifier, "./b");
    }

    #[test]
    fn broken_javascript_falls_back_to_heuristic() {
        let mut extractors = Extractors::new().unwrap();
        let src = "import { x } from './b';\nfunction f( {{{{ ]\n";
        let out = extractors.extract(&file("a.js", Language::JavaScript), src, false);
        assert_eq!(out.method, ExtractionMethod::Heuristic);
        assert!(out.parse_error.is_some());
        assert_eq!(out.imports[0].specifier, "./b");
    }
}
