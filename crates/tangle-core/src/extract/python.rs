//! Python extraction: `import`/`from` statements, functions, classes.

use tree_sitter::{Node, Parser};

use super::{node_text, Extraction, ExtractionMethod, FunctionSpan, RawImport};
use crate::complexity;
use crate::error::Error;
use crate::scanner::Language;

pub struct PythonExtractor {
    parser: Parser,
}

impl PythonExtractor {
    pub fn new() -> Result<Self, Error> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| Error::Grammar(format!("python: {e}")))?;
        Ok(Self { parser })
    }

    pub fn extract(&mut self, source: &str) -> Extraction {
        let mut extraction = Extraction::new(ExtractionMethod::Ast);
        let tree = match self.parser.parse(source, None) {
            Some(t) => t,
            None => {
                extraction.parse_error = Some("parser produced no tree".to_string());
                return extraction;
            }
        };
        let bytes = source.as_bytes();
        let root = tree.root_node();
        if root.has_error() {
            // The tree is error-tolerant; keep whatever parsed cleanly.
            extraction.parse_error = Some("syntax errors in source".to_string());
        }

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_statement" => collect_plain(node, bytes, &mut extraction.imports),
                "import_from_statement" => collect_from(node, bytes, &mut extraction.imports),
                "function_definition" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        extraction.functions.push(FunctionSpan {
                            name: node_text(name, bytes),
                            start_line: node.start_position().row as u32 + 1,
                            end_line: node.end_position().row as u32 + 1,
                            complexity: complexity::score(node, bytes, Language::Python),
                        });
                    }
                }
                "class_definition" => extraction.class_count += 1,
                _ => {}
            }
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }

        extraction.imports.sort_by_key(|i| i.line);
        extraction.functions.sort_by_key(|f| f.start_line);
        extraction
    }
}

/// `import a.b.c` and `import a.b as x`, possibly comma-separated.
fn collect_plain(node: Node, source: &[u8], imports: &mut Vec<RawImport>) {
    let line = node.start_position().row as u32 + 1;
    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        let specifier = match child.kind() {
            "dotted_name" => node_text(child, source),
            "aliased_import" => child
                .child_by_field_name("name")
                .map(|n| node_text(n, source))
                .unwrap_or_default(),
            _ => continue,
        };
        if !specifier.is_empty() {
            imports.push(RawImport {
                specifier,
                line,
                relative_level: 0,
            });
        }
    }
}

/// `from a.b import x`, `from . import x`, `from ..pkg import x as y`.
///
/// When the relative module part is empty (`from . import sibling`) the
/// imported names themselves are the module candidates, so one raw import
/// is emitted per name.
fn collect_from(node: Node, source: &[u8], imports: &mut Vec<RawImport>) {
    let line = node.start_position().row as u32 + 1;
    let module = match node.child_by_field_name("module_name") {
        Some(m) => m,
        None => return,
    };

    let (base, level) = match module.kind() {
        "relative_import" => {
            let mut dots = 0u32;
            let mut base = String::new();
            let mut cursor = module.walk();
            for part in module.children(&mut cursor) {
                match part.kind() {
                    "import_prefix" => {
                        dots = node_text(part, source).chars().filter(|c| *c == '.').count() as u32
                    }
                    "dotted_name" => base = node_text(part, source),
                    _ => {}
                }
            }
            (base, dots)
        }
        "dotted_name" => (node_text(module, source), 0),
        _ => return,
    };

    if !base.is_empty() {
        imports.push(RawImport {
            specifier: base,
            line,
            relative_level: level,
        });
        return;
    }
    if level == 0 {
        return;
    }

    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        let specifier = match name.kind() {
            "dotted_name" => node_text(name, source),
            "aliased_import" => name
                .child_by_field_name("name")
                .map(|n| node_text(n, source))
                .unwrap_or_default(),
            _ => continue,
        };
        if !specifier.is_empty() {
            imports.push(RawImport {
                specifier,
                line,
                relative_level: level,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Extraction {
        PythonExtractor::new().unwrap().extract(source)
    }

    #[test]
    fn plain_and_aliased_imports() {
        let out = extract("import os\nimport a.b.c\nimport numpy as np, sys\n");
        let specs: Vec<(&str, u32)> = out
            .imports
            .iter()
            .map(|i| (i.specifier.as_str(), i.line))
            .collect();
        assert_eq!(
            specs,
            vec![("os", 1), ("a.b.c", 2), ("numpy", 3), ("sys", 3)]
        );
        assert!(out.imports.iter().all(|i| i.relative_level == 0));
    }

    #[test]
    fn from_imports_keep_the_module_part() {
        let out = extract("from a.b import thing\nfrom x import y as z\n");
        assert_eq!(out.imports[0].specifier, "a.b");
        assert_eq!(out.imports[1].specifier, "x");
    }

    #[test]
    fn relative_imports_record_dot_level() {
        let out = extract("from . import sibling\nfrom ..pkg import thing\nfrom .mod import f\n");
        assert_eq!(out.imports[0].specifier, "sibling");
        assert_eq!(out.imports[0].relative_level, 1);
        assert_eq!(out.imports[1].specifier, "pkg");
        assert_eq!(out.imports[1].relative_level, 2);
        assert_eq!(out.imports[2].specifier, "mod");
        assert_eq!(out.imports[2].relative_level, 1);
    }

    #[test]
    fn bare_relative_import_emits_one_per_name() {
        let out = extract("from . import a, b\n");
        assert_eq!(out.imports.len(), 2);
        assert_eq!(out.imports[0].specifier, "a");
        assert_eq!(out.imports[1].specifier, "b");
        assert!(out.imports.iter().all(|i| i.relative_level == 1));
    }

    #[test]
    fn functions_methods_and_classes() {
        let src = "class Widget:\n    def render(self):\n        if self.ok:\n            return 1\n        return 0\n\ndef main():\n    pass\n";
        let out = extract(src);
        assert_eq!(out.class_count, 1);
        let names: Vec<&str> = out.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["render", "main"]);
        assert_eq!(out.functions[0].complexity, 2);
        assert_eq!(out.functions[0].start_line, 2);
        assert_eq!(out.functions[0].end_line, 5);
    }

    #[test]
    fn decorated_functions_are_found() {
        let out = extract("@cached\ndef compute():\n    return 1\n");
        assert_eq!(out.functions.len(), 1);
        assert_eq!(out.functions[0].name, "compute");
    }

    #[test]
    fn syntax_errors_keep_partial_results() {
        let out = extract("import os\ndef broken(:\n");
        assert!(out.parse_error.is_some());
        assert_eq!(out.imports[0].specifier, "os");
    }
}
