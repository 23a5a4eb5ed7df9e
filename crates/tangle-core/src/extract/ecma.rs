//! JavaScript and TypeScript extraction over a shared node-kind walk.
//!
//! The three grammars (JS, TS, TSX) share their statement shapes, so one
//! extractor parameterized by grammar covers all of them. Collected import
//! forms: ES `import`, `export ... from` re-exports, `require(...)` calls,
//! and dynamic `import(...)` with a literal argument. Computed specifiers
//! are ignored.

use tree_sitter::{Node, Parser};

use super::{node_text, Extraction, ExtractionMethod, FunctionSpan, RawImport};
use crate::complexity;
use crate::error::Error;
use crate::scanner::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmaGrammar {
    TypeScript,
    Tsx,
    JavaScript,
}

impl EcmaGrammar {
    fn grammar(self) -> tree_sitter::Language {
        match self {
            EcmaGrammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            EcmaGrammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            EcmaGrammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    fn language(self) -> Language {
        match self {
            EcmaGrammar::TypeScript | EcmaGrammar::Tsx => Language::TypeScript,
            EcmaGrammar::JavaScript => Language::JavaScript,
        }
    }
}

pub struct EcmaExtractor {
    parser: Parser,
    language: Language,
}

impl EcmaExtractor {
    pub fn new(grammar: EcmaGrammar) -> Result<Self, Error> {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.grammar())
            .map_err(|e| Error::Grammar(format!("{grammar:?}: {e}")))?;
        Ok(Self {
            parser,
            language: grammar.language(),
        })
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
        if tree.root_node().has_error() {
            extraction.parse_error = Some("syntax errors in source".to_string());
            return extraction;
        }

        let bytes = source.as_bytes();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_statement" | "export_statement" => {
                    if let Some(src) = node.child_by_field_name("source") {
                        push_import(src, bytes, &mut extraction.imports);
                    }
                }
                "call_expression" => {
                    if let Some(spec) = call_import_source(node, bytes) {
                        push_import(spec, bytes, &mut extraction.imports);
                    }
                }
                "function_declaration" | "generator_function_declaration" => {
                    self.push_named_function(node, node, bytes, &mut extraction.functions);
                }
                "method_definition" => {
                    self.push_named_function(node, node, bytes, &mut extraction.functions);
                }
                "variable_declarator" | "public_field_definition" => {
                    if let Some(value) = node.child_by_field_name("value") {
                        if complexity::is_function_node(value.kind(), self.language) {
                            self.push_named_function(node, value, bytes, &mut extraction.functions);
                        }
                    }
                }
                "class_declaration" | "abstract_class_declaration" => extraction.class_count += 1,
                "class" if node.is_named() => extraction.class_count += 1,
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

    /// `name_holder` carries the name field and the start line; `body` is the
    /// node complexity is scored on (they differ for `const f = () => ...`).
    fn push_named_function(
        &self,
        name_holder: Node,
        body: Node,
        source: &[u8],
        functions: &mut Vec<FunctionSpan>,
    ) {
        let name = match name_holder.child_by_field_name("name") {
            Some(n) if n.kind() != "computed_property_name" => node_text(n, source),
            _ => return,
        };
        if name.is_empty() {
            return;
        }
        functions.push(FunctionSpan {
            name,
            start_line: name_holder.start_position().row as u32 + 1,
            end_line: body.end_position().row as u32 + 1,
            complexity: complexity::score(body, source, self.language),
        });
    }
}

/// Literal specifier of a `require('x')` or dynamic `import('x')` call.
fn call_import_source<'a>(call: Node<'a>, source: &[u8]) -> Option<Node<'a>> {
    let callee = call.child_by_field_name("function")?;
    let is_import_call = match callee.kind() {
        "identifier" => node_text(callee, source) == "require",
        "import" => true,
        _ => false,
    };
    if !is_import_call {
        return None;
    }
    let args = call.child_by_field_name("arguments")?;
    let first = args.named_child(0)?;
    if first.kind() == "string" {
        Some(first)
    } else {
        None
    }
}

fn push_import(string_node: Node, source: &[u8], imports: &mut Vec<RawImport>) {
    let raw = node_text(string_node, source);
    let specifier = raw
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string();
    if specifier.is_empty() {
        return;
    }
    imports.push(RawImport {
        specifier,
        line: string_node.start_position().row as u32 + 1,
        relative_level: 0,
    });
}
