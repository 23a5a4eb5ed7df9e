//! Cyclomatic complexity scoring over tree-sitter syntax trees.
//!
//! Complexity starts at 1 and increments by exactly 1 for each decision
//! point: `if`/`elif`/`else if`, each loop construct, each `case` arm,
//! each boolean short-circuit operator, and each ternary expression.
//! Nested constructs accumulate additively; nested function definitions
//! are scored as their own functions and excluded from the enclosing one.

use tree_sitter::Node;

use crate::scanner::Language;

/// Node kinds that introduce a new function scope.
pub fn is_function_node(kind: &str, language: Language) -> bool {
    match language {
        Language::Python => kind == "function_definition",
        Language::JavaScript | Language::TypeScript => matches!(
            kind,
            "function_declaration"
                | "generator_function_declaration"
                | "function_expression"
                | "function"
                | "generator_function"
                | "arrow_function"
                | "method_definition"
        ),
        Language::Unknown => false,
    }
}

/// Score one function node. The node itself is not counted; decision points
/// in nested function scopes belong to those functions, not this one.
pub fn score(function_node: Node, source: &[u8], language: Language) -> u32 {
    let mut complexity = 1u32;
    let mut stack: Vec<Node> = Vec::new();
    push_children(function_node, &mut stack);

    while let Some(node) = stack.pop() {
        let kind = node.kind();
        if is_function_node(kind, language) {
            continue;
        }
        complexity += decision_delta(node, kind, language);
        push_children(node, &mut stack);
    }

    complexity
}

fn decision_delta(node: Node, kind: &str, language: Language) -> u32 {
    match language {
        Language::Python => match kind {
            "if_statement" | "elif_clause" | "for_statement" | "while_statement"
            | "conditional_expression" | "boolean_operator" | "case_clause" => 1,
            _ => 0,
        },
        Language::JavaScript | Language::TypeScript => match kind {
            "if_statement" | "for_statement" | "for_in_statement" | "while_statement"
            | "do_statement" | "ternary_expression" | "switch_case" => 1,
            "binary_expression" => {
                let op = node.child_by_field_name("operator").map(|n| n.kind());
                match op {
                    Some("&&") | Some("||") => 1,
                    _ => 0,
                }
            }
            _ => 0,
        },
        Language::Unknown => 0,
    }
}

fn push_children<'a>(node: Node<'a>, stack: &mut Vec<Node<'a>>) {
    for i in (0..node.child_count()).rev() {
        if let Some(child) = node.child(i) {
            stack.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn python_function(source: &str) -> (tree_sitter::Tree, Vec<u8>) {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        (tree, source.as_bytes().to_vec())
    }

    fn score_first_python(source: &str) -> u32 {
        let (tree, bytes) = python_function(source);
        let func = tree.root_node().child(0).unwrap();
        assert_eq!(func.kind(), "function_definition");
        score(func, &bytes, Language::Python)
    }

    #[test]
    fn straight_line_function_scores_one() {
        assert_eq!(score_first_python("def f():\n    return 1\n"), 1);
    }

    #[test]
    fn each_if_adds_one() {
        assert_eq!(
            score_first_python("def f(x):\n    if x:\n        return 1\n    return 0\n"),
            2
        );
        assert_eq!(
            score_first_python(
                "def f(x, y):\n    if x:\n        pass\n    if y:\n        pass\n    return 0\n"
            ),
            3
        );
    }

    #[test]
    fn elif_loops_and_booleans_count() {
        let src = "def f(x):\n    if x > 0:\n        pass\n    elif x < 0:\n        pass\n    for i in range(x):\n        while i and x:\n            pass\n";
        // if + elif + for + while + `and`
        assert_eq!(score_first_python(src), 6);
    }

    #[test]
    fn nested_function_scores_independently() {
        let src = "def outer(x):\n    def inner(y):\n        if y:\n            pass\n    return inner\n";
        assert_eq!(score_first_python(src), 1);
    }

    #[test]
    fn ternary_counts_in_javascript() {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .unwrap();
        let src = "function f(x) { return x ? 1 : 0; }";
        let tree = parser.parse(src, None).unwrap();
        let func = tree.root_node().child(0).unwrap();
        assert_eq!(func.kind(), "function_declaration");
        assert_eq!(score(func, src.as_bytes(), Language::JavaScript), 2);
    }

    #[test]
    fn short_circuit_operators_count_in_javascript() {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .unwrap();
        let src = "function f(a, b, c) { if (a && b || c) { return 1; } return 0; }";
        let tree = parser.parse(src, None).unwrap();
        let func = tree.root_node().child(0).unwrap();
        // if + && + ||
        assert_eq!(score(func, src.as_bytes(), Language::JavaScript), 4);
    }
}
