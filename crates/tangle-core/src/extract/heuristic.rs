//! Regex fallback for JavaScript/TypeScript files the parser cannot handle.
//!
//! Coarser than the syntax tree on purpose: it finds line-anchored import
//! forms and top-level function declarations, and approximates complexity
//! by counting branch keywords inside each function's line range. Ternaries
//! are not counted here; a `?` has too many other meanings in TypeScript.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Extraction, ExtractionMethod, FunctionSpan, RawImport};

static ES_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(?:[\w$*{},\s]+?\s+from\s+)?['"]([^'"]+)['"]"#).unwrap()
});
static EXPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*export\s+(?:\*|\{[^}]*\})\s*from\s+['"]([^'"]+)['"]"#).unwrap()
});
static REQUIRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static DYNAMIC_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)")
        .unwrap()
});
static ARROW_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:\([^)\n]*\)|[A-Za-z_$][\w$]*)\s*=>",
    )
    .unwrap()
});
static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)")
        .unwrap()
});
static BRANCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|for|while|case)\b|&&|\|\|").unwrap());

pub fn extract(source: &str) -> Extraction {
    let mut extraction = Extraction::new(ExtractionMethod::Heuristic);
    let line_starts = line_starts(source);

    for re in [&*ES_IMPORT, &*EXPORT_FROM, &*REQUIRE, &*DYNAMIC_IMPORT] {
        for captures in re.captures_iter(source) {
            let whole = captures.get(0).map(|m| m.start()).unwrap_or(0);
            if let Some(spec) = captures.get(1) {
                extraction.imports.push(RawImport {
                    specifier: spec.as_str().to_string(),
                    line: line_of(&line_starts, whole),
                    relative_level: 0,
                });
            }
        }
    }
    extraction.imports.sort_by(|a, b| {
        a.line
            .cmp(&b.line)
            .then_with(|| a.specifier.cmp(&b.specifier))
    });
    extraction.imports.dedup();

    extraction.class_count = CLASS_DECL.captures_iter(source).count();

    let total_lines = source.lines().count().max(1) as u32;
    let mut starts: Vec<(u32, String)> = Vec::new();
    for re in [&*FUNCTION_DECL, &*ARROW_DECL] {
        for captures in re.captures_iter(source) {
            let offset = captures.get(0).map(|m| m.start()).unwrap_or(0);
            if let Some(name) = captures.get(1) {
                starts.push((line_of(&line_starts, offset), name.as_str().to_string()));
            }
        }
    }
    starts.sort();
    starts.dedup_by(|a, b| a.0 == b.0);

    let lines: Vec<&str> = source.lines().collect();
    for (idx, (start, name)) in starts.iter().enumerate() {
        // A function runs until the next detected function or end of file.
        let end = starts
            .get(idx + 1)
            .map(|(next, _)| next.saturating_sub(1))
            .unwrap_or(total_lines);
        let body = lines
            .get(*start as usize - 1..end.min(total_lines) as usize)
            .unwrap_or(&[])
            .join("\n");
        extraction.functions.push(FunctionSpan {
            name: name.clone(),
            start_line: *start,
            end_line: end.max(*start),
            complexity: 1 + BRANCH.find_iter(&body).count() as u32,
        });
    }

    extraction
}

fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in source.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn line_of(starts: &[usize], offset: usize) -> u32 {
    match starts.binary_search(&offset) {
        Ok(i) => i as u32 + 1,
        Err(i) => i as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_imports_without_a_parser() {
        let src = "import a from './a';\nconst b = require('./b');\nexport * from './c';\nconst d = import('./d');\n";
        let out = extract(src);
        let specs: Vec<(&str, u32)> = out
            .imports
            .iter()
            .map(|i| (i.specifier.as_str(), i.line))
            .collect();
        assert_eq!(specs, vec![("./a", 1), ("./b", 2), ("./c", 3), ("./d", 4)]);
        assert_eq!(out.method, ExtractionMethod::Heuristic);
    }

    #[test]
    fn side_effect_imports_match() {
        let out = extract("import './polyfill';\n");
        assert_eq!(out.imports[0].specifier, "./polyfill");
    }

    #[test]
    fn functions_get_approximate_spans_and_complexity() {
        let src = "function first(x) {\n  if (x && x.ok) return 1;\n  return 0;\n}\n\nconst second = (y) => {\n  for (const i of y) {\n    console.log(i);\n  }\n};\n";
        let out = extract(src);
        assert_eq!(out.functions.len(), 2);
        assert_eq!(out.functions[0].name, "first");
        // if + &&
        assert_eq!(out.functions[0].complexity, 3);
        assert_eq!(out.functions[1].name, "second");
        assert_eq!(out.functions[1].complexity, 2);
        assert!(out.functions[0].end_line < out.functions[1].start_line);
    }

    #[test]
    fn counts_classes() {
        let out = extract("export class A {}\nclass B {}\n");
        assert_eq!(out.class_count, 2);
    }
}
