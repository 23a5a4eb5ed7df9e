//! Line classification for file metrics.
//!
//! Every line lands in exactly one bucket, so `code + comment + blank`
//! always equals the file's total line count. Python triple-quoted blocks
//! that open a line are treated as documentation; strings opened mid-line
//! stay code through their closing delimiter. JS/TS block comments track
//! `/* ... */` state across lines.

use crate::scanner::Language;

/// Per-file line buckets. Constructed only by [`classify`], which puts each
/// line in exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineBreakdown {
    pub code: usize,
    pub comment: usize,
    pub blank: usize,
}

impl LineBreakdown {
    pub fn total(&self) -> usize {
        self.code + self.comment + self.blank
    }
}

pub fn classify(source: &str, language: Language) -> LineBreakdown {
    match language {
        Language::Python => classify_python(source),
        Language::JavaScript | Language::TypeScript => classify_ecma(source),
        Language::Unknown => classify_plain(source),
    }
}

fn classify_python(source: &str) -> LineBreakdown {
    let mut out = LineBreakdown::default();
    // Some(delimiter) while inside a triple-quoted documentation block.
    let mut in_doc: Option<&str> = None;
    // Some(delimiter) while inside a string literal opened mid-line; those
    // lines belong to an expression and stay code.
    let mut in_str: Option<&str> = None;

    for line in source.lines() {
        let trimmed = line.trim();

        if let Some(delim) = in_doc {
            out.comment += 1;
            if trimmed.contains(delim) {
                in_doc = None;
            }
            continue;
        }
        if let Some(delim) = in_str {
            out.code += 1;
            if let Some(pos) = trimmed.find(delim) {
                in_str = unterminated_triple_quote(&trimmed[pos + delim.len()..]);
            }
            continue;
        }
        if trimmed.is_empty() {
            out.blank += 1;
            continue;
        }
        if trimmed.starts_with('#') {
            out.comment += 1;
            continue;
        }
        if let Some(delim) = doc_delimiter(trimmed) {
            out.comment += 1;
            if unterminated_triple_quote(trimmed) == Some(delim) {
                in_doc = Some(delim);
            }
            continue;
        }
        out.code += 1;
        in_str = unterminated_triple_quote(trimmed);
    }
    out
}

fn doc_delimiter(trimmed: &str) -> Option<&'static str> {
    for prefix in ["r", "b", ""] {
        let rest = trimmed.strip_prefix(prefix).unwrap_or(trimmed);
        if rest.starts_with("\"\"\"") {
            return Some("\"\"\"");
        }
        if rest.starts_with("'''") {
            return Some("'''");
        }
    }
    None
}

/// Delimiter of a triple-quoted string the line opens but does not close,
/// scanning open/close pairs left to right.
fn unterminated_triple_quote(line: &str) -> Option<&'static str> {
    let mut rest = line;
    loop {
        let delim = match (rest.find("\"\"\""), rest.find("'''")) {
            (None, None) => return None,
            (Some(_), None) => "\"\"\"",
            (None, Some(_)) => "'''",
            (Some(d), Some(s)) => {
                if d < s {
                    "\"\"\""
                } else {
                    "'''"
                }
            }
        };
        let open = rest.find(delim).unwrap_or(0);
        let after = &rest[open + delim.len()..];
        match after.find(delim) {
            Some(close) => rest = &after[close + delim.len()..],
            None => return Some(delim),
        }
    }
}

fn classify_ecma(source: &str) -> LineBreakdown {
    let mut out = LineBreakdown::default();
    let mut in_block = false;

    for line in source.lines() {
        let trimmed = line.trim();

        if in_block {
            out.comment += 1;
            if trimmed.contains("*/") {
                in_block = false;
            }
            continue;
        }
        if trimmed.is_empty() {
            out.blank += 1;
            continue;
        }
        if trimmed.starts_with("//") {
            out.comment += 1;
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("/*") {
            out.comment += 1;
            if !rest.contains("*/") {
                in_block = true;
            }
            continue;
        }
        out.code += 1;
        // A trailing block open on a code line carries into the next lines.
        if let Some(idx) = trimmed.rfind("/*") {
            if !trimmed[idx..].contains("*/") {
                in_block = true;
            }
        }
    }
    out
}

fn classify_plain(source: &str) -> LineBreakdown {
    let mut out = LineBreakdown::default();
    for line in source.lines() {
        if line.trim().is_empty() {
            out.blank += 1;
        } else {
            out.code += 1;
        }
    }
    out
}
