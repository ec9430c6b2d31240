//! Decides whether a SQL string can be edited in the graphical builder.
//!
//! This is a heuristic: an ordered list of patterns is matched against a
//! normalized copy of the query and the first hit names the reason. It does
//! not validate the grammar, and both false positives and false negatives
//! are possible.

use lazy_static::lazy_static;
use panel_model::query::panel::Parseability;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const INVALID_QUERY: &str = "Invalid query";

/// Which set of constructs the builder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierMode {
    /// CASE expressions, multiple JOINs and HAVING are editable.
    #[default]
    Permissive,
    /// Additionally rejects CASE expressions, multiple JOINs and HAVING.
    Strict,
}

struct Pattern {
    regex: Regex,
    reason: &'static str,
}

fn compile(patterns: &[(&str, &'static str)]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|&(source, reason)| match Regex::new(&format!("(?i){source}")) {
            Ok(regex) => Some(Pattern { regex, reason }),
            Err(err) => {
                warn!(pattern = source, error = %err, "Skipping invalid classifier pattern");
                None
            }
        })
        .collect()
}

lazy_static! {
    static ref COMMON_PATTERNS: Vec<Pattern> = compile(&[
        (r"\(\s*SELECT\b", "Contains subqueries or derived tables"),
        (r"\bJOIN\s*\(", "Contains nested JOIN groupings"),
        (r"^WITH\b", "Contains Common Table Expressions (CTEs)"),
        (
            r"\b(UNION|INTERSECT|EXCEPT)\b",
            "Contains set operations (UNION/INTERSECT/EXCEPT)",
        ),
        (r"\bOVER\s*\(", "Contains window functions"),
        (
            r"\w+\s*\(\s*\w+\s*\(\s*\w+\s*\(",
            "Contains deeply nested function calls",
        ),
        (r"\bLATERAL\b", "Contains LATERAL joins"),
        (r"\bDISTINCT\s+ON\s*\(", "Contains DISTINCT ON"),
        (
            r"\bARRAY\s*\[|\[\s*\d+\s*\]|\bUNNEST\s*\(",
            "Contains array operations",
        ),
        (r"->>?|#>>?|@>|<@|\?\||\?&", "Contains JSON operators"),
    ]);
    static ref STRICT_PATTERNS: Vec<Pattern> = compile(&[
        (r"\bCASE\b", "Contains CASE statements"),
        (r"\bJOIN\b.*\bJOIN\b", "Contains multiple JOINs"),
        (r"\bHAVING\b", "Contains HAVING clause"),
    ]);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    mode: ClassifierMode,
}

impl Classifier {
    pub fn new(mode: ClassifierMode) -> Self {
        Self { mode }
    }

    /// Checks a SQL string. Blank input is an invalid query.
    pub fn check(&self, query: &str) -> Parseability {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Parseability::rejected(INVALID_QUERY);
        }

        let strict: &[Pattern] = match self.mode {
            ClassifierMode::Strict => &STRICT_PATTERNS,
            ClassifierMode::Permissive => &[],
        };

        match COMMON_PATTERNS
            .iter()
            .chain(strict.iter())
            .find(|p| p.regex.is_match(&normalized))
        {
            Some(hit) => {
                debug!(reason = hit.reason, "Query rejected by builder classifier");
                Parseability::rejected(hit.reason)
            }
            None => Parseability::parseable(),
        }
    }

    /// Checks a dynamically typed query value, as received from a JSON
    /// payload. Anything but a non-blank string is an invalid query.
    pub fn check_value(&self, query: &serde_json::Value) -> Parseability {
        match query.as_str() {
            Some(sql) => self.check(sql),
            None => Parseability::rejected(INVALID_QUERY),
        }
    }
}

/// Produces the text the patterns run against: comments removed, string
/// literal contents blanked to `''`, whitespace collapsed to single spaces.
pub fn normalize(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut chars = query.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                out.push_str("''");
                while let Some(inner) = chars.next() {
                    if inner == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            continue;
                        }
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
                out.push(' ');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for inner in chars.by_ref() {
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
                out.push(' ');
            }
            other => out.push(other),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
