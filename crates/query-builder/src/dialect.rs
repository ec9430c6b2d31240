//! Defines the `Dialect` trait for SQL quoting rules.

use sqlparser::keywords::{
    ALL_KEYWORDS, ALL_KEYWORDS_INDEX, Keyword, RESERVED_FOR_COLUMN_ALIAS, RESERVED_FOR_TABLE_ALIAS,
};

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a stream or column name) in the correct
    /// quotation marks for the dialect, escaping embedded quotes.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Wraps a string value in single quotes, doubling any embedded
    /// single quote: `test's` becomes `'test''s'`.
    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Leaves lower-case, non-reserved identifiers bare and quotes
    /// everything else. Unquoted names are case-folded by the engine, so
    /// `Level` must stay quoted to keep meaning `Level`.
    fn quote_identifier_if_needed(&self, ident: &str) -> String {
        if is_plain_identifier(ident) && !is_reserved_word(ident) {
            ident.to_string()
        } else {
            self.quote_identifier(ident)
        }
    }
}

/// `[a-z_][a-z0-9_]*`
pub fn is_plain_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Keywords the expression parser gives a meaning of their own, e.g.
/// `interval = 'x'` starts an INTERVAL literal.
const EXPRESSION_KEYWORDS: &[Keyword] = &[
    Keyword::ALL,
    Keyword::AND,
    Keyword::ANY,
    Keyword::ARRAY,
    Keyword::AS,
    Keyword::BETWEEN,
    Keyword::BY,
    Keyword::CASE,
    Keyword::CAST,
    Keyword::CEIL,
    Keyword::CONVERT,
    Keyword::CURRENT_DATE,
    Keyword::CURRENT_TIME,
    Keyword::CURRENT_TIMESTAMP,
    Keyword::CURRENT_USER,
    Keyword::DISTINCT,
    Keyword::ELSE,
    Keyword::EXISTS,
    Keyword::EXTRACT,
    Keyword::FALSE,
    Keyword::FLOOR,
    Keyword::ILIKE,
    Keyword::IN,
    Keyword::INTERVAL,
    Keyword::IS,
    Keyword::LIKE,
    Keyword::LOCALTIME,
    Keyword::LOCALTIMESTAMP,
    Keyword::NOT,
    Keyword::NULL,
    Keyword::OR,
    Keyword::OVERLAY,
    Keyword::SAFE_CAST,
    Keyword::SESSION_USER,
    Keyword::SUBSTRING,
    Keyword::THEN,
    Keyword::TRIM,
    Keyword::TRUE,
    Keyword::TRY_CAST,
    Keyword::USER,
    Keyword::WHEN,
];

/// Whether `ident` cannot appear bare as a column name. Non-reserved
/// keywords such as `level` or `name` are fine unquoted.
pub fn is_reserved_word(ident: &str) -> bool {
    let upper = ident.to_ascii_uppercase();
    let Ok(index) = ALL_KEYWORDS.binary_search(&upper.as_str()) else {
        return false;
    };
    let Some(keyword) = ALL_KEYWORDS_INDEX.get(index) else {
        return false;
    };

    RESERVED_FOR_TABLE_ALIAS.contains(keyword)
        || RESERVED_FOR_COLUMN_ALIAS.contains(keyword)
        || EXPRESSION_KEYWORDS.contains(keyword)
}

/// The ANSI-flavoured dialect understood by the log search engine:
/// double-quoted identifiers, single-quoted strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl Dialect for Generic {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }
}
