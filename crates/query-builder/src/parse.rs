//! Thin wrappers over `sqlparser` shared by the analysis passes.

use crate::error::BuilderError;
use panel_model::query::filter::ValueKind;
use sqlparser::{
    ast::{
        Expr, Function, FunctionArg, FunctionArgExpr, FunctionArguments, Ident, ObjectName,
        ObjectNamePart, Query, Select, SetExpr, Statement, UnaryOperator,
    },
    dialect::GenericDialect,
    parser::Parser,
};

/// Parses `sql` as exactly one query statement.
pub fn parse_query(sql: &str) -> Result<Box<Query>, BuilderError> {
    if sql.trim().is_empty() {
        return Err(BuilderError::EmptyQuery);
    }

    let mut statements = Parser::parse_sql(&GenericDialect {}, sql)?;
    if statements.len() != 1 {
        return Err(BuilderError::UnsupportedStatement(format!(
            "{} statements",
            statements.len()
        )));
    }

    match statements.pop() {
        Some(Statement::Query(query)) => Ok(query),
        Some(other) => Err(BuilderError::UnsupportedStatement(
            other.to_string().chars().take(40).collect(),
        )),
        None => Err(BuilderError::EmptyQuery),
    }
}

/// Parses a standalone SQL expression, e.g. a WHERE fragment.
pub fn parse_expr(sql: &str) -> Result<Expr, BuilderError> {
    let dialect = GenericDialect {};
    let expr = Parser::new(&dialect).try_with_sql(sql)?.parse_expr()?;
    Ok(expr)
}

/// The first plain SELECT of a query, looking through parenthesized bodies.
pub fn first_select(query: &Query) -> Option<&Select> {
    match query.body.as_ref() {
        SetExpr::Select(select) => Some(select.as_ref()),
        SetExpr::Query(inner) => first_select(inner),
        _ => None,
    }
}

pub fn first_select_mut(query: &mut Query) -> Option<&mut Select> {
    match query.body.as_mut() {
        SetExpr::Select(select) => Some(select.as_mut()),
        SetExpr::Query(inner) => first_select_mut(inner),
        _ => None,
    }
}

/// The name an identifier refers to. Unquoted identifiers are folded to
/// lower case the way the engine folds them; quoted ones keep their case.
pub fn ident_name(ident: &Ident) -> String {
    match ident.quote_style {
        Some(_) => ident.value.clone(),
        None => ident.value.to_lowercase(),
    }
}

/// Unquoted last part of a possibly schema-qualified name.
pub fn object_name(name: &ObjectName) -> String {
    name.0
        .iter()
        .rev()
        .find_map(|part| match part {
            ObjectNamePart::Identifier(ident) => Some(ident_name(ident)),
            #[allow(unreachable_patterns)]
            _ => None,
        })
        .unwrap_or_else(|| name.to_string())
}

/// Lower-cased, unquoted function name.
pub fn function_name(func: &Function) -> String {
    object_name(&func.name).to_lowercase()
}

/// A positional function argument.
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    Expr(&'a Expr),
    Wildcard,
}

/// Positional arguments of a call; named arguments are skipped.
pub fn function_args(func: &Function) -> Vec<Arg<'_>> {
    let FunctionArguments::List(list) = &func.args else {
        return Vec::new();
    };

    list.args
        .iter()
        .filter_map(|arg| match arg {
            FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => Some(Arg::Expr(expr)),
            FunctionArg::Unnamed(FunctionArgExpr::Wildcard)
            | FunctionArg::Unnamed(FunctionArgExpr::QualifiedWildcard(_)) => Some(Arg::Wildcard),
            _ => None,
        })
        .collect()
}

/// A column reference: `(qualifier, column)`.
pub fn column_ref(expr: &Expr) -> Option<(Option<String>, String)> {
    match expr {
        Expr::Identifier(ident) => Some((None, ident_name(ident))),
        Expr::CompoundIdentifier(parts) => {
            let (last, rest) = parts.split_last()?;
            let qualifier = rest.iter().map(ident_name).collect::<Vec<_>>().join(".");
            Some((Some(qualifier).filter(|q| !q.is_empty()), ident_name(last)))
        }
        Expr::Nested(inner) => column_ref(inner),
        _ => None,
    }
}

/// A column reference flattened to `qualifier.column`.
pub fn column_path(expr: &Expr) -> Option<String> {
    column_ref(expr).map(|(qualifier, column)| match qualifier {
        Some(q) => format!("{q}.{column}"),
        None => column,
    })
}

/// A literal operand with its SQL text unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub text: String,
    pub kind: ValueKind,
}

/// A literal operand. `Some(None)` is SQL `NULL`; strings are unquoted
/// with doubled quotes collapsed; numbers and booleans keep their text.
/// Other value forms (placeholders, typed strings) are not literals here.
pub fn literal(expr: &Expr) -> Option<Option<Literal>> {
    match expr {
        Expr::Value(_) => {
            let text = expr.to_string();
            if text.eq_ignore_ascii_case("null") {
                return Some(None);
            }
            scalar(&text).map(Some)
        }
        Expr::UnaryOp {
            op: UnaryOperator::Minus | UnaryOperator::Plus,
            expr: inner,
        } if matches!(inner.as_ref(), Expr::Value(_)) => {
            let text = expr.to_string();
            is_number(&text).then(|| {
                Some(Literal {
                    text,
                    kind: ValueKind::Number,
                })
            })
        }
        Expr::Nested(inner) => literal(inner),
        _ => None,
    }
}

/// Literal text of a non-null literal, whatever its kind.
pub fn literal_text(expr: &Expr) -> Option<String> {
    literal(expr).flatten().map(|lit| lit.text)
}

fn scalar(text: &str) -> Option<Literal> {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        return Some(Literal {
            text: text[1..text.len() - 1].replace("''", "'"),
            kind: ValueKind::String,
        });
    }

    let kind = if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
        ValueKind::Boolean
    } else if is_number(text) {
        ValueKind::Number
    } else {
        return None;
    };
    Some(Literal {
        text: text.to_string(),
        kind,
    })
}

/// Whether `text` can be emitted unquoted as a numeric literal.
pub fn is_number(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') && digits.parse::<f64>().is_ok()
}
