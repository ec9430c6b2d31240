//! Extracts builder fields from a SELECT projection.

use crate::{
    fields::{X_AXIS_FUNCTIONS, Y_AXIS_FUNCTIONS},
    parse::{self, Arg},
};
use panel_model::query::field::ParsedField;
use sqlparser::ast::{DuplicateTreatment, Expr, Function, FunctionArguments, Select, SelectItem};

/// One `ParsedField` per projected expression. Wildcards contribute nothing.
pub fn extract_fields(select: &Select) -> Vec<ParsedField> {
    select
        .projection
        .iter()
        .filter_map(|item| match item {
            SelectItem::UnnamedExpr(expr) => Some(field_from_expr(expr, None)),
            SelectItem::ExprWithAlias { expr, alias } => {
                Some(field_from_expr(expr, Some(alias.value.as_str())))
            }
            _ => None,
        })
        .collect()
}

fn field_from_expr(expr: &Expr, alias: Option<&str>) -> ParsedField {
    if let Some((qualifier, column)) = parse::column_ref(expr) {
        return ParsedField {
            alias: alias.unwrap_or(&column).to_string(),
            column,
            stream_alias: qualifier,
            ..Default::default()
        };
    }

    if let Expr::Function(func) = expr
        && func.over.is_none()
        && let Some(field) = field_from_function(func, expr, alias)
    {
        return field;
    }

    raw_field(expr, alias)
}

/// `f(column, extra...)` or `f(*)`; anything more involved is a raw field.
fn field_from_function(func: &Function, expr: &Expr, alias: Option<&str>) -> Option<ParsedField> {
    let args = parse::function_args(func);
    let (first, rest) = match args.split_first() {
        Some((first, rest)) => (Some(*first), rest),
        None => (None, &[][..]),
    };

    let (stream_alias, column) = match first {
        Some(Arg::Wildcard) | None => (None, "*".to_string()),
        Some(Arg::Expr(first)) => match parse::column_ref(first) {
            Some(col) => col,
            None if parse::literal(first).is_some() => (None, "*".to_string()),
            None => return None,
        },
    };

    let mut extra = Vec::with_capacity(rest.len());
    for arg in rest {
        match arg {
            Arg::Expr(e) if parse::column_ref(e).is_some() || parse::literal(e).is_some() => {
                extra.push(e.to_string())
            }
            _ => return None,
        }
    }

    let mut name = parse::function_name(func);
    if name == "count" && is_distinct(func) {
        name = "count-distinct".to_string();
    }

    Some(ParsedField {
        column,
        alias: alias.map(String::from).unwrap_or_else(|| expr.to_string()),
        aggregation: Some(name),
        args: extra,
        stream_alias,
        raw_query: None,
    })
}

fn is_distinct(func: &Function) -> bool {
    matches!(
        &func.args,
        FunctionArguments::List(list)
            if matches!(list.duplicate_treatment, Some(DuplicateTreatment::Distinct))
    )
}

/// A projection kept as SQL text. Its aggregation is the outermost known
/// time-bucketing or aggregate call inside it, so `sum(a) / count(b)` still
/// lands on the y-axis.
fn raw_field(expr: &Expr, alias: Option<&str>) -> ParsedField {
    let sql = expr.to_string();
    ParsedField {
        column: alias.map(String::from).unwrap_or_else(|| sql.clone()),
        alias: alias.map(String::from).unwrap_or_else(|| sql.clone()),
        aggregation: outermost_known_function(expr),
        raw_query: Some(sql),
        ..Default::default()
    }
}

fn outermost_known_function(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Function(func) => {
            let name = parse::function_name(func);
            if X_AXIS_FUNCTIONS.contains(&name.as_str()) || Y_AXIS_FUNCTIONS.contains(&name.as_str())
            {
                return Some(name);
            }
            parse::function_args(func).into_iter().find_map(|arg| match arg {
                Arg::Expr(inner) => outermost_known_function(inner),
                Arg::Wildcard => None,
            })
        }
        Expr::BinaryOp { left, right, .. } => {
            outermost_known_function(left).or_else(|| outermost_known_function(right))
        }
        Expr::UnaryOp { expr, .. } | Expr::Nested(expr) => outermost_known_function(expr),
        Expr::Cast { expr, .. } => outermost_known_function(expr),
        _ => None,
    }
}
