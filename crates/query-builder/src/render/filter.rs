//! Turns filter editor state into SQL predicates.

use crate::{
    ast::expr::{BinaryOperator, Expr, FunctionCall, Ident},
    dialect::Dialect,
    parse::is_number,
    render::to_sql,
};
use panel_model::query::filter::{
    FilterCondition, FilterGroup, FilterNode, FilterOperator, LogicalOperator, ValueKind,
};

/// Builds the predicate for a single condition, or `None` when the
/// condition constrains nothing (an `IN` list without values).
///
/// A missing value turns `=` into `IS NULL` and `<>`/`!=` into
/// `IS NOT NULL`; ordering comparisons compare against `NULL`. Text and
/// regex operators use an empty pattern.
pub fn condition_expr(condition: &FilterCondition) -> Option<Expr> {
    let column = || Expr::Identifier(Ident::parse(&condition.column));
    let value = condition.value.clone().unwrap_or_default();

    let expr = match (condition.operator, condition.value.as_deref()) {
        (FilterOperator::Eq, None) => Expr::IsNull {
            expr: Box::new(column()),
            negated: false,
        },
        (FilterOperator::NotEq | FilterOperator::BangEq, None) => Expr::IsNull {
            expr: Box::new(column()),
            negated: true,
        },
        (
            FilterOperator::Eq
            | FilterOperator::NotEq
            | FilterOperator::BangEq
            | FilterOperator::Lt
            | FilterOperator::Gt
            | FilterOperator::LtEq
            | FilterOperator::GtEq,
            value,
        ) => {
            let right = match value {
                Some(v) => value_expr(v, condition.value_kind),
                None => Expr::Raw("NULL".into()),
            };
            Expr::binary(column(), comparison_operator(condition.operator), right)
        }
        (FilterOperator::Contains, _) => like(column(), format!("%{value}%"), false),
        (FilterOperator::NotContains, _) => like(column(), format!("%{value}%"), true),
        (FilterOperator::StartsWith, _) => like(column(), format!("{value}%"), false),
        (FilterOperator::EndsWith, _) => like(column(), format!("%{value}"), false),
        (FilterOperator::IsNull, _) => Expr::IsNull {
            expr: Box::new(column()),
            negated: false,
        },
        (FilterOperator::IsNotNull, _) => Expr::IsNull {
            expr: Box::new(column()),
            negated: true,
        },
        (FilterOperator::In | FilterOperator::NotIn, _) => {
            let list = list_values(condition);
            if list.is_empty() {
                return None;
            }
            Expr::InList {
                expr: Box::new(column()),
                list: list
                    .iter()
                    .map(|v| value_expr(v, condition.value_kind))
                    .collect(),
                negated: condition.operator == FilterOperator::NotIn,
            }
        }
        (
            FilterOperator::ReMatch
            | FilterOperator::ReNotMatch
            | FilterOperator::StrMatch
            | FilterOperator::StrMatchIgnoreCase,
            _,
        ) => Expr::FunctionCall(FunctionCall::new(
            condition.operator.label(),
            vec![column(), Expr::Value(value)],
        )),
        (FilterOperator::MatchAll, _) => Expr::FunctionCall(FunctionCall::new(
            "match_all",
            vec![Expr::Value(value)],
        )),
    };
    Some(expr)
}

/// Renders a single condition as a SQL fragment, e.g. `level = 'ERROR'`.
pub fn condition_sql(condition: &FilterCondition, dialect: &dyn Dialect) -> Option<String> {
    condition_expr(condition).map(|expr| to_sql(&expr, dialect))
}

/// Numbers and booleans are emitted bare only when the text really is one;
/// anything else falls back to a quoted string.
fn value_expr(value: &str, kind: ValueKind) -> Expr {
    match kind {
        ValueKind::Number if is_number(value) => Expr::Raw(value.to_string()),
        ValueKind::Boolean
            if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") =>
        {
            Expr::Raw(value.to_string())
        }
        _ => Expr::Value(value.to_string()),
    }
}

/// Builds the predicate for a whole filter tree, or `None` when it holds
/// no conditions. Nested groups and raw predicates are parenthesized; a
/// change of connective inside one group parenthesizes the left side.
pub fn group_expr(group: &FilterGroup) -> Option<Expr> {
    let mut acc: Option<(Expr, Option<LogicalOperator>)> = None;

    for node in &group.conditions {
        let (expr, connective) = match node {
            FilterNode::Condition(condition) => match condition_expr(condition) {
                Some(expr) => (expr, condition.logical_operator),
                None => continue,
            },
            FilterNode::Group(inner) => match group_expr(inner) {
                Some(expr) => (expr.nested(), group.logical_operator),
                None => continue,
            },
            FilterNode::Raw { sql } => (Expr::Raw(sql.clone()).nested(), group.logical_operator),
        };

        acc = Some(match acc {
            None => (expr, None),
            Some((left, previous)) => {
                let left = match previous {
                    Some(prev) if prev != connective => left.nested(),
                    _ => left,
                };
                (
                    Expr::binary(left, logical_operator(connective), expr),
                    Some(connective),
                )
            }
        });
    }

    acc.map(|(expr, _)| expr)
}

/// `IN` values come either as an explicit list or as one comma separated
/// string; blanks are dropped and each entry is trimmed.
fn list_values(condition: &FilterCondition) -> Vec<String> {
    if !condition.values.is_empty() {
        return condition.values.clone();
    }
    condition
        .value
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

fn like(column: Expr, pattern: String, negated: bool) -> Expr {
    Expr::Like {
        expr: Box::new(column),
        pattern,
        negated,
    }
}

fn comparison_operator(op: FilterOperator) -> BinaryOperator {
    match op {
        FilterOperator::Lt => BinaryOperator::Lt,
        FilterOperator::Gt => BinaryOperator::Gt,
        FilterOperator::LtEq => BinaryOperator::LtEq,
        FilterOperator::GtEq => BinaryOperator::GtEq,
        FilterOperator::NotEq | FilterOperator::BangEq => BinaryOperator::NotEq,
        _ => BinaryOperator::Eq,
    }
}

fn logical_operator(op: LogicalOperator) -> BinaryOperator {
    match op {
        LogicalOperator::And => BinaryOperator::And,
        LogicalOperator::Or => BinaryOperator::Or,
    }
}
