//! Extracts the filter tree from a WHERE clause.

use crate::parse::{self, Arg};
use panel_model::query::filter::{
    FilterCondition, FilterGroup, FilterNode, FilterOperator, LogicalOperator, ValueKind,
};
use sqlparser::ast::{BinaryOperator, Expr};

/// Builds the root filter group for a WHERE expression.
///
/// A chain of one connective (`a AND b AND c`) becomes one group;
/// parenthesized sub-chains become nested groups. Predicates the editor
/// cannot represent are kept as `FilterNode::Raw`.
pub fn extract_filters(selection: &Expr) -> FilterGroup {
    match connective(selection) {
        Some(op) => chain_group(selection, op),
        None => {
            let mut group = FilterGroup::new(LogicalOperator::And);
            group.push(leaf(selection, LogicalOperator::And));
            group
        }
    }
}

fn connective(expr: &Expr) -> Option<LogicalOperator> {
    match expr {
        Expr::BinaryOp {
            op: BinaryOperator::And,
            ..
        } => Some(LogicalOperator::And),
        Expr::BinaryOp {
            op: BinaryOperator::Or,
            ..
        } => Some(LogicalOperator::Or),
        _ => None,
    }
}

fn chain_group(expr: &Expr, op: LogicalOperator) -> FilterGroup {
    let mut operands = Vec::new();
    flatten(expr, op, &mut operands);

    let mut group = FilterGroup::new(op);
    for operand in operands {
        group.push(node(operand, op));
    }
    group
}

/// Collects the operands of a left- or right-leaning chain of `op`.
fn flatten<'a>(expr: &'a Expr, op: LogicalOperator, out: &mut Vec<&'a Expr>) {
    match expr {
        Expr::BinaryOp { left, right, .. } if connective(expr) == Some(op) => {
            flatten(left, op, out);
            flatten(right, op, out);
        }
        other => out.push(other),
    }
}

fn node(expr: &Expr, parent: LogicalOperator) -> FilterNode {
    match expr {
        Expr::Nested(inner) => match connective(inner) {
            Some(op) => FilterNode::Group(chain_group(inner, op)),
            None => leaf(inner, parent),
        },
        // A chain of the other connective without parentheses, e.g. the
        // `a AND b` operand in `a AND b OR c`.
        other => match connective(other) {
            Some(op) => FilterNode::Group(chain_group(other, op)),
            None => leaf(other, parent),
        },
    }
}

fn leaf(expr: &Expr, connective: LogicalOperator) -> FilterNode {
    match condition(expr) {
        Some(condition) => FilterNode::Condition(condition.with_logical_operator(connective)),
        None => FilterNode::Raw {
            sql: expr.to_string(),
        },
    }
}

fn condition(expr: &Expr) -> Option<FilterCondition> {
    match expr {
        Expr::Nested(inner) => condition(inner),
        Expr::BinaryOp { left, op, right } => {
            let operator = comparison(op)?;
            let column = parse::column_path(left)?;
            // `x = NULL` never matches; it stays raw rather than becoming IS NULL.
            let value = parse::literal(right)??;
            Some(
                FilterCondition::new(&column, operator, Some(&value.text))
                    .with_value_kind(value.kind),
            )
        }
        Expr::Like {
            negated,
            expr,
            pattern,
            ..
        } => {
            let column = parse::column_path(expr)?;
            let pattern = parse::literal_text(pattern)?;
            let (operator, value) = like_operator(&pattern, *negated)?;
            Some(FilterCondition::new(&column, operator, Some(value)))
        }
        Expr::IsNull(inner) => {
            let column = parse::column_path(inner)?;
            Some(FilterCondition::new(&column, FilterOperator::IsNull, None))
        }
        Expr::IsNotNull(inner) => {
            let column = parse::column_path(inner)?;
            Some(FilterCondition::new(&column, FilterOperator::IsNotNull, None))
        }
        Expr::InList {
            expr,
            list,
            negated,
            ..
        } => {
            let column = parse::column_path(expr)?;
            let values = list
                .iter()
                .map(|item| parse::literal(item).flatten())
                .collect::<Option<Vec<_>>>()?;
            let kind = values.first().map_or(ValueKind::String, |v| v.kind);
            if values.iter().any(|v| v.kind != kind) {
                return None;
            }
            let operator = if *negated {
                FilterOperator::NotIn
            } else {
                FilterOperator::In
            };
            let values = values.into_iter().map(|v| v.text).collect();
            Some(FilterCondition::list(&column, operator, values).with_value_kind(kind))
        }
        Expr::Function(func) => function_condition(func),
        _ => None,
    }
}

fn comparison(op: &BinaryOperator) -> Option<FilterOperator> {
    match op {
        BinaryOperator::Eq => Some(FilterOperator::Eq),
        BinaryOperator::NotEq => Some(FilterOperator::NotEq),
        BinaryOperator::Lt => Some(FilterOperator::Lt),
        BinaryOperator::Gt => Some(FilterOperator::Gt),
        BinaryOperator::LtEq => Some(FilterOperator::LtEq),
        BinaryOperator::GtEq => Some(FilterOperator::GtEq),
        _ => None,
    }
}

/// Maps a LIKE pattern back onto the text operators. Patterns with
/// wildcards elsewhere than the ends stay raw.
fn like_operator(pattern: &str, negated: bool) -> Option<(FilterOperator, &str)> {
    let leading = pattern.starts_with('%');
    let body = pattern.strip_prefix('%').unwrap_or(pattern);
    let trailing = body.ends_with('%');
    let inner = body.strip_suffix('%').unwrap_or(body);

    if inner.contains(['%', '_']) {
        return None;
    }

    match (leading, trailing, negated) {
        (true, true, false) => Some((FilterOperator::Contains, inner)),
        (true, true, true) => Some((FilterOperator::NotContains, inner)),
        (false, true, false) => Some((FilterOperator::StartsWith, inner)),
        (true, false, false) => Some((FilterOperator::EndsWith, inner)),
        _ => None,
    }
}

fn function_condition(func: &sqlparser::ast::Function) -> Option<FilterCondition> {
    let name = parse::function_name(func);
    let args = parse::function_args(func);

    if name == FilterOperator::MatchAll.label() {
        let [Arg::Expr(value)] = args.as_slice() else {
            return None;
        };
        let value = parse::literal_text(value)?;
        return Some(FilterCondition::new("", FilterOperator::MatchAll, Some(&value)));
    }

    let operator = match name.as_str() {
        "re_match" => FilterOperator::ReMatch,
        "re_not_match" => FilterOperator::ReNotMatch,
        "str_match" => FilterOperator::StrMatch,
        "str_match_ignore_case" => FilterOperator::StrMatchIgnoreCase,
        _ => return None,
    };
    let [Arg::Expr(column), Arg::Expr(value)] = args.as_slice() else {
        return None;
    };
    let column = parse::column_path(column)?;
    let value = parse::literal_text(value)?;
    Some(FilterCondition::new(&column, operator, Some(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_expr;

    fn filters(sql: &str) -> FilterGroup {
        extract_filters(&parse_expr(sql).unwrap())
    }

    fn only_condition(group: &FilterGroup) -> &FilterCondition {
        match group.conditions.as_slice() {
            [FilterNode::Condition(c)] => c,
            other => panic!("expected a single condition, got {other:?}"),
        }
    }

    #[test]
    fn test_single_comparison() {
        let group = filters("level = 'ERROR'");
        let cond = only_condition(&group);
        assert_eq!(cond.column, "level");
        assert_eq!(cond.operator, FilterOperator::Eq);
        assert_eq!(cond.value.as_deref(), Some("ERROR"));
    }

    #[test]
    fn test_literal_kinds_are_recorded() {
        let group = filters("code >= 500 AND ok = true AND status = '200'");
        let kinds: Vec<_> = group
            .conditions
            .iter()
            .map(|node| match node {
                FilterNode::Condition(c) => (c.value.clone().unwrap_or_default(), c.value_kind),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("500".to_string(), ValueKind::Number),
                ("true".to_string(), ValueKind::Boolean),
                ("200".to_string(), ValueKind::String),
            ]
        );

        let group = filters("code IN (200, 404)");
        let cond = only_condition(&group);
        assert_eq!(cond.value_kind, ValueKind::Number);
        assert_eq!(cond.values, vec!["200".to_string(), "404".to_string()]);

        let group = filters("code IN (200, 'x')");
        assert!(matches!(group.conditions[0], FilterNode::Raw { .. }));
    }

    #[test]
    fn test_null_comparison_stays_raw() {
        let group = filters("level = NULL");
        assert!(matches!(group.conditions[0], FilterNode::Raw { .. }));
    }

    #[test]
    fn test_and_chain_is_flattened() {
        let group = filters("a = 1 AND b <> 'x' AND c >= 10");
        assert_eq!(group.logical_operator, LogicalOperator::And);
        assert_eq!(group.conditions.len(), 3);
        assert_eq!(group.leaf_count(), 3);
    }

    #[test]
    fn test_parenthesized_or_becomes_subgroup() {
        let group = filters("app = 'api' AND (level = 'ERROR' OR level = 'WARN')");
        assert_eq!(group.conditions.len(), 2);
        match &group.conditions[1] {
            FilterNode::Group(inner) => {
                assert_eq!(inner.logical_operator, LogicalOperator::Or);
                assert_eq!(inner.conditions.len(), 2);
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence_without_parentheses() {
        // AND binds tighter: (a AND b) OR c
        let group = filters("a = 1 AND b = 2 OR c = 3");
        assert_eq!(group.logical_operator, LogicalOperator::Or);
        assert!(matches!(group.conditions[0], FilterNode::Group(_)));
        assert!(matches!(group.conditions[1], FilterNode::Condition(_)));
    }

    #[test]
    fn test_like_variants() {
        let cases = [
            ("msg LIKE '%err%'", FilterOperator::Contains, "err"),
            ("msg NOT LIKE '%err%'", FilterOperator::NotContains, "err"),
            ("msg LIKE 'GET%'", FilterOperator::StartsWith, "GET"),
            ("msg LIKE '%.js'", FilterOperator::EndsWith, ".js"),
        ];
        for (sql, op, value) in cases {
            let group = filters(sql);
            let cond = only_condition(&group);
            assert_eq!(cond.operator, op, "{sql}");
            assert_eq!(cond.value.as_deref(), Some(value), "{sql}");
        }

        let group = filters("msg LIKE 'a%b'");
        assert!(matches!(group.conditions[0], FilterNode::Raw { .. }));
    }

    #[test]
    fn test_null_and_list_conditions() {
        let group = filters("trace_id IS NOT NULL AND level NOT IN ('DEBUG', 'TRACE')");
        match group.conditions.as_slice() {
            [FilterNode::Condition(a), FilterNode::Condition(b)] => {
                assert_eq!(a.operator, FilterOperator::IsNotNull);
                assert_eq!(b.operator, FilterOperator::NotIn);
                assert_eq!(b.values, vec!["DEBUG".to_string(), "TRACE".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_function_conditions() {
        let group = filters("str_match(log, 'timeout') AND match_all('panic')");
        match group.conditions.as_slice() {
            [FilterNode::Condition(a), FilterNode::Condition(b)] => {
                assert_eq!(a.operator, FilterOperator::StrMatch);
                assert_eq!(a.column, "log");
                assert_eq!(b.operator, FilterOperator::MatchAll);
                assert_eq!(b.value.as_deref(), Some("panic"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unrepresentable_predicates_stay_raw() {
        let group = filters("a + b > 3 AND level = 'ERROR'");
        match &group.conditions[0] {
            FilterNode::Raw { sql } => assert_eq!(sql, "a + b > 3"),
            other => panic!("expected raw, got {other:?}"),
        }
    }
}
