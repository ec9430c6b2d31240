use crate::parse;
use panel_model::query::join::{JoinCondition, JoinDescription, JoinType};
use sqlparser::ast::{
    BinaryOperator, Expr, Join, JoinConstraint, JoinOperator, Select, TableFactor,
};
use tracing::debug;

/// Name and alias of the first FROM relation, when it is a plain table.
pub fn primary_table(select: &Select) -> Option<(String, Option<String>)> {
    let from = select.from.first()?;
    table_name(&from.relation)
}

/// Joins attached to the first FROM relation. Joins onto anything but a
/// plain table are skipped.
pub fn extract_joins(select: &Select) -> Vec<JoinDescription> {
    let Some(from) = select.from.first() else {
        return Vec::new();
    };

    from.joins.iter().filter_map(describe_join).collect()
}

fn table_name(factor: &TableFactor) -> Option<(String, Option<String>)> {
    match factor {
        TableFactor::Table { name, alias, .. } => Some((
            parse::object_name(name),
            alias.as_ref().map(|a| parse::ident_name(&a.name)),
        )),
        _ => None,
    }
}

fn describe_join(join: &Join) -> Option<JoinDescription> {
    let Some((stream, stream_alias)) = table_name(&join.relation) else {
        debug!(relation = %join.relation, "Skipping join onto a non-table relation");
        return None;
    };

    let (join_type, constraint) = join_kind(&join.join_operator);
    let conditions = match constraint {
        Some(JoinConstraint::On(expr)) => on_conditions(expr),
        _ => Vec::new(),
    };

    Some(JoinDescription {
        stream,
        stream_alias,
        join_type,
        conditions,
    })
}

fn join_kind(op: &JoinOperator) -> (JoinType, Option<&JoinConstraint>) {
    match op {
        JoinOperator::Join(c) | JoinOperator::Inner(c) => (JoinType::Inner, Some(c)),
        JoinOperator::Left(c) | JoinOperator::LeftOuter(c) => (JoinType::Left, Some(c)),
        JoinOperator::Right(c) | JoinOperator::RightOuter(c) => (JoinType::Right, Some(c)),
        JoinOperator::FullOuter(c) => (JoinType::Full, Some(c)),
        _ => (JoinType::Inner, None),
    }
}

/// Splits `a.x = b.y AND a.z = b.w` into equality conditions. Terms that
/// are not column equalities are dropped.
fn on_conditions(expr: &Expr) -> Vec<JoinCondition> {
    match expr {
        Expr::Nested(inner) => on_conditions(inner),
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            let mut out = on_conditions(left);
            out.extend(on_conditions(right));
            out
        }
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Eq,
            right,
        } => match (parse::column_path(left), parse::column_path(right)) {
            (Some(l), Some(r)) => vec![JoinCondition::equality(&l, &r)],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
