//! Renders panel builder state back into SQL.

use crate::{
    ast::{
        common::{OrderDir, TableRef},
        expr::{BinaryOperator, Expr, FunctionCall, Ident},
    },
    build::select::SelectBuilder,
    dialect::Dialect,
    render::{filter::group_expr, to_sql},
};
use panel_model::query::{field::ParsedField, join::JoinDescription, panel::PanelQuery};

const X_AXIS_PREFIX: &str = "x_axis_";
const Y_AXIS_PREFIX: &str = "y_axis_";
const BREAKDOWN_PREFIX: &str = "breakdown_";

/// Builds the SQL for a panel.
///
/// Custom queries are returned verbatim. Otherwise each field is aliased by
/// its role (`x_axis_1`, `y_axis_1`, `breakdown_1`, ...); when any y field
/// is present the x and breakdown aliases become the `GROUP BY` list and the
/// first x alias the ascending sort key.
pub fn render_panel_query(panel: &PanelQuery, dialect: &dyn Dialect) -> String {
    if panel.custom_query {
        return panel.raw_query.clone();
    }

    let mut columns = Vec::new();
    let mut group_keys = Vec::new();

    for (i, field) in panel.x_fields.iter().enumerate() {
        let alias = format!("{X_AXIS_PREFIX}{}", i + 1);
        columns.push(field_expr(field).alias(&alias));
        group_keys.push(alias_ref(&alias));
    }
    for (i, field) in panel.y_fields.iter().enumerate() {
        let alias = format!("{Y_AXIS_PREFIX}{}", i + 1);
        columns.push(field_expr(field).alias(&alias));
    }
    for (i, field) in panel.breakdown_fields.iter().enumerate() {
        let alias = format!("{BREAKDOWN_PREFIX}{}", i + 1);
        columns.push(field_expr(field).alias(&alias));
        group_keys.push(alias_ref(&alias));
    }

    let mut builder = SelectBuilder::new()
        .select(columns)
        .from(TableRef::new(&panel.stream), panel.stream_alias.as_deref());

    for join in &panel.joins {
        if let Some(on) = join_condition_expr(join) {
            builder = builder.join(
                join.join_type.into(),
                TableRef::new(&join.stream),
                join.stream_alias.as_deref(),
                on,
            );
        }
    }

    if let Some(condition) = group_expr(&panel.filters) {
        builder = builder.where_clause(condition);
    }

    if !panel.y_fields.is_empty() && !group_keys.is_empty() {
        builder = builder.group_by(group_keys);
        if !panel.x_fields.is_empty() {
            builder = builder.order_by(alias_ref(&format!("{X_AXIS_PREFIX}1")), Some(OrderDir::Asc));
        }
    }

    to_sql(&builder.build(), dialect)
}

/// The expression a field stands for, without its alias.
pub fn field_expr(field: &ParsedField) -> Expr {
    if let Some(raw) = &field.raw_query {
        return Expr::Raw(raw.clone());
    }

    let column = if field.column == "*" {
        None
    } else {
        Some(Expr::Identifier(Ident {
            qualifier: field.stream_alias.clone(),
            name: field.column.clone(),
        }))
    };

    let Some(aggregation) = field.aggregation.as_deref() else {
        return column.unwrap_or_else(|| Expr::Raw("*".into()));
    };

    let extra_args = field.args.iter().map(|arg| Expr::Raw(arg.clone()));
    let mut call = match aggregation {
        "count-distinct" => {
            let mut call = FunctionCall::new("count", column.into_iter().collect());
            call.distinct = true;
            call
        }
        "p50" | "p90" | "p95" | "p99" => {
            let fraction = format!("0.{}", &aggregation[1..]);
            FunctionCall::new(
                "approx_percentile_cont",
                column.into_iter().chain([Expr::Raw(fraction)]).collect(),
            )
        }
        name => FunctionCall::new(name, column.into_iter().chain(extra_args).collect()),
    };
    if field.column == "*" && call.args.is_empty() {
        call.wildcard = true;
    }
    Expr::FunctionCall(call)
}

fn alias_ref(alias: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: None,
        name: alias.to_string(),
    })
}

fn join_condition_expr(join: &JoinDescription) -> Option<Expr> {
    join.conditions
        .iter()
        .map(|cond| {
            Expr::binary(
                Expr::Identifier(Ident::parse(&cond.left_field)),
                BinaryOperator::Eq,
                Expr::Identifier(Ident::parse(&cond.right_field)),
            )
        })
        .reduce(|acc, next| Expr::binary(acc, BinaryOperator::And, next))
}
