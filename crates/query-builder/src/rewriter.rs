//! Text-level rewrites of panel queries.
//!
//! Every rewrite parses the whole query first and serializes it back only
//! on success, so a failed rewrite never yields a half-edited query.

use crate::{
    ast::{common::TableRef, expr::Expr},
    build::select::SelectBuilder,
    dialect::{Dialect, Generic},
    error::BuilderError,
    parse::{self, Arg},
    render::{filter::condition_sql, to_sql},
};
use panel_model::query::{filter::FilterCondition, panel::Label};
use sqlparser::ast::{Expr as SqlExpr, SelectItem};
use tracing::{debug, warn};

/// ANDs the label conditions into the WHERE clause of the first SELECT.
///
/// Without a WHERE clause the labels become the clause; otherwise the
/// result is `(existing) AND (labels)`. Labels that constrain nothing, such
/// as an `IN` label without values, are skipped.
pub fn add_labels(sql: &str, labels: &[Label]) -> Result<String, BuilderError> {
    let mut query = parse::parse_query(sql)?;

    let fragments = labels
        .iter()
        .filter_map(|label| {
            let fragment = label_sql(label, &Generic);
            if fragment.is_none() {
                warn!(
                    column = %label.column,
                    operator = %label.operator,
                    "Skipping label without values"
                );
            }
            fragment
        })
        .collect::<Vec<_>>();
    if fragments.is_empty() {
        return Ok(sql.to_string());
    }
    let labels_sql = fragments.join(" AND ");

    let select = parse::first_select_mut(&mut query).ok_or_else(|| {
        BuilderError::UnsupportedQuery("no SELECT body to attach labels to".to_string())
    })?;

    let combined = match select.selection.take() {
        None => labels_sql,
        Some(existing) => format!(
            "{} AND {}",
            parenthesize(&existing),
            parenthesize_text(&labels_sql)
        ),
    };
    select.selection = Some(parse::parse_expr(&combined)?);

    debug!(labels = fragments.len(), "Injected label filters");
    Ok(query.to_string())
}

/// Like [`add_labels`], but returns the input unchanged when the query
/// cannot be rewritten.
pub fn add_labels_or_original(sql: &str, labels: &[Label]) -> String {
    match add_labels(sql, labels) {
        Ok(rewritten) => rewritten,
        Err(err) => {
            warn!(error = %err, "Failed to add labels; keeping the original query");
            sql.to_string()
        }
    }
}

/// The SQL fragment for one label, e.g. `level = 'ERROR'`. Label values
/// are always quoted as strings.
pub fn label_sql(label: &Label, dialect: &dyn Dialect) -> Option<String> {
    let condition = FilterCondition::new(&label.column, label.operator, label.value.as_deref());
    condition_sql(&condition, dialect)
}

/// Formats a scalar as a SQL string literal, doubling embedded quotes.
/// `null` has no literal form.
pub fn format_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(Generic.quote_literal(s)),
        other => Some(Generic.quote_literal(&other.to_string())),
    }
}

/// `SELECT <fields> FROM "<table>"`, plus `WHERE <clause>` when the clause
/// is not blank. Fields and the clause are emitted as given.
pub fn build_sql_query<S: AsRef<str>>(table: &str, fields: &[S], where_clause: &str) -> String {
    let columns = fields
        .iter()
        .map(|field| Expr::Raw(field.as_ref().to_string()))
        .collect();

    let mut builder = SelectBuilder::new().select(columns).from(TableRef::new(table), None);
    if !where_clause.trim().is_empty() {
        builder = builder.where_clause(Expr::Raw(where_clause.trim().to_string()));
    }

    to_sql(&builder.build(), &Generic)
}

/// Sets the bucket interval of every `histogram()` call in the projection.
/// `None` drops the interval argument, leaving the engine's automatic one.
pub fn change_histogram_interval(sql: &str, interval: Option<&str>) -> Result<String, BuilderError> {
    let mut query = parse::parse_query(sql)?;
    let select = parse::first_select_mut(&mut query).ok_or_else(|| {
        BuilderError::UnsupportedQuery("no SELECT body to rewrite".to_string())
    })?;

    let mut changed = 0;
    for item in select.projection.iter_mut() {
        let expr = match item {
            SelectItem::UnnamedExpr(expr) => expr,
            SelectItem::ExprWithAlias { expr, .. } => expr,
            _ => continue,
        };
        if let Some(rewritten) = histogram_with_interval(expr, interval)? {
            *expr = rewritten;
            changed += 1;
        }
    }

    debug!(changed, interval, "Rewrote histogram intervals");
    Ok(query.to_string())
}

fn histogram_with_interval(
    expr: &SqlExpr,
    interval: Option<&str>,
) -> Result<Option<SqlExpr>, BuilderError> {
    let SqlExpr::Function(func) = expr else {
        return Ok(None);
    };
    if parse::function_name(func) != "histogram" {
        return Ok(None);
    }
    let Some(Arg::Expr(column)) = parse::function_args(func).first().copied() else {
        return Ok(None);
    };

    let call = match interval.map(str::trim).filter(|i| !i.is_empty()) {
        Some(interval) => format!(
            "{}({column}, {})",
            func.name,
            Generic.quote_literal(interval)
        ),
        None => format!("{}({column})", func.name),
    };
    parse::parse_expr(&call).map(Some)
}

/// Single-line canonical form of a query.
pub fn normalize_query(sql: &str) -> Result<String, BuilderError> {
    Ok(parse::parse_query(sql)?.to_string())
}

fn parenthesize(expr: &SqlExpr) -> String {
    match expr {
        SqlExpr::Nested(_) => expr.to_string(),
        other => format!("({other})"),
    }
}

fn parenthesize_text(sql: &str) -> String {
    format!("({sql})")
}
