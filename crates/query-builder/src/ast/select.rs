//! The SELECT statement shape the panel renderer emits.

use crate::ast::{
    common::{JoinKind, OrderDir, TableRef},
    expr::Expr,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    /// The list of columns or expressions to be returned.
    /// e.g., `level`, `histogram(_timestamp) AS "x_axis_1"`
    pub columns: Vec<Expr>,

    /// The primary stream for the query.
    pub from: Option<FromClause>,

    pub joins: Vec<JoinClause>,

    pub where_clause: Option<Expr>,

    pub group_by: Vec<Expr>,

    pub order_by: Vec<OrderByExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub table: TableRef,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: TableRef,
    pub alias: Option<String>,
    /// The join condition, e.g., `ON a.trace_id = b.trace_id`.
    pub on: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Option<OrderDir>,
}
