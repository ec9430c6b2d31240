//! Typestate builder for panel `Select` statements.
//!
//! A panel query always has a projection and a stream, so the builder only
//! exposes the optional clauses once both are set.

use crate::ast::{
    common::{JoinKind, OrderDir, TableRef},
    expr::Expr,
    select::{FromClause, JoinClause, OrderByExpr, Select},
};
use std::marker::PhantomData;

/// No clause set yet.
#[derive(Debug, Default, Clone)]
pub struct InitialState;

/// Projection set; a stream is required next.
#[derive(Debug, Default, Clone)]
pub struct SelectState;

/// Projection and stream set; joins, filters, grouping and ordering may follow.
#[derive(Debug, Default, Clone)]
pub struct FromState;

#[derive(Debug, Clone)]
pub struct SelectBuilder<State> {
    ast: Select,
    state: PhantomData<State>,
}

impl Default for SelectBuilder<InitialState> {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectBuilder<InitialState> {
    pub fn new() -> Self {
        Self {
            ast: Select::default(),
            state: PhantomData,
        }
    }

    /// Sets the projection. An empty list renders as `*`.
    pub fn select(self, columns: Vec<Expr>) -> SelectBuilder<SelectState> {
        let mut ast = self.ast;
        ast.columns = columns;
        SelectBuilder {
            ast,
            state: PhantomData,
        }
    }
}

impl SelectBuilder<SelectState> {
    pub fn from(self, stream: TableRef, alias: Option<&str>) -> SelectBuilder<FromState> {
        let mut ast = self.ast;
        ast.from = Some(FromClause {
            table: stream,
            alias: alias.map(String::from),
        });
        SelectBuilder {
            ast,
            state: PhantomData,
        }
    }
}

impl SelectBuilder<FromState> {
    pub fn join(mut self, kind: JoinKind, stream: TableRef, alias: Option<&str>, on: Expr) -> Self {
        self.ast.joins.push(JoinClause {
            kind,
            table: stream,
            alias: alias.map(String::from),
            on,
        });
        self
    }

    /// Replaces the filter predicate.
    pub fn where_clause(mut self, predicate: Expr) -> Self {
        self.ast.where_clause = Some(predicate);
        self
    }

    /// Appends grouping keys; repeated calls accumulate.
    pub fn group_by(mut self, keys: Vec<Expr>) -> Self {
        self.ast.group_by.extend(keys);
        self
    }

    pub fn order_by(mut self, expr: Expr, direction: Option<OrderDir>) -> Self {
        self.ast.order_by.push(OrderByExpr { expr, direction });
        self
    }

    pub fn build(self) -> Select {
        self.ast
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{
            common::{JoinKind, OrderDir, TableRef},
            expr::{BinaryOperator, Expr, Ident},
        },
        build::select::SelectBuilder,
    };

    fn col(name: &str) -> Expr {
        Expr::Identifier(Ident::parse(name))
    }

    #[test]
    fn test_projection_and_stream() {
        let ast = SelectBuilder::new()
            .select(vec![col("level"), col("message")])
            .from(TableRef::new("logs"), None)
            .build();

        assert_eq!(ast.columns, vec![col("level"), col("message")]);
        assert_eq!(ast.from.unwrap().table.name, "logs");
        assert!(ast.where_clause.is_none());
    }

    #[test]
    fn test_filtered_select_with_alias() {
        let ast = SelectBuilder::new()
            .select(vec![col("message")])
            .from(TableRef::new("logs"), Some("l"))
            .where_clause(Expr::binary(
                col("l.level"),
                BinaryOperator::Eq,
                Expr::Value("ERROR".into()),
            ))
            .build();

        assert_eq!(ast.from.unwrap().alias, Some("l".to_string()));
        assert!(matches!(ast.where_clause, Some(Expr::BinaryOp(_))));
    }

    #[test]
    fn test_join_grouping_and_ordering() {
        let ast = SelectBuilder::new()
            .select(vec![col("a.service"), col("b.level")])
            .from(TableRef::new("traces"), Some("a"))
            .join(
                JoinKind::Left,
                TableRef::new("logs"),
                Some("b"),
                Expr::binary(
                    col("a.trace_id"),
                    BinaryOperator::Eq,
                    col("b.trace_id"),
                ),
            )
            .group_by(vec![col("x_axis_1")])
            .order_by(col("x_axis_1"), Some(OrderDir::Asc))
            .build();

        assert_eq!(ast.joins.len(), 1);
        assert_eq!(ast.group_by, vec![col("x_axis_1")]);
        assert_eq!(ast.order_by[0].direction, Some(OrderDir::Asc));
    }
}
