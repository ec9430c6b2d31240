//! Resolves the primary stream (table) a query reads from.

use crate::parse;
use sqlparser::ast::{Cte, Query, SetExpr, TableFactor};
use tracing::warn;

pub const DEFAULT_MAX_RESOLVE_DEPTH: usize = 10;

/// Walks the FROM clause of a query down to its first plain table.
///
/// CTE names are looked through to the CTE body, and derived tables,
/// nested join groupings, parenthesized queries and the left arm of set
/// operations are descended into. The walk is bounded by `max_depth`; when
/// the bound is hit (a self-referencing CTE, or absurd nesting) a warning is
/// logged and the deepest name seen so far is returned. This is a heuristic:
/// it does not prove the name is the table the rows come from.
#[derive(Debug, Clone, Copy)]
pub struct StreamResolver {
    max_depth: usize,
}

impl Default for StreamResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESOLVE_DEPTH)
    }
}

impl StreamResolver {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Parses `sql` and resolves its stream. Unparseable input yields `None`.
    pub fn stream_name(&self, sql: &str) -> Option<String> {
        let query = parse::parse_query(sql).ok()?;
        self.resolve(&query)
    }

    pub fn resolve(&self, query: &Query) -> Option<String> {
        let mut scope = Vec::new();
        self.query(query, &mut scope, 0)
    }

    fn query<'a>(&self, query: &'a Query, scope: &mut Vec<&'a Cte>, depth: usize) -> Option<String> {
        if depth > self.max_depth {
            warn!(
                max_depth = self.max_depth,
                "Stream resolution hit the depth limit; returning best-effort name"
            );
            return None;
        }

        let outer = scope.len();
        if let Some(with) = &query.with {
            scope.extend(with.cte_tables.iter());
        }

        let found = self.body(&query.body, scope, depth + 1);
        scope.truncate(outer);
        found
    }

    fn body<'a>(&self, body: &'a SetExpr, scope: &mut Vec<&'a Cte>, depth: usize) -> Option<String> {
        match body {
            SetExpr::Select(select) => {
                let from = select.from.first()?;
                self.relation(&from.relation, scope, depth)
            }
            SetExpr::Query(inner) => self.query(inner, scope, depth),
            SetExpr::SetOperation { left, .. } => self.body(left, scope, depth),
            _ => None,
        }
    }

    fn relation<'a>(
        &self,
        factor: &'a TableFactor,
        scope: &mut Vec<&'a Cte>,
        depth: usize,
    ) -> Option<String> {
        match factor {
            TableFactor::Table { name, .. } => {
                let table = parse::object_name(name);
                // Innermost definition wins when CTE names shadow each other.
                let cte = scope
                    .iter()
                    .rev()
                    .find(|cte| parse::ident_name(&cte.alias.name) == table)
                    .copied();

                match cte {
                    Some(cte) => self.query(&cte.query, scope, depth + 1).or(Some(table)),
                    None => Some(table),
                }
            }
            TableFactor::Derived { subquery, .. } => self.query(subquery, scope, depth + 1),
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.relation(&table_with_joins.relation, scope, depth + 1),
            _ => None,
        }
    }
}
