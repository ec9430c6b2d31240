use crate::{
    ast::{
        common::{JoinKind, OrderDir, TableRef},
        select::{FromClause, JoinClause, OrderByExpr, Select},
    },
    render::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        if self.columns.is_empty() {
            r.sql.push('*');
        }
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        // 3. JOIN
        for join in &self.joins {
            r.sql.push(' ');
            join.render(r);
        }

        // 4. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }

        // 5. GROUP BY
        if !self.group_by.is_empty() {
            r.sql.push_str(" GROUP BY ");
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                expr.render(r);
            }
        }

        // 6. ORDER BY
        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                order.render(r);
            }
        }
    }
}

impl Render for TableRef {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        self.table.render(r);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier_if_needed(alias));
        }
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        let join_str = match self.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
        };
        r.sql.push_str(&format!("{join_str} "));
        self.table.render(r);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier_if_needed(alias));
        }
        r.sql.push_str(" ON ");
        self.on.render(r);
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        if let Some(dir) = &self.direction {
            let dir_str = match dir {
                OrderDir::Asc => "ASC",
                OrderDir::Desc => "DESC",
            };
            r.sql.push(' ');
            r.sql.push_str(dir_str);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{
            common::{JoinKind, OrderDir, TableRef},
            expr::{BinaryOperator, Expr, FunctionCall, Ident},
            select::{FromClause, JoinClause, OrderByExpr, Select},
        },
        dialect::Generic,
        render::to_sql,
    };

    fn col(name: &str) -> Expr {
        Expr::Identifier(Ident::parse(name))
    }

    #[test]
    fn test_simple_select() {
        let ast = Select {
            columns: vec![Expr::Raw("level".into()), Expr::Raw("message".into())],
            from: Some(FromClause {
                table: TableRef::new("logs"),
                alias: None,
            }),
            ..Default::default()
        };

        assert_eq!(to_sql(&ast, &Generic), r#"SELECT level, message FROM "logs""#);
    }

    #[test]
    fn test_empty_projection_selects_everything() {
        let ast = Select {
            from: Some(FromClause {
                table: TableRef::new("logs"),
                alias: None,
            }),
            ..Default::default()
        };

        assert_eq!(to_sql(&ast, &Generic), r#"SELECT * FROM "logs""#);
    }

    #[test]
    fn test_complex_select() {
        let ast = Select {
            columns: vec![
                col("a.service"),
                Expr::FunctionCall(FunctionCall::new("count", vec![col("b.id")]))
                    .alias("y_axis_1"),
            ],
            from: Some(FromClause {
                table: TableRef::new("traces"),
                alias: Some("a".to_string()),
            }),
            joins: vec![JoinClause {
                kind: JoinKind::Left,
                table: TableRef::new("logs"),
                alias: Some("b".to_string()),
                on: Expr::binary(
                    col("a.trace_id"),
                    BinaryOperator::Eq,
                    col("b.trace_id"),
                ),
            }],
            where_clause: Some(Expr::binary(
                col("a.status"),
                BinaryOperator::NotEq,
                Expr::Value("ok".into()),
            )),
            group_by: vec![col("a.service")],
            order_by: vec![OrderByExpr {
                expr: Expr::Raw("y_axis_1".into()),
                direction: Some(OrderDir::Desc),
            }],
        };

        let expected_sql = r#"SELECT a.service, count(b.id) AS "y_axis_1" FROM "traces" AS a LEFT JOIN "logs" AS b ON a.trace_id = b.trace_id WHERE a.status <> 'ok' GROUP BY a.service ORDER BY y_axis_1 DESC"#;
        assert_eq!(to_sql(&ast, &Generic), expected_sql);
    }
}
