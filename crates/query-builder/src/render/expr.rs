use crate::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, FunctionCall, Ident},
    render::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Value(val) => r.push_literal(val),
            Expr::BinaryOp(op) => op.render(r),
            Expr::FunctionCall(func) => func.render(r),
            Expr::Alias { expr, alias } => {
                expr.render(r);
                r.sql.push_str(" AS ");
                r.sql.push_str(&r.dialect.quote_identifier(alias));
            }
            Expr::Like {
                expr,
                pattern,
                negated,
            } => {
                expr.render(r);
                r.sql
                    .push_str(if *negated { " NOT LIKE " } else { " LIKE " });
                r.push_literal(pattern);
            }
            Expr::IsNull { expr, negated } => {
                expr.render(r);
                r.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                expr.render(r);
                r.sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        r.sql.push_str(", ");
                    }
                    item.render(r);
                }
                r.sql.push(')');
            }
            Expr::Nested(inner) => {
                r.sql.push('(');
                inner.render(r);
                r.sql.push(')');
            }
            Expr::Raw(sql) => r.sql.push_str(sql),
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.sql
                .push_str(&r.dialect.quote_identifier_if_needed(qualifier));
            r.sql.push('.');
        }
        r.sql
            .push_str(&r.dialect.quote_identifier_if_needed(&self.name));
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        // Precedence is the caller's job: wrap operands in `Expr::Nested`
        // where grouping matters.
        self.left.render(r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::NotEq => " <> ",
            BinaryOperator::Lt => " < ",
            BinaryOperator::LtEq => " <= ",
            BinaryOperator::Gt => " > ",
            BinaryOperator::GtEq => " >= ",
            BinaryOperator::And => " AND ",
            BinaryOperator::Or => " OR ",
        };
        r.sql.push_str(op_str);

        self.right.render(r);
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&self.name);
        r.sql.push('(');
        if self.wildcard {
            r.sql.push('*');
        } else {
            if self.distinct {
                r.sql.push_str("DISTINCT ");
            }
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                arg.render(r);
            }
        }
        r.sql.push(')');
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::expr::{BinaryOperator, Expr, FunctionCall, Ident},
        dialect::Generic,
        render::to_sql,
    };

    fn ident(name: &str) -> Expr {
        Expr::Identifier(Ident {
            qualifier: None,
            name: name.to_string(),
        })
    }

    #[test]
    fn test_render_comparison() {
        let expr = Expr::binary(
            ident("level"),
            BinaryOperator::Eq,
            Expr::Value("ERROR".into()),
        );
        assert_eq!(to_sql(&expr, &Generic), "level = 'ERROR'");
    }

    #[test]
    fn test_render_quotes_odd_identifiers() {
        let expr = Expr::Identifier(Ident::parse("k8s-app.pod name"));
        assert_eq!(to_sql(&expr, &Generic), r#""k8s-app"."pod name""#);
    }

    #[test]
    fn test_render_in_list() {
        let expr = Expr::InList {
            expr: Box::new(ident("code")),
            list: vec![Expr::Raw("200".into()), Expr::Value("it's".into())],
            negated: true,
        };
        assert_eq!(to_sql(&expr, &Generic), "code NOT IN (200, 'it''s')");
    }

    #[test]
    fn test_render_quotes_reserved_columns() {
        let expr = Expr::binary(
            Expr::Identifier(Ident::parse("a.order")),
            BinaryOperator::Eq,
            Expr::Value("x".into()),
        );
        assert_eq!(to_sql(&expr, &Generic), r#"a."order" = 'x'"#);
    }

    #[test]
    fn test_render_distinct_function() {
        let mut func = FunctionCall::new("count", vec![ident("user_id")]);
        func.distinct = true;
        let expr = Expr::FunctionCall(func).alias("y_axis_1");
        assert_eq!(
            to_sql(&expr, &Generic),
            r#"count(DISTINCT user_id) AS "y_axis_1""#
        );
    }

    #[test]
    fn test_render_wildcard_function() {
        let mut func = FunctionCall::new("count", vec![]);
        func.wildcard = true;
        assert_eq!(to_sql(&Expr::FunctionCall(func), &Generic), "count(*)");
    }
}
