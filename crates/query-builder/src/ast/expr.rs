//! Expression nodes for panel projections and predicates.

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column or table identifier, e.g., `level` or `a.level`.
    Identifier(Ident),

    /// A string literal, rendered single-quoted.
    Value(String),

    /// A binary operation, e.g., `level = 'ERROR'` or `a AND b`.
    BinaryOp(Box<BinaryOp>),

    /// A function call, e.g., `count(*)` or `re_match(log, 'err')`.
    FunctionCall(FunctionCall),

    /// An aliased expression, e.g. `count(*) AS "y_axis_1"`
    Alias { expr: Box<Expr>, alias: String },

    /// `expr [NOT] LIKE pattern`
    Like {
        expr: Box<Expr>,
        pattern: String,
        negated: bool,
    },

    /// `expr IS [NOT] NULL`
    IsNull { expr: Box<Expr>, negated: bool },

    /// `expr [NOT] IN ('a', 'b')`
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// A parenthesized expression.
    Nested(Box<Expr>),

    /// SQL text emitted verbatim.
    Raw(String),
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    pub fn nested(self) -> Self {
        match self {
            Expr::Nested(_) => self,
            other => Expr::Nested(Box::new(other)),
        }
    }

    pub fn alias(self, alias: &str) -> Self {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>, // e.g., the 'a' in 'a.level'
    pub name: String,              // e.g., the 'level' in 'a.level'
}

impl Ident {
    /// Splits a dotted column reference into qualifier and name.
    /// Only the last dot separates them, so `k8s.pod.name` keeps `k8s.pod`
    /// as the qualifier.
    pub fn parse(column: &str) -> Self {
        match column.rsplit_once('.') {
            Some((qualifier, name)) if !qualifier.is_empty() && !name.is_empty() => Self {
                qualifier: Some(qualifier.to_string()),
                name: name.to_string(),
            },
            _ => Self {
                qualifier: None,
                name: column.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub wildcard: bool, // represents the '*' in 'count(*)'
    pub distinct: bool,
}

impl FunctionCall {
    pub fn new(name: &str, args: Vec<Expr>) -> Self {
        Self {
            name: name.to_string(),
            args,
            wildcard: false,
            distinct: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,    // =
    NotEq, // <>
    Lt,    // <
    LtEq,  // <=
    Gt,    // >
    GtEq,  // >=

    // Logical
    And,
    Or,
}
