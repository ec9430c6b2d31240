use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Operators offered by the filter editor.
///
/// The serialized form is the label shown to the user, so `Contains`
/// round-trips as `"Contains"` and inequality as `"<>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>")]
    NotEq,
    #[serde(rename = "!=")]
    BangEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "Contains")]
    Contains,
    #[serde(rename = "Not Contains")]
    NotContains,
    #[serde(rename = "Starts With")]
    StartsWith,
    #[serde(rename = "Ends With")]
    EndsWith,
    #[serde(rename = "Is Null")]
    IsNull,
    #[serde(rename = "Is Not Null")]
    IsNotNull,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "re_match")]
    ReMatch,
    #[serde(rename = "re_not_match")]
    ReNotMatch,
    #[serde(rename = "str_match")]
    StrMatch,
    #[serde(rename = "str_match_ignore_case")]
    StrMatchIgnoreCase,
    #[serde(rename = "match_all")]
    MatchAll,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 20] = [
        FilterOperator::Eq,
        FilterOperator::NotEq,
        FilterOperator::BangEq,
        FilterOperator::Lt,
        FilterOperator::Gt,
        FilterOperator::LtEq,
        FilterOperator::GtEq,
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::IsNull,
        FilterOperator::IsNotNull,
        FilterOperator::In,
        FilterOperator::NotIn,
        FilterOperator::ReMatch,
        FilterOperator::ReNotMatch,
        FilterOperator::StrMatch,
        FilterOperator::StrMatchIgnoreCase,
        FilterOperator::MatchAll,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::NotEq => "<>",
            FilterOperator::BangEq => "!=",
            FilterOperator::Lt => "<",
            FilterOperator::Gt => ">",
            FilterOperator::LtEq => "<=",
            FilterOperator::GtEq => ">=",
            FilterOperator::Contains => "Contains",
            FilterOperator::NotContains => "Not Contains",
            FilterOperator::StartsWith => "Starts With",
            FilterOperator::EndsWith => "Ends With",
            FilterOperator::IsNull => "Is Null",
            FilterOperator::IsNotNull => "Is Not Null",
            FilterOperator::In => "IN",
            FilterOperator::NotIn => "NOT IN",
            FilterOperator::ReMatch => "re_match",
            FilterOperator::ReNotMatch => "re_not_match",
            FilterOperator::StrMatch => "str_match",
            FilterOperator::StrMatchIgnoreCase => "str_match_ignore_case",
            FilterOperator::MatchAll => "match_all",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FilterOperator::ALL
            .iter()
            .find(|op| op.label().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| ModelError::UnknownOperator(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "AND"),
            LogicalOperator::Or => write!(f, "OR"),
        }
    }
}

/// How a condition value is written in SQL. Only strings are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    String,
    Number,
    Boolean,
}

impl ValueKind {
    pub fn is_string(&self) -> bool {
        matches!(self, ValueKind::String)
    }
}

/// A single `column <operator> value` predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub column: String,
    pub operator: FilterOperator,
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Applies to `value` and every entry of `values`.
    #[serde(default, skip_serializing_if = "ValueKind::is_string")]
    pub value_kind: ValueKind,
    /// Connective joining this condition to its previous sibling.
    #[serde(default)]
    pub logical_operator: LogicalOperator,
}

impl FilterCondition {
    pub fn new(column: &str, operator: FilterOperator, value: Option<&str>) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: value.map(String::from),
            values: Vec::new(),
            value_kind: ValueKind::String,
            logical_operator: LogicalOperator::And,
        }
    }

    pub fn list(column: &str, operator: FilterOperator, values: Vec<String>) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: None,
            values,
            value_kind: ValueKind::String,
            logical_operator: LogicalOperator::And,
        }
    }

    pub fn with_value_kind(mut self, kind: ValueKind) -> Self {
        self.value_kind = kind;
        self
    }

    pub fn with_logical_operator(mut self, op: LogicalOperator) -> Self {
        self.logical_operator = op;
        self
    }
}

/// A node of the filter tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filterType", rename_all = "camelCase")]
pub enum FilterNode {
    Condition(FilterCondition),
    Group(FilterGroup),
    /// A predicate the builder cannot edit, kept as SQL text.
    Raw { sql: String },
}

/// A parenthesized list of filter nodes joined by one connective.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    pub logical_operator: LogicalOperator,
    pub conditions: Vec<FilterNode>,
}

impl FilterGroup {
    pub fn new(logical_operator: LogicalOperator) -> Self {
        Self {
            logical_operator,
            conditions: Vec::new(),
        }
    }

    pub fn push(&mut self, node: FilterNode) {
        self.conditions.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Total number of leaf predicates in the tree.
    pub fn leaf_count(&self) -> usize {
        self.conditions
            .iter()
            .map(|node| match node {
                FilterNode::Group(group) => group.leaf_count(),
                FilterNode::Condition(_) | FilterNode::Raw { .. } => 1,
            })
            .sum()
    }
}
