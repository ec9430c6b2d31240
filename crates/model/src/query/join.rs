use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
            JoinType::Right => write!(f, "right"),
            JoinType::Full => write!(f, "full"),
        }
    }
}

/// Equality between two qualified fields, e.g. `a.trace_id = b.trace_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCondition {
    pub left_field: String,
    pub operation: String,
    pub right_field: String,
}

impl JoinCondition {
    pub fn equality(left_field: &str, right_field: &str) -> Self {
        Self {
            left_field: left_field.to_string(),
            operation: "=".to_string(),
            right_field: right_field.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDescription {
    pub stream: String,
    pub stream_alias: Option<String>,
    pub join_type: JoinType,
    pub conditions: Vec<JoinCondition>,
}
