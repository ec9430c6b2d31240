//! Table references, join kinds and sort directions.

use panel_model::query::join::JoinType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
}

impl TableRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl From<JoinType> for JoinKind {
    fn from(join_type: JoinType) -> Self {
        match join_type {
            JoinType::Inner => JoinKind::Inner,
            JoinType::Left => JoinKind::Left,
            JoinType::Right => JoinKind::Right,
            JoinType::Full => JoinKind::Full,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}
