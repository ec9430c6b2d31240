//! The decomposition of a SQL query into panel builder state.

use crate::query::{
    field::ParsedField,
    filter::{FilterGroup, FilterOperator},
    join::JoinDescription,
};
use serde::{Deserialize, Serialize};

/// Builder view of a single panel query.
///
/// When `custom_query` is set the field lists are not authoritative and the
/// panel must be edited as raw SQL (`raw_query`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelQuery {
    pub stream: String,
    /// Alias of the primary stream, referenced by join conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_alias: Option<String>,
    pub stream_type: String,
    pub x_fields: Vec<ParsedField>,
    pub y_fields: Vec<ParsedField>,
    pub breakdown_fields: Vec<ParsedField>,
    pub filters: FilterGroup,
    pub joins: Vec<JoinDescription>,
    pub custom_query: bool,
    pub raw_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    #[serde(default)]
    pub use_table_chart: bool,
}

impl PanelQuery {
    /// The safe default returned whenever a query cannot be decomposed.
    pub fn custom(raw_query: &str, stream_type: &str, parse_error: Option<String>) -> Self {
        Self {
            stream_type: stream_type.to_string(),
            custom_query: true,
            raw_query: raw_query.to_string(),
            parse_error,
            ..Default::default()
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &ParsedField> {
        self.x_fields
            .iter()
            .chain(self.y_fields.iter())
            .chain(self.breakdown_fields.iter())
    }
}

/// A label filter to inject into an existing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(alias = "name")]
    pub column: String,
    pub value: Option<String>,
    #[serde(default = "default_label_operator")]
    pub operator: FilterOperator,
}

fn default_label_operator() -> FilterOperator {
    FilterOperator::Eq
}

impl Label {
    pub fn new(column: &str, value: Option<&str>, operator: FilterOperator) -> Self {
        Self {
            column: column.to_string(),
            value: value.map(String::from),
            operator,
        }
    }

    pub fn equals(column: &str, value: &str) -> Self {
        Self::new(column, Some(value), FilterOperator::Eq)
    }
}

/// Verdict of the builder-compatibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parseability {
    pub is_parseable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Parseability {
    pub fn parseable() -> Self {
        Self {
            is_parseable: true,
            reason: None,
        }
    }

    pub fn rejected(reason: &str) -> Self {
        Self {
            is_parseable: false,
            reason: Some(reason.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_panel_defaults() {
        let panel = PanelQuery::custom("SELECT 1", "logs", Some("boom".into()));
        assert!(panel.custom_query);
        assert_eq!(panel.raw_query, "SELECT 1");
        assert!(panel.fields().next().is_none());
        assert!(panel.filters.is_empty());
    }

    #[test]
    fn test_label_deserializes_with_default_operator() {
        let label: Label = serde_json::from_str(r#"{"name": "level", "value": "ERROR"}"#).unwrap();
        assert_eq!(label, Label::equals("level", "ERROR"));
    }

    #[test]
    fn test_parseability_json_shape() {
        let json = serde_json::to_value(Parseability::rejected("Invalid query")).unwrap();
        assert_eq!(json["isParseable"], false);
        assert_eq!(json["reason"], "Invalid query");
    }
}
