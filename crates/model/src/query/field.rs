use serde::{Deserialize, Serialize};
use std::fmt;

/// A single projected column of a SELECT, as seen by the panel builder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedField {
    /// Source column, e.g. `_timestamp` in `histogram(_timestamp)`.
    pub column: String,

    /// Output name; falls back to the column when the query has no alias.
    pub alias: String,

    /// Lower-cased function name wrapping the column, if any.
    /// `COUNT(DISTINCT x)` is reported as `count-distinct`.
    pub aggregation: Option<String>,

    /// Extra function arguments rendered as SQL, e.g. the histogram interval.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Qualifier of the column, e.g. `a` in `a.level`.
    pub stream_alias: Option<String>,

    /// Verbatim SQL of the projection when it is not a plain column or
    /// a single-column function call.
    pub raw_query: Option<String>,
}

impl ParsedField {
    pub fn column(name: &str) -> Self {
        Self {
            column: name.to_string(),
            alias: name.to_string(),
            ..Default::default()
        }
    }

    pub fn aggregate(function: &str, column: &str, alias: &str) -> Self {
        Self {
            column: column.to_string(),
            alias: alias.to_string(),
            aggregation: Some(function.to_lowercase()),
            ..Default::default()
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_stream_alias(mut self, stream_alias: &str) -> Self {
        self.stream_alias = Some(stream_alias.to_string());
        self
    }
}

/// The chart axis a projected field is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisRole {
    X,
    Y,
    Breakdown,
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisRole::X => write!(f, "x"),
            AxisRole::Y => write!(f, "y"),
            AxisRole::Breakdown => write!(f, "breakdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_uses_name_as_alias() {
        let field = ParsedField::column("level");
        assert_eq!(field.alias, "level");
        assert_eq!(field.aggregation, None);
    }

    #[test]
    fn test_aggregate_lowercases_function() {
        let field = ParsedField::aggregate("COUNT", "level", "total");
        assert_eq!(field.aggregation.as_deref(), Some("count"));
        assert_eq!(field.alias, "total");
    }

    #[test]
    fn test_serializes_camel_case() {
        let field = ParsedField::column("level").with_stream_alias("a");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["streamAlias"], "a");
        assert!(json.get("args").is_none());
    }
}
