//! Assigns projected fields to chart axes.

use panel_model::query::field::{AxisRole, ParsedField};
use serde::Serialize;

/// Time-bucketing functions; fields wrapped in these become x-axis fields.
pub const X_AXIS_FUNCTIONS: &[&str] = &["histogram", "date_bin", "date_trunc", "time_bucket"];

/// Aggregations; fields wrapped in these become y-axis fields.
pub const Y_AXIS_FUNCTIONS: &[&str] = &[
    "count",
    "count-distinct",
    "sum",
    "avg",
    "min",
    "max",
    "median",
    "approx_distinct",
    "approx_median",
    "approx_percentile_cont",
    "percentile",
    "p50",
    "p90",
    "p95",
    "p99",
    "stddev",
    "stddev_pop",
    "stddev_samp",
    "variance",
    "var_pop",
    "var_samp",
];

pub const DEFAULT_MAX_CHART_DIMENSIONS: usize = 2;

/// Role of a single field. Unknown function names fall back to breakdown.
pub fn classify_field(field: &ParsedField) -> AxisRole {
    match field.aggregation.as_deref() {
        Some(name) if X_AXIS_FUNCTIONS.contains(&name) => AxisRole::X,
        Some(name) if Y_AXIS_FUNCTIONS.contains(&name) => AxisRole::Y,
        _ => AxisRole::Breakdown,
    }
}

/// Fields split by role, after the chart policy has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisAssignment {
    pub x: Vec<ParsedField>,
    pub y: Vec<ParsedField>,
    pub breakdown: Vec<ParsedField>,
    pub use_table_chart: bool,
}

impl AxisAssignment {
    pub fn grouping_count(&self) -> usize {
        self.x.len() + self.breakdown.len()
    }
}

/// Splits fields into x, y and breakdown lists, preserving input order.
///
/// Then, in order:
/// - with no x field, the first breakdown field is promoted to x;
/// - with more than `max_chart_dimensions` grouping fields (x + breakdown),
///   all of them move onto x and `use_table_chart` is set, since the chart
///   types cannot draw more dimensions than that.
pub fn classify_fields(fields: Vec<ParsedField>, max_chart_dimensions: usize) -> AxisAssignment {
    let mut axes = AxisAssignment::default();

    for field in fields {
        match classify_field(&field) {
            AxisRole::X => axes.x.push(field),
            AxisRole::Y => axes.y.push(field),
            AxisRole::Breakdown => axes.breakdown.push(field),
        }
    }

    if axes.x.is_empty() && !axes.breakdown.is_empty() {
        let promoted = axes.breakdown.remove(0);
        axes.x.push(promoted);
    }

    if axes.grouping_count() > max_chart_dimensions {
        let breakdown = std::mem::take(&mut axes.breakdown);
        axes.x.extend(breakdown);
        axes.use_table_chart = true;
    }

    axes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(function: &str, column: &str) -> ParsedField {
        ParsedField::aggregate(function, column, column)
    }

    #[test]
    fn test_classify_single_fields() {
        assert_eq!(classify_field(&agg("histogram", "_timestamp")), AxisRole::X);
        assert_eq!(classify_field(&agg("date_trunc", "_timestamp")), AxisRole::X);
        assert_eq!(classify_field(&agg("count", "*")), AxisRole::Y);
        assert_eq!(classify_field(&agg("count-distinct", "user")), AxisRole::Y);
        assert_eq!(classify_field(&agg("approx_percentile_cont", "took")), AxisRole::Y);
        assert_eq!(classify_field(&ParsedField::column("level")), AxisRole::Breakdown);
        assert_eq!(classify_field(&agg("lower", "level")), AxisRole::Breakdown);
    }

    #[test]
    fn test_time_series_with_breakdown() {
        let axes = classify_fields(
            vec![
                agg("histogram", "_timestamp"),
                agg("count", "*"),
                ParsedField::column("level"),
            ],
            DEFAULT_MAX_CHART_DIMENSIONS,
        );

        assert_eq!(axes.x.len(), 1);
        assert_eq!(axes.y.len(), 1);
        assert_eq!(axes.breakdown, vec![ParsedField::column("level")]);
        assert!(!axes.use_table_chart);
    }

    #[test]
    fn test_first_breakdown_is_promoted_when_x_is_empty() {
        let axes = classify_fields(
            vec![
                ParsedField::column("service"),
                agg("count", "*"),
                ParsedField::column("level"),
            ],
            DEFAULT_MAX_CHART_DIMENSIONS,
        );

        assert_eq!(axes.x, vec![ParsedField::column("service")]);
        assert_eq!(axes.breakdown, vec![ParsedField::column("level")]);
        assert!(!axes.use_table_chart);
    }

    #[test]
    fn test_too_many_dimensions_flatten_onto_x() {
        let axes = classify_fields(
            vec![
                agg("histogram", "_timestamp"),
                ParsedField::column("service"),
                agg("sum", "bytes"),
                ParsedField::column("level"),
            ],
            DEFAULT_MAX_CHART_DIMENSIONS,
        );

        let x: Vec<_> = axes.x.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(x, vec!["_timestamp", "service", "level"]);
        assert!(axes.breakdown.is_empty());
        assert_eq!(axes.y.len(), 1);
        assert!(axes.use_table_chart);
    }

    #[test]
    fn test_every_field_lands_in_exactly_one_list() {
        let fields = vec![
            agg("histogram", "_timestamp"),
            agg("avg", "took"),
            agg("whatever", "x"),
            ParsedField::column("a"),
            ParsedField::column("b"),
            agg("max", "code"),
        ];

        let axes = classify_fields(fields.clone(), DEFAULT_MAX_CHART_DIMENSIONS);
        assert_eq!(axes.x.len() + axes.y.len() + axes.breakdown.len(), fields.len());
        for field in &fields {
            let hits = [&axes.x, &axes.y, &axes.breakdown]
                .iter()
                .filter(|list| list.contains(field))
                .count();
            assert_eq!(hits, 1, "{field:?}");
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        let fields = vec![
            ParsedField::column("service"),
            agg("count", "*"),
            ParsedField::column("level"),
            ParsedField::column("host"),
        ];

        let first = classify_fields(fields.clone(), DEFAULT_MAX_CHART_DIMENSIONS);
        let second = classify_fields(fields, DEFAULT_MAX_CHART_DIMENSIONS);
        assert_eq!(first, second);

        for field in first.y.iter() {
            assert_eq!(classify_field(field), AxisRole::Y);
        }
    }
}
