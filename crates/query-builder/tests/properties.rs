use panel_model::query::{
    field::ParsedField,
    filter::{FilterCondition, FilterGroup, FilterNode, FilterOperator, LogicalOperator},
    panel::{Label, PanelQuery},
};
use panel_sql::{
    Classifier, ClassifierMode, Decomposer, StreamResolver, add_labels, add_labels_or_original,
    build_sql_query,
    classifier::INVALID_QUERY,
    dialect::Generic,
    fields::{DEFAULT_MAX_CHART_DIMENSIONS, classify_fields},
    format_value, render_panel_query,
};
use serde_json::json;

#[test]
fn test_non_sql_inputs_are_invalid() {
    for mode in [ClassifierMode::Permissive, ClassifierMode::Strict] {
        let classifier = Classifier::new(mode);
        for input in [json!(null), json!(""), json!(3.5), json!({"sql": "SELECT 1"})] {
            let verdict = classifier.check_value(&input);
            assert!(!verdict.is_parseable);
            assert_eq!(verdict.reason.as_deref(), Some(INVALID_QUERY));
        }
    }
}

#[test]
fn test_subquery_is_rejected_with_reason() {
    let verdict = Classifier::default().check("SELECT * FROM (SELECT * FROM logs)");
    assert!(!verdict.is_parseable);
    assert_eq!(
        verdict.reason.as_deref(),
        Some("Contains subqueries or derived tables")
    );
}

#[test]
fn test_label_round_trip() {
    let label = Label::equals("level", "ERROR");

    let added = add_labels("SELECT * FROM logs", std::slice::from_ref(&label)).unwrap();
    assert_eq!(added, "SELECT * FROM logs WHERE level = 'ERROR'");

    let added = add_labels("SELECT * FROM logs WHERE app = 'frontend'", &[label]).unwrap();
    assert_eq!(
        added,
        "SELECT * FROM logs WHERE (app = 'frontend') AND (level = 'ERROR')"
    );

    // The rewritten query decomposes back into both conditions.
    let panel = Decomposer::default().decompose(&added);
    assert_eq!(panel.filters.logical_operator, LogicalOperator::And);
    assert_eq!(panel.filters.leaf_count(), 2);
}

#[test]
fn test_label_injection_fails_closed() {
    let sql = "SELECT * FROM logs WHERE (";
    assert_eq!(
        add_labels_or_original(sql, &[Label::equals("level", "ERROR")]),
        sql
    );
}

#[test]
fn test_field_classification_is_total_and_idempotent() {
    let fields = vec![
        ParsedField::aggregate("histogram", "_timestamp", "x_axis_1"),
        ParsedField::aggregate("count", "*", "y_axis_1"),
        ParsedField::aggregate("p99", "took", "y_axis_2"),
        ParsedField::aggregate("coalesce", "host", "host"),
        ParsedField::column("level"),
    ];

    let first = classify_fields(fields.clone(), DEFAULT_MAX_CHART_DIMENSIONS);
    let second = classify_fields(fields.clone(), DEFAULT_MAX_CHART_DIMENSIONS);
    assert_eq!(first, second);

    let assigned: Vec<&ParsedField> = first
        .x
        .iter()
        .chain(first.y.iter())
        .chain(first.breakdown.iter())
        .collect();
    assert_eq!(assigned.len(), fields.len());
    for field in &fields {
        assert_eq!(assigned.iter().filter(|f| **f == field).count(), 1);
    }
}

#[test]
fn test_build_sql_query() {
    assert_eq!(
        build_sql_query("logs", &["level", "message"], ""),
        r#"SELECT level, message FROM "logs""#
    );
    assert_eq!(
        build_sql_query("logs", &["level", "message"], "level = 'ERROR'"),
        r#"SELECT level, message FROM "logs" WHERE level = 'ERROR'"#
    );
}

#[test]
fn test_format_value() {
    assert_eq!(
        format_value(&json!("test's value")).as_deref(),
        Some("'test''s value'")
    );
    assert_eq!(format_value(&json!(null)), None);
}

#[test]
fn test_table_chart_rule() {
    let axes = classify_fields(
        vec![
            ParsedField::column("service"),
            ParsedField::column("host"),
            ParsedField::column("level"),
            ParsedField::aggregate("count", "*", "y_axis_1"),
        ],
        DEFAULT_MAX_CHART_DIMENSIONS,
    );

    assert!(axes.use_table_chart);
    assert_eq!(axes.x.len(), 3);
    assert!(axes.breakdown.is_empty());
}

#[test]
fn test_decompose_then_render() {
    let sql = "SELECT histogram(_timestamp) AS x_axis_1, count(_timestamp) AS y_axis_1, \
               level AS breakdown_1 FROM logs WHERE app = 'api' AND level <> 'DEBUG'";
    let panel = Decomposer::default().decompose(sql);
    assert!(!panel.custom_query);

    assert_eq!(
        render_panel_query(&panel, &Generic),
        r#"SELECT histogram(_timestamp) AS "x_axis_1", count(_timestamp) AS "y_axis_1", level AS "breakdown_1" FROM "logs" WHERE app = 'api' AND level <> 'DEBUG' GROUP BY x_axis_1, breakdown_1 ORDER BY x_axis_1 ASC"#
    );
}

#[test]
fn test_decompose_then_render_keeps_literal_types_and_quoting() {
    let sql = r#"SELECT histogram(_timestamp) AS x_axis_1, count(*) AS y_axis_1 FROM logs WHERE code >= 500 AND ok = true AND "Level" = 'E' AND "order" IN (1, 2)"#;
    let panel = Decomposer::default().decompose(sql);
    assert!(!panel.custom_query);

    assert_eq!(
        render_panel_query(&panel, &Generic),
        r#"SELECT histogram(_timestamp) AS "x_axis_1", count(*) AS "y_axis_1" FROM "logs" WHERE code >= 500 AND ok = true AND "Level" = 'E' AND "order" IN (1, 2) GROUP BY x_axis_1 ORDER BY x_axis_1 ASC"#
    );
}

#[test]
fn test_render_filter_tree() {
    let mut inner = FilterGroup::new(LogicalOperator::Or);
    inner.push(FilterNode::Condition(FilterCondition::new(
        "level",
        FilterOperator::Eq,
        Some("ERROR"),
    )));
    inner.push(FilterNode::Condition(
        FilterCondition::new("level", FilterOperator::Eq, Some("WARN"))
            .with_logical_operator(LogicalOperator::Or),
    ));

    let mut filters = FilterGroup::new(LogicalOperator::And);
    filters.push(FilterNode::Condition(FilterCondition::new(
        "msg",
        FilterOperator::Contains,
        Some("timeout"),
    )));
    filters.push(FilterNode::Group(inner));

    let panel = PanelQuery {
        stream: "logs".to_string(),
        stream_type: "logs".to_string(),
        x_fields: vec![ParsedField::column("host")],
        filters,
        ..Default::default()
    };

    assert_eq!(
        render_panel_query(&panel, &Generic),
        r#"SELECT host AS "x_axis_1" FROM "logs" WHERE msg LIKE '%timeout%' AND (level = 'ERROR' OR level = 'WARN')"#
    );
}

#[test]
fn test_stream_resolution_through_cte() {
    let resolver = StreamResolver::default();
    assert_eq!(
        resolver
            .stream_name("WITH t AS (SELECT * FROM audit) SELECT * FROM t")
            .as_deref(),
        Some("audit")
    );
}
