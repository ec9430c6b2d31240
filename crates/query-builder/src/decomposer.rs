//! Decomposes a SQL query into panel builder state.

use crate::{
    classifier::Classifier,
    error::BuilderError,
    fields::classify_fields,
    filters::extract_filters,
    joins::{extract_joins, primary_table},
    parse,
    projection::extract_fields,
    settings::Settings,
    stream::StreamResolver,
};
use panel_model::query::panel::PanelQuery;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Decomposer {
    settings: Settings,
    classifier: Classifier,
    resolver: StreamResolver,
}

impl Decomposer {
    pub fn new(settings: Settings) -> Self {
        Self {
            classifier: Classifier::new(settings.classifier_mode),
            resolver: StreamResolver::new(settings.max_resolve_depth),
            settings,
        }
    }

    /// Decomposes `sql` for the builder. Queries the builder cannot edit
    /// come back as custom queries carrying the reason in `parse_error`.
    pub fn decompose(&self, sql: &str) -> PanelQuery {
        let verdict = self.classifier.check(sql);
        if !verdict.is_parseable {
            return self.custom(sql, verdict.reason);
        }

        match self.try_decompose(sql) {
            Ok(panel) => panel,
            Err(err) => {
                debug!(error = %err, "Falling back to a custom query");
                self.custom(sql, Some(err.to_string()))
            }
        }
    }

    /// Decomposes without consulting the classifier, returning parser
    /// failures instead of folding them into a custom panel.
    pub fn try_decompose(&self, sql: &str) -> Result<PanelQuery, BuilderError> {
        let query = parse::parse_query(sql)?;
        let select = parse::first_select(&query).ok_or_else(|| {
            BuilderError::UnsupportedQuery("query body is not a plain SELECT".to_string())
        })?;

        let (table, stream_alias) = primary_table(select).unzip();
        let stream = self
            .resolver
            .resolve(&query)
            .or(table)
            .unwrap_or_default();

        let axes = classify_fields(extract_fields(select), self.settings.max_chart_dimensions);
        let filters = select
            .selection
            .as_ref()
            .map(extract_filters)
            .unwrap_or_default();

        debug!(
            stream = %stream,
            x = axes.x.len(),
            y = axes.y.len(),
            breakdown = axes.breakdown.len(),
            filters = filters.leaf_count(),
            "Decomposed query"
        );

        Ok(PanelQuery {
            stream,
            stream_alias: stream_alias.flatten(),
            stream_type: self.settings.default_stream_type.clone(),
            x_fields: axes.x,
            y_fields: axes.y,
            breakdown_fields: axes.breakdown,
            filters,
            joins: extract_joins(select),
            custom_query: false,
            raw_query: sql.to_string(),
            parse_error: None,
            use_table_chart: axes.use_table_chart,
        })
    }

    fn custom(&self, sql: &str, reason: Option<String>) -> PanelQuery {
        PanelQuery::custom(sql, &self.settings.default_stream_type, reason)
    }
}
