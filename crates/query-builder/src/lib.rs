//! SQL analysis and rewriting for the panel query builder.
//!
//! Parsing is delegated to `sqlparser`; this crate decides whether a query
//! fits the graphical builder, decomposes it into axes, filters and joins,
//! injects label filters, and renders builder state back into SQL.

pub mod ast;
pub mod build;
pub mod classifier;
pub mod decomposer;
pub mod dialect;
pub mod error;
pub mod fields;
pub mod filters;
pub mod joins;
pub mod parse;
pub mod projection;
pub mod render;
pub mod rewriter;
pub mod settings;
pub mod stream;

pub use classifier::{Classifier, ClassifierMode};
pub use decomposer::Decomposer;
pub use error::BuilderError;
pub use render::panel::render_panel_query;
pub use rewriter::{
    add_labels, add_labels_or_original, build_sql_query, change_histogram_interval, format_value,
    normalize_query,
};
pub use settings::{Settings, SettingsBuilder};
pub use stream::StreamResolver;
