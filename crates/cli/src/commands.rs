use clap::{Args, Subcommand};
use panel_model::query::filter::FilterOperator;

#[derive(Args, Debug)]
pub struct SqlInput {
    #[arg(long, help = "SQL text; read from stdin when omitted")]
    pub sql: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a query can be edited in the builder
    Check {
        #[command(flatten)]
        input: SqlInput,
    },
    /// Decompose a query into axes, filters and joins
    Decompose {
        #[command(flatten)]
        input: SqlInput,
    },
    /// AND label filters into a query's WHERE clause
    AddLabels {
        #[command(flatten)]
        input: SqlInput,

        #[arg(
            long = "label",
            help = "Label as column=value; may be repeated"
        )]
        labels: Vec<String>,

        #[arg(
            long,
            default_value = "=",
            help = "Operator applied to every --label, e.g. '<>', 'Contains', 'IN'"
        )]
        operator: FilterOperator,

        #[arg(
            long,
            help = r#"JSON array of labels, e.g. [{"column":"msg","value":"err","operator":"Contains"}]"#
        )]
        labels_json: Option<String>,

        #[arg(
            long,
            help = "Print the original query instead of failing when it cannot be rewritten"
        )]
        lenient: bool,
    },
    /// Print the primary stream a query reads from
    Stream {
        #[command(flatten)]
        input: SqlInput,
    },
    /// Build a SELECT over a stream from a field list
    Build {
        #[arg(long, help = "Stream (table) name")]
        table: String,

        #[arg(long = "field", help = "Projected field; may be repeated")]
        fields: Vec<String>,

        #[arg(long = "where", default_value = "", help = "WHERE clause, appended verbatim")]
        where_clause: String,
    },
    /// Render a decomposed panel (JSON) back into SQL
    Render {
        #[arg(long, help = "Panel JSON file; read from stdin when omitted")]
        panel: Option<String>,
    },
    /// Change or drop the interval of histogram() calls
    HistogramInterval {
        #[command(flatten)]
        input: SqlInput,

        #[arg(long, help = "New interval, e.g. '5 minute'; omit to drop it")]
        interval: Option<String>,
    },
    /// Print the canonical single-line form of a query
    Normalize {
        #[command(flatten)]
        input: SqlInput,
    },
}
