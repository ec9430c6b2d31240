use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use panel_model::query::panel::PanelQuery;
use panel_sql::{
    Classifier, Decomposer, Settings, StreamResolver, add_labels, add_labels_or_original,
    build_sql_query, change_histogram_interval, dialect::Generic, normalize_query,
    render_panel_query,
};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod input;
mod output;

#[derive(Parser)]
#[command(
    name = "panelsql",
    version = "0.1.0",
    about = "Analyze and rewrite dashboard panel SQL"
)]
struct Cli {
    #[arg(long, global = true, help = "Settings file (JSON)")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => {
            info!("Loading settings from {path}");
            Settings::load(path)?
        }
        None => Settings::default(),
    };
    debug!(?settings, "Effective settings");

    match cli.command {
        Commands::Check { input } => {
            let sql = input::read_sql(input)?;
            let verdict = Classifier::new(settings.classifier_mode).check(&sql);
            output::print_json(&verdict)?;
        }
        Commands::Decompose { input } => {
            let sql = input::read_sql(input)?;
            let panel = Decomposer::new(settings).decompose(&sql);
            output::print_json(&panel)?;
        }
        Commands::AddLabels {
            input,
            labels,
            operator,
            labels_json,
            lenient,
        } => {
            let sql = input::read_sql(input)?;
            let labels = input::collect_labels(&labels, operator, labels_json.as_deref())?;
            let rewritten = if lenient {
                add_labels_or_original(&sql, &labels)
            } else {
                add_labels(&sql, &labels)?
            };
            output::print_sql(&rewritten);
        }
        Commands::Stream { input } => {
            let sql = input::read_sql(input)?;
            let stream = StreamResolver::new(settings.max_resolve_depth).stream_name(&sql);
            output::print_json(&json!({ "stream": stream }))?;
        }
        Commands::Build {
            table,
            fields,
            where_clause,
        } => {
            output::print_sql(&build_sql_query(&table, fields.as_slice(), &where_clause));
        }
        Commands::Render { panel } => {
            let source = match panel {
                Some(path) => std::fs::read_to_string(path)?,
                None => input::read_stdin()?,
            };
            let panel: PanelQuery = serde_json::from_str(&source)?;
            output::print_sql(&render_panel_query(&panel, &Generic));
        }
        Commands::HistogramInterval { input, interval } => {
            let sql = input::read_sql(input)?;
            output::print_sql(&change_histogram_interval(&sql, interval.as_deref())?);
        }
        Commands::Normalize { input } => {
            let sql = input::read_sql(input)?;
            output::print_sql(&normalize_query(&sql)?);
        }
    }

    Ok(())
}
