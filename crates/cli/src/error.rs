use panel_sql::BuilderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid label '{0}': expected column=value")]
    InvalidLabel(String),

    #[error("No SQL provided; pass --sql or pipe it on stdin")]
    MissingInput,
}
