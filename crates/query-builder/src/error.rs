use sqlparser::parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Failed to parse SQL: {0}")]
    Parse(#[from] ParserError),

    /// The input parsed, but is not a single query statement.
    #[error("Expected a single SELECT statement, found: {0}")]
    UnsupportedStatement(String),

    /// The query parsed, but its shape cannot be handled by the builder.
    #[error("Unsupported query shape: {0}")]
    UnsupportedQuery(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to read settings file: {0}")]
    SettingsRead(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
}
