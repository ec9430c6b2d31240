use crate::{commands::SqlInput, error::CliError};
use panel_model::query::{filter::FilterOperator, panel::Label};
use std::io::Read;

/// SQL from `--sql`, falling back to stdin.
pub fn read_sql(input: SqlInput) -> Result<String, CliError> {
    match input.sql {
        Some(sql) => Ok(sql),
        None => read_stdin(),
    }
}

pub fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        return Err(CliError::MissingInput);
    }
    Ok(buf)
}

/// Collects labels from repeated `column=value` flags, all sharing
/// `operator`, and an optional JSON array, in that order.
pub fn collect_labels(
    flags: &[String],
    operator: FilterOperator,
    json: Option<&str>,
) -> Result<Vec<Label>, CliError> {
    let mut labels = flags
        .iter()
        .map(|flag| parse_label(flag, operator))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(json) = json {
        let extra: Vec<Label> = serde_json::from_str(json)?;
        labels.extend(extra);
    }
    Ok(labels)
}

fn parse_label(flag: &str, operator: FilterOperator) -> Result<Label, CliError> {
    match flag.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok(Label::new(column.trim(), Some(value.trim()), operator))
        }
        _ => Err(CliError::InvalidLabel(flag.to_string())),
    }
}
