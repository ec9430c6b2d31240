use crate::error::CliError;
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn print_sql(sql: &str) {
    println!("{sql}");
}
