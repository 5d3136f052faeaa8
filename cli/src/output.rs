use pemrsa_envelope::Response;
use serde::Serialize;

use crate::error::Result;

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text format (OpenSSL-like)
    Text,
    /// JSON response envelope
    Json,
    /// YAML response envelope
    Yaml,
}

fn print_response<T: Serialize>(format: OutputFormat, response: &Response<T>) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(response)?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(response)?),
        OutputFormat::Text => {}
    }
    Ok(())
}

/// Print `data` wrapped in a success envelope. Text output is written by each command.
pub(crate) fn print_data<T: Serialize>(format: OutputFormat, data: T) -> Result<()> {
    print_response(format, &Response::data(data))
}

/// Report a decode failure.
///
/// Structured formats print a failure envelope on stdout. The error is returned in every
/// format so the process exits non-zero.
pub(crate) fn fail(format: OutputFormat, err: pemrsa_pkcs::Error) -> Result<()> {
    print_response(format, &Response::<()>::from_error(&err))?;
    Err(err.into())
}
