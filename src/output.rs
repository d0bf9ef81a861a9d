use std::io::{self, Write};

use clap::ValueEnum;
use console::style;

use crate::fetcher::FetchResult;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The full result record, pretty-printed
    #[default]
    Json,
    /// Transcript text only; errors go to stderr
    Text,
}

/// Write a fetch result in the requested format.
pub fn emit<O, E>(result: &FetchResult, format: OutputFormat, out: &mut O, err: &mut E) -> io::Result<()>
where
    O: Write,
    E: Write,
{
    match (format, result) {
        (OutputFormat::Json, _) => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        }
        (OutputFormat::Text, FetchResult::Success(transcript)) => {
            writeln!(out, "{}", transcript.text)?;
        }
        (OutputFormat::Text, FetchResult::Failure(failure)) => {
            writeln!(err, "{} {}", style("Error:").red().bold().for_stderr(), failure.message)?;
        }
    }

    out.flush()
}
