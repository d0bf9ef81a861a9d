mod content;
mod error;
mod fetcher;
mod innertube;
mod output;
mod selection;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fetcher::{fetch_transcript, FetchResult};
use innertube::InnerTubeClient;
use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "yt-transcript")]
#[command(version)]
#[command(about = "Fetch the transcript of a YouTube video", long_about = None)]
struct Args {
    /// YouTube video ID
    #[arg(allow_hyphen_values = true)]
    video_id: String,

    /// Preferred language codes, most preferred first (default: no en da sv)
    #[arg(long, num_args = 0.., value_name = "CODE")]
    languages: Option<Vec<String>>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Log requests and track selection to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match InnerTubeClient::new() {
        Ok(client) => fetch_transcript(&client, &args.video_id, args.languages).await,
        Err(e) => FetchResult::from(e),
    };

    if let Err(e) = output::emit(&result, args.output, &mut io::stdout().lock(), &mut io::stderr().lock()) {
        tracing::error!(error = %e, "failed to write output");
        return ExitCode::FAILURE;
    }

    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "yt_transcript=debug"
    } else {
        "yt_transcript=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
