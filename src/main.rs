//! `page-dl` command-line front end.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use clap::error::ErrorKind;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

use page_dl::cli::Args;
use page_dl::{Event, PageDownloader, RunSummary, ToExitCode, exit_codes};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
                _ => exit_codes::ARGUMENT,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(args.verbose);
    let start = Instant::now();

    match run(&args).await {
        Ok(summary) => {
            tracing::debug!(
                pages = summary.download.succeeded.len(),
                failed = summary.download.failed.len(),
                "exiting"
            );
            println!(
                "--- Generated in {:.4} seconds ---",
                start.elapsed().as_secs_f64()
            );
            ExitCode::from(exit_codes::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::debug!(code = e.error_code(), exit_code = e.exit_code(), "run failed");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: &Args) -> page_dl::Result<RunSummary> {
    // Identifier and arguments first: nothing may be created for a bad request
    let request = args.to_request()?;
    let config = args.to_config()?;

    println!("page-dl {}", env!("CARGO_PKG_VERSION"));
    println!("---------------------------------------------------");

    let downloader = PageDownloader::new(config)?;
    let printer = tokio::spawn(print_progress(downloader.subscribe(), args.verbose));

    let result = downloader.run(request).await;

    // Closing the channel lets the printer drain and exit
    drop(downloader);
    let _ = printer.await;

    result
}

/// Print the human-readable progress lines for a run
async fn print_progress(mut events: broadcast::Receiver<Event>, verbose: bool) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "progress printer lagged behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        match event {
            Event::DownloadStarted { .. } => println!("Downloading page images..."),
            Event::PageFetched { page, .. } if verbose => {
                println!("Downloaded page {}!", u64::from(page) + 1);
            }
            Event::PageFetched { .. } => {}
            Event::PageFailed { page, error } => {
                eprintln!("Failed to download page {}: {error}", u64::from(page) + 1);
            }
            Event::DownloadComplete { failed: 0, .. } => println!("Page downloads complete!"),
            Event::DownloadComplete { succeeded, failed } => {
                println!("Page downloads complete! ({succeeded} downloaded, {failed} failed)");
            }
            Event::AssemblyStarted { pages } => {
                println!("Generating a document from {pages} page(s)... (This may take a while)");
            }
            Event::Assembled { path, .. } => println!("Generated {}!", path.display()),
            Event::SourcesRemoved { removed, failed: 0 } => {
                println!("Removed {removed} page file(s)!");
            }
            Event::SourcesRemoved { removed, failed } => {
                println!("Removed {removed} page file(s), {failed} could not be removed");
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("page_dl={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
