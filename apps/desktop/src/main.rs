use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpRecognitionTransport, Phase, RecognitionSession, SelectedImage};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod config;
mod interactive;
mod render;

#[derive(Parser, Debug)]
#[command(name = "recognizer", about = "Identify an anime character from an image")]
struct Args {
    /// Recognition endpoint (overrides settings and environment)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Settings file (default: ./recognizer.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter, e.g. `info` or `client_core=debug`
    #[arg(long, global = true)]
    log_filter: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recognize a single image and print the result
    Recognize { image: PathBuf },
    /// Interactive session (default)
    Interactive,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }

    let filter = match args.log_filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let transport = HttpRecognitionTransport::new(settings.endpoint_url()?)
        .with_upload_field(settings.upload_field.clone());
    let mut session = RecognitionSession::new(transport);
    tracing::info!(endpoint = %session.transport().endpoint(), "using recognition service");

    match args.command.unwrap_or(Command::Interactive) {
        Command::Recognize { image } => {
            let image = SelectedImage::from_path(&image).await?;
            session.select_file(Some(image));
            session.submit().await;

            let snapshot = session.snapshot();
            let view = session.view();
            print!("{}", render::render_snapshot(&snapshot, view.as_ref()));
            session.reset();
            Ok(if snapshot.phase == Phase::Success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Interactive => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            interactive::run(&mut session, stdin, &mut stdout)
                .await
                .context("interactive session failed")?;
            session.reset();
            Ok(ExitCode::SUCCESS)
        }
    }
}
