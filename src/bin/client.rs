//! # Client Binary Entry Point
//!
//! Runs one image exchange from the command line.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin client -- photo.jpg --output processed.png
//! ```
//!
//! Against a backend speaking the base64/JSON contract:
//! ```bash
//! cargo run --bin client -- photo.jpg --endpoint http://localhost:8080 \
//!   --contract base64-json --print-source
//! ```
//!
//! The client will:
//! 1. Load configuration from the TOML file, if one is given
//! 2. Select the image named on the command line (none given = nothing selected)
//! 3. Submit it and wait for the processed image
//! 4. Save the result to the output path and print where it went

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use photo_exchange::client::{ExchangeClient, ProcessedImage, SourceImage, UploadSession};
use photo_exchange::common::config::ExchangeConfig;
use photo_exchange::Contract;

/// Command-line arguments for the client binary
#[derive(Parser, Debug)]
#[command(author, version, about = "Upload an image for processing and save the result", long_about = None)]
struct Args {
    /// Image to upload
    image: Option<PathBuf>,

    /// Path to the client configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (e.g., http://localhost:8080), overrides the config file
    #[arg(long)]
    endpoint: Option<String>,

    /// Response contract: "binary" or "base64-json", overrides the config file
    #[arg(long)]
    contract: Option<Contract>,

    /// Where to write the processed image, overrides the config file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the image source reference (object URL or data URI)
    #[arg(long)]
    print_source: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger(verbose: bool) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();
}

fn build_config(args: &Args) -> anyhow::Result<ExchangeConfig> {
    let mut config = match &args.config {
        Some(path) => ExchangeConfig::from_file(path)?,
        None => ExchangeConfig::default(),
    };

    if let Some(endpoint) = &args.endpoint {
        config.endpoint.base_url = endpoint.clone();
    }
    if let Some(contract) = args.contract {
        config.endpoint.contract = contract;
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = build_config(&args)?;

    let mut latest: Option<ProcessedImage> = None;
    let mut session = UploadSession::new(
        ExchangeClient::new(config.endpoint.clone()),
        |message: &str| eprintln!("{}", message),
        |image: &ProcessedImage| latest = Some(image.clone()),
    );

    if let Some(path) = &args.image {
        session.select_image(SourceImage::from_path(path)?);
    }

    if session.submit_image().await.is_err() {
        return Ok(ExitCode::FAILURE);
    }
    drop(session);

    if let Some(image) = latest {
        image.save(&config.output.path)?;
        println!("Processed image saved to: {}", config.output.path.display());
        if args.print_source {
            println!("{}", image.source());
        }
    }

    Ok(ExitCode::SUCCESS)
}
