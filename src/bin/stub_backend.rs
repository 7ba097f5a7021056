//! # Stub Backend Entry Point
//!
//! Serves both backend contracts locally without processing anything.
//!
//! ```bash
//! cargo run --bin stub_backend -- --addr 127.0.0.1:8080
//! ```

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::sync::Arc;

use photo_exchange::backend::{self, Behavior, BackendState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Local stand-in for the image processing backend", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Answer every upload with 500
    #[arg(long)]
    fail: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let behavior = if args.fail {
        Behavior::Fail
    } else {
        Behavior::Process
    };
    let state = Arc::new(BackendState::new(behavior));

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    backend::serve(listener, state).await?;

    Ok(())
}
