//!
//! server
//!

#![warn(clippy::pedantic)]

use redispack::{server, DEFAULT_HOST, DEFAULT_PORT};

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> redispack::Result<()> {
    set_up_logging()?;

    let cmd = CliCommand::parse();

    let listener = TcpListener::bind(&format!("{}:{}", cmd.host, cmd.port)).await?;

    server::run(listener, signal::ctrl_c()).await;

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "redispack-server", version, author, about = "An in-memory server for Redis hashes and sets")]
struct CliCommand {
    #[clap(long, default_value = DEFAULT_HOST)]
    host: String,

    #[clap(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

/// Log to stdout, filtered by `RUST_LOG` (e.g. `RUST_LOG=redispack=debug`).
fn set_up_logging() -> redispack::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
}
