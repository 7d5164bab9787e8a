//! Binary crate for the `weather-proxy` HTTP server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and initializing tracing
//! - Routing `/hello` and `/weather/{city}` requests
//! - Mapping lookup failures onto HTTP responses

use clap::Parser;

mod cli;
mod error;
mod routes;
mod shutdown;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
