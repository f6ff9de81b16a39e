//! statcalc MCP Server
//!
//! Newline-delimited JSON-RPC 2.0 over stdio. Logs go to stderr, stdout
//! carries only protocol messages.
//!
//! Tools:
//! - descriptive, linear_regression, bayes, binomial, poisson, anova:
//!   one tool per registered calculation
//! - help: Get documentation for a calculation
//! - list_calculations: List available calculations

mod config;
mod handlers;
mod protocol;

use config::ServerConfig;
use handlers::Server;
use protocol::PROTOCOL_VERSION;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        name = %config.server_name,
        version = env!("CARGO_PKG_VERSION"),
        protocol = PROTOCOL_VERSION,
        "statcalc MCP server started"
    );

    let server = Server::new(statcalc_stats::stats_registry(), config);

    if let Err(e) = serve(&server).await {
        error!("server stopped: {}", e);
    }

    info!("server shutting down");
}

/// Read requests line by line until EOF, answering each in turn
async fn serve(server: &Server) -> io::Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    info!("server ready, waiting for requests");

    while let Some(line) = lines.next_line().await? {
        if let Some(response) = server.handle_line(&line) {
            stdout.write_all(response.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    info!("client disconnected (EOF)");
    Ok(())
}
