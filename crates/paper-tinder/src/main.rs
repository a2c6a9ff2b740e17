//! Paper Tinder - Entry Point
//!
//! `serve` runs the HTTP gateway; `swipe` runs an interactive terminal session.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_tinder::{
    Config, ScholarGateway, SemanticScholarClient, SessionController, server::GatewayServer,
    terminal,
};

#[derive(Parser, Debug)]
#[command(name = "paper-tinder")]
#[command(about = "Swipe through Semantic Scholar paper recommendations")]
#[command(version)]
struct Cli {
    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP gateway
    Serve {
        /// HTTP server port
        #[arg(long, default_value = "3000", env = "PORT")]
        port: u16,

        /// Path prefix for the routes ("" or "/" mounts them at the root)
        #[arg(long, env = "PAPER_TINDER_BASE_PATH")]
        base_path: Option<String>,
    },
    /// Swipe through recommendations in the terminal
    Swipe {
        /// Author name to search for right away
        #[arg(long, short)]
        query: Option<String>,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so they never interleave with the swipe session on stdout.
    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Paper Tinder");

    let mut config = Config::from_env()?;
    if cli.api_key.is_some() {
        config.api_key = Config::new(cli.api_key).api_key;
    }

    match cli.command {
        Command::Serve { port, base_path } => {
            if let Some(base_path) = base_path {
                config = config.with_base_path(&base_path)?;
            }
            tracing::info!(port, base_path = %config.base_path, "Running gateway");
            GatewayServer::new(config)?.run(port).await?;
        }
        Command::Swipe { query } => {
            let client = SemanticScholarClient::new(config)?;
            let mut controller = SessionController::new(ScholarGateway::new(Arc::new(client)));
            let reader = BufReader::new(tokio::io::stdin());
            terminal::run_terminal(&mut controller, query, reader, tokio::io::stdout()).await?;
        }
    }

    Ok(())
}
