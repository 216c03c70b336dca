use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use things::{cli, config, server};

#[derive(Parser)]
#[command(name = "things", version, about = "Tell me things: notes, tasks and tracking in one text box")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web server
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Export rows as JSON to stdout
    Export {
        /// Only rows of this namespace
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Show row counts per kind
    Stats {
        /// Only rows of this namespace
        #[arg(long)]
        namespace: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let mut config = config::ThingsConfig::load()?;

    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { addr } => {
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            server::serve(config).await?;
        }
        Command::Export { namespace } => {
            cli::export::export(&config, namespace.as_deref())?;
        }
        Command::Stats { namespace } => {
            cli::stats::stats(&config, namespace.as_deref())?;
        }
    }

    Ok(())
}
