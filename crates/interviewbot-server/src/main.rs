//! interviewbot — AI interview backend.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "interviewbot",
    version,
    about = "AI interview backend: transcription, questions, and answer evaluation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: 8000)
        #[arg(long)]
        port: Option<u16>,

        /// SQLite database file (default: ai_interview.db)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show recently evaluated answers
    History {
        /// Number of sessions to show
        #[arg(long, default_value = "20")]
        limit: u32,

        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A missing .env file is fine; the environment may already carry the key.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            database,
            config,
        } => commands::serve::execute(host, port, database, config).await,
        Commands::History {
            limit,
            database,
            config,
        } => commands::history::execute(limit, database, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
