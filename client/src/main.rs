//! answer-sync
//!
//! Command-line front end for the sync orchestrator.
//!
//! # Commands
//!
//! - `sync` - Two-way sync of local and remote answers
//! - `upload` - Replace remote answers with local answers
//! - `download` - Overwrite local answers with remote answers
//! - `count` - Show local and remote answer counts
//! - `export` - Write local answers as exchange text
//! - `import` - Read exchange text into the local store

use answer_client::{
    ClientConfig, Credential, FileAnswerStore, HttpAnswerGateway, SyncOrchestrator,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Synchronise study answers with the answer server.
#[derive(Parser)]
#[command(name = "answer-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Load environment variables from this file instead of `.env`
    #[arg(global = true, long)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge local and remote answers and update both
    Sync,

    /// Replace remote answers with local answers
    Upload,

    /// Overwrite local answers with remote answers
    Download {
        /// Confirm that local answers may be overwritten
        #[arg(short, long)]
        yes: bool,
    },

    /// Show local and remote answer counts
    Count,

    /// Write local answers as exchange text
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Read exchange text into the local store
    Import {
        /// File holding exchange text
        file: PathBuf,

        /// Confirm that local answers may be overwritten
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "answer_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env()?;
    tracing::debug!(
        server = %config.server_url,
        store = %config.store_path.display(),
        "Loaded configuration"
    );

    let gateway = HttpAnswerGateway::from_config(&config)?;
    let store = FileAnswerStore::new(&config.store_path);
    let orchestrator = SyncOrchestrator::new(gateway, store);
    if let Some(token) = config.access_token {
        orchestrator.sign_in(Credential::new(token));
    }

    match cli.command {
        Commands::Sync => {
            let report = orchestrator.sync().await?;
            println!("{report}");
        }
        Commands::Upload => {
            let report = orchestrator.upload_only().await?;
            println!("{report}");
        }
        Commands::Download { yes } => {
            let report = orchestrator.download_only(yes).await?;
            println!("{report}");
        }
        Commands::Count => {
            let counts = orchestrator.answer_counts().await?;
            println!("{counts}");
        }
        Commands::Export { output } => {
            let text = orchestrator.export_answers()?;
            match output {
                Some(path) => std::fs::write(&path, text)?,
                None => println!("{text}"),
            }
        }
        Commands::Import { file, yes } => {
            let text = std::fs::read_to_string(&file)?;
            let count = orchestrator.import_answers(&text, yes)?;
            println!("Imported {count} answers");
        }
    }

    Ok(())
}
