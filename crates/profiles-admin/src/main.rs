//! profiles - manage accounts and status feeds from the terminal

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use profiles_auth::{AccountDirectory, Argon2Hasher, FeedLog};
use profiles_db::Database;

mod commands;
mod config;

use config::{Config, DEFAULT_LOG_FILTER};

/// Account and status feed administration
#[derive(Parser)]
#[command(name = "profiles", version, about, long_about = None)]
struct Cli {
    /// SQLite database file (overrides PROFILES_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a regular account
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// Password; omit to create an account that cannot log in
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account with staff and superuser rights
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// Password; prompted for when omitted
        #[arg(long, env = "PROFILES_SUPERUSER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Check a password against an account
    Authenticate {
        #[arg(long)]
        email: String,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Post a status update for an account
    Post {
        #[arg(long)]
        email: String,
        /// Status text, at most 255 characters
        text: String,
    },

    /// List an account's status updates, oldest first
    Feed {
        #[arg(long)]
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an account
    Show {
        #[arg(long)]
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an account and all of its status updates
    Delete {
        #[arg(long)]
        email: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Services shared by every command.
pub struct Context {
    pub directory: AccountDirectory<Arc<Database>, Argon2Hasher>,
    pub feed: FeedLog<Arc<Database>>,
}

fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let db = Arc::new(Database::open(&config.db_path)?);
    let ctx = Context {
        directory: AccountDirectory::with_hasher(db.clone(), config.hasher()?),
        feed: FeedLog::new(db),
    };
    info!("Using database {}", config.db_path.display());

    match cli.command {
        Commands::CreateUser { email, name, password } => {
            commands::create_user(&ctx, &email, &name, password.as_deref())
        }
        Commands::CreateSuperuser { email, name, password } => {
            commands::create_superuser(&ctx, &email, &name, password)
        }
        Commands::Authenticate { email, password } => {
            commands::authenticate(&ctx, &email, password)
        }
        Commands::Post { email, text } => commands::post(&ctx, &email, &text),
        Commands::Feed { email, json } => commands::feed(&ctx, &email, json),
        Commands::Show { email, json } => commands::show(&ctx, &email, json),
        Commands::Delete { email, force } => commands::delete(&ctx, &email, force),
    }
}
