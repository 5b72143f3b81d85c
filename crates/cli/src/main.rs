//! Recipe Finder CLI - Database migrations.
//!
//! # Usage
//!
//! ```bash
//! # Create the users table and the session store schema
//! rf-cli migrate
//!
//! # Only one of the two
//! rf-cli migrate --only users
//! rf-cli migrate --only sessions
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "rf-cli")]
#[command(author, version, about = "Recipe Finder CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        /// Run only one migration set
        #[arg(long, value_enum)]
        only: Option<MigrateTarget>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MigrateTarget {
    /// Application tables (`crates/web/migrations`)
    Users,
    /// tower-sessions store schema
    Sessions,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::migrate::MigrationError> {
    match cli.command {
        Commands::Migrate { only } => {
            let pool = commands::migrate::connect().await?;
            if only != Some(MigrateTarget::Sessions) {
                commands::migrate::users(&pool).await?;
            }
            if only != Some(MigrateTarget::Users) {
                commands::migrate::sessions(&pool).await?;
            }
        }
    }
    Ok(())
}
