//! Prato CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! prato-cli migrate
//!
//! # Seed development data (reproducible with --seed)
//! prato-cli seed --stores 3 --clients 10 --orders 20 --seed 42
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with development data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "prato-cli")]
#[command(author, version, about = "Prato CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with development data
    Seed {
        /// Number of stores to create
        #[arg(long, default_value_t = 3)]
        stores: u32,

        /// Number of client accounts to create
        #[arg(long, default_value_t = 10)]
        clients: u32,

        /// Number of orders to place through the order service
        #[arg(long, default_value_t = 20)]
        orders: u32,

        /// RNG seed for reproducible data
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "prato_cli=info,prato_api=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await.map_err(|e| e.to_string()),
        Commands::Seed {
            stores,
            clients,
            orders,
            seed,
        } => commands::seed::run(commands::seed::SeedConfig {
            stores,
            clients,
            orders,
            rng_seed: seed,
        })
        .await
        .map_err(|e| e.to_string()),
    };

    if let Err(message) = result {
        tracing::error!("{message}");
        std::process::exit(1);
    }
}
