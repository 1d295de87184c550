use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod format;

use config::SyncConfig;
use format::OutputFormat;

#[derive(Parser)]
#[command(name = "synctool")]
#[command(about = "Sync curated querysets and media between SQLite databases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file override (default: ~/.synctool/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Shared API token override
    #[arg(long, global = true, env = "SYNCTOOL_API_TOKEN")]
    api_token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured feed routes over HTTP
    Serve {
        /// Bind address override (e.g. 0.0.0.0:8000)
        #[arg(long)]
        listen: Option<String>,
    },

    /// Pull a feed and apply it to the local database
    Sync {
        /// Feed path under the configured api_url
        path: String,

        /// Delete local rows of each synced model before applying
        #[arg(long)]
        clean: bool,

        /// Skip the primary key sequence reset
        #[arg(long)]
        no_reset: bool,

        /// Download referenced images afterwards
        #[arg(long)]
        images: bool,
    },

    /// Download missing images for one model field
    Images {
        /// Model label, e.g. people.person
        model: String,

        /// Image field name
        field: String,
    },

    /// List registered models
    Models {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Reset primary key sequences for every model of an app
    ResetSequences {
        /// App label
        app: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = SyncConfig::load(cli.config)?;
    if let Some(token) = cli.api_token {
        config.api_token = token;
    }

    match cli.command {
        Commands::Serve { listen } => commands::serve::execute(&config, listen),
        Commands::Sync {
            path,
            clean,
            no_reset,
            images,
        } => commands::sync::execute(&config, &path, clean, no_reset, images),
        Commands::Images { model, field } => commands::images::execute(&config, &model, &field),
        Commands::Models { format } => commands::models::execute(&config, format),
        Commands::ResetSequences { app } => commands::reset_sequences::execute(&config, &app),
    }
}
