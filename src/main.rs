//! Museion - Content Store for a Museum Website
//!
//! Serves the site's content API and offers a few maintenance commands
//! over the same data directory.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use museion::{
    api::build_app,
    blob::{BlobStore, FileBlobStore},
    booking::BookingState,
    config::MuseionConfig,
    content::{types::CollectionKey, ContentState, ContentStore},
    curator::{CuratorClient, CuratorState},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "museion")]
#[command(version)]
#[command(about = "Content store and API for a museum website")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MUSEION_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the content API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the storage usage estimate
    Usage,

    /// Print one collection as JSON
    Export {
        /// Collection name, e.g. exhibitions or shop_orders
        collection: String,
    },

    /// Delete all stored content and restore the seed data
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Ask the AI curator a question
    Ask {
        /// Question text
        message: String,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("museion={},tower_http=info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => MuseionConfig::from_file(path)?,
        None => MuseionConfig::default(),
    };

    match cli.command {
        Commands::Serve { host, port } => {
            run_server(config, host, port).await?;
        }
        Commands::Usage => {
            show_usage(&config).await?;
        }
        Commands::Export { collection } => {
            export_collection(&config, &collection).await?;
        }
        Commands::Reset { yes } => {
            reset_content(&config, yes).await?;
        }
        Commands::Ask { message } => {
            let client = CuratorClient::new(config.curator.clone());
            println!("{}", client.ask(&message).await);
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn open_blobs(config: &MuseionConfig) -> Result<Arc<FileBlobStore>> {
    let blobs = FileBlobStore::open(&config.storage.data_dir).with_context(|| {
        format!(
            "failed to open data directory {}",
            config.storage.data_dir.display()
        )
    })?;
    Ok(Arc::new(blobs))
}

async fn open_store(config: &MuseionConfig) -> Result<Arc<ContentStore>> {
    let store = ContentStore::init(open_blobs(config)?)
        .await
        .with_quota(config.storage.quota_bytes);
    Ok(Arc::new(store))
}

async fn run_server(config: MuseionConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing::info!("Starting Museion");

    let store = open_store(&config).await?;
    let curator = CuratorClient::new(config.curator.clone());
    if !curator.is_available() {
        tracing::warn!(
            "AI curator has no API key (set {}); chat will answer with an apology",
            config.curator.api_key_env
        );
    }

    let app = build_app(
        ContentState::new(store.clone(), &config.admin.password),
        BookingState {
            store,
            prices: config.tickets,
        },
        CuratorState {
            client: Arc::new(curator),
        },
        &config.server.cors_origins,
    );

    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {}:{}", host, port))?;

    tracing::info!("Museion API listening on http://{}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

async fn show_usage(config: &MuseionConfig) -> Result<()> {
    let blobs = open_blobs(config)?;
    let on_disk = blobs.size_estimate()?;
    let store = ContentStore::init(blobs)
        .await
        .with_quota(config.storage.quota_bytes);
    let usage = store.storage_usage();

    println!("Data directory:  {}", config.storage.data_dir.display());
    println!("Used:            {} MB ({} bytes)", usage.megabytes, usage.bytes);
    println!("Quota:           {} bytes", usage.quota_bytes);
    println!("Percent used:    {:.1}%", usage.percent_used);
    println!("Embedded images: {} bytes", usage.embedded_image_bytes);
    println!("On disk:         {} bytes", on_disk);
    Ok(())
}

async fn export_collection(config: &MuseionConfig, collection: &str) -> Result<()> {
    let key: CollectionKey = collection.parse().map_err(anyhow::Error::msg)?;
    let store = open_store(config).await?;
    println!("{}", serde_json::to_string_pretty(&store.get_value(key))?);
    Ok(())
}

async fn reset_content(config: &MuseionConfig, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete all content without --yes");
    }
    let store = open_store(config).await?;
    store.reset_all()?;
    println!("All content reset to defaults.");
    Ok(())
}

fn show_config(config: Option<&MuseionConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
