//! Editor front-end dev server and page build.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                 editor-devkit                │
//!   editor.toml ─▶│  config ──▶ BuildConfig (validated, Arc)     │
//!                 │                 │                            │
//!                 │        ┌────────┴─────────┐                  │
//!                 │        ▼                  ▼                  │
//!   Browser ─────▶│   dev server          page build             │
//!                 │   ├─ /s… ─▶ proxy ───────────────────────────┼──▶ Backend
//!                 │   └─ base ─▶ pages ─┐     │                  │
//!                 │                     ▼     ▼                  │
//!                 │              plugin container                │
//!                 │              (html-minifier, post)           │──▶ out_dir
//!                 └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use editor_devkit::config::{load_or_default, validate_config, ConfigError};
use editor_devkit::observability::logging;
use editor_devkit::{build, DevServer, PluginContainer, Shutdown};

#[derive(Parser)]
#[command(name = "editor-devkit")]
#[command(about = "Dev server and page build for the editor front-end", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults to the committed configuration.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dev server
    Dev {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Build the entry pages into the output directory
    Build,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();

    let mut config = load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Dev { port } => {
            if let Some(port) = port {
                config.server.port = port;
                validate_config(&config).map_err(ConfigError::Validation)?;
            }

            tracing::info!(
                base = %config.base,
                port = config.server.port,
                app_type = ?config.app_type,
                "Configuration loaded"
            );

            let plugins = PluginContainer::from_config(&config);
            let listener = TcpListener::bind(config.server.bind_address()).await?;
            let local_addr = listener.local_addr()?;
            tracing::info!(address = %local_addr, "Listening for connections");

            let shutdown = Shutdown::new();
            shutdown.trigger_on_ctrl_c();
            let server = DevServer::new(config, plugins)?;
            server.run(listener, shutdown.signal()).await?;

            tracing::info!("Shutdown complete");
        }
        Commands::Build => {
            let plugins = Arc::new(PluginContainer::from_config(&config));
            let report = build::run(Arc::new(config), plugins).await?;
            println!(
                "built {} page(s) and {} asset(s) into {}",
                report.pages.len(),
                report.assets.len(),
                report.out_dir.display()
            );
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
