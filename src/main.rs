mod aggregation;
mod config;
mod database;
mod entities;
mod http_server;
mod logging;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{config::Config, database::Database, http_server::app::HttpServerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "GIGBOARD_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Tracing filter, e.g. `info` or `gigboard=debug,tower_http=debug` (default: config file)
    #[arg(long, global = true, env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the listings site over HTTP
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// The port to run the server on
        #[arg(short, long, env = "GIGBOARD_HTTP_PORT")]
        port: Option<u16>,

        /// SQLite database file, created and migrated if needed
        #[arg(short, long, env = "GIGBOARD_DATABASE")]
        database: Option<PathBuf>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).wrap_err("Failed to load gigboard config")?;

    let log_level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let tracer_provider = logging::init_tracing(
        "gigboard",
        config.logging.otlp_endpoint.as_deref(),
        log_level,
    )?;

    log::debug!("Gigboard starting");

    let result = run(args.command, config).await;

    if let Some(provider) = tracer_provider
        && let Err(e) = provider.shutdown()
    {
        eprintln!("Failed to flush traces: {e}");
    }

    result
}

async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                log::info!("Default config available at {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Serve {
            host,
            port,
            database,
        } => {
            let database_path = database.unwrap_or_else(|| config.database_path());
            log::debug!("Opening database at: {}", database_path.display());
            let database = Database::open(&database_path).await?;

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            log::info!("Starting HTTP server on {}:{}", host, port);
            http_server::app::start(HttpServerConfig {
                host,
                port,
                database,
            })
            .await?;
        }
    }

    Ok(())
}
