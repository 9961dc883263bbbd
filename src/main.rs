//! rdw-vehicle-mcp: MCP server for Dutch vehicle-registry (RDW) lookups
//!
//! Reads JSON-RPC requests from stdin, one per line, and writes one response
//! line per answered request to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use rdw_vehicle_mcp::config;
use rdw_vehicle_mcp::error::ConfigError;
use rdw_vehicle_mcp::mcp::server::McpServer;
use rdw_vehicle_mcp::rdw::HttpFetcher;

/// MCP server for Dutch vehicle-registry (RDW) lookups.
///
/// Exposes RDW open-data datasets as tools that take a registration
/// plate (kenteken) and return the matching records.
#[derive(Parser, Debug)]
#[command(name = "rdw-vehicle-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// stdout carries protocol messages only, so logs always go to stderr.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the shared HTTP fetcher from the configuration.
fn build_fetcher(cfg: &config::Config) -> Result<HttpFetcher, ConfigError> {
    HttpFetcher::new(cfg.http.timeout(), &cfg.http.user_agent()).map_err(ConfigError::HttpClient)
}

/// Entry point for the rdw-vehicle-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if let Some(default_path) = config::default_config_path() {
                eprintln!("\nDefault config location: {}", default_path.display());
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        timeout_secs = cfg.http.timeout_secs,
        "Starting rdw-vehicle-mcp server"
    );

    let fetcher = match build_fetcher(&cfg) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to initialise HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let server = McpServer::new(Arc::new(fetcher));

    info!(
        tools = server.catalog().list().len(),
        "MCP server ready, waiting for client connection..."
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
