//! Service configuration
//!
//! Command line flags with environment fallbacks. A `.env` file in the
//! working directory is loaded before parsing.

use axum::http::HeaderValue;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::core::PersistencePolicy;
use crate::error::{OrchestratorError, OrchestratorResult};

#[derive(Parser, Debug, Clone)]
#[command(name = "orchestrator")]
#[command(about = "Records process optimization runs and brokers calls to the compute service")]
pub struct Args {
    /// IP address to bind the HTTP server to
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the HTTP server
    #[arg(long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// Comma-separated origins allowed to call the API (`*` allows any)
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',', default_value = "http://localhost:3000")]
    pub allowed_origins: Vec<String>,

    /// Base address of the compute service
    #[arg(long, env = "ML_SERVICE_URL", default_value = "http://localhost:5001")]
    pub compute_url: String,

    /// Upper bound for every compute service call, in seconds
    #[arg(long, env = "COMPUTE_TIMEOUT_SECS", default_value = "30")]
    pub compute_timeout_secs: u64,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "process_optimization.db")]
    pub database_path: PathBuf,

    /// What to do when recording an optimize run fails
    #[arg(long, env = "RUN_PERSISTENCE", value_enum, default_value_t = PersistencePolicy::BestEffort)]
    pub persistence: PersistencePolicy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Origins accepted by the CORS layer
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Validated configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub allowed_origins: AllowedOrigins,
    pub compute_url: Url,
    pub compute_timeout: Duration,
    pub database_path: PathBuf,
    pub persistence: PersistencePolicy,
    pub log_level: String,
}

impl ServerConfig {
    /// Load `.env`, then parse flags and environment
    pub fn load() -> OrchestratorResult<Self> {
        dotenvy::dotenv().ok();
        Self::try_from(Args::parse())
    }
}

impl TryFrom<Args> for ServerConfig {
    type Error = OrchestratorError;

    fn try_from(args: Args) -> OrchestratorResult<Self> {
        let ip: IpAddr = args
            .host
            .parse()
            .map_err(|e| OrchestratorError::config("host", format!("'{}' is not an IP address: {e}", args.host)))?;

        let compute_url = Url::parse(&args.compute_url)
            .map_err(|e| OrchestratorError::config("compute_url", format!("'{}': {e}", args.compute_url)))?;
        if !matches!(compute_url.scheme(), "http" | "https") {
            return Err(OrchestratorError::config(
                "compute_url",
                format!("unsupported scheme '{}'", compute_url.scheme()),
            ));
        }

        if args.compute_timeout_secs == 0 {
            return Err(OrchestratorError::config("compute_timeout_secs", "must be at least 1"));
        }

        Ok(Self {
            bind_addr: SocketAddr::new(ip, args.port),
            allowed_origins: parse_origins(&args.allowed_origins)?,
            compute_url,
            compute_timeout: Duration::from_secs(args.compute_timeout_secs),
            database_path: args.database_path,
            persistence: args.persistence,
            log_level: args.log_level,
        })
    }
}

fn parse_origins(origins: &[String]) -> OrchestratorResult<AllowedOrigins> {
    let origins: Vec<&str> = origins.iter().map(|o| o.trim()).filter(|o| !o.is_empty()).collect();

    if origins.contains(&"*") {
        return Ok(AllowedOrigins::Any);
    }

    origins
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| OrchestratorError::config("allowed_origins", format!("'{origin}': {e}")))
        })
        .collect::<OrchestratorResult<Vec<_>>>()
        .map(AllowedOrigins::List)
}
