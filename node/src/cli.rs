//! # CLI Interface
//!
//! Defines the command-line argument structure for `farm-node` using
//! `clap` derive. Three subcommands: `run`, `status`, and `version`.
//!
//! Every operational knob is also settable through a `FARM_*` environment
//! variable, so the binary drops into a container without a wrapper script.

use clap::{Parser, Subcommand};

use farm_registry::config;

/// Tokenise.Farm service node.
///
/// Registers physical farm assets, computes the fraction of their appraised
/// value that is safe to collateralise, and issues a fungible token for that
/// fraction on a distributed ledger.
#[derive(Parser, Debug)]
#[command(
    name = "farm-node",
    about = "Farm registry and tokenisation service",
    version,
    propagate_version = true
)]
pub struct FarmNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the farm-node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service.
    Run(RunArgs),
    /// Query the health endpoint of a running node.
    Status(StatusArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Port for the HTTP API.
    #[arg(long, env = "FARM_HTTP_PORT", default_value_t = config::DEFAULT_HTTP_PORT)]
    pub http_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "FARM_METRICS_PORT", default_value_t = config::DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Ledger account id of the operating identity (e.g. "0.0.12345").
    ///
    /// When omitted the service still starts, but tokenisation requests
    /// fail until an operator identity is configured.
    #[arg(long, env = "FARM_OPERATOR_ID")]
    pub operator_id: Option<String>,

    /// Hex-encoded Ed25519 private key of the operating identity.
    ///
    /// **Never pass this flag on the command line in production** — use the
    /// environment variable or an injected secret.
    #[arg(long, env = "FARM_OPERATOR_KEY", hide_env_values = true)]
    pub operator_key: Option<String>,

    /// Target ledger network: mainnet, testnet, or previewnet.
    #[arg(long, env = "FARM_NETWORK", default_value = config::DEFAULT_NETWORK)]
    pub network: String,

    /// Base URL of the ledger gateway service.
    #[arg(long, env = "FARM_GATEWAY_URL", default_value = config::DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,

    /// Allowed CORS origin for the HTTP API ("*" for any).
    #[arg(long, env = "FARM_CORS_ORIGIN", default_value = "*")]
    pub cors_origin: String,

    /// Log output format: pretty or json.
    #[arg(long, env = "FARM_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Base URL of the running node.
    #[arg(long, default_value = "http://127.0.0.1:4000")]
    pub url: String,
}
