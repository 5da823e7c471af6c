// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tokenise.Farm Service Node
//!
//! Entry point for the `farm-node` binary. Parses CLI arguments,
//! initializes logging and metrics, wires the registry and tokenisation
//! coordinator to the ledger gateway, and serves the HTTP API.
//!
//! The binary supports three subcommands:
//!
//! - `run`     — start the service
//! - `status`  — query a running node's health endpoint
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use farm_registry::config;
use farm_registry::coordinator::TokenisationCoordinator;
use farm_registry::ledger::{HttpLedgerGateway, OperatorProfile};
use farm_registry::registry::FarmRegistry;

use cli::{Commands, FarmNodeCli};
use logging::LogFormat;
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = FarmNodeCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Status(args) => query_status(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the full service: HTTP API and metrics endpoint.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "farm_node=info,farm_registry=info,tower_http=debug",
        LogFormat::from_str_lossy(&args.log_format),
    );

    if !config::is_known_network(&args.network) {
        anyhow::bail!(
            "unknown network '{}'; expected one of mainnet, testnet, previewnet",
            args.network
        );
    }

    tracing::info!(
        http_port = args.http_port,
        metrics_port = args.metrics_port,
        network = %args.network,
        gateway = %args.gateway_url,
        "starting farm-node"
    );

    // --- Operator identity ---
    let operator = match (args.operator_id.as_deref(), args.operator_key.as_deref()) {
        (Some(account), Some(key_hex)) => {
            let profile = OperatorProfile::from_hex(account, key_hex, &args.network)
                .context("invalid operator credentials")?;
            tracing::info!(account = %profile.account, "operator identity loaded");
            Some(profile)
        }
        _ => {
            tracing::warn!(
                "FARM_OPERATOR_ID or FARM_OPERATOR_KEY missing; \
                 tokenisation requests will fail until the operator identity is configured"
            );
            None
        }
    };

    // --- Ledger gateway ---
    let gateway = Arc::new(
        HttpLedgerGateway::new(&args.gateway_url, operator, config::GATEWAY_TIMEOUT)
            .context("failed to build ledger gateway client")?,
    );

    // --- Registry & coordinator ---
    let registry = FarmRegistry::shared();
    let coordinator = Arc::new(TokenisationCoordinator::new(registry.clone(), gateway));

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new());

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        network: args.network.clone(),
        registry,
        coordinator,
        metrics: Arc::clone(&node_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state, &args.cors_origin);
    let api_addr = format!("0.0.0.0:{}", args.http_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {api_addr}"))?;
    tracing::info!("HTTP API listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {metrics_addr}"))?;
    tracing::info!("metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("farm-node stopped");
    Ok(())
}

/// Queries a running node's health endpoint and prints the raw response.
async fn query_status(args: cli::StatusArgs) -> Result<()> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let body = reqwest::get(&url)
        .await
        .with_context(|| format!("failed to reach {url}"))?
        .text()
        .await
        .context("failed to read response body")?;
    println!("{body}");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("farm-node {}", env!("CARGO_PKG_VERSION"));
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
