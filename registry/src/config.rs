//! # Service Configuration & Constants
//!
//! Every magic number in the farm service lives here. If you're hardcoding
//! a constant somewhere else, you're doing it wrong.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Tokenisation Policy
// ---------------------------------------------------------------------------

/// Fraction of a farm's appraised value eligible for on-ledger
/// representation. 25% is the underwriting ceiling: conservative enough to
/// absorb appraisal error, generous enough to be worth tokenising.
///
/// The ceiling is computed once at registration as
/// `round-half-up(appraised_value * SAFE_COLLATERAL_RATIO)` and never
/// recomputed, since appraised values are immutable after creation. One
/// token is issued per whole currency unit of the ceiling; fractional
/// remainders are dropped by the rounding. That is a deliberately
/// simplified policy, not a verified business rule.
pub const SAFE_COLLATERAL_RATIO: f64 = 0.25;

/// Upper bound on the appraised value accepted at registration.
///
/// 10^15 keeps the derived ceiling comfortably inside `u64` and inside the
/// range where `f64` still represents whole numbers exactly. No farm on
/// Earth appraises anywhere near this; the bound exists so the f64→u64
/// conversion in the ceiling math cannot misbehave.
pub const MAX_APPRAISED_VALUE: f64 = 1_000_000_000_000_000.0;

/// Ticker symbol assigned when the registration does not supply one.
pub const DEFAULT_TOKEN_SYMBOL: &str = "FARM";

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet — the real deal. Tokens created here cost real money.
pub const NETWORK_MAINNET: &str = "mainnet";

/// Testnet — where asset creation is free and mistakes are educational.
pub const NETWORK_TESTNET: &str = "testnet";

/// Previewnet — next protocol release, reset without notice.
pub const NETWORK_PREVIEWNET: &str = "previewnet";

/// The network used when none is configured.
pub const DEFAULT_NETWORK: &str = NETWORK_TESTNET;

/// Returns true if `name` is a network designation the gateway understands.
pub fn is_known_network(name: &str) -> bool {
    matches!(name, NETWORK_MAINNET | NETWORK_TESTNET | NETWORK_PREVIEWNET)
}

// ---------------------------------------------------------------------------
// Service Parameters
// ---------------------------------------------------------------------------

/// Service name reported by the liveness probe.
pub const SERVICE_NAME: &str = "tokenise-farm-backend";

/// Default HTTP API port.
pub const DEFAULT_HTTP_PORT: u16 = 4000;

/// Default Prometheus metrics port.
pub const DEFAULT_METRICS_PORT: u16 = 4001;

/// Default base URL of the ledger gateway service.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:7546";

/// How long a single ledger gateway call may take before the coordinator
/// gives up and reports a tokenisation failure. The farm stays registered
/// and the call can be retried.
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);
