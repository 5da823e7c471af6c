//! # Ledger Gateway
//!
//! The capability boundary toward the distributed ledger. The rest of the
//! service never talks to the ledger directly: it sees exactly one
//! operation, [`LedgerGateway::create_fungible_asset`], and treats it as
//! failable, asynchronous, and network-bound.
//!
//! The trait is the test seam: production wires in [`HttpLedgerGateway`],
//! tests substitute mocks that count invocations, fail on demand, or hang.

mod client;

pub use client::HttpLedgerGateway;

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures a gateway implementation can surface.
///
/// All of these leave the registry untouched; whether the ledger itself was
/// touched is unknowable for `Transport` and `Timeout` failures, which is
/// exactly why they are carried verbatim up to the operator.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed: connection refused, DNS, TLS, broken
    /// pipe, malformed response body.
    #[error("gateway transport error: {0}")]
    Transport(String),

    /// The operator identity could not sign the request.
    #[error("request signing failed: {0}")]
    Signing(String),

    /// The ledger (or the gateway on its behalf) refused the asset
    /// creation.
    #[error("ledger rejected asset creation: {0}")]
    Rejected(String),

    /// The call exceeded the coordinator's deadline.
    #[error("gateway call timed out after {0:?}")]
    Timeout(Duration),

    /// No operator identity is configured. The service runs without one,
    /// but tokenisation cannot proceed until it is provided.
    #[error("no operator identity configured")]
    MissingOperator,
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Parameters for creating a finite-supply fungible asset.
///
/// `initial_supply == max_supply` by construction in this service: the
/// entire issuance happens at creation and the cap equals it, so no
/// post-issuance minting is possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    /// Display name of the asset (e.g. "Oak Farm Token").
    pub name: String,
    /// Ticker symbol (e.g. "FARM").
    pub symbol: String,
    /// Units minted at creation.
    pub initial_supply: u64,
    /// Hard supply cap.
    pub max_supply: u64,
}

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// A service able to create fungible assets on the ledger.
///
/// This is the one external side effect of the tokenisation flow. The
/// coordinator guarantees at most one call per successful state transition;
/// implementations only have to execute the call and report honestly.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Creates a finite-supply fungible asset issued by the operating
    /// identity and returns the ledger-assigned token id.
    async fn create_fungible_asset(
        &self,
        request: &CreateAssetRequest,
    ) -> Result<String, GatewayError>;
}

// ---------------------------------------------------------------------------
// Operator identity
// ---------------------------------------------------------------------------

/// The operating identity: the ledger account that signs, funds, and acts
/// as treasury for every asset this service creates.
#[derive(Clone)]
pub struct OperatorProfile {
    /// Ledger account id (e.g. "0.0.12345").
    pub account: String,
    /// Target network designation (mainnet, testnet, previewnet).
    pub network: String,
    signing_key: SigningKey,
}

impl OperatorProfile {
    /// Builds an operator profile from a hex-encoded Ed25519 secret key.
    pub fn from_hex(
        account: impl Into<String>,
        key_hex: &str,
        network: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let bytes = hex::decode(key_hex.trim())
            .map_err(|e| GatewayError::Signing(format!("operator key is not valid hex: {e}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| GatewayError::Signing("operator key must be 32 bytes".into()))?;
        Ok(Self {
            account: account.into(),
            network: network.into(),
            signing_key: SigningKey::from_bytes(&bytes),
        })
    }

    /// Generates a fresh operator identity. For tooling and tests; real
    /// deployments load an existing funded account via [`from_hex`](Self::from_hex).
    pub fn generate(account: impl Into<String>, network: impl Into<String>) -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            account: account.into(),
            network: network.into(),
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Signs a payload with the operator key, returning the hex-encoded
    /// signature.
    pub fn sign(&self, payload: &[u8]) -> String {
        hex::encode(self.signing_key.sign(payload).to_bytes())
    }
}

// Never print the signing key, not even in debug output.
impl fmt::Debug for OperatorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorProfile")
            .field("account", &self.account)
            .field("network", &self.network)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_from_hex_roundtrip() {
        let generated = OperatorProfile::generate("0.0.1001", "testnet");
        let key_hex = hex::encode(generated.signing_key.to_bytes());
        let restored = OperatorProfile::from_hex("0.0.1001", &key_hex, "testnet").unwrap();

        // Same key, same signature.
        assert_eq!(generated.sign(b"payload"), restored.sign(b"payload"));
    }

    #[test]
    fn operator_rejects_malformed_keys() {
        assert!(matches!(
            OperatorProfile::from_hex("0.0.1001", "not-hex", "testnet"),
            Err(GatewayError::Signing(_))
        ));
        assert!(matches!(
            OperatorProfile::from_hex("0.0.1001", "deadbeef", "testnet"),
            Err(GatewayError::Signing(_))
        ));
    }

    #[test]
    fn signatures_are_deterministic() {
        let operator = OperatorProfile::generate("0.0.1001", "testnet");
        assert_eq!(operator.sign(b"abc"), operator.sign(b"abc"));
        assert_ne!(operator.sign(b"abc"), operator.sign(b"abd"));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let operator = OperatorProfile::generate("0.0.1001", "testnet");
        let debug = format!("{operator:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&hex::encode(operator.signing_key.to_bytes())));
    }
}
