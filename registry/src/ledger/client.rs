//! HTTP client for the ledger gateway service.
//!
//! The gateway exposes asset creation as a single JSON endpoint. This
//! client signs the request with the operator's Ed25519 key, posts it, and
//! extracts the ledger-assigned token id from the response. Everything
//! network-shaped becomes a [`GatewayError`]; nothing here panics.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{CreateAssetRequest, GatewayError, LedgerGateway, OperatorProfile};

/// Ledger gateway reached over HTTP.
///
/// Construction tolerates a missing operator identity so the service can
/// come up without credentials; calls then fail with
/// [`GatewayError::MissingOperator`] instead of taking the process down.
pub struct HttpLedgerGateway {
    http: Client,
    endpoint: String,
    operator: Option<OperatorProfile>,
}

impl HttpLedgerGateway {
    /// Builds a client for the gateway at `endpoint` with the given
    /// per-request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        operator: Option<OperatorProfile>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            operator,
        })
    }

    /// Canonical byte string the operator signs: the fields that define
    /// the asset, in fixed order, pipe-separated. The gateway re-derives
    /// this and verifies the signature against the treasury account.
    fn signing_preimage(request: &CreateAssetRequest, treasury: &str) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            request.name, request.symbol, request.initial_supply, request.max_supply, treasury
        )
    }
}

/// Success body returned by the gateway.
#[derive(Debug, Deserialize)]
struct CreateAssetResponse {
    #[serde(rename = "tokenId")]
    token_id: String,
}

#[async_trait::async_trait]
impl LedgerGateway for HttpLedgerGateway {
    async fn create_fungible_asset(
        &self,
        request: &CreateAssetRequest,
    ) -> Result<String, GatewayError> {
        let operator = self.operator.as_ref().ok_or(GatewayError::MissingOperator)?;

        let preimage = Self::signing_preimage(request, &operator.account);
        let signature = operator.sign(preimage.as_bytes());

        let body = json!({
            "name": request.name,
            "symbol": request.symbol,
            "initialSupply": request.initial_supply,
            "maxSupply": request.max_supply,
            "supplyType": "finite",
            "treasury": operator.account,
            "network": operator.network,
            "signature": signature,
        });

        tracing::debug!(
            symbol = %request.symbol,
            supply = request.initial_supply,
            network = %operator.network,
            "submitting asset creation to ledger gateway"
        );

        let url = format!("{}/v1/tokens", self.endpoint.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected(format!("{status}: {detail}")));
        }

        let parsed: CreateAssetResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(format!("malformed gateway response: {e}")))?;

        tracing::info!(token = %parsed.token_id, symbol = %request.symbol, "ledger created fungible asset");
        Ok(parsed.token_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateAssetRequest {
        CreateAssetRequest {
            name: "Oak Farm Token".into(),
            symbol: "FARM".into(),
            initial_supply: 100_000,
            max_supply: 100_000,
        }
    }

    #[test]
    fn preimage_is_stable_and_field_ordered() {
        let preimage = HttpLedgerGateway::signing_preimage(&request(), "0.0.1001");
        assert_eq!(preimage, "Oak Farm Token|FARM|100000|100000|0.0.1001");
    }

    #[tokio::test]
    async fn missing_operator_fails_without_touching_the_network() {
        // Unroutable endpoint on purpose: the operator check must fire first.
        let gateway =
            HttpLedgerGateway::new("http://127.0.0.1:1", None, Duration::from_millis(100)).unwrap();
        let err = gateway.create_fungible_asset(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingOperator));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_transport_error() {
        let operator = OperatorProfile::generate("0.0.1001", "testnet");
        let gateway =
            HttpLedgerGateway::new("http://127.0.0.1:1", Some(operator), Duration::from_millis(200))
                .unwrap();
        let err = gateway.create_fungible_asset(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
