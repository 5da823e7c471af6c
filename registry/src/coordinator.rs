//! # Tokenisation Coordinator
//!
//! Drives the registered→tokenised transition: validates preconditions
//! against the registry, invokes the ledger gateway at most once per
//! transition, and commits the resulting token id back into the registry
//! only on verified success.
//!
//! Locking discipline, because it is the whole point of this module:
//!
//! - The registry lock is held only for snapshot reads and the final
//!   commit, never across the gateway call. `parking_lot` guards are not
//!   `Send`, so holding one across the await would not even compile.
//! - Concurrent `tokenise` calls on the *same* farm serialise on a
//!   per-farm async mutex; the loser re-checks the record afterwards,
//!   observes the winner's terminal state, and short-circuits without a
//!   second gateway call. Other farms are never blocked by the round trip.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::config::GATEWAY_TIMEOUT;
use crate::error::RegistryError;
use crate::farm::FarmRecord;
use crate::ledger::{CreateAssetRequest, GatewayError, LedgerGateway};
use crate::registry::SharedRegistry;

/// Result of a tokenise call.
#[derive(Debug, Clone)]
pub struct TokenisationOutcome {
    /// The record as stored after the call.
    pub farm: FarmRecord,
    /// The ledger-assigned token id.
    pub token_id: String,
    /// False when the farm was already tokenised and the gateway was never
    /// contacted.
    pub freshly_issued: bool,
}

/// Orchestrates the one external side effect of the service.
pub struct TokenisationCoordinator {
    registry: SharedRegistry,
    gateway: Arc<dyn LedgerGateway>,
    /// Per-farm locks serialising concurrent tokenise calls on the same
    /// id. Entries are never removed; the registry never evicts records
    /// either, and a mutex per farm is nothing.
    in_flight: DashMap<String, Arc<Mutex<()>>>,
    gateway_timeout: Duration,
}

impl TokenisationCoordinator {
    /// Builds a coordinator with the default gateway timeout.
    pub fn new(registry: SharedRegistry, gateway: Arc<dyn LedgerGateway>) -> Self {
        Self::with_timeout(registry, gateway, GATEWAY_TIMEOUT)
    }

    /// Builds a coordinator with an explicit gateway timeout.
    pub fn with_timeout(
        registry: SharedRegistry,
        gateway: Arc<dyn LedgerGateway>,
        gateway_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            gateway,
            in_flight: DashMap::new(),
            gateway_timeout,
        }
    }

    /// Clones the farm's current state out of the registry.
    fn snapshot(&self, id: &str) -> Result<FarmRecord, RegistryError> {
        self.registry
            .read()
            .find(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Tokenises the farm with the given id.
    ///
    /// Idempotent from the caller's perspective: an already tokenised farm
    /// is returned as-is without contacting the gateway, and a failed
    /// attempt leaves the record `Registered` so the call can simply be
    /// retried. A retried failure of unknown cause may have left an
    /// orphaned asset on the ledger; the error carries the underlying
    /// cause so an operator can reconcile.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] for an unknown id,
    /// [`RegistryError::Tokenisation`] for any gateway failure or timeout.
    pub async fn tokenise(&self, id: &str) -> Result<TokenisationOutcome, RegistryError> {
        // Fast path: a terminal record needs no serialisation.
        let record = self.snapshot(id)?;
        if let Some(token_id) = record.external_token_id.clone() {
            return Ok(TokenisationOutcome {
                farm: record,
                token_id,
                freshly_issued: false,
            });
        }

        let farm_lock = self
            .in_flight
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let _guard = farm_lock.lock().await;

        // Re-check under the per-farm lock: a racing call may have won and
        // committed while we were waiting.
        let record = self.snapshot(id)?;
        if let Some(token_id) = record.external_token_id.clone() {
            return Ok(TokenisationOutcome {
                farm: record,
                token_id,
                freshly_issued: false,
            });
        }

        // Fixed 1:1 policy: one token per whole currency unit of the
        // ceiling, finite supply capped at the initial issuance.
        let supply = record.max_tokenisable_value;
        let request = CreateAssetRequest {
            name: record.token_name.clone(),
            symbol: record.token_symbol.clone(),
            initial_supply: supply,
            max_supply: supply,
        };

        tracing::info!(farm = %record.id, supply, "creating fungible asset on ledger");

        let issued = match timeout(
            self.gateway_timeout,
            self.gateway.create_fungible_asset(&request),
        )
        .await
        {
            Ok(Ok(token_id)) => token_id,
            Ok(Err(source)) => {
                tracing::warn!(farm = %record.id, error = %source, "ledger gateway failed; farm stays registered");
                return Err(RegistryError::Tokenisation {
                    farm_id: record.id,
                    source,
                });
            }
            Err(_elapsed) => {
                tracing::warn!(farm = %record.id, timeout = ?self.gateway_timeout, "ledger gateway timed out; farm stays registered");
                return Err(RegistryError::Tokenisation {
                    farm_id: record.id,
                    source: GatewayError::Timeout(self.gateway_timeout),
                });
            }
        };

        let farm = self.registry.write().mark_tokenised(id, &issued)?;
        tracing::info!(farm = %farm.id, token = %issued, "farm tokenised");
        Ok(TokenisationOutcome {
            farm,
            token_id: issued,
            freshly_issued: true,
        })
    }
}
