//! End-to-end integration tests for the farm registry core.
//!
//! These tests exercise the full lifecycle: registration with identifier
//! assignment and ceiling computation, then tokenisation through the
//! coordinator against a mock ledger gateway. They prove the components
//! compose correctly without any HTTP in between.
//!
//! Each test stands alone with its own registry and gateway. No shared
//! state, no test ordering dependencies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use farm_registry::coordinator::TokenisationCoordinator;
use farm_registry::error::RegistryError;
use farm_registry::farm::{FarmApplication, FarmStatus};
use farm_registry::ledger::{CreateAssetRequest, GatewayError, LedgerGateway};
use farm_registry::registry::{FarmRegistry, SharedRegistry};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Mock gateway: counts invocations and replays a scripted response queue.
struct MockGateway {
    calls: AtomicUsize,
    responses: Mutex<Vec<Result<String, GatewayError>>>,
}

impl MockGateway {
    fn succeeding(token_id: &str) -> Arc<Self> {
        Self::scripted(vec![Ok(token_id.to_string())])
    }

    fn scripted(responses: Vec<Result<String, GatewayError>>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(responses),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LedgerGateway for MockGateway {
    async fn create_fungible_asset(
        &self,
        _request: &CreateAssetRequest,
    ) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock();
        assert!(!responses.is_empty(), "gateway invoked more times than scripted");
        responses.remove(0)
    }
}

fn application(name: &str, location: &str, value: f64) -> FarmApplication {
    FarmApplication {
        name: Some(name.into()),
        location: Some(location.into()),
        estimated_value: Some(value),
        ..FarmApplication::default()
    }
}

fn setup(gateway: Arc<MockGateway>) -> (SharedRegistry, TokenisationCoordinator) {
    let registry = FarmRegistry::shared();
    let coordinator = TokenisationCoordinator::new(registry.clone(), gateway);
    (registry, coordinator)
}

// ---------------------------------------------------------------------------
// 1. Full Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_then_tokenise_full_lifecycle() {
    let gateway = MockGateway::succeeding("0.0.9999");
    let (registry, coordinator) = setup(gateway.clone());

    // Register.
    let farm = registry
        .write()
        .register(application("Oak Farm", "Devon", 400_000.0))
        .unwrap();
    assert_eq!(farm.id, "oak-farm");
    assert_eq!(farm.max_tokenisable_value, 100_000);
    assert_eq!(farm.status, FarmStatus::Registered);

    // Tokenise.
    let outcome = coordinator.tokenise("oak-farm").await.unwrap();
    assert_eq!(outcome.token_id, "0.0.9999");
    assert_eq!(outcome.farm.status, FarmStatus::Tokenised);
    assert_eq!(outcome.farm.external_token_id.as_deref(), Some("0.0.9999"));
    assert_eq!(gateway.calls(), 1);

    // The registry reflects the terminal state, and the invariant holds:
    // tokenised exactly when an external id is present.
    let stored = registry.read().find("oak-farm").cloned().unwrap();
    assert!(stored.is_tokenised());
    assert!(stored.external_token_id.is_some());
}

// ---------------------------------------------------------------------------
// 2. Identifier Assignment Across Registrations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn identifiers_stay_unique_and_ordered_across_the_registry() {
    let gateway = MockGateway::succeeding("0.0.1111");
    let (registry, coordinator) = setup(gateway);

    {
        let mut reg = registry.write();
        reg.register(application("Green Acres", "Kent", 100_000.0)).unwrap();
        reg.register(application("Green Acres", "Somerset", 250_000.0)).unwrap();
        reg.register(application("Mill Pond Farm", "Norfolk", 80_000.0)).unwrap();
    }

    let ids: Vec<String> = registry
        .read()
        .list()
        .iter()
        .map(|f| f.id.clone())
        .collect();
    assert_eq!(ids, ["green-acres", "green-acres-1", "mill-pond-farm"]);

    // Tokenising one farm leaves the others untouched.
    coordinator.tokenise("green-acres-1").await.unwrap();
    let reg = registry.read();
    assert_eq!(reg.find("green-acres").unwrap().status, FarmStatus::Registered);
    assert_eq!(reg.find("green-acres-1").unwrap().status, FarmStatus::Tokenised);
    assert_eq!(reg.find("mill-pond-farm").unwrap().status, FarmStatus::Registered);
}

// ---------------------------------------------------------------------------
// 3. Failure Then Retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_tokenisation_is_retryable_until_it_succeeds() {
    let gateway = MockGateway::scripted(vec![
        Err(GatewayError::Transport("connection reset by peer".into())),
        Err(GatewayError::Rejected("INSUFFICIENT_TX_FEE".into())),
        Ok("0.0.7777".into()),
    ]);
    let (registry, coordinator) = setup(gateway.clone());
    registry
        .write()
        .register(application("Oak Farm", "Devon", 400_000.0))
        .unwrap();

    for _ in 0..2 {
        let err = coordinator.tokenise("oak-farm").await.unwrap_err();
        assert!(matches!(err, RegistryError::Tokenisation { .. }));
        let stored = registry.read().find("oak-farm").cloned().unwrap();
        assert_eq!(stored.status, FarmStatus::Registered);
        assert_eq!(stored.external_token_id, None);
    }

    let outcome = coordinator.tokenise("oak-farm").await.unwrap();
    assert!(outcome.freshly_issued);
    assert_eq!(outcome.token_id, "0.0.7777");
    assert_eq!(gateway.calls(), 3);

    // A further call is a no-op read.
    let again = coordinator.tokenise("oak-farm").await.unwrap();
    assert!(!again.freshly_issued);
    assert_eq!(gateway.calls(), 3);
}

// ---------------------------------------------------------------------------
// 4. Errors Do Not Poison the Registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registry_survives_any_single_failed_call() {
    let gateway = MockGateway::scripted(vec![
        Err(GatewayError::MissingOperator),
        Ok("0.0.2222".into()),
    ]);
    let (registry, coordinator) = setup(gateway);

    // Bad registration: rejected, nothing stored.
    let err = registry
        .write()
        .register(application("", "Devon", 100.0))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(_)));
    assert!(registry.read().is_empty());

    // Unknown farm: rejected.
    let err = coordinator.tokenise("ghost-farm").await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));

    // A real registration and a failed-then-successful tokenisation still
    // work after all of the above.
    registry
        .write()
        .register(application("Oak Farm", "Devon", 400_000.0))
        .unwrap();
    coordinator.tokenise("oak-farm").await.unwrap_err();
    let outcome = coordinator.tokenise("oak-farm").await.unwrap();
    assert_eq!(outcome.token_id, "0.0.2222");
}
