//! Error types for the registry and tokenisation flow.
//!
//! `Validation` and `NotFound` are deterministic and terminal for the
//! request. `Tokenisation` wraps a gateway failure and is potentially
//! transient; the registry is left unmodified, so the caller may retry.
//! None of them are fatal to the process.

use thiserror::Error;

use crate::ledger::GatewayError;

/// Errors surfaced by registry and coordinator operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registration input was missing or invalid. Caller's fault;
    /// never retried automatically.
    #[error("invalid registration: {0}")]
    Validation(String),

    /// The referenced farm id does not exist.
    #[error("farm not found: {0}")]
    NotFound(String),

    /// The ledger gateway failed while creating the fungible asset. The
    /// farm remains registered and the operation is retry-safe at the
    /// registry level. The ledger itself gives no such guarantee: a failure
    /// of unknown cause may have created an asset that never got linked to
    /// the record, which is why the underlying cause is carried here for
    /// operator inspection.
    #[error("tokenisation failed for farm '{farm_id}'")]
    Tokenisation {
        /// Id of the farm whose tokenisation failed.
        farm_id: String,
        /// The gateway-side cause.
        #[source]
        source: GatewayError,
    },
}

impl RegistryError {
    /// Machine-readable tag for the error kind, stable across detail
    /// message changes. Used by the HTTP adapter's error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Tokenisation { .. } => "tokenisation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let v = RegistryError::Validation("x".into());
        let n = RegistryError::NotFound("x".into());
        let t = RegistryError::Tokenisation {
            farm_id: "x".into(),
            source: GatewayError::MissingOperator,
        };
        assert_eq!(v.kind(), "validation");
        assert_eq!(n.kind(), "not_found");
        assert_eq!(t.kind(), "tokenisation");
    }

    #[test]
    fn tokenisation_error_exposes_source() {
        use std::error::Error;
        let err = RegistryError::Tokenisation {
            farm_id: "oak-farm".into(),
            source: GatewayError::Rejected("INSUFFICIENT_TX_FEE".into()),
        };
        let source = err.source().expect("gateway cause should be chained");
        assert!(source.to_string().contains("INSUFFICIENT_TX_FEE"));
    }
}
