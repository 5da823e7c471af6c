//! # Farm Records
//!
//! Vocabulary types for the registry. A [`FarmRecord`] is the canonical
//! representation of one registered physical asset; [`FarmStatus`] is its
//! two-state lifecycle. The slug and ceiling math live here because they
//! are pure functions of the input: the registry decides *when* to apply
//! them, this module decides *what* they mean.
//!
//! JSON field names are camelCase to match the service's original wire
//! format (`maxTokenisableValue`, `externalTokenId`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SAFE_COLLATERAL_RATIO;

// ---------------------------------------------------------------------------
// FarmStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a registered farm.
///
/// A farm is `Registered` on creation and becomes `Tokenised` exactly once,
/// when the ledger confirms the asset creation. There is no reverse
/// transition and no re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmStatus {
    /// Registered with the service; no token exists yet.
    Registered,
    /// A fungible asset backing this farm exists on the ledger. Terminal.
    Tokenised,
}

impl fmt::Display for FarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Tokenised => write!(f, "tokenised"),
        }
    }
}

// ---------------------------------------------------------------------------
// FarmRecord
// ---------------------------------------------------------------------------

/// One registered physical farm asset.
///
/// The registry owns the authoritative copy of every record; everything
/// handed out to callers is a clone. Invariant:
/// `status == Tokenised` exactly when `external_token_id` is `Some`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecord {
    /// Unique identifier, derived from the farm name at registration and
    /// never reassigned.
    pub id: String,
    /// Display name of the farm.
    pub name: String,
    /// Free-form location description.
    pub location: String,
    /// Registered land area in hectares. Informational only.
    pub hectares: f64,
    /// Appraised monetary value supplied at registration. Trusted input,
    /// immutable after creation.
    pub appraised_value: f64,
    /// Collateralisation ceiling: round-half-up of 25% of the appraised
    /// value. Fixed at registration.
    pub max_tokenisable_value: u64,
    /// Ticker symbol for the farm's token.
    pub token_symbol: String,
    /// Display name for the farm's token.
    pub token_name: String,
    /// Ledger-assigned asset id. `None` until tokenisation succeeds.
    pub external_token_id: Option<String>,
    /// Lifecycle state.
    pub status: FarmStatus,
    /// When the farm was registered.
    pub registered_at: DateTime<Utc>,
}

impl FarmRecord {
    /// True once the farm has reached its terminal state.
    pub fn is_tokenised(&self) -> bool {
        self.status == FarmStatus::Tokenised
    }
}

// ---------------------------------------------------------------------------
// FarmApplication
// ---------------------------------------------------------------------------

/// A registration request as submitted by a caller.
///
/// Fields are optional at this layer so that presence validation happens in
/// [`FarmRegistry::register`](crate::registry::FarmRegistry::register) with
/// a descriptive error, keeping the HTTP adapter a thin 1:1 binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmApplication {
    /// Display name of the farm. Required.
    pub name: Option<String>,
    /// Location description. Required.
    pub location: Option<String>,
    /// Land area in hectares. Defaults to 0.
    pub hectares: Option<f64>,
    /// Appraised value in whole currency units. Required, positive.
    pub estimated_value: Option<f64>,
    /// Ticker symbol. Defaults to [`DEFAULT_TOKEN_SYMBOL`](crate::config::DEFAULT_TOKEN_SYMBOL).
    pub token_symbol: Option<String>,
    /// Token display name. Defaults to `"{name} Token"`.
    pub token_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// Computes the maximum tokenisable value for an appraised value.
///
/// Round-half-up of 25% of the appraisal. One token is later issued per
/// whole currency unit of this ceiling. Callers must have validated the
/// value range first; see `FarmRegistry::register`.
pub fn tokenisation_ceiling(appraised_value: f64) -> u64 {
    (appraised_value * SAFE_COLLATERAL_RATIO).round() as u64
}

/// Reduces a farm name to an identifier candidate: lowercased, whitespace
/// runs collapsed to a single hyphen, everything outside `[a-z0-9-]`
/// stripped. Can come out empty (e.g. a name of only punctuation); the
/// registry falls back to a positional placeholder in that case.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_gap = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_gap {
                slug.push('-');
                in_gap = true;
            }
        } else {
            in_gap = false;
            if ch.is_ascii_alphanumeric() || ch == '-' {
                slug.push(ch);
            }
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_is_a_quarter_rounded_half_up() {
        assert_eq!(tokenisation_ceiling(400_000.0), 100_000);
        assert_eq!(tokenisation_ceiling(401_000.0), 100_250);
        // 402 * 0.25 = 100.5, and the half rounds up.
        assert_eq!(tokenisation_ceiling(402.0), 101);
        assert_eq!(tokenisation_ceiling(1.0), 0);
        assert_eq!(tokenisation_ceiling(2.0), 1);
    }

    #[test]
    fn ceiling_handles_fractional_appraisals() {
        // 1000.6 * 0.25 = 250.15 → 250.
        assert_eq!(tokenisation_ceiling(1_000.6), 250);
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Green Acres"), "green-acres");
        assert_eq!(slugify("Oak Farm"), "oak-farm");
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("Green   Acres"), "green-acres");
        assert_eq!(slugify("Green\t \nAcres"), "green-acres");
    }

    #[test]
    fn slugify_strips_disallowed_characters() {
        assert_eq!(slugify("O'Brien & Sons Farm!"), "obrien--sons-farm");
        assert_eq!(slugify("Ferme Élevée"), "ferme-leve");
        assert_eq!(slugify("Plot #42"), "plot-42");
    }

    #[test]
    fn slugify_can_come_out_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("北海道"), "");
    }

    #[test]
    fn status_serialises_lowercase() {
        assert_eq!(
            serde_json::to_string(&FarmStatus::Registered).unwrap(),
            "\"registered\""
        );
        assert_eq!(
            serde_json::to_string(&FarmStatus::Tokenised).unwrap(),
            "\"tokenised\""
        );
    }

    #[test]
    fn record_serialises_with_camel_case_wire_names() {
        let record = FarmRecord {
            id: "oak-farm".into(),
            name: "Oak Farm".into(),
            location: "Devon".into(),
            hectares: 0.0,
            appraised_value: 400_000.0,
            max_tokenisable_value: 100_000,
            token_symbol: "FARM".into(),
            token_name: "Oak Farm Token".into(),
            external_token_id: None,
            status: FarmStatus::Registered,
            registered_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["maxTokenisableValue"], 100_000);
        assert_eq!(json["externalTokenId"], serde_json::Value::Null);
        assert_eq!(json["status"], "registered");
        assert_eq!(json["appraisedValue"], 400_000.0);
    }

    #[test]
    fn application_deserialises_from_wire_format() {
        let app: FarmApplication = serde_json::from_str(
            r#"{"name":"Oak Farm","location":"Devon","estimatedValue":400000}"#,
        )
        .unwrap();
        assert_eq!(app.name.as_deref(), Some("Oak Farm"));
        assert_eq!(app.estimated_value, Some(400_000.0));
        assert!(app.hectares.is_none());
        assert!(app.token_symbol.is_none());
    }
}
