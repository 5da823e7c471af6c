//! # Farm Registry
//!
//! The authoritative in-memory store of farm records. The registry owns
//! every record, assigns identifiers, and enforces the two rules that
//! matter: ids are unique and never reassigned, and the
//! registered→tokenised transition happens at most once per record.
//!
//! Storage is a `Vec` in registration order: the list endpoint's order is
//! the registration sequence, and the set is small enough that linear id
//! lookup keeps the structure honest. Records are never deleted; there is
//! no eviction and no expiry.
//!
//! The registry itself is synchronous and lock-free; concurrent access
//! goes through [`SharedRegistry`], and the coordinator is careful never to
//! hold that lock across a network round trip.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::config::{DEFAULT_TOKEN_SYMBOL, MAX_APPRAISED_VALUE};
use crate::error::RegistryError;
use crate::farm::{slugify, tokenisation_ceiling, FarmApplication, FarmRecord, FarmStatus};

/// Shared handle to the registry, used across request handlers and the
/// coordinator. `register` and `mark_tokenised` take the write lock;
/// everything else reads.
pub type SharedRegistry = Arc<RwLock<FarmRegistry>>;

/// The authoritative mapping from farm id to record.
#[derive(Debug, Default)]
pub struct FarmRegistry {
    farms: Vec<FarmRecord>,
}

impl FarmRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { farms: Vec::new() }
    }

    /// Wraps a fresh registry in the lock shared across the service.
    pub fn shared() -> SharedRegistry {
        Arc::new(RwLock::new(Self::new()))
    }

    /// All records in registration order. No side effects, never fails.
    pub fn list(&self) -> &[FarmRecord] {
        &self.farms
    }

    /// Read-only lookup by id.
    pub fn find(&self, id: &str) -> Option<&FarmRecord> {
        self.farms.iter().find(|f| f.id == id)
    }

    /// Number of registered farms.
    pub fn len(&self) -> usize {
        self.farms.len()
    }

    /// True when no farm has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.farms.is_empty()
    }

    /// Validates the application, assigns a unique id, computes the
    /// tokenisation ceiling, and appends the new record.
    ///
    /// Returns the stored record. On any validation failure the registry
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Validation`] when `name` or `location` is missing
    /// or blank, or `estimatedValue` is missing, non-positive, non-finite,
    /// or beyond the supported maximum.
    pub fn register(&mut self, application: FarmApplication) -> Result<FarmRecord, RegistryError> {
        let name = application.name.as_deref().map(str::trim).unwrap_or("");
        let location = application.location.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() || location.is_empty() || application.estimated_value.is_none() {
            return Err(RegistryError::Validation(
                "name, location and estimatedValue are required".into(),
            ));
        }

        let appraised = application.estimated_value.unwrap_or_default();
        if !appraised.is_finite() || appraised <= 0.0 {
            return Err(RegistryError::Validation(format!(
                "estimatedValue must be a positive number, got {appraised}"
            )));
        }
        if appraised > MAX_APPRAISED_VALUE {
            return Err(RegistryError::Validation(format!(
                "estimatedValue exceeds the supported maximum of {MAX_APPRAISED_VALUE}"
            )));
        }

        let id = self.assign_id(name);
        let token_symbol = application
            .token_symbol
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string());
        let token_name = application
            .token_name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("{name} Token"));

        let record = FarmRecord {
            id,
            name: name.to_string(),
            location: location.to_string(),
            hectares: application.hectares.unwrap_or(0.0),
            appraised_value: appraised,
            max_tokenisable_value: tokenisation_ceiling(appraised),
            token_symbol,
            token_name,
            external_token_id: None,
            status: FarmStatus::Registered,
            registered_at: Utc::now(),
        };

        tracing::info!(
            farm = %record.id,
            ceiling = record.max_tokenisable_value,
            "farm registered"
        );
        self.farms.push(record.clone());
        Ok(record)
    }

    /// Commits the registered→tokenised transition.
    ///
    /// Idempotent: an already tokenised record is returned unchanged and
    /// its stored external token id is never overwritten. This is the sole
    /// mutation entry point after creation.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] when no farm has the given id.
    pub fn mark_tokenised(
        &mut self,
        id: &str,
        external_token_id: &str,
    ) -> Result<FarmRecord, RegistryError> {
        let record = self
            .farms
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if record.status == FarmStatus::Tokenised {
            tracing::debug!(farm = %id, "already tokenised, keeping existing token id");
            return Ok(record.clone());
        }

        record.external_token_id = Some(external_token_id.to_string());
        record.status = FarmStatus::Tokenised;
        tracing::info!(farm = %id, token = external_token_id, "farm marked tokenised");
        Ok(record.clone())
    }

    /// Derives a unique id for a new farm. The slug of the name is the
    /// candidate; an empty slug falls back to a positional placeholder.
    /// On collision an incrementing numeric suffix is appended, first-fit,
    /// re-checked against the full id set each attempt.
    fn assign_id(&self, name: &str) -> String {
        let slug = slugify(name);
        let base = if slug.is_empty() {
            format!("farm-{}", self.farms.len() + 1)
        } else {
            slug
        };

        if self.find(&base).is_none() {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}-{n}");
            if self.find(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}
