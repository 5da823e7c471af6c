// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tokenise.Farm — Registry Core
//!
//! Domain core of the Tokenise.Farm service: register physical farm assets,
//! compute the fraction of their appraised value that is safe to put on a
//! ledger, and coordinate the one-shot creation of a fungible token backing
//! that fraction.
//!
//! The library is deliberately small and sharply layered:
//!
//! - **farm** — Vocabulary types. A farm record, its lifecycle status, the
//!   registration input, and the slug/ceiling math.
//! - **registry** — The authoritative in-memory store. Owns every record,
//!   assigns identifiers, and enforces the registered→tokenised state
//!   machine. No external dependencies, fully synchronous.
//! - **coordinator** — Orchestrates the single external side effect:
//!   creating the fungible asset on the ledger, at most once per farm, and
//!   committing the result back into the registry only on verified success.
//! - **ledger** — The capability boundary toward the distributed ledger.
//!   A narrow async trait plus the HTTP client that implements it.
//! - **config** — Constants. The collateral ratio lives here and nowhere
//!   else.
//! - **error** — The error taxonomy callers see.
//!
//! The registry is volatile by design: process lifetime is registry
//! lifetime. Durability, transfers, and fractional re-tokenisation are
//! explicitly out of scope.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod farm;
pub mod ledger;
pub mod registry;
