//! Common error handling utilities for CareLine Engine
//!
//! This module provides the standardized error types shared across the
//! turn-processing pipeline. It ensures consistent error handling and a
//! single taxonomy for the recoverable conditions every component must
//! agree on.
//!
//! # Error Categories
//!
//! - **ClassificationAmbiguous**: neither classification path yielded a
//!   specific domain; the turn proceeds under the generic `help` handler
//! - **ProviderUnavailable / ProviderTimeout**: a completion provider
//!   failed or exceeded its attempt budget; recovered by the gateway's
//!   fallback chain
//! - **InvalidPatientId**: malformed or unresolvable patient identifier;
//!   handlers proceed without patient context
//! - **MissingConsent**: a caregiver- or minor-related action is blocked
//!   pending provider-mediated approval
//! - **Storage**: audit or data-store write failure, surfaced on a
//!   failure channel and never thrown back into the turn pipeline
//!
//! None of these escape the pipeline as unhandled errors; callers always
//! receive a natural-language response plus a logged record.

pub mod types;

pub use types::*;
