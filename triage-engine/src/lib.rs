//! Clinical triage rules engine for CareLine Engine
//!
//! This module assigns a three-tier urgency verdict (RED / ORANGE / GREEN)
//! to reported symptoms using a declarative, versioned rule table:
//! - Keyword predicates over normalized free text
//! - Numeric thresholds over pain severity, temperature, and glucose
//! - Recency escalation when the same symptom repeats within a 7-day window
//! - Symptom normalization against a clinical codebook with SNOMED codes
//!
//! The engine is deterministic and side-effect-free: it works fully offline
//! with no completion provider, and the recent-symptom history it consults
//! is supplied by the caller rather than queried here.
//!
//! # Tier semantics
//!
//! - **RED**: emergency, immediate care instruction
//! - **ORANGE**: same-day nurse follow-up
//! - **GREEN**: routine logging for provider review
//!
//! RED predicates are evaluated first and short-circuit the evaluation;
//! once a higher tier is matched it is never downgraded within the same
//! call.

pub mod engine;
pub mod error;
pub mod rules;
pub mod symptoms;
pub mod tier;
pub mod vitals;

pub use engine::*;
pub use error::*;
pub use rules::*;
pub use symptoms::*;
pub use tier::*;
pub use vitals::*;
