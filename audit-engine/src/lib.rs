//! Audit logging engine for CareLine Engine
//!
//! Append-only recorder of every processed turn, consumed by external
//! reviewers:
//! - One structured JSON line per turn, never mutated or deleted
//! - Appends are serialized, so concurrent turns interleave whole lines
//!   and never corrupt or truncate each other
//! - A storage failure is retried exactly once, then swallowed and
//!   surfaced through the `audit::failures` tracing target; it never
//!   blocks turn completion or propagates into the pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use audit_engine::{AuditEngine, LogRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = AuditEngine::open("logs/turns.jsonl")?;
//! engine.record(&LogRecord::new("OrchestrationAgent", "I feel dizzy", "response text"));
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod entry;
pub mod error;

pub use engine::*;
pub use entry::*;
pub use error::*;
