//! Turn orchestration engine for CareLine Engine
//!
//! The finite-state dispatcher at the center of the system: each
//! incoming patient message becomes a [`Turn`] that moves through
//! `Start -> Routed -> Handled -> Logged -> Done`, exactly once:
//! - **Routed**: the intent router resolves a conversational domain and
//!   patient id (gateway primary, keyword fallback)
//! - **Handled**: the domain handler for the resolved intent runs --
//!   a closed match over the intent enum, not an open registry -- and
//!   may call the triage engine and/or the completion gateway
//! - **Logged**: the audit engine records the accumulated turn, on
//!   success and failure paths alike
//! - **Done**: the response text and any triage tier return to the
//!   caller
//!
//! Nothing escapes the pipeline as an error: handler faults become an
//! apologetic response with the failure marked in the audit record, and
//! every handler works without gateway access (rule-based behavior is
//! the resilience baseline).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use audit_engine::AuditEngine;
//! use patient_directory::InMemoryDirectory;
//! use triage_engine::TriageEngine;
//! use workflow_engine::{PolicySet, TurnRequest, WorkflowEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = WorkflowEngine::new(
//!     None,
//!     TriageEngine::default(),
//!     Arc::new(InMemoryDirectory::seed_demo()),
//!     Arc::new(AuditEngine::open("logs/turns.jsonl")?),
//!     PolicySet::default(),
//! );
//! let response = engine
//!     .process(TurnRequest::new("I feel dizzy 7/10").with_patient_id("10004235"))
//!     .await;
//! println!("{}", response.response);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod handlers;
pub mod policy;
pub mod turn;

pub use engine::*;
pub use error::*;
pub use policy::*;
pub use turn::*;
