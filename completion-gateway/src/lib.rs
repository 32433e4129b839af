//! Multi-provider completion gateway for CareLine Engine
//!
//! This module provides the single entry point every other component uses
//! to talk to external natural-language completion services:
//! - Ordered fallback across providers (chain of responsibility)
//! - Credential detection: providers without keys drop out of the chain
//!   silently
//! - A bounded timeout per provider attempt, never unbounded retry
//! - A fixed safety preamble injected into every outbound request
//! - Audio transcription for the speech I/O adapter (OpenAI Whisper)
//!
//! Provider failures are logged to the dedicated `gateway::failures`
//! tracing target and the chain advances; only full exhaustion surfaces
//! to callers, who must then fall back to their own rule-based logic.

pub mod config;
pub mod error;
pub mod gateway;
pub mod prompt;
pub mod providers;

pub use config::*;
pub use error::*;
pub use gateway::*;
pub use prompt::*;
pub use providers::CompletionProvider;
