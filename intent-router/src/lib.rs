//! Intent routing for CareLine Engine
//!
//! Classifies each turn into one of the fixed conversational domains
//! (appointment, followup, medication, caregiver, help) and extracts the
//! 8-digit patient identifier:
//! - Primary path: the completion gateway, constrained to emit one of
//!   the fixed labels as JSON
//! - Fallback path: ordered keyword matching, consulted when the
//!   primary path fails, times out, or returns the uncertain `help`
//!   sentinel
//!
//! Keyword priority is clinical-first: symptom and vital-sign phrases
//! outrank scheduling phrases, which outrank medication and caregiver
//! phrases, because a missed clinical signal costs more than a missed
//! administrative request. The identifier scan runs unconditionally and
//! is independent of classification. Routing never fails: the worst
//! case resolves to `help`.

pub mod intent;
pub mod keywords;
pub mod patient_id;
pub mod router;

pub use intent::*;
pub use keywords::*;
pub use patient_id::*;
pub use router::*;
