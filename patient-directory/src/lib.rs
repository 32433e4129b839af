//! Patient data lookup interface for CareLine Engine
//!
//! The patient/appointment/medication/caregiver store is an external
//! collaborator: the engine consumes it through the [`PatientDirectory`]
//! trait and never owns its file format. Lookup misses are `Ok(None)`,
//! not errors; storage faults surface as [`DirectoryError`] and callers
//! degrade to generic responses rather than failing the turn.
//!
//! [`InMemoryDirectory`] is the bundled implementation used by tests and
//! the demo CLI, seeded with a small synthetic roster.

pub mod directory;
pub mod error;
pub mod memory;
pub mod records;

pub use directory::*;
pub use error::*;
pub use memory::*;
pub use records::*;
