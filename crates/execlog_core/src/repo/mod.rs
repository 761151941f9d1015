//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract consumed by the record service.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Lookups report absence as `Ok(None)`; only transport and data
//!   corruption problems are errors.

pub mod record_repo;
