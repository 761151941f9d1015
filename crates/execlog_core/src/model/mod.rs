//! Domain model for execution records and the entities they reference.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the fixed text formats used for record timestamps.
//!
//! # Invariants
//! - Every persisted entity is identified by a store-assigned integer id.
//! - Records reference students, languages and tasks by id only.

pub mod catalog;
pub mod record;
pub mod timestamp;
