//! Execution record model.
//!
//! # Responsibility
//! - Define the record row and its joined read model.
//!
//! # Invariants
//! - `created_at` is always a full date-time; there is no default value.
//! - Records are immutable after insert.

use crate::model::catalog::{Language, LanguageId, Student, StudentId, Task, TaskId};
use chrono::NaiveDateTime;

/// Store-assigned record identifier.
pub type RecordId = i64;

/// Record fields before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub student_id: StudentId,
    pub language_id: LanguageId,
    pub task_id: TaskId,
    /// Execution time in milliseconds.
    pub execution_time: i64,
    pub created_at: NaiveDateTime,
}

/// Persisted record joined with every entity it references.
///
/// Produced by inner joins only, so all three references are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub id: RecordId,
    pub student: Student,
    pub language: Language,
    pub task: Task,
    pub execution_time: i64,
    pub created_at: NaiveDateTime,
}
