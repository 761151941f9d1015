//! Request and response shapes for record use-cases.
//!
//! # Responsibility
//! - Define the flat, read-only view returned to callers.
//! - Define create request and list filter inputs.
//!
//! # Invariants
//! - Serialized field names are camelCase.
//! - `created` is preformatted text; its pattern depends on the operation.

use crate::model::catalog::{Language, LanguageId, NewTask, Student, StudentId, Task, TaskId};
use crate::model::record::{RecordId, RecordRow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageView {
    pub id: LanguageId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: TaskId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Execution record composed with its language, task and student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub id: RecordId,
    pub language: LanguageView,
    pub task: TaskView,
    pub student: StudentView,
    pub execution_time: i64,
    pub created: String,
}

impl RecordView {
    /// Builds a view from a joined row with an already rendered timestamp.
    pub fn from_row(row: RecordRow, created: String) -> Self {
        Self {
            id: row.id,
            language: row.language.into(),
            task: row.task.into(),
            student: row.student.into(),
            execution_time: row.execution_time,
            created,
        }
    }
}

impl From<Language> for LanguageView {
    fn from(value: Language) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<Task> for TaskView {
    fn from(value: Task) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

impl From<Student> for StudentView {
    fn from(value: Student) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
        }
    }
}

/// Input for creating one execution record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub language_id: LanguageId,
    pub student_id: StudentId,
    pub task_id: TaskId,
    /// Execution time in milliseconds.
    pub execution_time: i64,
    /// `dd/MM/yyyy HH:mm:ss`, 24-hour clock.
    pub created: String,
    /// Used only when `task_id` does not resolve to an existing task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<NewTask>,
}

/// Optional, AND-combined list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordListFilter {
    /// `dd/MM/yyyy`. An empty string is treated as absent.
    pub date: Option<String>,
    pub language_id: Option<LanguageId>,
    pub task_id: Option<TaskId>,
}
