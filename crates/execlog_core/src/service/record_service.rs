//! Execution record use-case service.
//!
//! # Responsibility
//! - Validate timestamps and date filters before touching storage.
//! - Resolve referenced language, student and task; create the task from
//!   inline request data when it is missing.
//! - Shape joined rows into [`RecordView`] responses.
//!
//! # Invariants
//! - Cancellation is checked before every repository call.
//! - A created record references the caller-supplied `task_id`; an inline
//!   task is persisted under that same id so the reference always resolves.
//! - Inline task creation and record insert are one repository call, atomic
//!   on stores that support transactions.
//! - Absence on `get_record` is `Ok(None)`, not an error.

use crate::model::record::{NewRecord, RecordId, RecordRow};
use crate::model::timestamp::{
    format_created, format_listed, parse_created, parse_date_filter, TimestampError,
};
use crate::repo::record_repo::{RecordQuery, RecordRepository, RepoError};
use crate::service::record_view::{CreateRecordRequest, RecordListFilter, RecordView};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Entity kind named in not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Language,
    Student,
    Task,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Language => write!(f, "Language"),
            Self::Student => write!(f, "Student"),
            Self::Task => write!(f, "Task"),
        }
    }
}

/// Errors from record service operations.
#[derive(Debug)]
pub enum RecordServiceError {
    /// Malformed caller input. The message names the value and the pattern.
    InvalidArgument(String),
    /// A referenced entity does not exist.
    NotFound { entity: EntityKind, id: i64 },
    /// The caller cancelled the operation.
    Cancelled,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl RecordServiceError {
    /// Whether the caller supplied bad input, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::NotFound { .. })
    }
}

impl Display for RecordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} with ID {id} not found."),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RecordServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TimestampError> for RecordServiceError {
    fn from(value: TimestampError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

pub type ServiceResult<T> = Result<T, RecordServiceError>;

/// Record service facade over repository implementations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets one record by id with `created` rendered `dd/MM/yyyy HH:mm:ss`.
    pub fn get_record(
        &self,
        id: RecordId,
        cancel: &CancellationToken,
    ) -> ServiceResult<Option<RecordView>> {
        ensure_active(cancel)?;
        let row = self.repo.get_record(id)?;
        debug!(
            "event=record_get module=service status=ok record_id={id} found={}",
            row.is_some()
        );
        Ok(row.map(|row| {
            let created = format_created(&row.created_at);
            RecordView::from_row(row, created)
        }))
    }

    /// Lists records matching `filter`, newest first, then by student last name.
    ///
    /// `created` is rendered `dd/MM/yyyy hh:mm:ss` (12-hour, no AM/PM).
    pub fn list_records(
        &self,
        filter: &RecordListFilter,
        cancel: &CancellationToken,
    ) -> ServiceResult<Vec<RecordView>> {
        let date = match filter.date.as_deref() {
            Some(value) if !value.is_empty() => Some(parse_date_filter(value)?),
            _ => None,
        };
        let query = RecordQuery {
            date,
            language_id: filter.language_id,
            task_id: filter.task_id,
        };

        ensure_active(cancel)?;
        let rows = self.repo.query_records(&query)?;
        info!(
            "event=record_list module=service status=ok count={} date_filter={} language_filter={} task_filter={}",
            rows.len(),
            query.date.is_some(),
            query.language_id.is_some(),
            query.task_id.is_some()
        );

        Ok(rows
            .into_iter()
            .map(|row| {
                let created = format_listed(&row.created_at);
                RecordView::from_row(row, created)
            })
            .collect())
    }

    /// Creates one record after resolving every reference.
    ///
    /// # Contract
    /// - `created` must be `dd/MM/yyyy HH:mm:ss` (24-hour).
    /// - Language, then student, then task are resolved; the first missing
    ///   one fails with `NotFound`.
    /// - A missing task with inline data is created under `request.task_id`.
    pub fn create_record(
        &mut self,
        request: &CreateRecordRequest,
        cancel: &CancellationToken,
    ) -> ServiceResult<RecordView> {
        let started_at = Instant::now();
        let created_at = parse_created(&request.created)?;

        ensure_active(cancel)?;
        let language = self
            .repo
            .find_language(request.language_id)?
            .ok_or(RecordServiceError::NotFound {
                entity: EntityKind::Language,
                id: request.language_id,
            })?;

        ensure_active(cancel)?;
        let student = self
            .repo
            .find_student(request.student_id)?
            .ok_or(RecordServiceError::NotFound {
                entity: EntityKind::Student,
                id: request.student_id,
            })?;

        ensure_active(cancel)?;
        let existing_task = self.repo.find_task(request.task_id)?;

        let record = NewRecord {
            student_id: student.id,
            language_id: language.id,
            task_id: request.task_id,
            execution_time: request.execution_time,
            created_at,
        };

        ensure_active(cancel)?;
        let (task, record_id) = match (existing_task, request.task.as_ref()) {
            (Some(task), _) => {
                let record_id = self.repo.insert_record(&record)?;
                (task, record_id)
            }
            (None, Some(inline)) => {
                let (task, record_id) =
                    self.repo
                        .insert_record_with_task(inline, Some(request.task_id), &record)?;
                info!("event=task_create_inline module=service status=ok task_id={}", task.id);
                (task, record_id)
            }
            (None, None) => {
                return Err(RecordServiceError::NotFound {
                    entity: EntityKind::Task,
                    id: request.task_id,
                });
            }
        };

        info!(
            "event=record_create module=service status=ok record_id={record_id} task_id={} duration_ms={}",
            task.id,
            started_at.elapsed().as_millis()
        );

        let row = RecordRow {
            id: record_id,
            student,
            language,
            task,
            execution_time: record.execution_time,
            created_at,
        };
        Ok(RecordView::from_row(row, format_created(&created_at)))
    }
}

fn ensure_active(cancel: &CancellationToken) -> ServiceResult<()> {
    if cancel.is_cancelled() {
        return Err(RecordServiceError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{EntityKind, RecordServiceError};
    use crate::model::timestamp::parse_date_filter;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = RecordServiceError::NotFound {
            entity: EntityKind::Language,
            id: 7,
        };
        assert_eq!(err.to_string(), "Language with ID 7 not found.");
        assert!(err.is_client_error());
    }

    #[test]
    fn timestamp_errors_become_invalid_argument() {
        let err: RecordServiceError = parse_date_filter("1/1/2024").unwrap_err().into();
        assert!(matches!(err, RecordServiceError::InvalidArgument(ref message)
            if message.contains("1/1/2024") && message.contains("dd/MM/yyyy")));
        assert!(!RecordServiceError::Cancelled.is_client_error());
    }
}
