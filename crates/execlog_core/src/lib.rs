//! Core logic for recording and querying student execution records.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use tokio_util::sync::CancellationToken;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{
    Language, LanguageId, NewStudent, NewTask, Student, StudentId, Task, TaskId,
};
pub use model::record::{NewRecord, RecordId, RecordRow};
pub use model::timestamp::{TimestampError, CREATED_PATTERN, DATE_FILTER_PATTERN};
pub use repo::record_repo::{
    RecordQuery, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use service::record_service::{EntityKind, RecordService, RecordServiceError, ServiceResult};
pub use service::record_view::{
    CreateRecordRequest, LanguageView, RecordListFilter, RecordView, StudentView, TaskView,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
