//! Record store schema history.
//!
//! - `0001_init`: students, languages, tasks and records with foreign keys
//!   from each record to its student, language and task.
//! - `0002_record_indexes`: indexes behind the list filters (creation day,
//!   language, task) and the newest-first ordering.
//!
//! The schema version lives in `PRAGMA user_version` and equals the last
//! applied step. All pending steps run in one transaction, so a failed
//! upgrade leaves the store at its previous version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "record_indexes",
        sql: include_str!("0002_record_indexes.sql"),
    },
];

/// Schema version a fully migrated record store reports.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the store is already past
///   [`latest_version`].
/// - [`DbError::Sqlite`] when a step fails; nothing from the run is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored = stored_version(conn)?;
    let latest = latest_version();

    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > stored)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    let names: Vec<&str> = pending.iter().map(|step| step.name).collect();
    info!(
        "event=db_migrate module=db status=ok from_version={stored} to_version={latest} steps={}",
        names.join(",")
    );
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}
