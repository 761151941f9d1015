//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookups over students, languages and tasks.
//! - Insert tasks and records, optionally as one atomic unit.
//! - Run the joined, filtered and ordered record query.
//!
//! # Invariants
//! - Record reads use inner joins; a record whose references are missing is
//!   never returned.
//! - List order is `created_at DESC, last_name ASC (binary), id ASC`.
//! - Read paths reject unparseable `created_at` text instead of masking it.

use crate::db::DbError;
use crate::model::catalog::{
    Language, LanguageId, NewStudent, NewTask, Student, StudentId, Task, TaskId,
};
use crate::model::record::{NewRecord, RecordId, RecordRow};
use crate::model::timestamp::{date_to_storage, from_storage, to_storage};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT
    r.id,
    r.execution_time,
    r.created_at,
    s.id AS student_id,
    s.first_name,
    s.last_name,
    s.email,
    l.id AS language_id,
    l.name AS language_name,
    t.id AS task_id,
    t.name AS task_name,
    t.description AS task_description
FROM records r
INNER JOIN students s ON s.id = r.student_id
INNER JOIN languages l ON l.id = r.language_id
INNER JOIN tasks t ON t.id = r.task_id";

const REQUIRED_TABLES: [&str; 4] = ["students", "languages", "tasks", "records"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection was not migrated; the named table is absent.
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Typed filters for the record list query. Every field is optional and
/// all present fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Calendar date of `created_at`; time of day is ignored.
    pub date: Option<NaiveDate>,
    pub language_id: Option<LanguageId>,
    pub task_id: Option<TaskId>,
}

/// Repository interface for execution records and their references.
pub trait RecordRepository {
    fn find_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn find_language(&self, id: LanguageId) -> RepoResult<Option<Language>>;
    fn find_task(&self, id: TaskId) -> RepoResult<Option<Task>>;

    /// Inserts a student. Used for seeding; record use-cases never call it.
    fn insert_student(&self, student: &NewStudent) -> RepoResult<Student>;
    /// Inserts a language. Used for seeding; record use-cases never call it.
    fn insert_language(&self, name: &str) -> RepoResult<Language>;

    /// Inserts a task under `id`, or under a store-assigned id when `None`.
    fn insert_task(&self, task: &NewTask, id: Option<TaskId>) -> RepoResult<Task>;
    fn insert_record(&self, record: &NewRecord) -> RepoResult<RecordId>;

    /// Inserts a task and then a record referencing it.
    ///
    /// The default runs two independent inserts; a failed record insert
    /// leaves the task behind. Implementations with transactions should
    /// override this to make both inserts atomic.
    fn insert_record_with_task(
        &mut self,
        task: &NewTask,
        task_id: Option<TaskId>,
        record: &NewRecord,
    ) -> RepoResult<(Task, RecordId)> {
        let task = self.insert_task(task, task_id)?;
        let record_id = self.insert_record(record)?;
        Ok((task, record_id))
    }

    /// Gets one record joined with its references.
    fn get_record(&self, id: RecordId) -> RepoResult<Option<RecordRow>>;
    /// Lists joined records matching `query`, in list order.
    fn query_records(&self, query: &RecordQuery) -> RepoResult<Vec<RecordRow>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails with `MissingRequiredTable` when the schema is absent.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn find_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                "SELECT id, first_name, last_name, email FROM students WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Student {
                        id: row.get("id")?,
                        first_name: row.get("first_name")?,
                        last_name: row.get("last_name")?,
                        email: row.get("email")?,
                    })
                },
            )
            .optional()?;
        Ok(student)
    }

    fn find_language(&self, id: LanguageId) -> RepoResult<Option<Language>> {
        let language = self
            .conn
            .query_row("SELECT id, name FROM languages WHERE id = ?1;", [id], |row| {
                Ok(Language {
                    id: row.get("id")?,
                    name: row.get("name")?,
                })
            })
            .optional()?;
        Ok(language)
    }

    fn find_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, name, description FROM tasks WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Task {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        description: row.get("description")?,
                    })
                },
            )
            .optional()?;
        Ok(task)
    }

    fn insert_student(&self, student: &NewStudent) -> RepoResult<Student> {
        self.conn.execute(
            "INSERT INTO students (first_name, last_name, email) VALUES (?1, ?2, ?3);",
            params![
                student.first_name.as_str(),
                student.last_name.as_str(),
                student.email.as_str(),
            ],
        )?;
        Ok(Student {
            id: self.conn.last_insert_rowid(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
        })
    }

    fn insert_language(&self, name: &str) -> RepoResult<Language> {
        self.conn
            .execute("INSERT INTO languages (name) VALUES (?1);", [name])?;
        Ok(Language {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn insert_task(&self, task: &NewTask, id: Option<TaskId>) -> RepoResult<Task> {
        insert_task_on(self.conn, task, id)
    }

    fn insert_record(&self, record: &NewRecord) -> RepoResult<RecordId> {
        insert_record_on(self.conn, record)
    }

    fn insert_record_with_task(
        &mut self,
        task: &NewTask,
        task_id: Option<TaskId>,
        record: &NewRecord,
    ) -> RepoResult<(Task, RecordId)> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let task = insert_task_on(&tx, task, task_id)?;
        let record_id = insert_record_on(&tx, record)?;
        tx.commit()?;
        Ok((task, record_id))
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<RecordRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             WHERE r.id = ?1
             ORDER BY r.created_at ASC, r.id ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn query_records(&self, query: &RecordQuery) -> RepoResult<Vec<RecordRow>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(date) = query.date.as_ref() {
            sql.push_str(" AND date(r.created_at) = ?");
            bind_values.push(Value::Text(date_to_storage(date)));
        }

        if let Some(language_id) = query.language_id {
            sql.push_str(" AND r.language_id = ?");
            bind_values.push(Value::Integer(language_id));
        }

        if let Some(task_id) = query.task_id {
            sql.push_str(" AND r.task_id = ?");
            bind_values.push(Value::Integer(task_id));
        }

        sql.push_str(" ORDER BY r.created_at DESC, s.last_name COLLATE BINARY ASC, r.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }
}

fn insert_task_on(conn: &Connection, task: &NewTask, id: Option<TaskId>) -> RepoResult<Task> {
    // A NULL id lets SQLite assign the next rowid.
    conn.execute(
        "INSERT INTO tasks (id, name, description) VALUES (?1, ?2, ?3);",
        params![id, task.name.as_str(), task.description.as_str()],
    )?;
    Ok(task.clone().into_task(conn.last_insert_rowid()))
}

fn insert_record_on(conn: &Connection, record: &NewRecord) -> RepoResult<RecordId> {
    conn.execute(
        "INSERT INTO records (
            student_id,
            language_id,
            task_id,
            execution_time,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            record.student_id,
            record.language_id,
            record.task_id,
            record.execution_time,
            to_storage(&record.created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<RecordRow> {
    let id: RecordId = row.get("id")?;
    let created_text: String = row.get("created_at")?;
    let created_at = from_storage(&created_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid created_at value `{created_text}` in records.created_at for id {id}"
        ))
    })?;

    Ok(RecordRow {
        id,
        student: Student {
            id: row.get("student_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
        },
        language: Language {
            id: row.get("language_id")?,
            name: row.get("language_name")?,
        },
        task: Task {
            id: row.get("task_id")?,
            name: row.get("task_name")?,
            description: row.get("task_description")?,
        },
        execution_time: row.get("execution_time")?,
        created_at,
    })
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
