//! Command-line entry point for the execution record store.
//!
//! # Responsibility
//! - Map subcommands onto repository seeding and record service calls.
//! - Print results as JSON on stdout, errors on stderr.
//!
//! # Exit codes
//! - `0` success, `2` invalid input or missing reference, `1` anything else.

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, CreateArgs, LanguageCommand, RecordCommand, StudentCommand};
use execlog_core::db::open_db;
use execlog_core::{
    default_log_level, init_logging, CancellationToken, CreateRecordRequest, NewStudent,
    NewTask, RecordListFilter, RecordRepository, RecordService, RecordServiceError,
    SqliteRecordRepository,
};
use serde_json::to_string_pretty;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    let client_error = err
        .downcast_ref::<RecordServiceError>()
        .is_some_and(RecordServiceError::is_client_error);
    if client_error {
        2
    } else {
        1
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let mut conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let repo = SqliteRecordRepository::try_new(&mut conn)?;
    let cancel = CancellationToken::new();

    let output = match cli.command {
        Commands::Student(StudentCommand::Add {
            first_name,
            last_name,
            email,
        }) => {
            let student = repo.insert_student(&NewStudent {
                first_name,
                last_name,
                email,
            })?;
            to_string_pretty(&student)?
        }
        Commands::Language(LanguageCommand::Add { name }) => {
            to_string_pretty(&repo.insert_language(&name)?)?
        }
        Commands::Record(RecordCommand::Get { id }) => {
            let service = RecordService::new(repo);
            match service.get_record(id, &cancel)? {
                Some(view) => to_string_pretty(&view)?,
                None => "null".to_string(),
            }
        }
        Commands::Record(RecordCommand::List {
            date,
            language_id,
            task_id,
        }) => {
            let service = RecordService::new(repo);
            let filter = RecordListFilter {
                date,
                language_id,
                task_id,
            };
            to_string_pretty(&service.list_records(&filter, &cancel)?)?
        }
        Commands::Record(RecordCommand::Create(args)) => {
            let request = create_request(args)?;
            let mut service = RecordService::new(repo);
            to_string_pretty(&service.create_record(&request, &cancel)?)?
        }
    };

    println!("{output}");
    Ok(())
}

fn create_request(args: CreateArgs) -> Result<CreateRecordRequest> {
    if let Some(json) = args.json {
        return serde_json::from_str(&json).map_err(|err| {
            anyhow::Error::from(RecordServiceError::InvalidArgument(format!(
                "invalid --json create request: {err}"
            )))
        });
    }

    let task = match (args.task_name, args.task_description) {
        (Some(name), Some(description)) => Some(NewTask::new(name, description)),
        _ => None,
    };

    // clap enforces presence unless --json was given.
    Ok(CreateRecordRequest {
        language_id: args.language_id.context("--language-id is required")?,
        student_id: args.student_id.context("--student-id is required")?,
        task_id: args.task_id.context("--task-id is required")?,
        execution_time: args.execution_time.context("--execution-time is required")?,
        created: args.created.context("--created is required")?,
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::{create_request, exit_status};
    use crate::cli::{Cli, Commands, CreateArgs, RecordCommand};
    use anyhow::anyhow;
    use clap::Parser;
    use execlog_core::{EntityKind, NewTask, RecordServiceError, RepoError};

    fn create_args(flags: &[&str]) -> CreateArgs {
        let argv = ["execlog", "record", "create"]
            .into_iter()
            .chain(flags.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Record(RecordCommand::Create(args)) => args,
            _ => panic!("expected record create"),
        }
    }

    #[test]
    fn json_request_uses_camel_case_fields() {
        let args = create_args(&[
            "--json",
            r#"{"languageId":1,"studentId":2,"taskId":3,"executionTime":40,"created":"15/03/2024 14:30:00","task":{"name":"Sort","description":"Implement sort"}}"#,
        ]);
        let request = create_request(args).unwrap();
        assert_eq!(request.language_id, 1);
        assert_eq!(request.student_id, 2);
        assert_eq!(request.task_id, 3);
        assert_eq!(request.execution_time, 40);
        assert_eq!(request.created, "15/03/2024 14:30:00");
        assert_eq!(request.task, Some(NewTask::new("Sort", "Implement sort")));
    }

    #[test]
    fn flag_request_builds_inline_task_only_when_named() {
        let base = [
            "--language-id",
            "1",
            "--student-id",
            "2",
            "--task-id",
            "3",
            "--execution-time",
            "40",
            "--created",
            "15/03/2024 14:30:00",
        ];
        let request = create_request(create_args(&base)).unwrap();
        assert_eq!(request.task_id, 3);
        assert_eq!(request.created, "15/03/2024 14:30:00");
        assert!(request.task.is_none());

        let mut with_task = base.to_vec();
        with_task.extend(["--task-name", "Sort", "--task-description", "Implement sort"]);
        let request = create_request(create_args(&with_task)).unwrap();
        assert_eq!(request.task, Some(NewTask::new("Sort", "Implement sort")));
    }

    #[test]
    fn malformed_json_request_is_a_client_error() {
        let err = create_request(create_args(&["--json", r#"{"languageId":"one"}"#])).unwrap_err();
        assert!(err.to_string().contains("invalid --json create request"));
        assert_eq!(exit_status(&err), 2);
    }

    #[test]
    fn exit_status_separates_client_errors_from_failures() {
        let not_found = anyhow::Error::from(RecordServiceError::NotFound {
            entity: EntityKind::Task,
            id: 9,
        });
        assert_eq!(exit_status(&not_found), 2);

        let invalid = anyhow::Error::from(RecordServiceError::InvalidArgument("bad".to_string()));
        assert_eq!(exit_status(&invalid), 2);

        let repo = anyhow::Error::from(RecordServiceError::Repo(RepoError::MissingRequiredTable(
            "records",
        )));
        assert_eq!(exit_status(&repo), 1);

        assert_eq!(exit_status(&anyhow::Error::from(RecordServiceError::Cancelled)), 1);
        assert_eq!(exit_status(&anyhow!("failed to open database")), 1);
    }
}
