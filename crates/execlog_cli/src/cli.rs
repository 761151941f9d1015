use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "execlog")]
#[command(about = "Record and query student execution records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database file
    #[arg(long, env = "EXECLOG_DB_PATH", default_value = "execlog.sqlite3")]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults by build mode
    #[arg(long, env = "EXECLOG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "EXECLOG_LOG_DIR")]
    pub log_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage students
    #[command(subcommand)]
    Student(StudentCommand),

    /// Manage languages
    #[command(subcommand)]
    Language(LanguageCommand),

    /// Create and query execution records
    #[command(subcommand)]
    Record(RecordCommand),
}

#[derive(Subcommand)]
pub enum StudentCommand {
    /// Add a student
    Add {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
pub enum LanguageCommand {
    /// Add a programming language
    Add {
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum RecordCommand {
    /// Show one record
    Get {
        /// Record ID
        id: i64,
    },

    /// List records, newest first
    List {
        /// Creation date, dd/MM/yyyy
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        language_id: Option<i64>,

        #[arg(long)]
        task_id: Option<i64>,
    },

    /// Create a record
    Create(CreateArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    /// Full request as camelCase JSON; overrides the other flags
    #[arg(long, conflicts_with_all = ["language_id", "student_id", "task_id", "execution_time", "created"])]
    pub json: Option<String>,

    #[arg(long, required_unless_present = "json")]
    pub language_id: Option<i64>,

    #[arg(long, required_unless_present = "json")]
    pub student_id: Option<i64>,

    #[arg(long, required_unless_present = "json")]
    pub task_id: Option<i64>,

    /// Execution time in milliseconds
    #[arg(long, required_unless_present = "json")]
    pub execution_time: Option<i64>,

    /// Creation time, dd/MM/yyyy HH:mm:ss
    #[arg(long, required_unless_present = "json")]
    pub created: Option<String>,

    /// Name for a task created when --task-id does not exist
    #[arg(long, requires = "task_description")]
    pub task_name: Option<String>,

    #[arg(long, requires = "task_name")]
    pub task_description: Option<String>,
}
