use clap::Parser;
use std::env;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Manage departments and employees stored in a SQLite database",
    long_about = "A small object-relational mapper over SQLite. Records are printed to stdout as JSON; logs go to stderr."
)]
pub struct Cli {
    #[arg(
        long,
        env = "STAFFDB_DB",
        default_value = ".staffdb/staffdb.sqlite",
        value_name = "PATH",
        help = "SQLite database file (created if missing)"
    )]
    pub db: String,

    #[arg(
        long,
        default_value_t = false,
        help = "Delete the database file before running the command"
    )]
    pub reset: bool,

    #[arg(
        long = "log-file",
        env = "STAFFDB_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
