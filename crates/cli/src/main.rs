//! EntryStore CLI.
//!
//! Two modes:
//! - **Shell mode**: `entrystore [flags] COMMAND` runs one command and exits
//! - **Pipe mode**: `entrystore [flags] < commands.jsonl` reads one JSON
//!   `Command` per line and writes one JSON result per line
//!
//! Exit code is 1 if any command failed.

mod commands;
mod format;
mod parse;
mod pipe;

use std::io::IsTerminal;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use entrystore_engine::Database;
use entrystore_executor::Executor;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::matches_to_command;

/// Default database directory when neither `--db` nor `ENTRYSTORE_DB` is set.
const DEFAULT_DB_PATH: &str = ".entrystore";

fn main() {
    let matches = build_cli().get_matches();

    init_tracing(matches.get_flag("verbose"), matches.get_flag("quiet"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else {
        OutputMode::Human
    };

    let db = match open_database(&matches) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };
    let executor = Executor::new(db);

    let exit_code = if matches.subcommand().is_some() {
        run_shell_mode(&matches, &executor, output_mode)
    } else if std::io::stdin().is_terminal() {
        // Nothing to read; show usage instead of blocking on the terminal
        let _ = build_cli().print_help();
        println!();
        0
    } else {
        pipe::run_pipe(&executor)
    };

    // Drop the executor (and its database) before exiting so the log is flushed
    drop(executor);
    process::exit(exit_code);
}

/// Install the stderr log subscriber.
///
/// `--quiet` turns logging off, `--verbose` shows debug output (or whatever
/// `RUST_LOG` asks for), and the default shows warnings only.
fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"))
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn open_database(matches: &clap::ArgMatches) -> anyhow::Result<Arc<Database>> {
    if matches.get_flag("cache") {
        return Ok(Database::cache());
    }

    let path = matches
        .get_one::<String>("db")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DB_PATH);

    Database::open(path).with_context(|| format!("Failed to open database at '{}'", path))
}

fn run_shell_mode(matches: &clap::ArgMatches, executor: &Executor, mode: OutputMode) -> i32 {
    let cmd = match matches_to_command(matches) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("(error) {}", e);
            return 1;
        }
    };

    match executor.execute(cmd) {
        Ok(output) => {
            let formatted = format_output(&output, mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            1
        }
    }
}
