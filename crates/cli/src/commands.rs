//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("entrystore")
        .about("Command-line interface for the EntryStore database")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(false)
        .after_help(
            "Without a subcommand, reads one JSON command per line from stdin\n\
             and prints one JSON result per line, e.g.\n\
             \n  echo '{\"Append\":{\"value\":5}}' | entrystore",
        )
        .arg(
            Arg::new("db")
                .long("db")
                .env("ENTRYSTORE_DB")
                .help("Database path (default: .entrystore)")
                .global(true),
        )
        .arg(
            Arg::new("cache")
                .long("cache")
                .help("Ephemeral in-memory database, no disk (overrides --db)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("raw")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Raw output mode (bare values)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show debug logs on stderr")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Suppress all logs")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_add())
        .subcommand(build_entries())
        .subcommand(build_get())
        .subcommand(build_len())
        .subcommand(build_remove())
        .subcommand(build_checkpoint())
        .subcommand(build_info())
        .subcommand(build_ping())
}

fn index_arg() -> Arg {
    Arg::new("index")
        .required(true)
        .value_parser(clap::value_parser!(u64))
        .help("Zero-based position")
}

fn build_add() -> Command {
    Command::new("add").about("Append a value").arg(
        Arg::new("value")
            .required(true)
            .value_parser(clap::value_parser!(u64))
            .help("Unsigned 64-bit value"),
    )
}

fn build_entries() -> Command {
    Command::new("entries").about("List every entry in position order")
}

fn build_get() -> Command {
    Command::new("get")
        .about("Read the entry at a position")
        .arg(index_arg())
}

fn build_len() -> Command {
    Command::new("len").about("Number of entries")
}

fn build_remove() -> Command {
    Command::new("remove")
        .about("Remove the entry at a position")
        .arg(index_arg())
        .arg(
            Arg::new("policy")
                .long("policy")
                .short('p')
                .default_value("swap-compact")
                .help("leave-gap | shift-compact | swap-compact"),
        )
}

fn build_checkpoint() -> Command {
    Command::new("checkpoint").about("Write a checkpoint and prune the log")
}

fn build_info() -> Command {
    Command::new("info").about("Database information")
}

fn build_ping() -> Command {
    Command::new("ping").about("Check the database responds")
}
