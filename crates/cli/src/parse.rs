//! ArgMatches → Command translation.

use clap::ArgMatches;
use entrystore_core::RemovalPolicy;
use entrystore_executor::Command;

/// Translate a parsed subcommand into an executor command.
pub fn matches_to_command(matches: &ArgMatches) -> Result<Command, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "no subcommand given".to_string())?;

    match name {
        "add" => Ok(Command::Append {
            value: required_u64(sub, "value")?,
        }),
        "entries" => Ok(Command::ReadAll),
        "get" => Ok(Command::ReadAt {
            index: required_u64(sub, "index")?,
        }),
        "len" => Ok(Command::Len),
        "remove" => {
            let index = required_u64(sub, "index")?;
            let policy = match sub.get_one::<String>("policy") {
                Some(p) => p.parse::<RemovalPolicy>().map_err(|e| e.to_string())?,
                None => RemovalPolicy::SwapCompact,
            };
            Ok(remove_command(policy, index))
        }
        "checkpoint" => Ok(Command::Checkpoint),
        "info" => Ok(Command::Info),
        "ping" => Ok(Command::Ping),
        other => Err(format!("unknown command '{}'", other)),
    }
}

/// The Remove* command for a policy.
pub fn remove_command(policy: RemovalPolicy, index: u64) -> Command {
    match policy {
        RemovalPolicy::LeaveGap => Command::RemoveLeavingGaps { index },
        RemovalPolicy::ShiftCompact => Command::RemoveShiftCompact { index },
        RemovalPolicy::SwapCompact => Command::RemoveSwapCompact { index },
    }
}

fn required_u64(matches: &ArgMatches, name: &str) -> Result<u64, String> {
    matches
        .get_one::<u64>(name)
        .copied()
        .ok_or_else(|| format!("missing argument <{}>", name))
}
