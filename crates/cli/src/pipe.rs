//! Pipe mode: JSON commands in, JSON results out.
//!
//! Each non-empty input line is one serialized `Command`. Each output line
//! is the serialized `Result<Output, Error>` for it (`{"Ok": ...}` or
//! `{"Err": ...}`). Lines starting with `#` are skipped.

use std::io::{self, BufRead, Write};

use entrystore_executor::{Command, Error, Executor, Output};

/// Run pipe mode over stdin/stdout. Returns the process exit code.
pub fn run_pipe(executor: &Executor) -> i32 {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_lines(executor, stdin.lock(), &mut stdout.lock())
}

/// Execute every command line from `input`, writing results to `out`.
pub fn run_lines<R: BufRead, W: Write>(executor: &Executor, input: R, out: &mut W) -> i32 {
    let mut exit_code = 0;

    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(target: "entrystore::cli", error = %e, "Stopped reading stdin");
                exit_code = 1;
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let result: Result<Output, Error> = match serde_json::from_str::<Command>(trimmed) {
            Ok(cmd) => executor.execute(cmd),
            Err(e) => Err(Error::InvalidInput {
                reason: format!("invalid command: {}", e),
            }),
        };
        if result.is_err() {
            exit_code = 1;
        }

        let encoded = serde_json::to_string(&result).unwrap_or_else(|e| {
            format!(
                "{{\"Err\":{{\"Serialization\":{{\"reason\":\"{}\"}}}}}}",
                e.to_string().replace('"', "'")
            )
        });
        if writeln!(out, "{}", encoded).is_err() {
            return 1;
        }
    }

    exit_code
}
