//! Output → human/json/raw string formatting.
//!
//! Three modes:
//! - **Human** (default): Redis-style, e.g. `(integer) 42`, `(empty list)`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`
//! - **Raw** (`--raw`): Bare values, one per line

use entrystore_executor::{DatabaseInfo, Error, Output};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Raw,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Raw => format_raw(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": err.to_string(),
            "detail": err,
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Raw => err.to_string(),
        OutputMode::Human => format!("(error) {}", err),
    }
}

fn format_json(output: &Output) -> String {
    let value = match output {
        Output::Unit => serde_json::Value::Null,
        Output::Entry(v) | Output::Len(v) => serde_json::json!(v),
        Output::Entries(vs) => serde_json::json!(vs),
        Output::DatabaseInfo(info) => serde_json::json!(info),
        Output::Pong { version } => serde_json::json!({ "version": version }),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

fn format_raw(output: &Output) -> String {
    match output {
        Output::Unit => String::new(),
        Output::Entry(v) | Output::Len(v) => v.to_string(),
        Output::Entries(vs) => vs
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        Output::DatabaseInfo(info) => format_info(info),
        Output::Pong { version } => version.clone(),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Entry(v) | Output::Len(v) => format!("(integer) {}", v),
        Output::Entries(vs) if vs.is_empty() => "(empty list)".to_string(),
        Output::Entries(vs) => {
            let width = (vs.len() - 1).to_string().len();
            vs.iter()
                .enumerate()
                .map(|(i, v)| format!("{:>width$}) {}", i, v, width = width))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Output::DatabaseInfo(info) => format_info(info),
        Output::Pong { version } => format!("PONG (entrystore {})", version),
    }
}

fn format_info(info: &DatabaseInfo) -> String {
    let path = info
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in-memory)".to_string());
    let max_entries = info
        .max_entries
        .map(|m| m.to_string())
        .unwrap_or_else(|| "unlimited".to_string());

    [
        format!("path: {}", path),
        format!("durability: {}", info.durability),
        format!("len: {}", info.len),
        format!("seq: {}", info.seq),
        format!("checkpoint_seq: {}", info.checkpoint_seq),
        format!("wal_segment: {}", info.wal_segment),
        format!("max_entries: {}", max_entries),
        format!("checkpoint_every: {}", info.checkpoint_every),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_entries_show_positions() {
        let out = format_output(&Output::Entries(vec![10, 0, 30]), OutputMode::Human);
        assert_eq!(out, "0) 10\n1) 0\n2) 30");

        let out = format_output(&Output::Entries(vec![]), OutputMode::Human);
        assert_eq!(out, "(empty list)");
    }

    #[test]
    fn test_human_positions_right_aligned() {
        let out = format_output(&Output::Entries((0..11).collect()), OutputMode::Human);
        assert!(out.starts_with(" 0) 0\n"));
        assert!(out.ends_with("10) 10"));
    }

    #[test]
    fn test_raw_and_json() {
        assert_eq!(format_output(&Output::Entry(5), OutputMode::Raw), "5");
        assert_eq!(format_output(&Output::Unit, OutputMode::Raw), "");
        assert_eq!(
            format_output(&Output::Entries(vec![1, 2]), OutputMode::Json),
            "[\n  1,\n  2\n]"
        );
        assert_eq!(format_output(&Output::Len(3), OutputMode::Json), "3");
    }

    #[test]
    fn test_error_formats() {
        let err = Error::InvalidIndex { index: 2, len: 1 };
        assert_eq!(
            format_error(&err, OutputMode::Human),
            "(error) invalid index: index 2, len 1"
        );
        let json: serde_json::Value =
            serde_json::from_str(&format_error(&err, OutputMode::Json)).unwrap();
        assert_eq!(json["detail"]["InvalidIndex"]["len"], 1);
        assert_eq!(format_error(&Error::EmptyStore, OutputMode::Raw), "no entries");
    }
}
